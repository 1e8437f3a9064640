#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Download orchestration
//!
//! Two orchestrators over the leaf crates: the [`Issuer`] turns an
//! (email, platform, user-agent) request into a pair of URLs, an audit
//! event, and a best-effort email; the [`Fulfiller`] turns an inbound token
//! plus a platform route into a verified, ready-to-stream artifact.

pub mod fulfill;
pub mod issue;

pub use fulfill::{Fulfiller, Fulfillment};
pub use issue::{IssueOutcome, IssueRequest, Issuer};

#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Platform resolution and compatibility checks
//!
//! This crate maps a requesting client (declared platform or user-agent
//! signals) to a canonical [`Platform`], holds the immutable per-platform
//! distribution registry, and evaluates a client against a platform's
//! minimum requirements.

pub mod compat;
pub mod registry;
pub mod resolve;
pub mod ua;

pub use compat::{recommendations, validate};
pub use registry::{PlatformRegistry, RegistryUrls};
pub use resolve::resolve;
pub use ua::{ClientSignals, DetectedBrowser, DetectedOs, OsFamily};

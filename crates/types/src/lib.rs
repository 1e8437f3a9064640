#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Shared types for the downlink distribution service
//!
//! Platform identity is a closed enum at the core boundary; string parsing
//! happens once at the HTTP edge and bare strings never travel through the
//! resolver, issuer, or fulfiller internals.

mod compat;
mod platform;

pub use compat::{BrowserFamily, CompatibilityResult, Requirements};
pub use platform::{Platform, PlatformConfig};

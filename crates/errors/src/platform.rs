//! Platform resolution error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlatformError {
    #[error("unrecognized platform '{value}'")]
    Unrecognized { value: String },

    #[error("no distribution metadata registered for platform '{platform}'")]
    UnknownPlatform { platform: String },

    #[error("platform '{platform}' is not served from this system")]
    NotServed { platform: String },
}

//! Inbound request validation error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RequestError {
    #[error("email is required")]
    MissingEmail,

    #[error("'{value}' is not a valid email address")]
    InvalidEmail { value: String },
}

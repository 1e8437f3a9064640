//! Download token error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenError {
    #[error("no token supplied")]
    Missing,

    #[error("token structure could not be decoded: {reason}")]
    Malformed { reason: String },

    #[error("token signature does not match payload")]
    SignatureMismatch,

    #[error("token expired at {expired_at}")]
    Expired { expired_at: i64 },

    #[error("token platform claim '{claim}' is not valid for the '{route}' route")]
    PlatformMismatch { claim: String, route: String },
}

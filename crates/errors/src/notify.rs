//! Notification error types
//!
//! Notification failures are always non-fatal to the request that triggered
//! them; these errors are logged and emitted as events, never surfaced to
//! the HTTP client.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NotifyError {
    #[error("failed to send download email to {recipient}: {message}")]
    SendFailed { recipient: String, message: String },

    #[error("notification channel unavailable: {message}")]
    ChannelUnavailable { message: String },
}

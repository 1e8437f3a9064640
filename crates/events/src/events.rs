use downlink_types::Platform;
use serde::{Deserialize, Serialize};

use crate::meta::EventLevel;

/// Top-level event grouping by functional domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", rename_all = "snake_case")]
pub enum AppEvent {
    Download(DownloadEvent),
    Notify(NotifyEvent),
}

impl AppEvent {
    /// Default severity for drain-side logging.
    #[must_use]
    pub fn level(&self) -> EventLevel {
        match self {
            AppEvent::Download(event) => event.level(),
            AppEvent::Notify(event) => event.level(),
        }
    }
}

/// Download issuance and fulfillment events
///
/// `Requested` is the audit record: exactly one per issuance request,
/// emitted before and independently of the notification attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DownloadEvent {
    /// A download was requested; the unconditional audit entry.
    Requested {
        platform: Platform,
        email: String,
        user_agent: String,
    },

    /// A signed link was produced.
    LinkIssued {
        platform: Platform,
        email: String,
        /// True when served from our storage, false for store redirects.
        direct: bool,
    },

    /// An artifact was streamed to a client.
    Fulfilled {
        platform: Platform,
        email: String,
        file_name: String,
        bytes: u64,
        placeholder: bool,
    },

    /// A fulfillment attempt was turned away.
    FulfillRejected { platform: Platform, reason: String },
}

impl DownloadEvent {
    #[must_use]
    pub fn level(&self) -> EventLevel {
        match self {
            DownloadEvent::Requested { .. }
            | DownloadEvent::LinkIssued { .. }
            | DownloadEvent::Fulfilled { .. } => EventLevel::Info,
            DownloadEvent::FulfillRejected { .. } => EventLevel::Warn,
        }
    }
}

/// Email notification events; always best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NotifyEvent {
    EmailSent {
        recipient: String,
        platform: Platform,
    },
    EmailFailed {
        recipient: String,
        platform: Platform,
        error: String,
    },
}

impl NotifyEvent {
    #[must_use]
    pub fn level(&self) -> EventLevel {
        match self {
            NotifyEvent::EmailSent { .. } => EventLevel::Info,
            NotifyEvent::EmailFailed { .. } => EventLevel::Warn,
        }
    }
}

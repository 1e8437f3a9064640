//! Event drain: converts domain events into tracing records
//!
//! The orchestrators emit structured events over a channel; this task turns
//! each one into a log record with structured fields. The audit trail is
//! whatever this drain writes, so the task runs for the life of the process.

use downlink_events::{AppEvent, DownloadEvent, EventMessage, EventReceiver, NotifyEvent};
use tracing::{info, warn};

/// Drain events until every sender is dropped.
pub async fn drain(mut receiver: EventReceiver) {
    while let Some(message) = receiver.recv().await {
        log_event(&message);
    }
}

fn log_event(message: &EventMessage) {
    let meta = &message.meta;
    match &message.event {
        AppEvent::Download(event) => match event {
            DownloadEvent::Requested {
                platform,
                email,
                user_agent,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    platform = %platform,
                    email = %email,
                    user_agent = %user_agent,
                    "download requested"
                );
            }
            DownloadEvent::LinkIssued {
                platform,
                email,
                direct,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    platform = %platform,
                    email = %email,
                    direct = direct,
                    "download link issued"
                );
            }
            DownloadEvent::Fulfilled {
                platform,
                email,
                file_name,
                bytes,
                placeholder,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    platform = %platform,
                    email = %email,
                    file_name = %file_name,
                    bytes = bytes,
                    placeholder = placeholder,
                    "download fulfilled"
                );
            }
            DownloadEvent::FulfillRejected { platform, reason } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    platform = %platform,
                    reason = %reason,
                    "download rejected"
                );
            }
        },
        AppEvent::Notify(event) => match event {
            NotifyEvent::EmailSent {
                recipient,
                platform,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    recipient = %recipient,
                    platform = %platform,
                    "download email sent"
                );
            }
            NotifyEvent::EmailFailed {
                recipient,
                platform,
                error,
            } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    recipient = %recipient,
                    platform = %platform,
                    error = %error,
                    "download email failed"
                );
            }
        },
    }
}

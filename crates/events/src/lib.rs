#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Audit and analytics events for downlink
//!
//! Issuance and fulfillment emit structured events over an unbounded
//! channel; the binary drains them into tracing records. Emission never
//! blocks a request and never fails it: a dropped receiver is silently
//! ignored. Audit events are emitted unconditionally, decoupled from the
//! best-effort notification path, so an email-provider outage never erases
//! the audit trail.

pub mod events;
pub mod meta;

pub use events::{AppEvent, DownloadEvent, NotifyEvent};
pub use meta::{EventLevel, EventMeta, EventSource};

use tokio::sync::mpsc::UnboundedSender;

/// A fully formed event: payload plus emission metadata.
#[derive(Debug, Clone)]
pub struct EventMessage {
    pub meta: EventMeta,
    pub event: AppEvent,
}

/// Type alias for the event sender.
pub type EventSender = UnboundedSender<EventMessage>;

/// Type alias for the event receiver.
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<EventMessage>;

/// Create a new event channel.
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events
///
/// Implemented by anything that holds an `EventSender`; `emit` stamps
/// metadata and ignores send errors so a missing drain never affects the
/// request path.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event with metadata derived from the event itself
    fn emit(&self, source: EventSource, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            let meta = EventMeta::new(event.level(), source);
            // Ignore send errors - if the receiver is dropped, we continue
            let _ = sender.send(EventMessage { meta, event });
        }
    }
}

impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

impl EventEmitter for Option<EventSender> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use downlink_types::Platform;

    #[tokio::test]
    async fn emit_delivers_message_with_metadata() {
        let (tx, mut rx) = channel();
        tx.emit(
            EventSource::Issuer,
            AppEvent::Download(DownloadEvent::Requested {
                platform: Platform::Android,
                email: "a@b.com".to_string(),
                user_agent: "curl/8.0".to_string(),
            }),
        );

        let message = rx.recv().await.unwrap();
        assert_eq!(message.meta.source, EventSource::Issuer);
        assert_eq!(message.meta.level, EventLevel::Info);
        assert!(matches!(
            message.event,
            AppEvent::Download(DownloadEvent::Requested { .. })
        ));
    }

    #[tokio::test]
    async fn emit_with_dropped_receiver_is_silent() {
        let (tx, rx) = channel();
        drop(rx);
        // Must not panic or error
        tx.emit(
            EventSource::Notifier,
            AppEvent::Notify(NotifyEvent::EmailFailed {
                recipient: "a@b.com".to_string(),
                platform: Platform::Mac,
                error: "smtp down".to_string(),
            }),
        );
    }
}

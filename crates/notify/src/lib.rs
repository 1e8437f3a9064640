#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Best-effort download notifications
//!
//! Email delivery is a collaborator behind the [`Mailer`] trait; the actual
//! transport lives outside this system. Dispatch is a detached task with its
//! own failure logging: a provider outage is logged and emitted as an event
//! but never fails or delays the issuance response, which already carries
//! the URLs directly.

use std::sync::Arc;

use async_trait::async_trait;
use downlink_errors::Error;
use downlink_events::{AppEvent, EventEmitter, EventSender, EventSource, NotifyEvent};
use downlink_types::Platform;
use tracing::{info, warn};

/// One download-links email to a requester.
#[derive(Debug, Clone)]
pub struct DownloadEmail {
    pub recipient: String,
    pub platform: Platform,
    pub display_name: String,
    pub primary_url: String,
    pub fallback_url: String,
}

/// Email-sending collaborator contract.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver the download links to the recipient.
    ///
    /// # Errors
    /// Returns `NotifyError` when delivery fails; callers treat this as
    /// best-effort.
    async fn send_download_links(&self, email: &DownloadEmail) -> Result<(), Error>;
}

/// Default mailer for local/dev operation: logs the links instead of
/// delivering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_download_links(&self, email: &DownloadEmail) -> Result<(), Error> {
        info!(
            recipient = %email.recipient,
            platform = %email.platform,
            primary = %email.primary_url,
            fallback = %email.fallback_url,
            "download email (log transport)"
        );
        Ok(())
    }
}

/// Fire-and-forget delivery on a detached task.
///
/// The spawned task emits `EmailSent` or `EmailFailed`; the caller's control
/// flow is unaffected either way.
pub fn dispatch(mailer: Arc<dyn Mailer>, email: DownloadEmail, events: EventSender) {
    tokio::spawn(async move {
        let recipient = email.recipient.clone();
        let platform = email.platform;
        match mailer.send_download_links(&email).await {
            Ok(()) => {
                events.emit(
                    EventSource::Notifier,
                    AppEvent::Notify(NotifyEvent::EmailSent {
                        recipient,
                        platform,
                    }),
                );
            }
            Err(e) => {
                warn!(recipient = %recipient, error = %e, "download email failed");
                events.emit(
                    EventSource::Notifier,
                    AppEvent::Notify(NotifyEvent::EmailFailed {
                        recipient,
                        platform,
                        error: e.to_string(),
                    }),
                );
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use downlink_errors::NotifyError;

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send_download_links(&self, email: &DownloadEmail) -> Result<(), Error> {
            Err(NotifyError::SendFailed {
                recipient: email.recipient.clone(),
                message: "smtp down".to_string(),
            }
            .into())
        }
    }

    fn email() -> DownloadEmail {
        DownloadEmail {
            recipient: "a@b.com".to_string(),
            platform: Platform::Android,
            display_name: "Android".to_string(),
            primary_url: "https://get.example/downloads/android?token=t".to_string(),
            fallback_url: "https://app.example/app".to_string(),
        }
    }

    #[tokio::test]
    async fn successful_send_emits_sent_event() {
        let (tx, mut rx) = downlink_events::channel();
        dispatch(Arc::new(LogMailer), email(), tx);

        let message = rx.recv().await.unwrap();
        assert!(matches!(
            message.event,
            AppEvent::Notify(NotifyEvent::EmailSent { .. })
        ));
    }

    #[tokio::test]
    async fn failed_send_emits_failure_event_not_panic() {
        let (tx, mut rx) = downlink_events::channel();
        dispatch(Arc::new(FailingMailer), email(), tx);

        let message = rx.recv().await.unwrap();
        match message.event {
            AppEvent::Notify(NotifyEvent::EmailFailed { error, .. }) => {
                assert!(error.contains("smtp down"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}

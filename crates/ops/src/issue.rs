//! Download issuance
//!
//! Per-request flow: validate, resolve the platform, record the audit
//! event, mint the token and build URLs, then hand the email off to a
//! detached task. Validation failure rejects the whole request; everything
//! after the audit record is either infallible or best-effort.

use std::sync::Arc;

use downlink_errors::{Error, RequestError};
use downlink_events::{AppEvent, DownloadEvent, EventEmitter, EventSender, EventSource};
use downlink_notify::{DownloadEmail, Mailer};
use downlink_platform::{resolve, PlatformRegistry};
use downlink_token::TokenSigner;
use downlink_types::Platform;

/// Inbound issuance request, already decoded at the HTTP edge.
#[derive(Debug, Clone)]
pub struct IssueRequest {
    pub email: String,
    pub platform: Platform,
    pub user_agent: String,
}

/// Everything the caller needs to hand back to the requester.
#[derive(Debug, Clone)]
pub struct IssueOutcome {
    pub platform: Platform,
    pub download_url: String,
    pub fallback_url: String,
    /// Artifact name for self-hosted platforms, `None` for store redirects.
    pub file_name: Option<String>,
    pub display_name: String,
}

/// Issues signed download links.
#[derive(Clone)]
pub struct Issuer {
    registry: Arc<PlatformRegistry>,
    signer: TokenSigner,
    public_url: String,
    events: EventSender,
    mailer: Arc<dyn Mailer>,
}

impl Issuer {
    #[must_use]
    pub fn new(
        registry: Arc<PlatformRegistry>,
        signer: TokenSigner,
        public_url: impl Into<String>,
        events: EventSender,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            registry,
            signer,
            public_url: public_url.into(),
            events,
            mailer,
        }
    }

    /// Issue download links for a validated request.
    ///
    /// The audit event is emitted unconditionally once validation passes;
    /// the notification email is dispatched fire-and-forget and cannot fail
    /// the request.
    ///
    /// # Errors
    /// Returns `RequestError` for a missing or malformed email and
    /// `PlatformError` when the platform has no registered metadata.
    pub fn issue(&self, request: &IssueRequest) -> Result<IssueOutcome, Error> {
        let email = validate_email(&request.email)?;

        // Meta-platform requests pick their concrete member here; tokens
        // only ever carry concrete platforms.
        let platform = resolve(Some(request.platform), &request.user_agent);
        let config = self.registry.config_for(platform)?.clone();

        // Audit entry first: it must survive any notification outcome.
        self.events.emit(
            EventSource::Issuer,
            AppEvent::Download(DownloadEvent::Requested {
                platform,
                email: email.to_string(),
                user_agent: request.user_agent.clone(),
            }),
        );

        let (download_url, fallback_url) = if let Some(store_url) = &config.store_url {
            // A token is meaningless off-system; store links go out as-is.
            (store_url.clone(), self.registry.web_app_url().to_string())
        } else {
            let token = self.signer.issue(email, platform)?;
            let url = format!(
                "{}/v1/downloads/{}?token={token}",
                self.public_url, platform
            );
            (url, self.registry.web_app_url().to_string())
        };

        self.events.emit(
            EventSource::Issuer,
            AppEvent::Download(DownloadEvent::LinkIssued {
                platform,
                email: email.to_string(),
                direct: config.direct_download(),
            }),
        );

        downlink_notify::dispatch(
            Arc::clone(&self.mailer),
            DownloadEmail {
                recipient: email.to_string(),
                platform,
                display_name: config.display_name.clone(),
                primary_url: download_url.clone(),
                fallback_url: fallback_url.clone(),
            },
            self.events.clone(),
        );

        Ok(IssueOutcome {
            platform,
            download_url,
            fallback_url,
            file_name: config.file_name,
            display_name: config.display_name,
        })
    }
}

fn validate_email(email: &str) -> Result<&str, Error> {
    let email = email.trim();
    if email.is_empty() {
        return Err(RequestError::MissingEmail.into());
    }
    // Deliverability is the mail provider's problem; we only reject shapes
    // that cannot be an address at all.
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(RequestError::InvalidEmail {
            value: email.to_string(),
        }
        .into());
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use downlink_errors::NotifyError;
    use downlink_events::NotifyEvent;
    use downlink_notify::LogMailer;
    use downlink_platform::RegistryUrls;

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send_download_links(&self, email: &DownloadEmail) -> Result<(), Error> {
            Err(NotifyError::SendFailed {
                recipient: email.recipient.clone(),
                message: "provider outage".to_string(),
            }
            .into())
        }
    }

    fn issuer(
        mailer: Arc<dyn Mailer>,
    ) -> (Issuer, downlink_events::EventReceiver) {
        let (tx, rx) = downlink_events::channel();
        let issuer = Issuer::new(
            Arc::new(PlatformRegistry::new(&RegistryUrls::default())),
            TokenSigner::new(*b"unit-test-secret-0123456789abcde"),
            "https://get.example",
            tx,
            mailer,
        );
        (issuer, rx)
    }

    fn request(platform: Platform) -> IssueRequest {
        IssueRequest {
            email: "a@b.com".to_string(),
            platform,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
        }
    }

    #[tokio::test]
    async fn self_hosted_platform_gets_tokenized_route() {
        let (issuer, _rx) = issuer(Arc::new(LogMailer));
        let outcome = issuer.issue(&request(Platform::Android)).unwrap();

        assert!(outcome
            .download_url
            .starts_with("https://get.example/v1/downloads/android?token="));
        assert_eq!(outcome.file_name.as_deref(), Some("downlink.apk"));
        assert_eq!(outcome.display_name, "Android");
    }

    #[tokio::test]
    async fn store_platform_link_carries_no_token() {
        let (issuer, _rx) = issuer(Arc::new(LogMailer));
        let outcome = issuer.issue(&request(Platform::Ios)).unwrap();

        assert!(outcome.download_url.starts_with("https://apps.apple.com/"));
        assert!(!outcome.download_url.contains("token="));
        assert!(outcome.file_name.is_none());
    }

    #[tokio::test]
    async fn desktop_request_resolves_before_issuing() {
        let (issuer, _rx) = issuer(Arc::new(LogMailer));
        let outcome = issuer.issue(&request(Platform::Desktop)).unwrap();
        assert_eq!(outcome.platform, Platform::Windows);
        assert!(outcome.download_url.contains("/downloads/windows?"));
    }

    #[tokio::test]
    async fn missing_email_is_rejected() {
        let (issuer, _rx) = issuer(Arc::new(LogMailer));
        let mut req = request(Platform::Android);
        req.email = "   ".to_string();
        let err = issuer.issue(&req).unwrap_err();
        assert!(matches!(err, Error::Request(RequestError::MissingEmail)));

        req.email = "not-an-address".to_string();
        let err = issuer.issue(&req).unwrap_err();
        assert!(matches!(
            err,
            Error::Request(RequestError::InvalidEmail { .. })
        ));
    }

    #[tokio::test]
    async fn audit_event_survives_mailer_failure() {
        let (issuer, mut rx) = issuer(Arc::new(FailingMailer));
        let outcome = issuer.issue(&request(Platform::Android));
        assert!(outcome.is_ok(), "mailer failure must not fail issuance");

        // First two events are the audit record and the issued link.
        let first = rx.recv().await.unwrap();
        assert!(matches!(
            first.event,
            AppEvent::Download(DownloadEvent::Requested { .. })
        ));
        let second = rx.recv().await.unwrap();
        assert!(matches!(
            second.event,
            AppEvent::Download(DownloadEvent::LinkIssued { .. })
        ));
        // The detached notifier reports its failure as an event.
        let third = rx.recv().await.unwrap();
        assert!(matches!(
            third.event,
            AppEvent::Notify(NotifyEvent::EmailFailed { .. })
        ));
    }
}

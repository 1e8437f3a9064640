//! Download fulfillment
//!
//! Turns a platform route plus a presented token into a verified artifact.
//! Every rejection emits an event naming the reason; no bytes leave the
//! process until the token has verified and the file has passed every
//! integrity check.

use std::sync::Arc;

use downlink_artifact::{ArtifactFile, ArtifactStore};
use downlink_errors::{Error, PlatformError, TokenError};
use downlink_events::{AppEvent, DownloadEvent, EventEmitter, EventSender, EventSource};
use downlink_platform::PlatformRegistry;
use downlink_token::{DownloadToken, TokenSigner};
use downlink_types::Platform;

/// A verified artifact plus the identity and naming needed to stream it.
#[derive(Debug, Clone)]
pub struct Fulfillment {
    pub artifact: ArtifactFile,
    /// Name the client saves the file under.
    pub file_name: String,
    pub claims: DownloadToken,
}

/// Verifies tokens and releases artifacts.
#[derive(Clone)]
pub struct Fulfiller {
    registry: Arc<PlatformRegistry>,
    signer: TokenSigner,
    store: ArtifactStore,
    events: EventSender,
}

impl Fulfiller {
    #[must_use]
    pub fn new(
        registry: Arc<PlatformRegistry>,
        signer: TokenSigner,
        store: ArtifactStore,
        events: EventSender,
    ) -> Self {
        Self {
            registry,
            signer,
            store,
            events,
        }
    }

    /// Verify `token` against `route` and open the platform's artifact.
    ///
    /// # Errors
    /// Returns `TokenError` when the token is absent, fails verification, or
    /// names a different platform than the route; `PlatformError` when the
    /// route has no self-hosted artifact; `ArtifactError` when the file on
    /// disk fails verification.
    pub async fn fulfill(
        &self,
        route: Platform,
        token: Option<&str>,
    ) -> Result<Fulfillment, Error> {
        match self.try_fulfill(route, token).await {
            Ok(fulfillment) => {
                self.events.emit(
                    EventSource::Fulfiller,
                    AppEvent::Download(DownloadEvent::Fulfilled {
                        platform: route,
                        email: fulfillment.claims.subject_email.clone(),
                        file_name: fulfillment.file_name.clone(),
                        bytes: fulfillment.artifact.size,
                        placeholder: fulfillment.artifact.placeholder,
                    }),
                );
                Ok(fulfillment)
            }
            Err(e) => {
                self.events.emit(
                    EventSource::Fulfiller,
                    AppEvent::Download(DownloadEvent::FulfillRejected {
                        platform: route,
                        reason: e.to_string(),
                    }),
                );
                Err(e)
            }
        }
    }

    async fn try_fulfill(
        &self,
        route: Platform,
        token: Option<&str>,
    ) -> Result<Fulfillment, Error> {
        let token = token.ok_or(TokenError::Missing)?;
        let claims = self.signer.verify(token)?;

        // A token minted for one platform never releases another platform's
        // artifact. The meta `desktop` claim is honored for any desktop
        // family route since the concrete member was unknown at issuance.
        let claim_matches = claims.platform == route
            || (claims.platform == Platform::Desktop && route.is_desktop_family());
        if !claim_matches {
            return Err(TokenError::PlatformMismatch {
                claim: claims.platform.to_string(),
                route: route.to_string(),
            }
            .into());
        }

        let config = self.registry.config_for(route)?;
        let file_name = config
            .file_name
            .clone()
            .ok_or_else(|| PlatformError::NotServed {
                platform: route.to_string(),
            })?;

        let artifact = self.store.open_verified(route, &file_name).await?;

        Ok(Fulfillment {
            artifact,
            file_name,
            claims,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use downlink_errors::ArtifactError;
    use downlink_platform::RegistryUrls;
    use downlink_token::TOKEN_TTL_SECS;
    use std::collections::HashMap;
    use std::io::Write;
    use std::path::Path;
    use tempfile::TempDir;

    const SECRET: &[u8; 32] = b"unit-test-secret-0123456789abcde";

    fn write_artifact(dir: &Path, name: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        file.write_all(b"artifact bytes").unwrap();
    }

    fn fulfiller(root: &Path) -> (Fulfiller, downlink_events::EventReceiver) {
        let (tx, rx) = downlink_events::channel();
        let fulfiller = Fulfiller::new(
            Arc::new(PlatformRegistry::new(&RegistryUrls::default())),
            TokenSigner::new(*SECRET),
            ArtifactStore::new(root.to_path_buf(), HashMap::new(), HashMap::new(), false),
            tx,
        );
        (fulfiller, rx)
    }

    fn token_for(platform: Platform) -> String {
        TokenSigner::new(*SECRET)
            .issue("a@b.com", platform)
            .unwrap()
    }

    #[tokio::test]
    async fn valid_token_releases_the_artifact() {
        let dir = TempDir::new().unwrap();
        write_artifact(dir.path(), "downlink.apk");
        let (fulfiller, mut rx) = fulfiller(dir.path());

        let token = token_for(Platform::Android);
        let fulfillment = fulfiller
            .fulfill(Platform::Android, Some(&token))
            .await
            .unwrap();

        assert_eq!(fulfillment.file_name, "downlink.apk");
        assert_eq!(fulfillment.artifact.size, 14);
        assert_eq!(fulfillment.claims.subject_email, "a@b.com");

        let message = rx.recv().await.unwrap();
        assert!(matches!(
            message.event,
            AppEvent::Download(DownloadEvent::Fulfilled { bytes: 14, .. })
        ));
    }

    #[tokio::test]
    async fn missing_token_is_rejected_with_event() {
        let dir = TempDir::new().unwrap();
        let (fulfiller, mut rx) = fulfiller(dir.path());

        let err = fulfiller.fulfill(Platform::Android, None).await.unwrap_err();
        assert!(matches!(err, Error::Token(TokenError::Missing)));

        let message = rx.recv().await.unwrap();
        assert!(matches!(
            message.event,
            AppEvent::Download(DownloadEvent::FulfillRejected { .. })
        ));
    }

    #[tokio::test]
    async fn cross_platform_token_is_rejected() {
        let dir = TempDir::new().unwrap();
        write_artifact(dir.path(), "downlink.dmg");
        let (fulfiller, _rx) = fulfiller(dir.path());

        let token = token_for(Platform::Windows);
        let err = fulfiller
            .fulfill(Platform::Mac, Some(&token))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Token(TokenError::PlatformMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn desktop_claim_is_valid_for_any_desktop_route() {
        let dir = TempDir::new().unwrap();
        write_artifact(dir.path(), "downlink.dmg");
        let (fulfiller, _rx) = fulfiller(dir.path());

        let token = token_for(Platform::Desktop);
        assert!(fulfiller.fulfill(Platform::Mac, Some(&token)).await.is_ok());

        // The alias is only an alias for the desktop family.
        let err = fulfiller
            .fulfill(Platform::Android, Some(&token))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Token(TokenError::PlatformMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let dir = TempDir::new().unwrap();
        write_artifact(dir.path(), "downlink.apk");
        let (fulfiller, _rx) = fulfiller(dir.path());

        let issued = Utc::now() - Duration::seconds(TOKEN_TTL_SECS + 5);
        let token = TokenSigner::new(*SECRET)
            .issue_at("a@b.com", Platform::Android, issued)
            .unwrap();
        let err = fulfiller
            .fulfill(Platform::Android, Some(&token))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Token(TokenError::Expired { .. })));
    }

    #[tokio::test]
    async fn tampered_token_is_rejected_before_disk_access() {
        // No artifact on disk: a signature failure must surface as a token
        // error, proving verification happens first.
        let dir = TempDir::new().unwrap();
        let (fulfiller, _rx) = fulfiller(dir.path());

        let mut token = token_for(Platform::Android);
        token.pop();
        let err = fulfiller
            .fulfill(Platform::Android, Some(&token))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Token(_)));
    }

    #[tokio::test]
    async fn store_platform_has_no_artifact_route() {
        let dir = TempDir::new().unwrap();
        let (fulfiller, _rx) = fulfiller(dir.path());

        let token = token_for(Platform::Ios);
        let err = fulfiller
            .fulfill(Platform::Ios, Some(&token))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Platform(PlatformError::NotServed { .. })
        ));
    }

    #[tokio::test]
    async fn missing_artifact_surfaces_after_token_checks() {
        let dir = TempDir::new().unwrap();
        let (fulfiller, _rx) = fulfiller(dir.path());

        let token = token_for(Platform::Linux);
        let err = fulfiller
            .fulfill(Platform::Linux, Some(&token))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Artifact(ArtifactError::Missing { .. })
        ));
    }
}

#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! HTTP surface for the downlink distribution service
//!
//! Thin actix-web layer over the orchestrators: handlers decode requests,
//! call into [`downlink_ops`], and map domain errors onto HTTP statuses.
//! No business rules live here.

pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;

use std::sync::Arc;

use downlink_artifact::ArtifactStore;
use downlink_config::Config;
use downlink_errors::Error;
use downlink_events::EventSender;
use downlink_notify::Mailer;
use downlink_ops::{Fulfiller, Issuer};
use downlink_platform::{PlatformRegistry, RegistryUrls};
use downlink_token::TokenSigner;

pub use routes::configure_routes;

/// Shared per-process state handed to every handler.
pub struct AppContext {
    issuer: Issuer,
    fulfiller: Fulfiller,
    registry: Arc<PlatformRegistry>,
}

impl AppContext {
    /// Wire the orchestrators up from configuration.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingSecret` when no token secret is set;
    /// every other configuration value has a usable default.
    pub fn from_config(
        config: &Config,
        events: EventSender,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, Error> {
        let secret = config.token.require_secret()?;
        let signer = TokenSigner::new(secret.as_bytes().to_vec());

        let registry = Arc::new(PlatformRegistry::new(&RegistryUrls {
            web_app: config.urls.web_app_url.clone(),
            ios_store: config.urls.ios_store_url.clone(),
        }));

        let store = ArtifactStore::new(
            config.storage.artifact_dir.clone(),
            config.storage.artifact_paths.clone(),
            config.storage.checksums.clone(),
            config.dev.allow_placeholders,
        );

        let issuer = Issuer::new(
            Arc::clone(&registry),
            signer.clone(),
            config.urls.public_url.trim_end_matches('/'),
            events.clone(),
            Arc::clone(&mailer),
        );
        let fulfiller = Fulfiller::new(Arc::clone(&registry), signer, store, events);

        Ok(Self {
            issuer,
            fulfiller,
            registry,
        })
    }

    #[must_use]
    pub fn issuer(&self) -> &Issuer {
        &self.issuer
    }

    #[must_use]
    pub fn fulfiller(&self) -> &Fulfiller {
        &self.fulfiller
    }

    #[must_use]
    pub fn registry(&self) -> &PlatformRegistry {
        &self.registry
    }
}

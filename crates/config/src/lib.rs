#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for downlink
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded, suitable for local/dev operation)
//! - Configuration file (`downlink.toml`)
//! - Environment variables (`DOWNLINK_*`)
//! - CLI flags (applied by the binary, highest precedence)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use downlink_errors::{ConfigError, Error};
use downlink_types::Platform;
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub urls: UrlConfig,

    #[serde(default)]
    pub token: TokenConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub dev: DevConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Public-facing URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Base URL download links are built against.
    #[serde(default = "default_public_url")]
    pub public_url: String,
    /// Browser app, also the universal fallback destination.
    #[serde(default = "default_web_app_url")]
    pub web_app_url: String,
    /// App Store page for the iOS build.
    #[serde(default = "default_ios_store_url")]
    pub ios_store_url: String,
}

/// Token signing configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TokenConfig {
    /// Server-held HMAC secret. Required; no default on purpose.
    pub secret: Option<String>,
}

impl TokenConfig {
    /// The signing secret, or a configuration error if unset.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingSecret` when no secret is configured.
    pub fn require_secret(&self) -> Result<&str, Error> {
        self.secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingSecret.into())
    }
}

/// Artifact storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory the per-platform artifact names resolve under.
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,
    /// Full-path overrides keyed by platform, taking precedence over
    /// `artifact_dir` + registry file name.
    #[serde(default)]
    pub artifact_paths: HashMap<Platform, PathBuf>,
    /// Optional expected blake3 hashes (hex) keyed by platform; enforced at
    /// artifact verification time when present.
    #[serde(default)]
    pub checksums: HashMap<Platform, String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            artifact_dir: default_artifact_dir(),
            artifact_paths: HashMap::new(),
            checksums: HashMap::new(),
        }
    }
}

/// Development conveniences. Everything here must stay off in production.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DevConfig {
    /// Write a clearly-marked stub when an artifact is absent instead of
    /// failing the request. Never enable outside local development.
    #[serde(default)]
    pub allow_placeholders: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            public_url: default_public_url(),
            web_app_url: default_web_app_url(),
            ios_store_url: default_ios_store_url(),
        }
    }
}

// Default value functions for serde

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8480
}

fn default_public_url() -> String {
    "http://127.0.0.1:8480".to_string()
}

fn default_web_app_url() -> String {
    "https://app.downlink.example/app".to_string()
}

fn default_ios_store_url() -> String {
    "https://apps.apple.com/app/downlink/id000000000".to_string()
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("./artifacts")
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration from an optional path, falling back to
    /// `downlink.toml` in the working directory, falling back to defaults
    /// when neither exists.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or
    /// contains invalid TOML syntax.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => {
                let default_path = Path::new("downlink.toml");
                if default_path.exists() {
                    Self::load_from_file(default_path).await
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Ok(host) = std::env::var("DOWNLINK_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("DOWNLINK_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                field: "DOWNLINK_PORT".to_string(),
                value: port,
            })?;
        }
        if let Ok(url) = std::env::var("DOWNLINK_PUBLIC_URL") {
            self.urls.public_url = url;
        }
        if let Ok(url) = std::env::var("DOWNLINK_WEB_APP_URL") {
            self.urls.web_app_url = url;
        }
        if let Ok(url) = std::env::var("DOWNLINK_IOS_STORE_URL") {
            self.urls.ios_store_url = url;
        }
        if let Ok(secret) = std::env::var("DOWNLINK_TOKEN_SECRET") {
            self.token.secret = Some(secret);
        }
        if let Ok(dir) = std::env::var("DOWNLINK_ARTIFACT_DIR") {
            self.storage.artifact_dir = PathBuf::from(dir);
        }
        for platform in Platform::ALL {
            if platform.is_meta() {
                continue;
            }
            let var = format!("DOWNLINK_ARTIFACT_{}", platform.as_str().to_uppercase());
            if let Ok(path) = std::env::var(&var) {
                self.storage
                    .artifact_paths
                    .insert(platform, PathBuf::from(path));
            }
        }
        if let Ok(value) = std::env::var("DOWNLINK_DEV_PLACEHOLDERS") {
            self.dev.allow_placeholders = match value.as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "DOWNLINK_DEV_PLACEHOLDERS".to_string(),
                        value,
                    }
                    .into())
                }
            };
        }
        Ok(())
    }
}

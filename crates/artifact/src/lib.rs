#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Artifact storage and verification
//!
//! Binaries live on durable storage keyed by platform. Before a file is
//! released to a client it must exist, be a regular file, be readable, and
//! be non-empty; when an expected checksum is configured it must also match.
//! Verification failure is fatal to the individual request, never to the
//! process.

pub mod checksum;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use downlink_errors::{ArtifactError, Error};
use downlink_types::Platform;
use tokio::fs;
use tracing::warn;

/// Marker prefix written into dev placeholder stubs so they can never be
/// mistaken for a real release artifact.
pub const PLACEHOLDER_PREFIX: &str = "DOWNLINK-DEV-PLACEHOLDER";

/// A verified, ready-to-stream binary.
#[derive(Debug, Clone)]
pub struct ArtifactFile {
    pub path: PathBuf,
    pub size: u64,
    pub content_type: String,
    /// True when this is a dev stub, never in production configurations.
    pub placeholder: bool,
}

/// Artifact location and verification policy.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
    overrides: HashMap<Platform, PathBuf>,
    checksums: HashMap<Platform, String>,
    allow_placeholders: bool,
}

impl ArtifactStore {
    #[must_use]
    pub fn new(
        root: PathBuf,
        overrides: HashMap<Platform, PathBuf>,
        checksums: HashMap<Platform, String>,
        allow_placeholders: bool,
    ) -> Self {
        Self {
            root,
            overrides,
            checksums,
            allow_placeholders,
        }
    }

    /// Resolve the storage path for a platform's artifact: the configured
    /// override, or the default name under the storage root.
    #[must_use]
    pub fn resolve(&self, platform: Platform, file_name: &str) -> PathBuf {
        self.overrides
            .get(&platform)
            .cloned()
            .unwrap_or_else(|| self.root.join(file_name))
    }

    /// Resolve and verify a platform's artifact, returning the metadata
    /// needed to stream it.
    ///
    /// # Errors
    /// Returns `ArtifactError` when the file is missing, not a regular file,
    /// unreadable, empty, or fails its configured checksum.
    pub async fn open_verified(
        &self,
        platform: Platform,
        file_name: &str,
    ) -> Result<ArtifactFile, Error> {
        let path = self.resolve(platform, file_name);

        let mut placeholder = false;
        if !fs::try_exists(&path).await.unwrap_or(false) {
            if !self.allow_placeholders {
                return Err(ArtifactError::Missing {
                    path: path.display().to_string(),
                }
                .into());
            }
            self.write_placeholder(&path, file_name).await?;
            placeholder = true;
        }

        let size = verify_file(&path).await?;

        // Checksums apply to real artifacts only; a stub can never pass one.
        if !placeholder {
            if let Some(expected) = self.checksums.get(&platform) {
                let actual = checksum::hash_file(&path).await?;
                if !actual.eq_ignore_ascii_case(expected) {
                    return Err(ArtifactError::ChecksumMismatch {
                        path: path.display().to_string(),
                        expected: expected.clone(),
                        actual,
                    }
                    .into());
                }
            }
        }

        Ok(ArtifactFile {
            content_type: content_type_for(file_name),
            path,
            size,
            placeholder,
        })
    }

    async fn write_placeholder(&self, path: &Path, file_name: &str) -> Result<(), Error> {
        warn!(
            path = %path.display(),
            "artifact missing, writing dev placeholder; never enable this in production"
        );
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io_with_path(&e, parent))?;
        }
        let body = format!("{PLACEHOLDER_PREFIX}: stub for {file_name}, not a release artifact\n");
        fs::write(path, body)
            .await
            .map_err(|e| Error::io_with_path(&e, path))
    }
}

/// Check that a path is a readable, non-empty regular file and return its
/// size in bytes.
///
/// # Errors
/// Returns the specific `ArtifactError` for each failed check.
pub async fn verify_file(path: &Path) -> Result<u64, Error> {
    let metadata = fs::metadata(path).await.map_err(|_| ArtifactError::Missing {
        path: path.display().to_string(),
    })?;

    if !metadata.is_file() {
        return Err(ArtifactError::NotAFile {
            path: path.display().to_string(),
        }
        .into());
    }

    if metadata.len() == 0 {
        return Err(ArtifactError::Empty {
            path: path.display().to_string(),
        }
        .into());
    }

    // Readability: an open that fails here would otherwise surface midway
    // through a response body.
    fs::File::open(path)
        .await
        .map_err(|e| ArtifactError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    Ok(metadata.len())
}

/// Content type served for an artifact name.
#[must_use]
pub fn content_type_for(file_name: &str) -> String {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".apk") {
        return "application/vnd.android.package-archive".to_string();
    }
    if lower.ends_with(".exe") {
        return "application/x-msdownload".to_string();
    }
    if lower.ends_with(".dmg") {
        return "application/x-apple-diskimage".to_string();
    }
    if lower.ends_with(".appimage") {
        return "application/octet-stream".to_string();
    }
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .to_string()
}

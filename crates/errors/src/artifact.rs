//! Artifact verification error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArtifactError {
    #[error("artifact not found: {path}")]
    Missing { path: String },

    #[error("artifact is not a regular file: {path}")]
    NotAFile { path: String },

    #[error("artifact is not readable: {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("artifact is empty: {path}")]
    Empty { path: String },

    #[error("artifact checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: String,
        expected: String,
        actual: String,
    },
}

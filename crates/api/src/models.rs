//! Wire-level request and response bodies
//!
//! All JSON fields are camelCase. These types exist only at the HTTP edge;
//! handlers convert them to and from the orchestrator types immediately.

use downlink_types::PlatformConfig;
use serde::{Deserialize, Serialize};

/// POST /v1/api/download request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    #[serde(default)]
    pub email: Option<String>,
    /// Declared platform. When absent the platform is sniffed from the
    /// user agent.
    #[serde(default)]
    pub platform: Option<String>,
    /// Explicit override for clients proxying on behalf of a browser;
    /// otherwise the User-Agent header is used.
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// POST /v1/api/download response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub success: bool,
    pub message: String,
    pub platform: String,
    pub download_url: String,
    pub fallback_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// Issuance failure body; `success` is always false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueFailureBody {
    pub success: bool,
    pub message: String,
}

/// POST /v1/api/compatibility request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityRequest {
    /// When absent the platform is sniffed from the user agent.
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// POST /v1/api/compatibility response body. Always 200 for a well-formed
/// request; incompatibility is data, not an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityResponse {
    pub valid: bool,
    pub platform: String,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    /// Distribution metadata for the platform, absent when unregistered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PlatformConfig>,
}

/// Uniform error body for the fulfillment and compatibility routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

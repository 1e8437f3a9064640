//! Domain error to HTTP response mapping
//!
//! One classifier owns the status mapping so every endpoint rejects the same
//! failure the same way; only the body shape differs per route (the issuance
//! endpoint answers `{success:false, message}`, everything else `{error}`).
//! Client-caused failures echo the domain message; server-side failures are
//! logged in full and answered with a generic body so storage paths and
//! internals never reach a client.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use downlink_errors::{Error, TokenError};
use tracing::error;

use crate::models::{ErrorBody, IssueFailureBody};

fn classify(err: &Error) -> (StatusCode, &'static str, String) {
    match err {
        // Absence of a token is a malformed request, not a failed credential.
        Error::Token(TokenError::Missing) | Error::Request(_) | Error::Platform(_) => {
            (StatusCode::BAD_REQUEST, "invalid_request", err.to_string())
        }

        Error::Token(_) => (StatusCode::UNAUTHORIZED, "invalid_token", err.to_string()),

        Error::Artifact(_) => {
            error!(error = %err, "artifact verification failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "artifact_unavailable",
                "download is temporarily unavailable".to_string(),
            )
        }

        Error::Config(_) | Error::Notify(_) | Error::Internal(_) | Error::Io { .. } => {
            error!(error = %err, "internal error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                "internal server error".to_string(),
            )
        }
    }
}

/// Render a domain error as a `{error: {code, message}}` response.
#[must_use]
pub fn error_response(err: &Error) -> HttpResponse {
    let (status, code, message) = classify(err);
    HttpResponse::build(status).json(ErrorBody::new(code, message))
}

/// Render a domain error in the issuance endpoint's `{success, message}`
/// shape.
#[must_use]
pub fn issue_error_response(err: &Error) -> HttpResponse {
    let (status, _, message) = classify(err);
    HttpResponse::build(status).json(IssueFailureBody {
        success: false,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use downlink_errors::{ArtifactError, PlatformError, RequestError};

    #[test]
    fn statuses_by_domain() {
        let cases: Vec<(Error, StatusCode)> = vec![
            (RequestError::MissingEmail.into(), StatusCode::BAD_REQUEST),
            (
                PlatformError::Unrecognized {
                    value: "amiga".to_string(),
                }
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (TokenError::Missing.into(), StatusCode::BAD_REQUEST),
            (
                TokenError::SignatureMismatch.into(),
                StatusCode::UNAUTHORIZED,
            ),
            (
                TokenError::Expired { expired_at: 0 }.into(),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ArtifactError::Missing {
                    path: "/srv/x".to_string(),
                }
                .into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(error_response(&err).status(), expected, "{err}");
            assert_eq!(issue_error_response(&err).status(), expected, "{err}");
        }
    }

    #[actix_web::test]
    async fn server_errors_do_not_leak_paths() {
        let err: Error = ArtifactError::Missing {
            path: "/srv/secret/location".to_string(),
        }
        .into();
        let response = error_response(&err);
        let bytes = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error.code, "artifact_unavailable");
        assert!(!body.error.message.contains("/srv"));
    }

    #[actix_web::test]
    async fn issuance_failures_use_the_success_flag_shape() {
        let err: Error = RequestError::MissingEmail.into();
        let response = issue_error_response(&err);
        let bytes = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let body: IssueFailureBody = serde_json::from_slice(&bytes).unwrap();
        assert!(!body.success);
        assert!(body.message.contains("email"));
    }
}

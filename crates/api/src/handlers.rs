//! Request handlers
//!
//! Each handler decodes its request, delegates to the orchestrators, and
//! renders the result. Error rendering goes through
//! [`crate::error::error_response`] so statuses stay uniform across
//! endpoints.

use std::sync::Arc;

use actix_web::body::SizedStream;
use actix_web::http::header;
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use downlink_errors::Error;
use downlink_ops::IssueRequest;
use downlink_platform::{recommendations, resolve, validate};
use downlink_types::Platform;

use crate::error::{error_response, issue_error_response};
use crate::models::{
    CompatibilityRequest, CompatibilityResponse, DownloadRequest, DownloadResponse,
};
use crate::AppContext;

fn header_user_agent(request: &HttpRequest) -> String {
    request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// POST /v1/api/download - Issue download links for a platform
///
/// The platform may be declared in the body or omitted, in which case it is
/// sniffed from the user agent. A successful response always carries both a
/// primary URL and the web-app fallback.
#[post("/download")]
pub async fn post_download(
    request: HttpRequest,
    body: web::Json<DownloadRequest>,
    context: web::Data<Arc<AppContext>>,
) -> impl Responder {
    let user_agent = body
        .user_agent
        .clone()
        .unwrap_or_else(|| header_user_agent(&request));

    let platform = match &body.platform {
        Some(value) => match value.parse::<Platform>() {
            Ok(platform) => platform,
            Err(e) => return issue_error_response(&e),
        },
        None => resolve(None, &user_agent),
    };

    let issue = IssueRequest {
        email: body.email.clone().unwrap_or_default(),
        platform,
        user_agent,
    };

    match context.issuer().issue(&issue) {
        Ok(outcome) => HttpResponse::Ok().json(DownloadResponse {
            success: true,
            message: format!("Download link issued for {}", outcome.display_name),
            platform: outcome.platform.to_string(),
            download_url: outcome.download_url,
            fallback_url: outcome.fallback_url,
            file_name: outcome.file_name,
        }),
        Err(e) => issue_error_response(&e),
    }
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    #[serde(default)]
    token: Option<String>,
}

/// GET /v1/downloads/{platform}?token=... - Stream a verified artifact
///
/// Requires a token minted for this platform (or the desktop alias for a
/// desktop-family route). The artifact passes the full verification chain
/// before the first byte leaves the process.
#[get("/downloads/{platform}")]
pub async fn get_download(
    path: web::Path<String>,
    query: web::Query<DownloadQuery>,
    context: web::Data<Arc<AppContext>>,
) -> impl Responder {
    let platform = match path.parse::<Platform>() {
        Ok(platform) => platform,
        Err(e) => return error_response(&e),
    };

    let fulfillment = match context
        .fulfiller()
        .fulfill(platform, query.token.as_deref())
        .await
    {
        Ok(fulfillment) => fulfillment,
        Err(e) => return error_response(&e),
    };

    let file = match tokio::fs::File::open(&fulfillment.artifact.path).await {
        Ok(file) => file,
        Err(e) => {
            return error_response(&Error::io_with_path(&e, &fulfillment.artifact.path));
        }
    };

    HttpResponse::Ok()
        .content_type(fulfillment.artifact.content_type.as_str())
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", fulfillment.file_name),
        ))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        // Content-Length must be set on the response itself; the body's
        // size hint alone does not place the header until wire encoding.
        .no_chunking(fulfillment.artifact.size)
        .body(SizedStream::new(
            fulfillment.artifact.size,
            ReaderStream::new(file),
        ))
}

/// POST /v1/api/compatibility - Advisory compatibility check
///
/// Always 200 for a well-formed request; an incompatible client gets a
/// valid=false verdict with issues and recommendations, never an error
/// status.
#[post("/compatibility")]
pub async fn post_compatibility(
    request: HttpRequest,
    body: web::Json<CompatibilityRequest>,
    context: web::Data<Arc<AppContext>>,
) -> impl Responder {
    let user_agent = body
        .user_agent
        .clone()
        .unwrap_or_else(|| header_user_agent(&request));

    // The desktop meta platform resolves to its concrete member here too,
    // so the verdict describes the download the user would actually get.
    let platform = match &body.platform {
        Some(value) => match value.parse::<Platform>() {
            Ok(platform) => resolve(Some(platform), &user_agent),
            Err(e) => return error_response(&e),
        },
        None => resolve(None, &user_agent),
    };

    let result = validate(platform, &user_agent, context.registry());
    let recommendations = recommendations(platform, &user_agent, context.registry());
    let config = context.registry().config_for(platform).ok().cloned();

    HttpResponse::Ok().json(CompatibilityResponse {
        valid: result.compatible,
        platform: platform.to_string(),
        issues: result.issues,
        recommendations,
        config,
    })
}

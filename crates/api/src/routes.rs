//! API routes configuration
//!
//! All endpoints use the /v1 version prefix:
//! - POST /v1/api/download - Issue download links (and a best-effort email)
//! - GET /v1/downloads/{platform} - Stream a verified artifact by token
//! - POST /v1/api/compatibility - Advisory client compatibility check
//! - GET /v1/api/healthcheck - Health check endpoint

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::handlers;

/// Configure API routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1")
            .service(
                web::scope("/api")
                    .service(handlers::post_download)
                    .service(handlers::post_compatibility)
                    .route("/healthcheck", web::get().to(healthcheck_handler)),
            )
            .service(handlers::get_download),
    );
}

/// Health check endpoint handler
async fn healthcheck_handler() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "apiVersion": "v1",
    }))
}

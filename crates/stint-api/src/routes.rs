//! API routes configuration
//!
//! This module configures all HTTP routes for the stint job gateway.

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::handlers;

/// Configure API routes for the job gateway
///
/// All endpoints use the /v1 version prefix:
/// - POST /v1/api/jobs - submit a job
/// - GET /v1/api/jobs/{job_id} - fetch job status/result
/// - DELETE /v1/api/jobs/{job_id} - delete a job (not while running/stopping)
/// - POST /v1/api/jobs/kill/{job_id} - request termination of a job
/// - GET /v1/api/healthcheck - health check endpoint
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1").service(
            web::scope("/api")
                .service(
                    web::scope("/jobs")
                        .service(handlers::submit_job)
                        .service(handlers::kill_job)
                        .service(handlers::get_job)
                        .service(handlers::delete_job),
                )
                .route("/healthcheck", web::get().to(healthcheck_handler)),
        ),
    );
}

/// Health check endpoint handler
async fn healthcheck_handler() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1"
    }))
}

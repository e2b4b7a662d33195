//! Job endpoints: submit, fetch, delete, kill.

use actix_web::{delete, get, post, web, HttpResponse, Responder};
use std::sync::Arc;
use stint_core::JobManager;

use super::map_gateway_error;
use crate::models::{
    DeleteJobResponse, JobStatusResponse, KillJobResponse, SubmitJobRequest, SubmitJobResponse,
};

/// POST /v1/api/jobs - submit a job
///
/// The request carries the secret coordinates, never the payload; the
/// manager resolves the one-time token and persists the record as `queued`.
#[post("")]
pub async fn submit_job(
    manager: web::Data<Arc<JobManager>>,
    body: web::Json<SubmitJobRequest>,
) -> impl Responder {
    match manager.submit(body.into_inner().into()).await {
        Ok(receipt) => HttpResponse::Ok().json(SubmitJobResponse::from(receipt)),
        Err(err) => map_gateway_error(&err),
    }
}

/// GET /v1/api/jobs/{job_id} - fetch status/result
#[get("/{job_id}")]
pub async fn get_job(
    manager: web::Data<Arc<JobManager>>,
    path: web::Path<String>,
) -> impl Responder {
    match manager.get(&path.into_inner()).await {
        Ok(view) => HttpResponse::Ok().json(JobStatusResponse::from(view)),
        Err(err) => map_gateway_error(&err),
    }
}

/// DELETE /v1/api/jobs/{job_id} - delete if no worker owns the job
#[delete("/{job_id}")]
pub async fn delete_job(
    manager: web::Data<Arc<JobManager>>,
    path: web::Path<String>,
) -> impl Responder {
    match manager.delete(&path.into_inner()).await {
        Ok(job_id) => HttpResponse::Ok().json(DeleteJobResponse {
            id: job_id.into_string(),
        }),
        Err(err) => map_gateway_error(&err),
    }
}

/// POST /v1/api/jobs/kill/{job_id} - latch the kill flag
///
/// The job may be running on a different node, so this only persists the
/// flag for the owning worker to observe on its next poll.
#[post("/kill/{job_id}")]
pub async fn kill_job(
    manager: web::Data<Arc<JobManager>>,
    path: web::Path<String>,
) -> impl Responder {
    match manager.kill(&path.into_inner()).await {
        Ok(receipt) => HttpResponse::Ok().json(KillJobResponse::from(receipt)),
        Err(err) => map_gateway_error(&err),
    }
}

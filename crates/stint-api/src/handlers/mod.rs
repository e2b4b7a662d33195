//! HTTP handlers.

pub mod jobs;

use actix_web::HttpResponse;
use log::{error, warn};
use stint_core::GatewayError;

use crate::models::ErrorResponse;

pub use jobs::{delete_job, get_job, kill_job, submit_job};

/// Map a lifecycle manager outcome onto the fixed error taxonomy.
pub(crate) fn map_gateway_error(err: &GatewayError) -> HttpResponse {
    match err {
        GatewayError::InvalidRequest(_) => {
            warn!("rejected job request: {}", err);
            HttpResponse::BadRequest().json(ErrorResponse::invalid_request(err))
        }
        GatewayError::NotFound(_) => {
            HttpResponse::NotFound().json(ErrorResponse::not_found(err))
        }
        GatewayError::Internal(_) => {
            error!("job request failed: {}", err);
            HttpResponse::InternalServerError().json(ErrorResponse::internal(err))
        }
    }
}

//! API data models
//!
//! Request and response structures for the stint job gateway API.

pub mod error_response;
pub mod job_requests;
pub mod job_responses;

pub use error_response::ErrorResponse;
pub use job_requests::SubmitJobRequest;
pub use job_responses::{
    DeleteJobResponse, JobStatusResponse, KillJobResponse, SubmitJobResponse,
};

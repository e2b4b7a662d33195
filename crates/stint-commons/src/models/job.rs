//! Job entity.
//!
//! The canonical record tracked in the shared job store. The gateway creates
//! it at submission time; workers own every later mutation except the
//! `kill_requested` latch, which only the gateway sets.

use serde::{Deserialize, Serialize};

use crate::ids::JobId;
use crate::models::JobStatus;

/// A unit of requested work tracked as a persistent record.
///
/// ## Fields
/// - `job_id`: gateway-assigned, immutable, time-sortable identifier
/// - `qname`: queue/partition selector, lower-cased on submission
/// - `status`: see [`JobStatus`]
/// - `node_uuid`: worker currently/last owning the job; empty until claimed
/// - `container_image`: execution target reference
/// - `container_id`: runtime handle, set by the worker
/// - `submitted` / `started` / `ended`: unix millis; `None` = not yet reached
/// - `output`: accumulated/final execution output
/// - `return_code`: exit status, meaningful only once `status` is terminal
/// - `kill_requested`: sticky flag set by the gateway, cleared only by a
///   worker's terminal transition
/// - `wrap_secret_id`: client-supplied wrapped-token reference, required
/// - `cubby_token` / `cubby_path`: one-time secret retrieval coordinates
/// - `payload`: plaintext job body, written by the gateway after secret
///   resolution and never accepted from, or echoed back to, clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: JobId,
    pub qname: String,
    pub status: JobStatus,
    pub node_uuid: String,
    pub container_image: String,
    pub container_id: String,
    pub submitted: i64,
    pub started: Option<i64>,
    pub ended: Option<i64>,
    pub output: String,
    pub return_code: Option<i32>,
    pub kill_requested: bool,
    pub wrap_secret_id: String,
    pub cubby_token: String,
    pub cubby_path: String,
    pub payload: String,
}

impl Job {
    /// True when the record may be removed from the store.
    pub fn is_deletable(&self) -> bool {
        !self.status.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SnowflakeGenerator;

    fn sample_job() -> Job {
        let gen = SnowflakeGenerator::new(1);
        Job {
            job_id: JobId::generate(&gen).unwrap(),
            qname: "play".to_string(),
            status: JobStatus::Queued,
            node_uuid: String::new(),
            container_image: "alpine:3.20".to_string(),
            container_id: String::new(),
            submitted: 1730000000000,
            started: None,
            ended: None,
            output: String::new(),
            return_code: None,
            kill_requested: false,
            wrap_secret_id: "wrap-1".to_string(),
            cubby_token: "tok-1".to_string(),
            cubby_path: "cubbyhole/job".to_string(),
            payload: String::new(),
        }
    }

    #[test]
    fn test_deletable_by_status() {
        let mut job = sample_job();
        assert!(job.is_deletable());

        job.status = JobStatus::Running;
        assert!(!job.is_deletable());

        job.status = JobStatus::Stopping;
        assert!(!job.is_deletable());

        job.status = JobStatus::Stopped;
        assert!(job.is_deletable());
    }

    #[test]
    fn test_serde_round_trip() {
        let job = sample_job();
        let json = serde_json::to_string(&job).unwrap();
        let back: Job = serde_json::from_str(&json).unwrap();
        assert_eq!(job, back);
    }
}

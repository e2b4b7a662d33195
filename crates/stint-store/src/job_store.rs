//! The `JobStore` trait and the merge-update patch type.

use async_trait::async_trait;
use stint_commons::{Job, JobId, JobStatus};

use crate::error::Result;

/// A merge-style update of job record fields.
///
/// Only fields set to `Some` are written; everything else is left untouched
/// in the store. This is what lets the gateway flip `kill_requested` while a
/// worker concurrently appends `output` without either write clobbering the
/// other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub node_uuid: Option<String>,
    pub container_id: Option<String>,
    pub started: Option<i64>,
    pub ended: Option<i64>,
    pub output: Option<String>,
    pub return_code: Option<i32>,
    pub kill_requested: Option<bool>,
}

impl JobPatch {
    /// The gateway's one and only write: latch the kill flag on.
    pub fn kill() -> Self {
        Self {
            kill_requested: Some(true),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge this patch into an in-memory job record.
    pub fn apply_to(&self, job: &mut Job) {
        if let Some(status) = self.status {
            job.status = status;
        }
        if let Some(ref node_uuid) = self.node_uuid {
            job.node_uuid = node_uuid.clone();
        }
        if let Some(ref container_id) = self.container_id {
            job.container_id = container_id.clone();
        }
        if let Some(started) = self.started {
            job.started = Some(started);
        }
        if let Some(ended) = self.ended {
            job.ended = Some(ended);
        }
        if let Some(ref output) = self.output {
            job.output = output.clone();
        }
        if let Some(return_code) = self.return_code {
            job.return_code = Some(return_code);
        }
        if let Some(kill_requested) = self.kill_requested {
            job.kill_requested = kill_requested;
        }
    }
}

/// Typed CRUD over the shared job collection.
///
/// Each operation executes exactly one round trip. Failures are surfaced
/// immediately - callers never retry (a second insert would risk
/// duplication, and a consumed wrap token cannot be re-resolved anyway).
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persist a new job record. Fails with [`crate::StoreError::WriteFailed`]
    /// on any underlying error, including an ID collision.
    async fn insert(&self, job: &Job) -> Result<()>;

    /// Fetch a job record by ID.
    async fn find_by_id(&self, id: &JobId) -> Result<Job>;

    /// Merge the patch's named fields into an existing record.
    async fn update_partial(&self, id: &JobId, patch: &JobPatch) -> Result<()>;

    /// Remove a job record by ID.
    async fn remove_by_id(&self, id: &JobId) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use stint_commons::SnowflakeGenerator;

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
            payload: "plaintext".to_string(),
        }
    }

    #[test]
    fn test_kill_patch_touches_only_the_flag() {
        let patch = JobPatch::kill();
        let mut job = sample_job();
        let before = job.clone();

        patch.apply_to(&mut job);

        assert!(job.kill_requested);
        job.kill_requested = false;
        assert_eq!(job, before);
    }

    #[test]
    fn test_apply_merges_disjoint_fields() {
        let mut job = sample_job();

        let worker_patch = JobPatch {
            status: Some(JobStatus::Running),
            node_uuid: Some("node-7".to_string()),
            started: Some(1730000001000),
            ..Default::default()
        };
        worker_patch.apply_to(&mut job);

        JobPatch::kill().apply_to(&mut job);

        assert_eq!(job.status, JobStatus::Running);
        assert_eq!(job.node_uuid, "node-7");
        assert_eq!(job.started, Some(1730000001000));
        assert!(job.kill_requested);
    }

    #[test]
    fn test_is_empty() {
        assert!(JobPatch::default().is_empty());
        assert!(!JobPatch::kill().is_empty());
    }
}

//! Job lifecycle manager.

use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};
use stint_commons::{Job, JobId, JobStatus, SnowflakeGenerator};
use stint_secrets::SecretResolver;
use stint_store::{JobPatch, JobStore};

use crate::error::{GatewayError, Result};

/// A validated submission, as handed over by the API surface.
///
/// Job-type-specific request fields are opaque to this core and never reach
/// it; only the fields below matter for the record lifecycle.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub qname: String,
    pub container_image: String,
    pub wrap_secret_id: String,
    pub cubby_token: String,
    pub cubby_path: String,
}

/// What the caller gets back for an accepted submission.
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    pub job_id: JobId,
    pub status: JobStatus,
    pub qname: String,
}

/// What the caller gets back for a persisted kill request.
///
/// `container_id` and `status` are echoes of the record at read time; the
/// flag itself is reported unconditionally once the update succeeds, since
/// the gateway never waits for worker acknowledgement.
#[derive(Debug, Clone)]
pub struct KillReceipt {
    pub job_id: JobId,
    pub container_id: String,
    pub status: JobStatus,
}

/// Read-only projection of a job record.
///
/// Secret material (`payload`, `cubby_token`, `cubby_path`,
/// `wrap_secret_id`) is excluded structurally - it cannot be re-exposed
/// after ingestion because this type has nowhere to put it.
#[derive(Debug, Clone, PartialEq)]
pub struct JobView {
    pub job_id: JobId,
    pub status: JobStatus,
    pub node_uuid: String,
    pub qname: String,
    pub container_image: String,
    pub submitted: i64,
    pub started: Option<i64>,
    pub ended: Option<i64>,
    pub output: String,
    pub return_code: Option<i32>,
}

impl From<Job> for JobView {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.job_id,
            status: job.status,
            node_uuid: job.node_uuid,
            qname: job.qname,
            container_image: job.container_image,
            submitted: job.submitted,
            started: job.started,
            ended: job.ended,
            output: job.output,
            return_code: job.return_code,
        }
    }
}

/// Core orchestration over the store adapter and the secret resolver.
///
/// One instance is shared by all requests; it holds only the long-lived
/// store/resolver handles and the id generator, all safe for concurrent
/// use. Every operation completes or fails within the scope of the inbound
/// call - nothing outlives the request.
pub struct JobManager {
    store: Arc<dyn JobStore>,
    secrets: Arc<dyn SecretResolver>,
    ids: SnowflakeGenerator,
}

impl JobManager {
    pub fn new(store: Arc<dyn JobStore>, secrets: Arc<dyn SecretResolver>, node_id: u16) -> Self {
        Self {
            store,
            secrets,
            ids: SnowflakeGenerator::new(node_id),
        }
    }

    /// Accept a new job.
    ///
    /// Normalizes the queue name, assigns a fresh ID, resolves the one-time
    /// secret into the record's payload and persists it with status
    /// `queued`. On resolver failure the submission aborts and nothing is
    /// persisted - a record must never exist with an unresolved or stale
    /// payload. A store failure after successful resolution is equally
    /// fatal: the wrap token is spent and cannot be re-resolved.
    pub async fn submit(&self, request: SubmitRequest) -> Result<SubmitReceipt> {
        if request.wrap_secret_id.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "the secret id's wrapping token must be present in the job request".to_string(),
            ));
        }

        let qname = request.qname.to_lowercase();
        let job_id = JobId::generate(&self.ids).map_err(GatewayError::Internal)?;

        let payload = match self
            .secrets
            .resolve(&request.cubby_token, &request.cubby_path)
            .await
        {
            Ok(payload) => payload,
            Err(err) => {
                warn!("secret resolution failed for job {}: {}", job_id, err);
                return Err(err.into());
            }
        };

        let job = Job {
            job_id: job_id.clone(),
            qname: qname.clone(),
            status: JobStatus::Queued,
            node_uuid: String::new(),
            container_image: request.container_image,
            container_id: String::new(),
            submitted: Utc::now().timestamp_millis(),
            started: None,
            ended: None,
            output: String::new(),
            return_code: None,
            kill_requested: false,
            wrap_secret_id: request.wrap_secret_id,
            cubby_token: request.cubby_token,
            cubby_path: request.cubby_path,
            payload,
        };

        self.store.insert(&job).await?;
        info!("job {} queued on {}", job_id, qname);

        Ok(SubmitReceipt {
            job_id,
            status: JobStatus::Queued,
            qname,
        })
    }

    /// Fetch the read-only projection of a job record.
    pub async fn get(&self, raw_id: &str) -> Result<JobView> {
        let job_id = parse_job_id(raw_id)?;
        let job = self.store.find_by_id(&job_id).await?;
        Ok(JobView::from(job))
    }

    /// Delete a job record, provided no worker owns it.
    ///
    /// The read-check-then-remove sequence is not atomic against a
    /// concurrent worker transition; a job could start running between the
    /// two steps. The check is a best-effort guard, not a hard guarantee.
    pub async fn delete(&self, raw_id: &str) -> Result<JobId> {
        let job_id = parse_job_id(raw_id)?;
        let job = self.store.find_by_id(&job_id).await?;

        if job.status.is_active() {
            return Err(GatewayError::InvalidRequest(format!(
                "cannot delete a {} job",
                job.status
            )));
        }

        self.store.remove_by_id(&job_id).await?;
        info!("job {} deleted", job_id);
        Ok(job_id)
    }

    /// Latch the kill flag on a job record.
    ///
    /// The node handling this request is not necessarily the node executing
    /// the job, so the kill cannot happen here. The flag is persisted as a
    /// partial update and the owning worker acts on it the next time it
    /// polls the record. Fire-and-forget: the receipt reports that the flag
    /// was persisted, not that the job was killed.
    pub async fn kill(&self, raw_id: &str) -> Result<KillReceipt> {
        let job_id = parse_job_id(raw_id)?;
        let job = self.store.find_by_id(&job_id).await?;

        self.store.update_partial(&job_id, &JobPatch::kill()).await?;
        info!("kill requested for job {} ({})", job_id, job.status);

        Ok(KillReceipt {
            job_id,
            container_id: job.container_id,
            status: job.status,
        })
    }
}

/// Validate an externally-supplied identifier before touching the store.
fn parse_job_id(raw: &str) -> Result<JobId> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "job id missing from request path".to_string(),
        ));
    }
    JobId::parse(raw).map_err(GatewayError::InvalidRequest)
}

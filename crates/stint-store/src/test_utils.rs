//! Test utilities for stint-store.
//!
//! Provides an in-memory [`JobStore`] so lifecycle and handler tests run
//! without a live Redis instance.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use stint_commons::{Job, JobId};

use crate::error::{Result, StoreError};
use crate::job_store::{JobPatch, JobStore};

/// In-memory job store with the same operation semantics as the Redis
/// adapter.
///
/// Also counts store operations, so tests can assert that validation
/// failures never reach the store at all.
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: Mutex<HashMap<JobId, Job>>,
    ops: AtomicUsize,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a record directly, bypassing the operation counter.
    pub fn seed(&self, job: Job) {
        self.jobs.lock().unwrap().insert(job.job_id.clone(), job);
    }

    /// Snapshot of a stored record, bypassing the operation counter.
    pub fn job(&self, id: &JobId) -> Option<Job> {
        self.jobs.lock().unwrap().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of store operations performed through the trait.
    pub fn op_count(&self) -> usize {
        self.ops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn insert(&self, job: &Job) -> Result<()> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        let mut jobs = self.jobs.lock().unwrap();
        if jobs.contains_key(&job.job_id) {
            return Err(StoreError::WriteFailed(format!(
                "insert {}: record already exists",
                job.job_id
            )));
        }
        jobs.insert(job.job_id.clone(), job.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &JobId) -> Result<Job> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        self.jobs
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update_partial(&self, id: &JobId, patch: &JobPatch) -> Result<()> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        patch.apply_to(job);
        Ok(())
    }

    async fn remove_by_id(&self, id: &JobId) -> Result<()> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        self.jobs
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stint_commons::{JobStatus, SnowflakeGenerator};

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

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = InMemoryJobStore::new();
        let job = sample_job();

        store.insert(&job).await.unwrap();
        let found = store.find_by_id(&job.job_id).await.unwrap();
        assert_eq!(found, job);
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_a_write_failure() {
        let store = InMemoryJobStore::new();
        let job = sample_job();

        store.insert(&job).await.unwrap();
        assert!(matches!(
            store.insert(&job).await,
            Err(StoreError::WriteFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_update_partial_merges() {
        let store = InMemoryJobStore::new();
        let job = sample_job();
        store.seed(job.clone());

        store
            .update_partial(&job.job_id, &JobPatch::kill())
            .await
            .unwrap();

        let stored = store.job(&job.job_id).unwrap();
        assert!(stored.kill_requested);
        assert_eq!(stored.status, JobStatus::Queued);
        assert_eq!(stored.payload, "plaintext");
    }

    #[tokio::test]
    async fn test_missing_records_map_to_not_found() {
        let store = InMemoryJobStore::new();
        let id = JobId::parse("00000deadbeef123").unwrap();

        assert!(matches!(
            store.find_by_id(&id).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.update_partial(&id, &JobPatch::kill()).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.remove_by_id(&id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_deletes_the_record() {
        let store = InMemoryJobStore::new();
        let job = sample_job();
        store.seed(job.clone());

        store.remove_by_id(&job.job_id).await.unwrap();
        assert!(store.is_empty());
    }
}

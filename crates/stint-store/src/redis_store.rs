//! Redis-backed job store.
//!
//! Each job record is a Redis hash at `{key_prefix}:{job_id}`, one hash
//! field per record field. Hash-field granularity is what makes
//! `update_partial` a genuine merge: `HSET` writes only the named fields,
//! so the gateway's `kill_requested` latch and a worker's status/output
//! writes never overwrite each other.
//!
//! Insert and partial update run as small Lua scripts so the
//! existence check and the field writes happen in one round trip.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use stint_commons::{Job, JobId, JobStatus};

use crate::error::{Result, StoreError};
use crate::job_store::{JobPatch, JobStore};

/// Refuses to overwrite an existing record.
const INSERT_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
  return 0
end
for i = 1, #ARGV, 2 do
  redis.call('HSET', KEYS[1], ARGV[i], ARGV[i + 1])
end
return 1
"#;

/// Writes only the named fields, and only if the record exists.
const UPDATE_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
  return 0
end
for i = 1, #ARGV, 2 do
  redis.call('HSET', KEYS[1], ARGV[i], ARGV[i + 1])
end
return 1
"#;

/// Job store over a shared Redis instance.
///
/// One multiplexed connection is opened at construction and shared by every
/// request; the handle is cheap to clone and safe for concurrent use.
#[derive(Clone)]
pub struct RedisJobStore {
    conn: MultiplexedConnection,
    key_prefix: String,
}

impl RedisJobStore {
    /// Connect to the shared store.
    pub async fn connect(url: &str, key_prefix: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| anyhow::anyhow!("invalid job store url {}: {}", url, e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| anyhow::anyhow!("failed to open job store connection: {}", e))?;
        log::debug!("job store connected (key prefix {})", key_prefix);
        Ok(Self {
            conn,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn job_key(&self, id: &JobId) -> String {
        format!("{}:{}", self.key_prefix, id)
    }
}

#[async_trait]
impl JobStore for RedisJobStore {
    async fn insert(&self, job: &Job) -> Result<()> {
        let key = self.job_key(&job.job_id);
        let fields = job_to_fields(job);

        let mut cmd = redis::cmd("EVAL");
        cmd.arg(INSERT_SCRIPT).arg(1).arg(&key);
        for (field, value) in &fields {
            cmd.arg(*field).arg(value);
        }

        let mut conn = self.conn.clone();
        let created: i64 = cmd
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::WriteFailed(format!("insert {}: {}", job.job_id, e)))?;
        if created == 0 {
            return Err(StoreError::WriteFailed(format!(
                "insert {}: record already exists",
                job.job_id
            )));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &JobId) -> Result<Job> {
        let key = self.job_key(id);

        let mut conn = self.conn.clone();
        let fields: HashMap<String, String> = redis::cmd("HGETALL")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::ReadFailed(format!("find {}: {}", id, e)))?;
        if fields.is_empty() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        job_from_fields(id, &fields)
    }

    async fn update_partial(&self, id: &JobId, patch: &JobPatch) -> Result<()> {
        let key = self.job_key(id);
        let fields = patch_to_fields(patch);

        let mut cmd = redis::cmd("EVAL");
        cmd.arg(UPDATE_SCRIPT).arg(1).arg(&key);
        for (field, value) in &fields {
            cmd.arg(*field).arg(value);
        }

        let mut conn = self.conn.clone();
        let updated: i64 = cmd
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::WriteFailed(format!("update {}: {}", id, e)))?;
        if updated == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn remove_by_id(&self, id: &JobId) -> Result<()> {
        let key = self.job_key(id);

        let mut conn = self.conn.clone();
        let removed: i64 = redis::cmd("DEL")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::WriteFailed(format!("remove {}: {}", id, e)))?;
        if removed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn job_to_fields(job: &Job) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("qname", job.qname.clone()),
        ("status", job.status.as_str().to_string()),
        ("node_uuid", job.node_uuid.clone()),
        ("container_image", job.container_image.clone()),
        ("container_id", job.container_id.clone()),
        ("submitted", job.submitted.to_string()),
        ("output", job.output.clone()),
        ("kill_requested", bool_field(job.kill_requested)),
        ("wrap_secret_id", job.wrap_secret_id.clone()),
        ("cubby_token", job.cubby_token.clone()),
        ("cubby_path", job.cubby_path.clone()),
        ("payload", job.payload.clone()),
    ];
    if let Some(started) = job.started {
        fields.push(("started", started.to_string()));
    }
    if let Some(ended) = job.ended {
        fields.push(("ended", ended.to_string()));
    }
    if let Some(return_code) = job.return_code {
        fields.push(("return_code", return_code.to_string()));
    }
    fields
}

fn patch_to_fields(patch: &JobPatch) -> Vec<(&'static str, String)> {
    let mut fields = Vec::new();
    if let Some(status) = patch.status {
        fields.push(("status", status.as_str().to_string()));
    }
    if let Some(ref node_uuid) = patch.node_uuid {
        fields.push(("node_uuid", node_uuid.clone()));
    }
    if let Some(ref container_id) = patch.container_id {
        fields.push(("container_id", container_id.clone()));
    }
    if let Some(started) = patch.started {
        fields.push(("started", started.to_string()));
    }
    if let Some(ended) = patch.ended {
        fields.push(("ended", ended.to_string()));
    }
    if let Some(ref output) = patch.output {
        fields.push(("output", output.clone()));
    }
    if let Some(return_code) = patch.return_code {
        fields.push(("return_code", return_code.to_string()));
    }
    if let Some(kill_requested) = patch.kill_requested {
        fields.push(("kill_requested", bool_field(kill_requested)));
    }
    fields
}

fn job_from_fields(id: &JobId, fields: &HashMap<String, String>) -> Result<Job> {
    Ok(Job {
        job_id: id.clone(),
        qname: string_field(fields, "qname"),
        status: status_field(id, fields)?,
        node_uuid: string_field(fields, "node_uuid"),
        container_image: string_field(fields, "container_image"),
        container_id: string_field(fields, "container_id"),
        submitted: required_int(id, fields, "submitted")?,
        started: optional_int(id, fields, "started")?,
        ended: optional_int(id, fields, "ended")?,
        output: string_field(fields, "output"),
        return_code: optional_int(id, fields, "return_code")?,
        kill_requested: string_field(fields, "kill_requested") == "true",
        wrap_secret_id: string_field(fields, "wrap_secret_id"),
        cubby_token: string_field(fields, "cubby_token"),
        cubby_path: string_field(fields, "cubby_path"),
        payload: string_field(fields, "payload"),
    })
}

fn bool_field(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

fn string_field(fields: &HashMap<String, String>, name: &str) -> String {
    fields.get(name).cloned().unwrap_or_default()
}

fn status_field(id: &JobId, fields: &HashMap<String, String>) -> Result<JobStatus> {
    let raw = string_field(fields, "status");
    JobStatus::from_str_opt(&raw)
        .ok_or_else(|| StoreError::ReadFailed(format!("job {}: unknown status {:?}", id, raw)))
}

fn required_int<T: std::str::FromStr>(
    id: &JobId,
    fields: &HashMap<String, String>,
    name: &str,
) -> Result<T> {
    optional_int(id, fields, name)?.ok_or_else(|| {
        StoreError::ReadFailed(format!("job {}: missing field {:?}", id, name))
    })
}

fn optional_int<T: std::str::FromStr>(
    id: &JobId,
    fields: &HashMap<String, String>,
    name: &str,
) -> Result<Option<T>> {
    match fields.get(name) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
            StoreError::ReadFailed(format!(
                "job {}: malformed field {:?} ({:?})",
                id, name, raw
            ))
        }),
    }
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
            status: JobStatus::Running,
            node_uuid: "node-7".to_string(),
            container_image: "alpine:3.20".to_string(),
            container_id: "c1".to_string(),
            submitted: 1730000000000,
            started: Some(1730000001000),
            ended: None,
            output: "hello\n".to_string(),
            return_code: None,
            kill_requested: false,
            wrap_secret_id: "wrap-1".to_string(),
            cubby_token: "tok-1".to_string(),
            cubby_path: "cubbyhole/job".to_string(),
            payload: "plaintext".to_string(),
        }
    }

    fn to_map(fields: Vec<(&'static str, String)>) -> HashMap<String, String> {
        fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_field_round_trip() {
        let job = sample_job();
        let map = to_map(job_to_fields(&job));
        let back = job_from_fields(&job.job_id, &map).unwrap();
        assert_eq!(job, back);
    }

    #[test]
    fn test_unset_timestamps_are_absent() {
        let job = sample_job();
        let map = to_map(job_to_fields(&job));
        assert!(!map.contains_key("ended"));
        assert!(!map.contains_key("return_code"));
        assert!(map.contains_key("started"));
    }

    #[test]
    fn test_patch_names_only_set_fields() {
        let fields = patch_to_fields(&JobPatch::kill());
        assert_eq!(fields, vec![("kill_requested", "true".to_string())]);
    }

    #[test]
    fn test_unknown_status_is_a_read_failure() {
        let job = sample_job();
        let mut map = to_map(job_to_fields(&job));
        map.insert("status".to_string(), "paused".to_string());
        match job_from_fields(&job.job_id, &map) {
            Err(StoreError::ReadFailed(msg)) => assert!(msg.contains("paused")),
            other => panic!("expected ReadFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_timestamp_is_a_read_failure() {
        let job = sample_job();
        let mut map = to_map(job_to_fields(&job));
        map.insert("submitted".to_string(), "soon".to_string());
        assert!(matches!(
            job_from_fields(&job.job_id, &map),
            Err(StoreError::ReadFailed(_))
        ));
    }
}

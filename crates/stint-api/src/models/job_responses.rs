//! Response models for the job endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stint_core::{JobView, KillReceipt, SubmitReceipt};

/// Response for `POST /v1/api/jobs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitJobResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: String,
    pub qname: String,
}

impl From<SubmitReceipt> for SubmitJobResponse {
    fn from(receipt: SubmitReceipt) -> Self {
        Self {
            id: receipt.job_id.into_string(),
            status: receipt.status.to_string(),
            qname: receipt.qname,
        }
    }
}

/// Response for `GET /v1/api/jobs/{job_id}`.
///
/// The full read projection - no payload, no secret coordinates.
/// Timestamps render as RFC 3339, `null` while unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: String,
    pub node_uuid: String,
    pub qname: String,
    pub container_image: String,
    pub submitted: String,
    pub started: Option<String>,
    pub ended: Option<String>,
    pub output: String,
    pub return_code: Option<i32>,
}

impl From<JobView> for JobStatusResponse {
    fn from(view: JobView) -> Self {
        Self {
            id: view.job_id.into_string(),
            status: view.status.to_string(),
            node_uuid: view.node_uuid,
            qname: view.qname,
            container_image: view.container_image,
            submitted: millis_to_rfc3339(view.submitted),
            started: view.started.map(millis_to_rfc3339),
            ended: view.ended.map(millis_to_rfc3339),
            output: view.output,
            return_code: view.return_code,
        }
    }
}

/// Response for `DELETE /v1/api/jobs/{job_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteJobResponse {
    #[serde(rename = "_id")]
    pub id: String,
}

/// Response for `POST /v1/api/jobs/kill/{job_id}`.
///
/// `kill_requested` reports that the flag was persisted, not that the
/// worker has acted on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KillJobResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub container_id: String,
    pub status: String,
    pub kill_requested: bool,
}

impl From<KillReceipt> for KillJobResponse {
    fn from(receipt: KillReceipt) -> Self {
        Self {
            id: receipt.job_id.into_string(),
            container_id: receipt.container_id,
            status: receipt.status.to_string(),
            kill_requested: true,
        }
    }
}

fn millis_to_rfc3339(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_else(Utc::now)
        .to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stint_commons::{JobId, JobStatus};

    #[test]
    fn test_status_response_renders_timestamps() {
        let view = JobView {
            job_id: JobId::parse("00000deadbeef123").unwrap(),
            status: JobStatus::Running,
            node_uuid: "node-7".to_string(),
            qname: "play".to_string(),
            container_image: "alpine:3.20".to_string(),
            submitted: 1730000000000,
            started: Some(1730000001000),
            ended: None,
            output: "hello\n".to_string(),
            return_code: None,
        };

        let response = JobStatusResponse::from(view);
        assert_eq!(response.id, "00000deadbeef123");
        assert_eq!(response.status, "running");
        assert!(response.submitted.starts_with("2024-10-27T"));
        assert!(response.started.is_some());
        assert!(response.ended.is_none());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["_id"], "00000deadbeef123");
        assert_eq!(json["ended"], serde_json::Value::Null);
    }

    #[test]
    fn test_kill_response_always_reports_the_latch() {
        let receipt = KillReceipt {
            job_id: JobId::parse("00000deadbeef123").unwrap(),
            container_id: "c1".to_string(),
            status: JobStatus::Running,
        };
        let response = KillJobResponse::from(receipt);
        assert!(response.kill_requested);
        assert_eq!(response.container_id, "c1");
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Status of a job record.
///
/// The normal lifecycle is `Queued → Running → Stopping → Stopped`, with
/// `Failed` as the failure terminal and `Queued → Stopped` possible when a
/// job is cancelled before pickup. All transitions are performed by workers;
/// the gateway only reads the status (to gate deletion) and never writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Stopping,
    Stopped,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Stopping => "stopping",
            JobStatus::Stopped => "stopped",
            JobStatus::Failed => "failed",
        }
    }

    /// True once a worker has finished with the job, one way or the other.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Stopped | JobStatus::Failed)
    }

    /// True while a worker owns the job. Active jobs cannot be deleted.
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Running | JobStatus::Stopping)
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(JobStatus::Queued),
            "running" => Some(JobStatus::Running),
            "stopping" => Some(JobStatus::Stopping),
            "stopped" => Some(JobStatus::Stopped),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }
}

impl FromStr for JobStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::from_str_opt(s).ok_or_else(|| format!("Invalid JobStatus: {}", s))
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

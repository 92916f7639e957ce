//! Job lifecycle model

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::span::RedactionResult;

/// Opaque job identifier, assigned at submission
pub type JobId = String;

/// Generate a fresh random job id (UUID v4)
pub fn new_job_id() -> JobId {
    uuid::Uuid::new_v4().to_string()
}

/// Lifecycle state of a job.
///
/// Transitions are monotonic: `Queued -> Processing -> {Completed | Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether moving from `self` to `next` follows the lifecycle order
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Queued, JobStatus::Processing)
                | (JobStatus::Processing, JobStatus::Completed)
                | (JobStatus::Processing, JobStatus::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal payload attached to a job
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum JobResult {
    Redacted(RedactionResult),
    Failed { error: String },
}

impl JobResult {
    /// Whether this payload is the right kind for `status`
    pub fn matches(&self, status: JobStatus) -> bool {
        matches!(
            (self, status),
            (JobResult::Redacted(_), JobStatus::Completed)
                | (JobResult::Failed { .. }, JobStatus::Failed)
        )
    }
}

/// Snapshot of a job record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub result: Option<JobResult>,
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::timestamp")]
    pub updated_at: OffsetDateTime,
}

impl Job {
    pub fn new(id: JobId) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id,
            status: JobStatus::Queued,
            result: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Redacted output, only when the job completed
    pub fn redaction(&self) -> Option<&RedactionResult> {
        match &self.result {
            Some(JobResult::Redacted(result)) => Some(result),
            _ => None,
        }
    }

    /// Error description, only when the job failed
    pub fn error(&self) -> Option<&str> {
        match &self.result {
            Some(JobResult::Failed { error }) => Some(error),
            _ => None,
        }
    }
}

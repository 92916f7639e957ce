use thiserror::Error;

use crate::job::JobStatus;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Job already exists: {0}")]
    JobAlreadyExists(String),

    #[error("Invalid status transition for job {job_id}: {from} -> {to}")]
    InvalidTransition {
        job_id: String,
        from: JobStatus,
        to: JobStatus,
    },

    #[error("Inconsistent result for job {job_id} with status {status}")]
    InconsistentResult { job_id: String, status: JobStatus },

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Job queue is full")]
    QueueFull,

    #[error("Scheduler is shut down")]
    SchedulerClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

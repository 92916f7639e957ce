use std::sync::Arc;
use std::time::Duration;

use redact_core::{JobResult, JobStatus};
use redact_detect::TextRedactor;
use redact_storage::JobStore;
use tracing::{error, info, warn};

/// Drives a single job from `queued` to a terminal state
pub struct JobRunner {
    store: Arc<JobStore>,
    redactor: Arc<TextRedactor>,
    processing_delay: Duration,
}

impl JobRunner {
    pub fn new(store: Arc<JobStore>, redactor: Arc<TextRedactor>) -> Self {
        Self {
            store,
            redactor,
            processing_delay: Duration::ZERO,
        }
    }

    /// Pause before each redaction, simulating slow processing
    pub fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.processing_delay = delay;
        self
    }

    /// Run the redaction pipeline for `job_id`.
    ///
    /// Any redaction error becomes the job's `failed` result; nothing is
    /// returned to the caller and nothing is retried.
    pub async fn run_job(&self, job_id: &str, text: &str) {
        if let Err(e) = self.store.set_status(job_id, JobStatus::Processing, None) {
            warn!(job_id = %job_id, error = %e, "Could not start job");
            return;
        }
        info!(job_id = %job_id, chars = text.chars().count(), "Job processing");

        if !self.processing_delay.is_zero() {
            tokio::time::sleep(self.processing_delay).await;
        }

        let (status, result) = match self.redactor.redact(text).await {
            Ok(redaction) => {
                info!(job_id = %job_id, spans = redaction.metadata.len(), "Job completed");
                (
                    JobStatus::Completed,
                    JobResult::Redacted(redaction.into_result(job_id)),
                )
            }
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "Job failed");
                (
                    JobStatus::Failed,
                    JobResult::Failed {
                        error: e.to_string(),
                    },
                )
            }
        };

        if let Err(e) = self.store.set_status(job_id, status, Some(result)) {
            error!(job_id = %job_id, error = %e, "Could not record job outcome");
        }
    }

    /// Mark a job failed after its run aborted without recording an outcome
    pub(crate) fn abandon(&self, job_id: &str, reason: &str) {
        let result = JobResult::Failed {
            error: reason.to_string(),
        };
        if let Err(e) = self.store.set_status(job_id, JobStatus::Failed, Some(result)) {
            error!(job_id = %job_id, error = %e, "Could not mark abandoned job failed");
        }
    }
}

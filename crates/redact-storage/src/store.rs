use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use redact_core::{Error, Job, JobId, JobResult, JobStatus, Result};
use time::OffsetDateTime;
use tracing::debug;

/// Authoritative map of job id -> job record.
///
/// Every operation locks at most one shard for its whole duration, so a
/// reader never sees a status without its matching result. No operation
/// awaits or performs I/O.
pub struct JobStore {
    jobs: DashMap<JobId, Job>,
}

impl JobStore {
    pub fn new() -> Self {
        Self {
            jobs: DashMap::new(),
        }
    }

    /// Insert a new `queued` job. Ids must be unique.
    pub fn create_job(&self, job_id: &str) -> Result<()> {
        match self.jobs.entry(job_id.to_string()) {
            Entry::Occupied(_) => Err(Error::JobAlreadyExists(job_id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(Job::new(job_id.to_string()));
                debug!(job_id = %job_id, "Job created");
                Ok(())
            }
        }
    }

    /// Move a job to `status`, attaching `result` in the same step.
    ///
    /// Rejects transitions that do not follow the lifecycle order and
    /// results that do not fit the target status (terminal states need
    /// one, others must not carry one).
    pub fn set_status(
        &self,
        job_id: &str,
        status: JobStatus,
        result: Option<JobResult>,
    ) -> Result<()> {
        let mut job = self
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| Error::JobNotFound(job_id.to_string()))?;

        if !job.status.can_transition_to(status) {
            return Err(Error::InvalidTransition {
                job_id: job_id.to_string(),
                from: job.status,
                to: status,
            });
        }

        let consistent = match &result {
            Some(result) => result.matches(status),
            None => !status.is_terminal(),
        };
        if !consistent {
            return Err(Error::InconsistentResult {
                job_id: job_id.to_string(),
                status,
            });
        }

        job.status = status;
        job.result = result;
        job.updated_at = OffsetDateTime::now_utc();

        Ok(())
    }

    /// Snapshot of the current record
    pub fn get_job(&self, job_id: &str) -> Result<Job> {
        self.jobs
            .get(job_id)
            .map(|job| job.value().clone())
            .ok_or_else(|| Error::JobNotFound(job_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Drop terminal jobs last updated before `cutoff`. Returns how many
    /// were removed. Queued and processing jobs are never evicted.
    pub fn evict_finished_before(&self, cutoff: OffsetDateTime) -> usize {
        let mut evicted = 0;
        self.jobs.retain(|_, job| {
            let keep = !(job.status.is_terminal() && job.updated_at < cutoff);
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}

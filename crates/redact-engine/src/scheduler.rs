use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use redact_core::{Error, JobId, Result, new_job_id};
use redact_detect::TextRedactor;
use redact_storage::JobStore;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::runner::JobRunner;

#[derive(Debug, Clone)]
pub struct SchedulerOptions {
    /// Jobs redacted concurrently
    pub workers: usize,
    /// Submissions waiting for a worker before new ones are rejected
    pub queue_capacity: usize,
    pub processing_delay: Duration,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 1024,
            processing_delay: Duration::ZERO,
        }
    }
}

struct JobTicket {
    job_id: JobId,
    text: String,
}

/// Runs submitted jobs on a fixed worker pool.
///
/// Each job is queued exactly once, at submission, so it is executed at
/// most once. There is no cancellation and no deadline on a running job.
pub struct TaskScheduler {
    store: Arc<JobStore>,
    sender: RwLock<Option<mpsc::Sender<JobTicket>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskScheduler {
    /// Spawn the worker pool. Must be called inside a tokio runtime.
    pub fn start(
        store: Arc<JobStore>,
        redactor: Arc<TextRedactor>,
        options: SchedulerOptions,
    ) -> Result<Self> {
        if options.workers == 0 {
            return Err(Error::Validation("scheduler needs at least one worker".to_string()));
        }
        if options.queue_capacity == 0 {
            return Err(Error::Validation("queue capacity must be positive".to_string()));
        }

        let (sender, receiver) = mpsc::channel(options.queue_capacity);
        let receiver = Arc::new(tokio::sync::Mutex::new(receiver));
        let runner = Arc::new(
            JobRunner::new(store.clone(), redactor).with_processing_delay(options.processing_delay),
        );

        let workers = (0..options.workers)
            .map(|worker| tokio::spawn(work(worker, receiver.clone(), runner.clone())))
            .collect();

        info!(
            workers = options.workers,
            queue_capacity = options.queue_capacity,
            "Task scheduler started"
        );

        Ok(Self {
            store,
            sender: RwLock::new(Some(sender)),
            workers: Mutex::new(workers),
        })
    }

    /// Create a `queued` job for `text` and hand it to the worker pool.
    ///
    /// Queue capacity is reserved before the job record exists, so a
    /// rejected submission leaves nothing behind.
    pub fn submit(&self, text: String) -> Result<JobId> {
        let guard = self.sender.read().unwrap_or_else(PoisonError::into_inner);
        let sender = guard.as_ref().ok_or(Error::SchedulerClosed)?;

        let permit = sender.try_reserve().map_err(|e| match e {
            TrySendError::Full(()) => Error::QueueFull,
            TrySendError::Closed(()) => Error::SchedulerClosed,
        })?;

        let job_id = new_job_id();
        self.store.create_job(&job_id)?;
        permit.send(JobTicket {
            job_id: job_id.clone(),
            text,
        });

        info!(job_id = %job_id, "Job submitted");
        Ok(job_id)
    }

    pub fn store(&self) -> &Arc<JobStore> {
        &self.store
    }

    /// Stop accepting jobs, let workers drain the queue, and wait for them.
    pub async fn shutdown(&self) {
        self.sender
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let workers = {
            let mut guard = self.workers.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *guard)
        };
        for worker in workers {
            if let Err(e) = worker.await {
                error!(error = %e, "Worker terminated abnormally");
            }
        }
        info!("Task scheduler stopped");
    }
}

async fn work(
    worker: usize,
    receiver: Arc<tokio::sync::Mutex<mpsc::Receiver<JobTicket>>>,
    runner: Arc<JobRunner>,
) {
    loop {
        let ticket = receiver.lock().await.recv().await;
        let Some(JobTicket { job_id, text }) = ticket else {
            break;
        };

        debug!(worker, job_id = %job_id, "Worker picked up job");

        // A panic inside the pipeline must not take the worker down or
        // leave the job stuck in `processing`.
        let run = {
            let runner = runner.clone();
            let job_id = job_id.clone();
            tokio::spawn(async move { runner.run_job(&job_id, &text).await })
        };
        if let Err(e) = run.await {
            error!(worker, job_id = %job_id, error = %e, "Redaction task aborted");
            runner.abandon(&job_id, "redaction task aborted");
        }
    }

    debug!(worker, "Worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use redact_core::{EntityRecognizer, Job, JobStatus, RecognizedEntity};
    use tokio::sync::Notify;

    struct FixedRecognizer(Vec<RecognizedEntity>);

    #[async_trait]
    impl EntityRecognizer for FixedRecognizer {
        async fn recognize(&self, _text: &str) -> Result<Vec<RecognizedEntity>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    struct FailingRecognizer;

    #[async_trait]
    impl EntityRecognizer for FailingRecognizer {
        async fn recognize(&self, _text: &str) -> Result<Vec<RecognizedEntity>> {
            Err(Error::Recognition("model unavailable".to_string()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    struct GatedRecognizer(Arc<Notify>);

    #[async_trait]
    impl EntityRecognizer for GatedRecognizer {
        async fn recognize(&self, _text: &str) -> Result<Vec<RecognizedEntity>> {
            self.0.notified().await;
            Ok(Vec::new())
        }

        fn name(&self) -> &'static str {
            "gated"
        }
    }

    struct PanickingRecognizer;

    #[async_trait]
    impl EntityRecognizer for PanickingRecognizer {
        async fn recognize(&self, _text: &str) -> Result<Vec<RecognizedEntity>> {
            panic!("recognizer bug")
        }

        fn name(&self) -> &'static str {
            "panicking"
        }
    }

    fn start(
        recognizer: impl EntityRecognizer + 'static,
        options: SchedulerOptions,
    ) -> TaskScheduler {
        TaskScheduler::start(
            Arc::new(JobStore::new()),
            Arc::new(TextRedactor::new(Arc::new(recognizer))),
            options,
        )
        .unwrap()
    }

    async fn wait_for(scheduler: &TaskScheduler, job_id: &str, done: fn(&Job) -> bool) -> Job {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let job = scheduler.store().get_job(job_id).unwrap();
                if done(&job) {
                    return job;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("job did not reach expected state")
    }

    fn terminal(job: &Job) -> bool {
        job.status.is_terminal()
    }

    #[tokio::test]
    async fn test_submit_returns_queued_job_then_completes() {
        let scheduler = start(FixedRecognizer(vec![]), SchedulerOptions::default());

        let job_id = scheduler
            .submit("Email me at a@b.com or call 555-123-4567.".to_string())
            .unwrap();

        let job = wait_for(&scheduler, &job_id, terminal).await;
        assert_eq!(job.status, JobStatus::Completed);

        let result = job.redaction().unwrap();
        assert_eq!(result.job_id, job_id);
        assert_eq!(
            result.redacted_text,
            "Email me at [REDACTED] or call [REDACTED]."
        );
        assert_eq!(result.metadata.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_recognition_is_terminal() {
        let scheduler = start(FailingRecognizer, SchedulerOptions::default());
        let job_id = scheduler.submit("John Mark".to_string()).unwrap();

        let job = wait_for(&scheduler, &job_id, terminal).await;
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.redaction().is_none());
        assert!(job.error().unwrap().contains("model unavailable"));
    }

    #[tokio::test]
    async fn test_panicking_pipeline_fails_job_and_keeps_worker() {
        let scheduler = start(
            PanickingRecognizer,
            SchedulerOptions {
                workers: 1,
                ..Default::default()
            },
        );

        for _ in 0..2 {
            let job_id = scheduler.submit("text".to_string()).unwrap();
            let job = wait_for(&scheduler, &job_id, terminal).await;
            assert_eq!(job.status, JobStatus::Failed);
        }
    }

    #[tokio::test]
    async fn test_many_jobs_complete_with_distinct_ids() {
        let scheduler = start(
            FixedRecognizer(vec![]),
            SchedulerOptions {
                workers: 3,
                ..Default::default()
            },
        );

        let ids: Vec<_> = (0..20)
            .map(|i| scheduler.submit(format!("call 555-000-{:04}", i)).unwrap())
            .collect();

        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());

        for id in &ids {
            let job = wait_for(&scheduler, id, terminal).await;
            assert_eq!(job.status, JobStatus::Completed);
            assert_eq!(job.redaction().unwrap().redacted_text, "call [REDACTED]");
        }
    }

    #[tokio::test]
    async fn test_full_queue_rejects_without_creating_job() {
        let gate = Arc::new(Notify::new());
        let scheduler = start(
            GatedRecognizer(gate.clone()),
            SchedulerOptions {
                workers: 1,
                queue_capacity: 1,
                processing_delay: Duration::ZERO,
            },
        );

        let running = scheduler.submit("first".to_string()).unwrap();
        wait_for(&scheduler, &running, |job| job.status == JobStatus::Processing).await;

        let waiting = scheduler.submit("second".to_string()).unwrap();
        assert!(matches!(
            scheduler.submit("third".to_string()),
            Err(Error::QueueFull)
        ));
        assert_eq!(scheduler.store().len(), 2);

        // A stalled job does not block status reads
        assert_eq!(
            scheduler.store().get_job(&waiting).unwrap().status,
            JobStatus::Queued
        );

        gate.notify_one();
        wait_for(&scheduler, &running, terminal).await;
        gate.notify_one();
        let job = wait_for(&scheduler, &waiting, terminal).await;
        assert_eq!(job.status, JobStatus::Completed);
    }

    #[tokio::test]
    async fn test_shutdown_drains_queue_and_rejects_new_jobs() {
        let scheduler = start(
            FixedRecognizer(vec![]),
            SchedulerOptions {
                workers: 1,
                ..Default::default()
            },
        );

        let ids: Vec<_> = (0..5)
            .map(|_| scheduler.submit("text".to_string()).unwrap())
            .collect();

        scheduler.shutdown().await;

        for id in &ids {
            assert_eq!(
                scheduler.store().get_job(id).unwrap().status,
                JobStatus::Completed
            );
        }
        assert!(matches!(
            scheduler.submit("late".to_string()),
            Err(Error::SchedulerClosed)
        ));
        assert_eq!(scheduler.store().len(), 5);
    }

    #[tokio::test]
    async fn test_invalid_options_are_rejected() {
        let store = Arc::new(JobStore::new());
        let redactor = Arc::new(TextRedactor::new(Arc::new(FixedRecognizer(vec![]))));

        let zero_workers = SchedulerOptions {
            workers: 0,
            ..Default::default()
        };
        assert!(matches!(
            TaskScheduler::start(store.clone(), redactor.clone(), zero_workers),
            Err(Error::Validation(_))
        ));

        let zero_capacity = SchedulerOptions {
            queue_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            TaskScheduler::start(store, redactor, zero_capacity),
            Err(Error::Validation(_))
        ));
    }
}

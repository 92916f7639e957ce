use std::sync::Arc;
use std::time::Duration;

use redact_storage::JobStore;
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Periodically evict finished jobs older than `ttl`.
///
/// Only terminal jobs are evicted; their ids then read as not found.
pub fn spawn_sweeper(store: Arc<JobStore>, ttl: Duration, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;

            let cutoff = OffsetDateTime::now_utc() - ttl;
            let evicted = store.evict_finished_before(cutoff);
            if evicted > 0 {
                info!(evicted, remaining = store.len(), "Evicted finished jobs");
            } else {
                debug!(remaining = store.len(), "Retention sweep found nothing to evict");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use redact_core::{JobResult, JobStatus};

    #[tokio::test]
    async fn test_sweeper_evicts_finished_jobs_only() {
        let store = Arc::new(JobStore::new());
        store.create_job("waiting").unwrap();
        store.create_job("done").unwrap();
        store.set_status("done", JobStatus::Processing, None).unwrap();
        store
            .set_status(
                "done",
                JobStatus::Failed,
                Some(JobResult::Failed {
                    error: "boom".to_string(),
                }),
            )
            .unwrap();

        let sweeper = spawn_sweeper(store.clone(), Duration::ZERO, Duration::from_millis(10));

        tokio::time::timeout(Duration::from_secs(5), async {
            while store.get_job("done").is_ok() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("finished job was not evicted");

        assert!(store.get_job("waiting").is_ok());
        sweeper.abort();
    }
}

use anyhow::Result;
use redact_config::Config;
use redact_engine::{SchedulerOptions, TaskScheduler, spawn_sweeper};
use redact_server::RedactServer;
use redact_storage::JobStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Command-line values that take precedence over the config file
#[derive(Debug, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub workers: Option<usize>,
    pub ner_endpoint: Option<String>,
    pub api_title: Option<String>,
}

impl Overrides {
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(workers) = self.workers {
            config.scheduler.workers = workers;
        }
        if let Some(endpoint) = self.ner_endpoint {
            config.recognizer.endpoint = Some(endpoint);
        }
        if let Some(title) = self.api_title {
            config.server.api_title = title;
        }
    }
}

pub async fn handle(mut config: Config, overrides: Overrides) -> Result<()> {
    overrides.apply(&mut config);

    let redactor = Arc::new(super::build_redactor(&config.recognizer)?);
    let store = Arc::new(JobStore::new());

    let options = SchedulerOptions {
        workers: config.scheduler.workers,
        queue_capacity: config.scheduler.queue_capacity,
        processing_delay: Duration::from_millis(config.scheduler.processing_delay_ms),
    };
    let scheduler = Arc::new(TaskScheduler::start(store.clone(), redactor, options)?);

    let sweeper = config.retention.ttl_secs.map(|ttl| {
        spawn_sweeper(
            store.clone(),
            Duration::from_secs(ttl),
            Duration::from_secs(config.retention.sweep_interval_secs.max(1)),
        )
    });

    let server = Arc::new(RedactServer::new(
        scheduler.clone(),
        config.server.api_title.clone(),
    ));
    server
        .serve(&config.server.host, config.server.port, shutdown_signal())
        .await?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    scheduler.shutdown().await;

    info!("redactd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler, run until killed
        error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested, draining queued jobs");
}

use anyhow::{Context, Result};
use redact_config::LoggingConfig;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Pick the filter directive: `debug` wins, then an explicit level, then config
fn resolve_level<'a>(config: &'a LoggingConfig, level: Option<&'a str>, debug: bool) -> &'a str {
    if debug {
        "debug"
    } else {
        level.unwrap_or(&config.level)
    }
}

/// Install the global subscriber.
///
/// Logs go to stderr so `redactd redact` output stays clean on stdout.
/// `RUST_LOG` overrides every other level setting.
pub fn init(config: &LoggingConfig, level: Option<&str>, debug: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(resolve_level(config, level, debug)));

    let file_layer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}

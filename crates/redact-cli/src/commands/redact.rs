use anyhow::{Context, Result};
use redact_config::Config;
use redact_core::new_job_id;
use std::io::Read;
use std::path::PathBuf;

/// Redact one input synchronously and print the result as JSON
pub async fn handle(
    config: Config,
    file: Option<PathBuf>,
    ner_endpoint: Option<String>,
) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let mut recognizer = config.recognizer;
    if let Some(endpoint) = ner_endpoint {
        recognizer.endpoint = Some(endpoint);
    }

    let redactor = super::build_redactor(&recognizer)?;
    let redaction = redactor.redact(&text).await?;
    let result = redaction.into_result(new_job_id());

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

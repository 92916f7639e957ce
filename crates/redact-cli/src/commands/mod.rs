pub mod config;
pub mod redact;
pub mod serve;

use anyhow::Result;
use redact_config::RecognizerConfig;
use redact_core::EntityRecognizer;
use redact_detect::TextRedactor;
use redact_ner::{DisabledRecognizer, HttpRecognizer};
use std::sync::Arc;
use tracing::{info, warn};

/// Build the redaction pipeline from recognizer settings
pub fn build_redactor(config: &RecognizerConfig) -> Result<TextRedactor> {
    let recognizer: Arc<dyn EntityRecognizer> = match &config.endpoint {
        Some(endpoint) => {
            info!(endpoint = %endpoint, "Using NER service");
            Arc::new(HttpRecognizer::new(endpoint.as_str())?)
        }
        None => {
            warn!("No NER endpoint configured; only emails and phone numbers will be redacted");
            Arc::new(DisabledRecognizer)
        }
    };

    Ok(TextRedactor::new(recognizer).with_labels(config.labels.iter().cloned()))
}

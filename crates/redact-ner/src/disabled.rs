use async_trait::async_trait;
use redact_core::{EntityRecognizer, RecognizedEntity, Result};

/// Recognizer used when no NER service is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRecognizer;

#[async_trait]
impl EntityRecognizer for DisabledRecognizer {
    async fn recognize(&self, _text: &str) -> Result<Vec<RecognizedEntity>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

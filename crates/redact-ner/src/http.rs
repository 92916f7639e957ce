use async_trait::async_trait;
use redact_core::{EntityRecognizer, Error, RecognizedEntity, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize)]
struct RecognizeRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct RecognizeResponse {
    entities: Vec<RecognizedEntity>,
}

/// Recognizer backed by a remote NER service.
///
/// POSTs `{"text": ...}` to the endpoint and expects
/// `{"entities": [{"label", "start", "end"}]}` with character offsets.
/// No request timeout is applied.
pub struct HttpRecognizer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRecognizer {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(Error::Validation(format!(
                "NER endpoint must start with http:// or https://: {}",
                endpoint
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("redactd/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Other(anyhow::anyhow!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EntityRecognizer for HttpRecognizer {
    async fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RecognizeRequest { text })
            .send()
            .await
            .map_err(|e| Error::Recognition(format!("NER request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Recognition(format!(
                "NER service returned HTTP {}",
                status.as_u16()
            )));
        }

        let body: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| Error::Recognition(format!("Malformed NER response: {}", e)))?;

        debug!(
            endpoint = %self.endpoint,
            entities = body.entities.len(),
            "NER response received"
        );

        Ok(body.entities)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

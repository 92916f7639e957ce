//! Entity-recognition boundary

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One entity reported by a recognizer.
///
/// Offsets are character (Unicode scalar) offsets into the text that was
/// passed to the recognizer, end-exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizedEntity {
    pub label: String,
    #[serde(alias = "start_char")]
    pub start: usize,
    #[serde(alias = "end_char")]
    pub end: usize,
}

impl RecognizedEntity {
    pub fn new(label: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }
}

/// Trait for named-entity recognition engines
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    /// Recognize entities in `text`, in text order.
    ///
    /// Failures are reported as `Error::Recognition`.
    async fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

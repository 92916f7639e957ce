//! Redaction output model

use std::fmt;

use serde::{Deserialize, Serialize};

/// Literal token substituted for every detected span
pub const REDACTION_TOKEN: &str = "[REDACTED]";

/// Semantic label of a detected span.
///
/// Labels outside the known vocabulary are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityKind {
    Person,
    Org,
    Gpe,
    Date,
    Time,
    Email,
    Phone,
    Other(String),
}

impl EntityKind {
    pub fn as_str(&self) -> &str {
        match self {
            EntityKind::Person => "PERSON",
            EntityKind::Org => "ORG",
            EntityKind::Gpe => "GPE",
            EntityKind::Date => "DATE",
            EntityKind::Time => "TIME",
            EntityKind::Email => "EMAIL",
            EntityKind::Phone => "PHONE",
            EntityKind::Other(label) => label,
        }
    }
}

impl From<&str> for EntityKind {
    fn from(label: &str) -> Self {
        match label {
            "PERSON" => EntityKind::Person,
            "ORG" => EntityKind::Org,
            "GPE" => EntityKind::Gpe,
            "DATE" => EntityKind::Date,
            "TIME" => EntityKind::Time,
            "EMAIL" => EntityKind::Email,
            "PHONE" => EntityKind::Phone,
            other => EntityKind::Other(other.to_string()),
        }
    }
}

impl From<String> for EntityKind {
    fn from(label: String) -> Self {
        EntityKind::from(label.as_str())
    }
}

impl From<EntityKind> for String {
    fn from(kind: EntityKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected sensitive region.
///
/// `span` holds character offsets into the text as it existed when the
/// span was detected, not into the original input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionSpan {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub span: (usize, usize),
    pub original_text: String,
    pub reason: Option<String>,
}

impl RedactionSpan {
    pub fn new(kind: EntityKind, start: usize, end: usize, original_text: String) -> Self {
        Self {
            kind,
            span: (start, end),
            original_text,
            reason: None,
        }
    }
}

/// Final output of one redaction run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionResult {
    pub job_id: String,
    pub redacted_text: String,
    pub metadata: Vec<RedactionSpan>,
}

//! Detection and replacement of sensitive spans
//!
//! A redaction run is three passes over the text, always in this order:
//!
//! 1. **Entities.** The recognizer runs once on the original text. Its
//!    coordinates refer to that text, so each replacement shifts the
//!    remaining ones by a running offset.
//! 2. **Emails**, then 3. **phones.** Each pattern rescans the text as
//!    mutated so far and records coordinates in that text directly; no
//!    offset bookkeeping is involved.
//!
//! Metadata keeps detection order (all entities, then emails, then phones),
//! which is not document order.

use std::collections::HashSet;
use std::sync::Arc;

use lazy_static::lazy_static;
use redact_core::{
    EntityKind, EntityRecognizer, Error, REDACTION_TOKEN, RecognizedEntity, RedactionResult,
    RedactionSpan, Result,
};
use regex::Regex;
use tracing::debug;

use crate::reason::annotate;

lazy_static! {
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+").expect("email pattern");
    static ref PHONE_PATTERN: Regex =
        Regex::new(r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b").expect("phone pattern");
}

/// Recognizer labels redacted unless configured otherwise
pub const DEFAULT_ENTITY_LABELS: [&str; 5] = ["PERSON", "ORG", "GPE", "DATE", "TIME"];

/// Redacted text plus annotated metadata, before it is bound to a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redaction {
    pub redacted_text: String,
    pub metadata: Vec<RedactionSpan>,
}

impl Redaction {
    pub fn into_result(self, job_id: impl Into<String>) -> RedactionResult {
        RedactionResult {
            job_id: job_id.into(),
            redacted_text: self.redacted_text,
            metadata: self.metadata,
        }
    }
}

pub struct TextRedactor {
    recognizer: Arc<dyn EntityRecognizer>,
    labels: HashSet<String>,
}

impl TextRedactor {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self {
            recognizer,
            labels: DEFAULT_ENTITY_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// Replace the set of recognizer labels that get redacted
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn recognizer_name(&self) -> &'static str {
        self.recognizer.name()
    }

    /// Redact `text`.
    ///
    /// A recognizer failure aborts the whole run; no partial output is
    /// returned.
    pub async fn redact(&self, text: &str) -> Result<Redaction> {
        let entities: Vec<RecognizedEntity> = self
            .recognizer
            .recognize(text)
            .await?
            .into_iter()
            .filter(|entity| self.labels.contains(&entity.label))
            .collect();

        let (mut redacted, mut metadata) = redact_entities(text, entities)?;
        let entity_count = metadata.len();

        redact_pattern(&mut redacted, &EMAIL_PATTERN, EntityKind::Email, &mut metadata);
        redact_pattern(&mut redacted, &PHONE_PATTERN, EntityKind::Phone, &mut metadata);

        debug!(
            recognizer = self.recognizer.name(),
            entities = entity_count,
            patterns = metadata.len() - entity_count,
            "Redaction finished"
        );

        Ok(Redaction {
            redacted_text: redacted,
            metadata: annotate(metadata),
        })
    }
}

/// Entity pass. Coordinates in `entities` refer to `text`; recorded spans
/// refer to the text as mutated at the moment of each replacement.
fn redact_entities(
    text: &str,
    mut entities: Vec<RecognizedEntity>,
) -> Result<(String, Vec<RedactionSpan>)> {
    entities.sort_by_key(|entity| entity.start);

    let mut chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    let token: Vec<char> = REDACTION_TOKEN.chars().collect();

    let mut metadata = Vec::with_capacity(entities.len());
    let mut offset: isize = 0;
    let mut previous_end = 0;

    for entity in entities {
        if entity.start >= entity.end || entity.end > total {
            return Err(Error::Recognition(format!(
                "entity {} at {}..{} is outside text of {} chars",
                entity.label, entity.start, entity.end, total
            )));
        }
        if entity.start < previous_end {
            return Err(Error::Recognition(format!(
                "entity {} at {}..{} overlaps a previous entity",
                entity.label, entity.start, entity.end
            )));
        }
        previous_end = entity.end;

        let start = shift(entity.start, offset)?;
        let end = shift(entity.end, offset)?;

        let original: String = chars[start..end].iter().collect();
        chars.splice(start..end, token.iter().copied());
        metadata.push(RedactionSpan::new(
            EntityKind::from(entity.label),
            start,
            end,
            original,
        ));

        offset += token.len() as isize - (entity.end - entity.start) as isize;
    }

    Ok((chars.into_iter().collect(), metadata))
}

fn shift(position: usize, offset: isize) -> Result<usize> {
    position
        .checked_add_signed(offset)
        .ok_or_else(|| Error::Recognition(format!("entity offset {position} out of range")))
}

/// Pattern pass over the live text, left to right, non-overlapping.
/// Scanning resumes right after each inserted token.
fn redact_pattern(
    text: &mut String,
    pattern: &Regex,
    kind: EntityKind,
    metadata: &mut Vec<RedactionSpan>,
) {
    let mut search_from = 0;

    loop {
        let Some(found) = pattern.find_at(text, search_from) else {
            break;
        };
        let range = found.range();
        let original = found.as_str().to_string();

        let start = text[..range.start].chars().count();
        let end = start + original.chars().count();

        text.replace_range(range.clone(), REDACTION_TOKEN);
        search_from = range.start + REDACTION_TOKEN.len();

        metadata.push(RedactionSpan::new(kind.clone(), start, end, original));
    }
}

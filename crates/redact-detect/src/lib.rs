//! Sensitive-span detection and replacement

pub mod reason;
pub mod redactor;

pub use reason::{annotate, reason_for};
pub use redactor::{DEFAULT_ENTITY_LABELS, Redaction, TextRedactor};

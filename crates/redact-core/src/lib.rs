//! Core domain models for redactd
//!
//! This crate contains:
//! - Job lifecycle models (Job, JobStatus, JobResult)
//! - Redaction output models (RedactionSpan, RedactionResult)
//! - The entity-recognition boundary (EntityRecognizer)

pub mod error;
pub mod job;
pub mod recognizer;
pub mod span;

pub use error::{Error, Result};
pub use job::{Job, JobId, JobResult, JobStatus, new_job_id};
pub use recognizer::{EntityRecognizer, RecognizedEntity};
pub use span::{EntityKind, REDACTION_TOKEN, RedactionResult, RedactionSpan};

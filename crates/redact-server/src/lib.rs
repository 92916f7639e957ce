//! HTTP surface for redactd
//!
//! - `POST /submit` queues text and returns a job id
//! - `GET /status/:job_id` reports the lifecycle state
//! - `GET /result/:job_id` returns the redacted text and metadata

pub mod server;

pub use server::RedactServer;

//! Job storage for redactd
//!
//! In-memory, process-lifetime job records with atomic per-job updates.

pub mod store;

pub use store::JobStore;

//! Background execution of redaction jobs
//!
//! `TaskScheduler` accepts submissions into a bounded queue drained by a
//! fixed pool of workers; each worker drives one job at a time through
//! `JobRunner`. `spawn_sweeper` evicts finished jobs after a retention period.

pub mod retention;
pub mod runner;
pub mod scheduler;

pub use retention::spawn_sweeper;
pub use runner::JobRunner;
pub use scheduler::{SchedulerOptions, TaskScheduler};

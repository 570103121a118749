//! Batch orchestrator for generating many characters concurrently.
//!
//! A fixed pool of workers pulls jobs from a shared cursor over the input
//! list. Characters whose GIF already exists are skipped, and a failure or
//! panic while generating one character never affects the others.

mod runner;
mod types;

pub use runner::{BatchOrchestrator, JobClaimCallback};
pub use types::{BatchSummary, Job, JobOutcome};

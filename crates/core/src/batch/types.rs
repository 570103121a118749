//! Types for the batch module.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One unit of work: a character and its position in the input list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub character: String,
    /// Zero-based position in the input list.
    pub index: usize,
    /// Length of the input list.
    pub total: usize,
}

impl Job {
    /// `[index+1/total]` label used in progress logs.
    pub fn label(&self) -> String {
        format!("[{}/{}]", self.index + 1, self.total)
    }
}

/// Result of processing one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum JobOutcome {
    Success {
        character: String,
        output_path: PathBuf,
    },
    Failure {
        character: String,
        error: String,
    },
    /// Output already existed; the generator was not invoked.
    Skipped {
        character: String,
        output_path: PathBuf,
    },
}

impl JobOutcome {
    pub fn character(&self) -> &str {
        match self {
            JobOutcome::Success { character, .. }
            | JobOutcome::Failure { character, .. }
            | JobOutcome::Skipped { character, .. } => character,
        }
    }
}

/// Aggregated outcomes of a batch run.
///
/// Every input character lands in exactly one of the three lists. Order
/// within a list follows completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub successes: Vec<JobOutcome>,
    pub failures: Vec<JobOutcome>,
    pub skips: Vec<JobOutcome>,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: JobOutcome) {
        match outcome {
            JobOutcome::Success { .. } => self.successes.push(outcome),
            JobOutcome::Failure { .. } => self.failures.push(outcome),
            JobOutcome::Skipped { .. } => self.skips.push(outcome),
        }
    }

    /// Number of recorded outcomes.
    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len() + self.skips.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Characters of all recorded outcomes, in no particular order.
    pub fn characters(&self) -> Vec<&str> {
        self.successes
            .iter()
            .chain(&self.failures)
            .chain(&self.skips)
            .map(JobOutcome::character)
            .collect()
    }

    /// Failed characters paired with their error message.
    pub fn failed(&self) -> impl Iterator<Item = (&str, &str)> {
        self.failures.iter().filter_map(|outcome| match outcome {
            JobOutcome::Failure { character, error } => Some((character.as_str(), error.as_str())),
            _ => None,
        })
    }
}

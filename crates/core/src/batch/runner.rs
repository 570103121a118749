//! Batch orchestrator implementation.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::pipeline::CharacterGenerator;

use super::types::{BatchSummary, Job, JobOutcome};

/// Callback invoked every time a worker claims a job.
pub type JobClaimCallback = Arc<dyn Fn(&Job) + Send + Sync>;

/// Runs a generator over a list of characters with bounded concurrency.
pub struct BatchOrchestrator {
    generator: Arc<dyn CharacterGenerator>,
    on_claim: Option<JobClaimCallback>,
}

impl BatchOrchestrator {
    /// Create a new orchestrator.
    pub fn new(generator: Arc<dyn CharacterGenerator>) -> Self {
        Self {
            generator,
            on_claim: None,
        }
    }

    /// Set a callback that observes every claimed job.
    pub fn with_claim_callback(mut self, callback: JobClaimCallback) -> Self {
        self.on_claim = Some(callback);
        self
    }

    /// Processes every character exactly once and returns the outcomes.
    ///
    /// `min(concurrency, characters.len())` workers share one cursor over the
    /// list. A concurrency of 0 is treated as 1.
    pub async fn run(&self, characters: Vec<String>, concurrency: usize) -> BatchSummary {
        let total = characters.len();
        if total == 0 {
            return BatchSummary::default();
        }

        let concurrency = if concurrency == 0 {
            warn!("Concurrency must be at least 1, using 1");
            1
        } else {
            concurrency
        };
        let workers = concurrency.min(total);
        info!("Processing {} characters with {} workers", total, workers);

        let characters: Arc<[String]> = characters.into();
        let cursor = Arc::new(AtomicUsize::new(0));
        let summary = Arc::new(Mutex::new(BatchSummary::default()));

        let mut tasks = JoinSet::new();
        for worker_id in 0..workers {
            let worker = Worker {
                id: worker_id,
                characters: Arc::clone(&characters),
                cursor: Arc::clone(&cursor),
                summary: Arc::clone(&summary),
                generator: Arc::clone(&self.generator),
                on_claim: self.on_claim.clone(),
            };
            tasks.spawn(worker.run());
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                error!("Batch worker terminated abnormally: {}", e);
            }
        }

        let summary = summary.lock().await.clone();
        summary
    }
}

/// One worker of the pool.
struct Worker {
    id: usize,
    characters: Arc<[String]>,
    cursor: Arc<AtomicUsize>,
    summary: Arc<Mutex<BatchSummary>>,
    generator: Arc<dyn CharacterGenerator>,
    on_claim: Option<JobClaimCallback>,
}

impl Worker {
    async fn run(self) {
        let total = self.characters.len();

        loop {
            // Claim and bounds check on the same value; no await in between
            let index = self.cursor.fetch_add(1, Ordering::SeqCst);
            if index >= total {
                break;
            }

            let job = Job {
                character: self.characters[index].clone(),
                index,
                total,
            };
            debug!(worker = self.id, "{} claimed \"{}\"", job.label(), job.character);

            // Once claimed, the job must end up in the summary whatever unwinds
            let outcome = AssertUnwindSafe(self.handle(&job))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| {
                    let message = panic_message(panic.as_ref());
                    error!("{} Job \"{}\" panicked: {}", job.label(), job.character, message);
                    JobOutcome::Failure {
                        character: job.character.clone(),
                        error: format!("job panicked: {}", message),
                    }
                });
            self.summary.lock().await.record(outcome);
        }

        debug!(worker = self.id, "Worker finished");
    }

    async fn handle(&self, job: &Job) -> JobOutcome {
        if let Some(callback) = &self.on_claim {
            callback(job);
        }
        process_job(self.generator.as_ref(), job).await
    }
}

async fn process_job(generator: &dyn CharacterGenerator, job: &Job) -> JobOutcome {
    let label = job.label();

    let output_path = match generator.output_path(&job.character) {
        Ok(path) => path,
        Err(e) => {
            error!("{} Cannot generate \"{}\": {}", label, job.character, e);
            return JobOutcome::Failure {
                character: job.character.clone(),
                error: e.to_string(),
            };
        }
    };

    if tokio::fs::try_exists(&output_path).await.unwrap_or(false) {
        info!(
            "{} Skipping \"{}\": {} already exists",
            label,
            job.character,
            output_path.display()
        );
        return JobOutcome::Skipped {
            character: job.character.clone(),
            output_path,
        };
    }

    info!("{} Generating \"{}\"", label, job.character);

    match AssertUnwindSafe(generator.generate(&job.character))
        .catch_unwind()
        .await
    {
        Ok(Ok(output_path)) => {
            info!("{} Done \"{}\": {}", label, job.character, output_path.display());
            JobOutcome::Success {
                character: job.character.clone(),
                output_path,
            }
        }
        Ok(Err(e)) => {
            error!("{} Failed \"{}\": {}", label, job.character, e);
            JobOutcome::Failure {
                character: job.character.clone(),
                error: e.to_string(),
            }
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!("{} Generator panicked on \"{}\": {}", label, job.character, message);
            JobOutcome::Failure {
                character: job.character.clone(),
                error: format!("generator panicked: {}", message),
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

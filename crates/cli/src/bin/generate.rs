use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};

use strokegif_cli::{
    build_pipeline, init_tracing, load, log_summary, GenerateArgs, EXIT_GENERATION_FAILED,
};
use strokegif_core::{BatchOrchestrator, GenerationTarget};

#[tokio::main]
async fn main() -> ExitCode {
    // clap's own usage exit code (2) would collide with "generation failed"
    let args = match GenerateArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing();

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_GENERATION_FAILED),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every character succeeded or was skipped.
async fn run(args: GenerateArgs) -> Result<bool> {
    let config = load(args.config.as_deref())?;

    let target = GenerationTarget::from_arg(&args.target);
    let characters = target.resolve().context("Failed to load characters")?;
    if characters.is_empty() {
        bail!("No characters to generate");
    }

    let concurrency = args.concurrency.unwrap_or(config.batch.concurrency);
    info!(
        "Generating {} character(s) with concurrency {}",
        characters.len(),
        concurrency
    );

    let pipeline = build_pipeline(&config)?;
    let orchestrator = BatchOrchestrator::new(Arc::new(pipeline));

    let started = Instant::now();
    let summary = orchestrator.run(characters, concurrency).await;
    log_summary(&summary, started.elapsed());

    Ok(!summary.has_failures())
}

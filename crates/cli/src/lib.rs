//! Shared plumbing for the command-line binaries.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use strokegif_core::{
    load_config_or_default, validate_config, BatchSummary, Config, FfmpegEncoder,
    StrokePipeline, WebDriverRenderer,
};

/// Exit code when at least one character failed.
pub const EXIT_GENERATION_FAILED: u8 = 2;

/// Character generated when no target is given.
pub const DEFAULT_CHARACTER: &str = "中";

/// Arguments of the `generate` binary.
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Render stroke-order GIFs for one character or a JSON list",
    after_help = "Exit status: 0 when every character was generated or skipped, \
                  1 on invalid input or configuration, \
                  2 when at least one character failed (the others are still written)."
)]
pub struct GenerateArgs {
    /// Configuration file (defaults to STROKEGIF_CONFIG or ./strokegif.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// A single character, or a `.json` file listing characters
    #[arg(default_value = DEFAULT_CHARACTER)]
    pub target: String,

    /// Number of characters generated in parallel
    #[arg(value_parser = parse_concurrency)]
    pub concurrency: Option<usize>,
}

/// Arguments of the `update-manifest` binary.
#[derive(Parser, Debug)]
#[command(version, about = "Write output/data.json listing the generated GIFs")]
pub struct ManifestArgs {
    /// Configuration file (defaults to STROKEGIF_CONFIG or ./strokegif.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Concurrency must be a positive integer.
pub fn parse_concurrency(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("concurrency must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("`{}` is not a number", value)),
    }
}

/// Initialize logging to stderr, `RUST_LOG` overriding the default `info`.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Loads and validates the configuration.
pub fn load(config: Option<&std::path::Path>) -> Result<Config> {
    let config = load_config_or_default(config).context("Failed to load config")?;
    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

/// Browser-backed pipeline for the configured renderer and encoder.
pub fn build_pipeline(config: &Config) -> Result<StrokePipeline<WebDriverRenderer, FfmpegEncoder>> {
    let renderer = WebDriverRenderer::new(config.renderer.clone())
        .context("Failed to create WebDriver client")?;
    let encoder = FfmpegEncoder::new(config.encoder.clone());
    Ok(StrokePipeline::from_config(config, renderer, encoder))
}

/// Logs the end-of-run report.
pub fn log_summary(summary: &BatchSummary, elapsed: Duration) {
    info!("========== Generation finished ==========");
    info!("Elapsed: {:.2} minutes", elapsed.as_secs_f64() / 60.0);
    info!("Succeeded: {}", summary.successes.len());
    info!("Skipped: {} (already generated)", summary.skips.len());
    info!("Failed: {}", summary.failures.len());

    if summary.has_failures() {
        error!("Failed characters:");
        for (character, message) in summary.failed() {
            error!("  - {}: {}", character, message);
        }
    }
}

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use strokegif_cli::{init_tracing, load, ManifestArgs};
use strokegif_core::write_snapshot;

#[tokio::main]
async fn main() -> ExitCode {
    let args = ManifestArgs::parse();
    init_tracing();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: ManifestArgs) -> Result<()> {
    let config = load(args.config.as_deref())?;
    let dir = &config.output.dir;

    if !dir.is_dir() {
        info!("Output directory {} does not exist, nothing to list", dir.display());
        return Ok(());
    }

    let report = write_snapshot(dir, &config.output.manifest_file)
        .await
        .context("Failed to write manifest")?;
    info!(
        "Wrote {} entr{} to {}",
        report.count,
        if report.count == 1 { "y" } else { "ies" },
        report.path.display()
    );
    Ok(())
}

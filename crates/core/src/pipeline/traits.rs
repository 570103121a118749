//! Trait definitions for the pipeline module.

use std::path::PathBuf;

use async_trait::async_trait;

use super::error::PipelineError;

/// Produces one GIF per character.
#[async_trait]
pub trait CharacterGenerator: Send + Sync {
    /// Where the GIF for `character` lives once generated.
    fn output_path(&self, character: &str) -> Result<PathBuf, PipelineError>;

    /// Generates the GIF for `character`, returning its path.
    async fn generate(&self, character: &str) -> Result<PathBuf, PipelineError>;
}

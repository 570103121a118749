//! Mock character generator for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::input::validate_character;
use crate::pipeline::{CharacterGenerator, PipelineError};
use crate::renderer::RendererError;

/// Mock implementation of the CharacterGenerator trait.
///
/// Writes `<output_dir>/<character>.gif` on success. Failures and panics can
/// be injected per character.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    output_dir: PathBuf,
    calls: Arc<RwLock<Vec<String>>>,
    fail: Arc<RwLock<HashSet<String>>>,
    panic: Arc<RwLock<HashSet<String>>>,
    delay: Arc<RwLock<Duration>>,
}

impl MockGenerator {
    /// Create a mock writing into `output_dir`.
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            calls: Arc::new(RwLock::new(Vec::new())),
            fail: Arc::new(RwLock::new(HashSet::new())),
            panic: Arc::new(RwLock::new(HashSet::new())),
            delay: Arc::new(RwLock::new(Duration::ZERO)),
        }
    }

    /// Make generation of `character` return an error.
    pub async fn fail_on(&self, character: &str) {
        self.fail.write().await.insert(character.to_string());
    }

    /// Make generation of `character` panic.
    pub async fn panic_on(&self, character: &str) {
        self.panic.write().await.insert(character.to_string());
    }

    /// Simulated generation time.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// Number of `generate` calls.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Characters passed to `generate`, in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl CharacterGenerator for MockGenerator {
    fn output_path(&self, character: &str) -> Result<PathBuf, PipelineError> {
        validate_character(character)?;
        Ok(self.output_dir.join(format!("{}.gif", character)))
    }

    async fn generate(&self, character: &str) -> Result<PathBuf, PipelineError> {
        self.calls.write().await.push(character.to_string());

        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.panic.read().await.contains(character) {
            panic!("mock panic for {}", character);
        }
        if self.fail.read().await.contains(character) {
            return Err(PipelineError::Renderer(RendererError::Script(format!(
                "mock failure for {}",
                character
            ))));
        }

        let path = self.output_path(character)?;
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| PipelineError::io(&self.output_dir, e))?;
        tokio::fs::write(&path, b"GIF89a")
            .await
            .map_err(|e| PipelineError::io(&path, e))?;
        Ok(path)
    }
}

//! Stroke pipeline implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::{Config, OutputConfig, RenderConfig};
use crate::encoder::{EncodeJob, Encoder};
use crate::input::validate_character;
use crate::renderer::{PageRequest, RenderSession, Renderer};

use super::error::PipelineError;
use super::traits::CharacterGenerator;

/// Renders a character's stroke animation and encodes it as a GIF.
pub struct StrokePipeline<R: Renderer, E: Encoder> {
    renderer: Arc<R>,
    encoder: Arc<E>,
    render: RenderConfig,
    output: OutputConfig,
}

impl<R: Renderer, E: Encoder> StrokePipeline<R, E> {
    /// Creates a new pipeline.
    pub fn new(render: RenderConfig, output: OutputConfig, renderer: R, encoder: E) -> Self {
        Self {
            renderer: Arc::new(renderer),
            encoder: Arc::new(encoder),
            render,
            output,
        }
    }

    /// Creates a pipeline from the full application config.
    pub fn from_config(config: &Config, renderer: R, encoder: E) -> Self {
        Self::new(
            config.render.clone(),
            config.output.clone(),
            renderer,
            encoder,
        )
    }

    /// Scratch directory holding the frames of `character`.
    pub fn frames_dir(&self, character: &str) -> PathBuf {
        self.output.temp_dir.join(character)
    }

    async fn prepare_dirs(&self, frames_dir: &Path) -> Result<(), PipelineError> {
        tokio::fs::create_dir_all(&self.output.dir)
            .await
            .map_err(|e| PipelineError::io(&self.output.dir, e))?;
        tokio::fs::create_dir_all(frames_dir)
            .await
            .map_err(|e| PipelineError::io(frames_dir, e))?;
        Ok(())
    }

    /// Drives the page from load to the last captured frame.
    async fn capture(
        &self,
        session: &mut dyn RenderSession,
        character: &str,
        frames_dir: &Path,
    ) -> Result<u32, PipelineError> {
        if !session.wait_ready(self.render.ready_timeout()).await? {
            warn!(
                "Timed out waiting for \"{}\" to become ready, continuing anyway",
                character
            );
            sleep(self.render.ready_fallback()).await;
        }

        sleep(self.render.settle_delay()).await;
        session.start_animation().await?;

        let mut detected = false;
        for _ in 0..self.render.stroke_poll_attempts {
            sleep(self.render.stroke_poll_interval()).await;
            if session.strokes_visible().await? {
                detected = true;
                break;
            }
        }
        if detected {
            debug!("Stroke animation started for \"{}\"", character);
        } else {
            debug!("No stroke detected for \"{}\", waiting before capture", character);
            sleep(self.render.stroke_fallback()).await;
        }

        let total = self.render.frame_count();
        let interval = self.render.frame_interval();
        for index in 0..total {
            let png = session.capture_frame().await?;
            let path = EncodeJob::frame_path(frames_dir, index);
            tokio::fs::write(&path, png)
                .await
                .map_err(|e| PipelineError::io(&path, e))?;

            sleep(interval).await;

            if (index + 1) % 10 == 0 || index + 1 == total {
                info!("\"{}\": captured {}/{} frames", character, index + 1, total);
            }
        }

        Ok(total)
    }
}

#[async_trait]
impl<R: Renderer + 'static, E: Encoder + 'static> CharacterGenerator for StrokePipeline<R, E> {
    fn output_path(&self, character: &str) -> Result<PathBuf, PipelineError> {
        validate_character(character)?;
        Ok(self.output.dir.join(format!("{}.gif", character)))
    }

    async fn generate(&self, character: &str) -> Result<PathBuf, PipelineError> {
        let start = Instant::now();
        let output_path = self.output_path(character)?;
        let frames_dir = self.frames_dir(character);

        info!("Generating stroke order GIF for \"{}\"", character);
        self.prepare_dirs(&frames_dir).await?;

        let request = PageRequest::new(
            character,
            self.render.frame_width(),
            self.render.frame_height(),
        );
        let mut session = self.renderer.open(&request).await?;

        let captured = self.capture(session.as_mut(), character, &frames_dir).await;

        if let Err(e) = session.close().await {
            warn!(error = %e, "Failed to close {} session for \"{}\"", self.renderer.name(), character);
        }
        let frame_count = captured?;

        info!("\"{}\": encoding {} frames", character, frame_count);
        let job = EncodeJob::new(
            &frames_dir,
            self.render.fps,
            self.render.frame_width(),
            self.render.frame_height(),
            &output_path,
        );

        let result = self
            .encoder
            .encode(&job)
            .await
            .map_err(|source| PipelineError::Encoder {
                source,
                frames_dir: frames_dir.clone(),
            })?;

        if let Err(e) = tokio::fs::remove_dir_all(&frames_dir).await {
            warn!(error = %e, "Failed to remove frames in {}", frames_dir.display());
        }

        info!(
            size_bytes = result.output_size_bytes,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "GIF written: {}",
            output_path.display()
        );
        Ok(output_path)
    }
}

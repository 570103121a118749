//! Trait definitions for the encoder module.

use async_trait::async_trait;

use super::error::EncoderError;
use super::types::{EncodeJob, EncodeResult};

/// An encoder that turns a numbered frame sequence into an animated image.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Returns the name of this encoder implementation.
    fn name(&self) -> &str;

    /// Encodes the frames described by the job into `job.output_path`.
    async fn encode(&self, job: &EncodeJob) -> Result<EncodeResult, EncoderError>;

    /// Validates that the encoder is installed and usable.
    async fn validate(&self) -> Result<(), EncoderError>;
}

//! Mock encoder for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::encoder::{EncodeJob, EncodeResult, Encoder, EncoderError};

/// A recorded encode for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedEncode {
    /// The job that was submitted.
    pub job: EncodeJob,
    /// Frame files present in the frames directory at encode time.
    pub frame_count: usize,
}

/// Mock implementation of the Encoder trait.
///
/// Successful encodes write a small placeholder GIF to `job.output_path`.
#[derive(Debug, Clone, Default)]
pub struct MockEncoder {
    encodes: Arc<RwLock<Vec<RecordedEncode>>>,
    /// If set, the next encode fails with this error.
    next_error: Arc<RwLock<Option<EncoderError>>>,
}

impl MockEncoder {
    /// Create a new mock encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next encode fail.
    pub async fn set_next_error(&self, error: EncoderError) {
        *self.next_error.write().await = Some(error);
    }

    /// All encodes attempted so far.
    pub async fn recorded_jobs(&self) -> Vec<RecordedEncode> {
        self.encodes.read().await.clone()
    }
}

async fn count_frames(job: &EncodeJob) -> usize {
    let mut count = 0;
    while tokio::fs::try_exists(EncodeJob::frame_path(&job.frames_dir, count as u32))
        .await
        .unwrap_or(false)
    {
        count += 1;
    }
    count
}

#[async_trait]
impl Encoder for MockEncoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn encode(&self, job: &EncodeJob) -> Result<EncodeResult, EncoderError> {
        let frame_count = count_frames(job).await;
        self.encodes.write().await.push(RecordedEncode {
            job: job.clone(),
            frame_count,
        });

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        if frame_count == 0 {
            return Err(EncoderError::NoFrames {
                path: job.frames_dir.clone(),
            });
        }

        if let Some(parent) = job.output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&job.output_path, b"GIF89a").await?;

        Ok(EncodeResult {
            output_path: job.output_path.clone(),
            output_size_bytes: 6,
            duration_ms: 0,
        })
    }

    async fn validate(&self) -> Result<(), EncoderError> {
        Ok(())
    }
}

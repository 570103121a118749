//! Error types for the pipeline module.

use std::path::PathBuf;

use thiserror::Error;

use crate::encoder::EncoderError;
use crate::input::InputError;
use crate::renderer::RendererError;

/// Errors that can occur while generating one GIF.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Character cannot be used as a file name.
    #[error(transparent)]
    InvalidCharacter(#[from] InputError),

    /// Browser session failed.
    #[error("Rendering failed: {0}")]
    Renderer(#[from] RendererError),

    /// Encoder failed. Frames are kept for inspection.
    #[error("{source} (frames kept in {})", .frames_dir.display())]
    Encoder {
        #[source]
        source: EncoderError,
        frames_dir: PathBuf,
    },

    /// Filesystem error while preparing directories or writing frames.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoder_error_mentions_frames_dir() {
        let err = PipelineError::Encoder {
            source: EncoderError::encode_failed("FFmpeg exited with code: Some(1)", None),
            frames_dir: PathBuf::from("temp/中"),
        };
        let msg = err.to_string();
        assert!(msg.contains("FFmpeg exited with code"));
        assert!(msg.contains("temp/中"));
    }
}

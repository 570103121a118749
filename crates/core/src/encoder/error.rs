//! Error types for the encoder module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while encoding a GIF.
#[derive(Debug, Error)]
pub enum EncoderError {
    /// FFmpeg binary not found. Carries the command to run once it is installed.
    #[error(
        "FFmpeg not found at path: {}. Install it (macOS: brew install ffmpeg, \
         Linux: sudo apt-get install ffmpeg) or run manually: {manual_command}",
        .path.display()
    )]
    FfmpegNotFound {
        path: PathBuf,
        manual_command: String,
    },

    /// Frames directory does not exist or holds no frames.
    #[error("No frames found in {}", .path.display())]
    NoFrames { path: PathBuf },

    /// Output directory does not exist and could not be created.
    #[error("Failed to create output directory: {}", .path.display())]
    OutputDirectoryFailed { path: PathBuf },

    /// Encoder process failed.
    #[error("Encoding failed: {reason}")]
    EncodeFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// Encoding timed out.
    #[error("Encoding timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error during encoding.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EncoderError {
    /// Creates a new encode failed error with stderr output.
    pub fn encode_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::EncodeFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Whether the encoder binary itself is missing.
    pub fn is_missing_binary(&self) -> bool {
        matches!(self, Self::FfmpegNotFound { .. })
    }
}

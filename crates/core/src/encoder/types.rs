//! Types for the encoder module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// printf-style pattern of captured frame files inside a frames directory.
pub const FRAME_PATTERN: &str = "frame%04d.png";

/// One frame-sequence-to-GIF encode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeJob {
    /// Directory holding `frame0000.png`, `frame0001.png`, ...
    pub frames_dir: PathBuf,
    /// Input frame rate.
    pub framerate: u32,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Destination GIF path.
    pub output_path: PathBuf,
}

impl EncodeJob {
    pub fn new(
        frames_dir: impl Into<PathBuf>,
        framerate: u32,
        width: u32,
        height: u32,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            frames_dir: frames_dir.into(),
            framerate,
            width,
            height,
            output_path: output_path.into(),
        }
    }

    /// Input pattern passed to the encoder (`<frames_dir>/frame%04d.png`).
    pub fn input_pattern(&self) -> PathBuf {
        self.frames_dir.join(FRAME_PATTERN)
    }

    /// File name of the frame with the given index.
    pub fn frame_file_name(index: u32) -> String {
        format!("frame{:04}.png", index)
    }

    /// Full path of the frame with the given index.
    pub fn frame_path(frames_dir: &Path, index: u32) -> PathBuf {
        frames_dir.join(Self::frame_file_name(index))
    }
}

/// Result of a successful encode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeResult {
    /// Path of the produced file.
    pub output_path: PathBuf,
    /// Size of the produced file.
    pub output_size_bytes: u64,
    /// Wall-clock encode time.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_file_names_are_zero_padded() {
        assert_eq!(EncodeJob::frame_file_name(0), "frame0000.png");
        assert_eq!(EncodeJob::frame_file_name(42), "frame0042.png");
        assert_eq!(EncodeJob::frame_file_name(149), "frame0149.png");
    }

    #[test]
    fn test_input_pattern() {
        let job = EncodeJob::new("/tmp/frames/中", 15, 540, 540, "/out/中.gif");
        assert_eq!(
            job.input_pattern(),
            PathBuf::from("/tmp/frames/中/frame%04d.png")
        );
    }
}

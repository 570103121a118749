//! Encoder module for turning captured frame sequences into looping GIFs.
//!
//! The `Encoder` trait hides the external encoder process. `FfmpegEncoder`
//! shells out to ffmpeg with a fixed filter chain:
//!
//! ```text
//! scale=W:H:flags=lanczos,split[s0][s1];[s0]palettegen[p];[s1][p]paletteuse
//! ```
//!
//! # Example
//!
//! ```ignore
//! use strokegif_core::encoder::{EncodeJob, Encoder, FfmpegEncoder};
//!
//! let encoder = FfmpegEncoder::with_defaults();
//! encoder.validate().await?;
//!
//! let job = EncodeJob::new("temp/中", 15, 540, 540, "output/中.gif");
//! let result = encoder.encode(&job).await?;
//! println!("{} bytes in {} ms", result.output_size_bytes, result.duration_ms);
//! ```

mod error;
mod ffmpeg;
mod traits;
mod types;

pub use error::EncoderError;
pub use ffmpeg::FfmpegEncoder;
pub use traits::Encoder;
pub use types::{EncodeJob, EncodeResult, FRAME_PATTERN};

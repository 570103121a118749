//! Testing utilities and mock implementations.
//!
//! Mocks for the renderer, encoder and whole-character generator, so the
//! pipeline and batch orchestrator can be exercised without a browser or
//! ffmpeg.
//!
//! # Example
//!
//! ```rust,ignore
//! use strokegif_core::testing::{MockEncoder, MockRenderer};
//!
//! let renderer = MockRenderer::new();
//! renderer.set_ready(false).await;
//!
//! let encoder = MockEncoder::new();
//! encoder.set_next_error(EncoderError::encode_failed("boom", None)).await;
//!
//! let pipeline = StrokePipeline::new(render, output, renderer.clone(), encoder.clone());
//! ```

mod mock_encoder;
mod mock_generator;
mod mock_renderer;

pub use mock_encoder::{MockEncoder, RecordedEncode};
pub use mock_generator::MockGenerator;
pub use mock_renderer::MockRenderer;

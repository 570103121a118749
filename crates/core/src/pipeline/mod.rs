//! Single-character render pipeline.
//!
//! `StrokePipeline` opens a renderer session, captures the stroke animation
//! as a numbered frame sequence in `temp_dir/<character>/`, then hands the
//! frames to the encoder to produce `output_dir/<character>.gif`.
//!
//! The batch orchestrator only sees the `CharacterGenerator` trait, so tests
//! can swap the whole pipeline for a mock.

mod error;
mod stroke;
mod traits;

pub use error::PipelineError;
pub use stroke::StrokePipeline;
pub use traits::CharacterGenerator;

pub mod batch;
pub mod config;
pub mod encoder;
pub mod input;
pub mod manifest;
pub mod pipeline;
pub mod renderer;
pub mod testing;

pub use batch::{BatchOrchestrator, BatchSummary, Job, JobClaimCallback, JobOutcome};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError,
};
pub use encoder::{EncodeJob, Encoder, EncoderError, FfmpegEncoder};
pub use input::{GenerationTarget, InputError};
pub use manifest::{list_outputs, write_snapshot, ManifestEntry, ManifestError};
pub use pipeline::{CharacterGenerator, PipelineError, StrokePipeline};
pub use renderer::{Renderer, RendererError, WebDriverRenderer};

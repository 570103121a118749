use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Frame geometry and frame rate are non-zero
/// - Capture duration yields at least one frame
/// - Batch concurrency is at least 1
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.render.width == 0 || config.render.height == 0 {
        return Err(ConfigError::ValidationError(
            "render.width and render.height must be non-zero".to_string(),
        ));
    }

    if config.render.fps == 0 {
        return Err(ConfigError::ValidationError(
            "render.fps cannot be 0".to_string(),
        ));
    }

    if config.render.capture_duration_ms == 0 {
        return Err(ConfigError::ValidationError(
            "render.capture_duration_ms cannot be 0".to_string(),
        ));
    }

    if config.batch.concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "batch.concurrency must be at least 1".to_string(),
        ));
    }

    Ok(())
}

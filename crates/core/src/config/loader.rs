use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

use super::{types::Config, ConfigError};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "STROKEGIF_CONFIG";

/// File picked up when neither `--config` nor `STROKEGIF_CONFIG` is given.
const DEFAULT_CONFIG_FILE: &str = "strokegif.toml";

fn base_figment() -> Figment {
    Figment::from(Serialized::defaults(Config::default()))
}

fn env_overrides() -> Env {
    Env::prefixed("STROKEGIF_")
        .ignore(&["CONFIG"])
        .split("__")
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    base_figment()
        .merge(Toml::file(path))
        .merge(env_overrides())
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration, falling back to built-in defaults when no file is present.
///
/// An explicit path (argument or `STROKEGIF_CONFIG`) must exist; the implicit
/// `strokegif.toml` is optional.
pub fn load_config_or_default(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let from_env = std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from);

    match explicit.map(Path::to_path_buf).or(from_env) {
        Some(path) => load_config(&path),
        None => {
            let implicit = Path::new(DEFAULT_CONFIG_FILE);
            if implicit.exists() {
                load_config(implicit)
            } else {
                base_figment()
                    .merge(env_overrides())
                    .extract()
                    .map_err(|e| ConfigError::ParseError(e.to_string()))
            }
        }
    }
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

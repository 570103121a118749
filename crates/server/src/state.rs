use strokegif_core::Config;

use crate::generate::GenerateCommand;

/// Shared application state
pub struct AppState {
    config: Config,
    generate: GenerateCommand,
}

impl AppState {
    pub fn new(config: Config, generate: GenerateCommand) -> Self {
        Self { config, generate }
    }

    /// State with the generate command resolved from the config.
    pub fn from_config(config: Config) -> Self {
        let generate = GenerateCommand::from_config(&config.server);
        Self::new(config, generate)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn generate_command(&self) -> &GenerateCommand {
        &self.generate
    }
}

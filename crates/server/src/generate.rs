//! Out-of-process generation.
//!
//! The API runs the `generate` binary once per request, so a crashing
//! browser or encoder can never take the server down with it. The child
//! inherits the server's environment and working directory, which carries
//! `STROKEGIF_CONFIG` and any `STROKEGIF_*` overrides along.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{info, warn};

use strokegif_core::config::ServerConfig;

/// Name of the generator binary shipped next to the server.
const GENERATE_BIN: &str = "generate";

/// Handle to the generator executable.
#[derive(Debug, Clone)]
pub struct GenerateCommand {
    program: PathBuf,
}

impl GenerateCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Uses `server.generate_command`, or the `generate` binary next to the
    /// running executable.
    pub fn from_config(config: &ServerConfig) -> Self {
        match &config.generate_command {
            Some(program) => Self::new(program),
            None => Self::new(default_program()),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The character goes after `--` so a leading dash is never read as a flag.
    fn command(&self, character: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("--")
            .arg(character)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }

    /// Runs the generator for one character and waits for it to exit.
    ///
    /// Output lines are forwarded to the log as they arrive.
    pub async fn run(&self, character: &str) -> std::io::Result<ExitStatus> {
        let mut child = self.command(character).spawn()?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (status, _, _) = tokio::join!(
            child.wait(),
            forward_lines(stdout, character, "stdout"),
            forward_lines(stderr, character, "stderr"),
        );
        status
    }
}

fn default_program() -> PathBuf {
    let file_name = format!("{}{}", GENERATE_BIN, std::env::consts::EXE_SUFFIX);
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&file_name)))
        .unwrap_or_else(|| PathBuf::from(file_name))
}

async fn forward_lines<R: AsyncRead + Unpin>(reader: Option<R>, character: &str, stream: &str) {
    let Some(reader) = reader else {
        return;
    };
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => info!(character = %character, stream, "{}", line),
            Ok(None) => break,
            Err(e) => {
                warn!(character = %character, stream, "Failed to read generator output: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_program_wins() {
        let config = ServerConfig {
            generate_command: Some(PathBuf::from("/usr/local/bin/generate")),
            ..Default::default()
        };
        let command = GenerateCommand::from_config(&config);
        assert_eq!(command.program(), Path::new("/usr/local/bin/generate"));
    }

    #[test]
    fn test_default_program_is_sibling_binary() {
        let command = GenerateCommand::from_config(&ServerConfig::default());
        let name = command.program().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with(GENERATE_BIN));
    }

    #[test]
    fn test_character_is_passed_after_separator() {
        let command = GenerateCommand::new("/usr/local/bin/generate");
        for character in ["中", "-V", "--config"] {
            let built = command.command(character);
            let args: Vec<_> = built.as_std().get_args().collect();
            assert_eq!(args, vec![std::ffi::OsStr::new("--"), std::ffi::OsStr::new(character)]);
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_reports_exit_status() {
        let ok = GenerateCommand::new("/bin/true").run("中").await.unwrap();
        assert!(ok.success());

        let failed = GenerateCommand::new("/bin/false").run("中").await.unwrap();
        assert_eq!(failed.code(), Some(1));
    }

    #[tokio::test]
    async fn test_run_missing_program() {
        let result = GenerateCommand::new("/nonexistent/generate").run("中").await;
        assert!(result.is_err());
    }
}

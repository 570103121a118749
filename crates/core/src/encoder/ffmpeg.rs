//! FFmpeg-based GIF encoder implementation.

use async_trait::async_trait;
use regex_lite::Regex;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use crate::config::EncoderConfig;

use super::error::EncoderError;
use super::traits::Encoder;
use super::types::{EncodeJob, EncodeResult};

/// FFmpeg-based encoder implementation.
pub struct FfmpegEncoder {
    config: EncoderConfig,
}

impl FfmpegEncoder {
    /// Creates a new FFmpeg encoder with the given configuration.
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Creates an encoder with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(EncoderConfig::default())
    }

    /// Palette-generating filter chain with lanczos scaling.
    pub fn filter_chain(width: u32, height: u32) -> String {
        format!(
            "scale={}:{}:flags=lanczos,split[s0][s1];[s0]palettegen[p];[s1][p]paletteuse",
            width, height
        )
    }

    /// Builds ffmpeg arguments for a GIF encode.
    fn build_args(&self, job: &EncodeJob) -> Vec<String> {
        vec![
            "-y".to_string(), // Overwrite output
            "-framerate".to_string(),
            job.framerate.to_string(),
            "-i".to_string(),
            job.input_pattern().to_string_lossy().to_string(),
            "-vf".to_string(),
            Self::filter_chain(job.width, job.height),
            "-loglevel".to_string(),
            self.config.log_level.clone(),
            // Progress output for parsing
            "-progress".to_string(),
            "pipe:2".to_string(),
            job.output_path.to_string_lossy().to_string(),
        ]
    }

    /// Shell command an operator can run by hand to finish the encode.
    pub fn manual_command(&self, job: &EncodeJob) -> String {
        format!(
            "{} -y -framerate {} -i \"{}\" -vf \"{}\" \"{}\"",
            self.config.ffmpeg_path.display(),
            job.framerate,
            job.input_pattern().display(),
            Self::filter_chain(job.width, job.height),
            job.output_path.display()
        )
    }

    fn not_found(&self, manual_command: String) -> EncoderError {
        EncoderError::FfmpegNotFound {
            path: self.config.ffmpeg_path.clone(),
            manual_command,
        }
    }

    /// Checks that ffmpeg can be executed.
    async fn ffmpeg_available(&self) -> Result<bool, std::io::Error> {
        match Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
        {
            Ok(status) => Ok(status.success()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn run_encode(&self, job: &EncodeJob) -> Result<EncodeResult, EncoderError> {
        let start = Instant::now();

        let first_frame = EncodeJob::frame_path(&job.frames_dir, 0);
        if !tokio::fs::try_exists(&first_frame).await.unwrap_or(false) {
            return Err(EncoderError::NoFrames {
                path: job.frames_dir.clone(),
            });
        }

        if !self.ffmpeg_available().await? {
            let manual = self.manual_command(job);
            warn!(
                frames_dir = %job.frames_dir.display(),
                "FFmpeg is not installed; frames kept for manual encoding: {}",
                manual
            );
            return Err(self.not_found(manual));
        }

        // Ensure output directory exists
        if let Some(parent) = job.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|_| {
                    EncoderError::OutputDirectoryFailed {
                        path: parent.to_path_buf(),
                    }
                })?;
            }
        }

        let args = self.build_args(job);
        debug!("Running {} {}", self.config.ffmpeg_path.display(), args.join(" "));

        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    self.not_found(self.manual_command(job))
                } else {
                    EncoderError::Io(e)
                }
            })?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| EncoderError::encode_failed("stderr was not captured", None))?;
        let mut reader = BufReader::new(stderr).lines();
        let frame_regex = Regex::new(r"^frame=(\d+)").ok();

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let result = timeout(timeout_duration, async {
            let mut error_output = String::new();

            while let Ok(Some(line)) = reader.next_line().await {
                if line.contains("Error") || line.contains("error") {
                    error_output.push_str(&line);
                    error_output.push('\n');
                }

                if let Some(ref re) = frame_regex {
                    if let Some(frame) = re.captures(&line).and_then(|caps| caps.get(1)) {
                        debug!(
                            output = %job.output_path.display(),
                            "Encoded frame {}",
                            frame.as_str()
                        );
                    }
                }
            }

            let status = child.wait().await?;
            Ok::<(std::process::ExitStatus, String), std::io::Error>((status, error_output))
        })
        .await;

        match result {
            Ok(Ok((status, error_output))) => {
                if !status.success() {
                    return Err(EncoderError::encode_failed(
                        format!("FFmpeg exited with code: {:?}", status.code()),
                        if error_output.is_empty() {
                            None
                        } else {
                            Some(error_output)
                        },
                    ));
                }
            }
            Ok(Err(e)) => return Err(EncoderError::Io(e)),
            Err(_) => {
                let _ = child.kill().await;
                return Err(EncoderError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                });
            }
        }

        let output_meta = tokio::fs::metadata(&job.output_path)
            .await
            .map_err(|_| EncoderError::encode_failed("Output file not created", None))?;

        Ok(EncodeResult {
            output_path: job.output_path.clone(),
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn encode(&self, job: &EncodeJob) -> Result<EncodeResult, EncoderError> {
        self.run_encode(job).await
    }

    async fn validate(&self) -> Result<(), EncoderError> {
        if self.ffmpeg_available().await? {
            Ok(())
        } else {
            let template = EncodeJob::new("<frames_dir>", 15, 540, 540, "<output>.gif");
            Err(self.not_found(self.manual_command(&template)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn sample_job() -> EncodeJob {
        EncodeJob::new("/tmp/frames/中", 15, 540, 540, "/out/中.gif")
    }

    #[test]
    fn test_filter_chain() {
        assert_eq!(
            FfmpegEncoder::filter_chain(540, 540),
            "scale=540:540:flags=lanczos,split[s0][s1];[s0]palettegen[p];[s1][p]paletteuse"
        );
    }

    #[test]
    fn test_build_args() {
        let encoder = FfmpegEncoder::with_defaults();
        let args = encoder.build_args(&sample_job());

        assert_eq!(args[0], "-y");
        let fps_idx = args.iter().position(|a| a == "-framerate").unwrap();
        assert_eq!(args[fps_idx + 1], "15");
        let input_idx = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[input_idx + 1], "/tmp/frames/中/frame%04d.png");
        let vf_idx = args.iter().position(|a| a == "-vf").unwrap();
        assert!(args[vf_idx + 1].contains("palettegen"));
        assert!(args[vf_idx + 1].contains("flags=lanczos"));
        assert!(args.contains(&"warning".to_string()));
        assert_eq!(args.last().unwrap(), "/out/中.gif");
    }

    #[test]
    fn test_manual_command() {
        let encoder = FfmpegEncoder::with_defaults();
        let cmd = encoder.manual_command(&sample_job());
        assert_eq!(
            cmd,
            "ffmpeg -y -framerate 15 -i \"/tmp/frames/中/frame%04d.png\" \
             -vf \"scale=540:540:flags=lanczos,split[s0][s1];[s0]palettegen[p];[s1][p]paletteuse\" \
             \"/out/中.gif\""
        );
    }

    #[tokio::test]
    async fn test_encode_without_frames_fails() {
        let temp = TempDir::new().unwrap();
        let encoder = FfmpegEncoder::with_defaults();
        let job = EncodeJob::new(temp.path(), 15, 10, 10, temp.path().join("out.gif"));

        let result = encoder.encode(&job).await;
        assert!(matches!(result, Err(EncoderError::NoFrames { .. })));
    }

    #[tokio::test]
    async fn test_missing_binary_reports_manual_command() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("frame0000.png"), b"png").unwrap();

        let encoder = FfmpegEncoder::new(EncoderConfig::with_ffmpeg_path(PathBuf::from(
            "/nonexistent/bin/ffmpeg",
        )));
        let job = EncodeJob::new(temp.path(), 15, 10, 10, temp.path().join("out.gif"));

        let err = encoder.encode(&job).await.unwrap_err();
        assert!(err.is_missing_binary());
        let msg = err.to_string();
        assert!(msg.contains("frame%04d.png"));
        assert!(msg.contains("out.gif"));

        // Frames are left for the operator
        assert!(temp.path().join("frame0000.png").exists());
    }

    #[tokio::test]
    async fn test_validate_missing_binary() {
        let encoder = FfmpegEncoder::new(EncoderConfig::with_ffmpeg_path(PathBuf::from(
            "/nonexistent/bin/ffmpeg",
        )));
        let err = encoder.validate().await.unwrap_err();
        assert!(matches!(err, EncoderError::FfmpegNotFound { .. }));
    }
}

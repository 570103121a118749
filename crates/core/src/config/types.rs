use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub renderer: WebDriverConfig,
    #[serde(default)]
    pub encoder: EncoderConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// HTML document served at `/`.
    #[serde(default = "default_dashboard_path")]
    pub dashboard_path: PathBuf,
    /// Binary run for `POST /api/generate`.
    /// Defaults to the `generate` binary next to the server executable.
    #[serde(default)]
    pub generate_command: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            dashboard_path: default_dashboard_path(),
            generate_command: None,
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    3000
}

fn default_dashboard_path() -> PathBuf {
    PathBuf::from("assets/dashboard.html")
}

/// Where generated files and scratch frames live.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
    /// Snapshot file written by `update-manifest`, relative to `dir`.
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            temp_dir: default_temp_dir(),
            manifest_file: default_manifest_file(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_temp_dir() -> PathBuf {
    PathBuf::from("temp")
}

fn default_manifest_file() -> String {
    "data.json".to_string()
}

/// Frame geometry and capture timing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Extra pixels on each axis so the watermark border is captured.
    #[serde(default = "default_margin")]
    pub margin: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Total capture time (milliseconds).
    #[serde(default = "default_capture_duration")]
    pub capture_duration_ms: u64,
    /// How long to wait for the drawing engine to report ready.
    #[serde(default = "default_ready_timeout")]
    pub ready_timeout_ms: u64,
    /// Extra delay applied when the ready wait times out.
    #[serde(default = "default_ready_fallback")]
    pub ready_fallback_ms: u64,
    /// Delay between readiness and starting the animation.
    #[serde(default = "default_settle")]
    pub settle_ms: u64,
    #[serde(default = "default_stroke_poll_attempts")]
    pub stroke_poll_attempts: u32,
    #[serde(default = "default_stroke_poll_interval")]
    pub stroke_poll_interval_ms: u64,
    /// Delay applied when no stroke was seen within the poll budget.
    #[serde(default = "default_stroke_fallback")]
    pub stroke_fallback_ms: u64,
}

fn default_width() -> u32 {
    500
}

fn default_height() -> u32 {
    500
}

fn default_margin() -> u32 {
    40
}

fn default_fps() -> u32 {
    15
}

fn default_capture_duration() -> u64 {
    10_000
}

fn default_ready_timeout() -> u64 {
    15_000
}

fn default_ready_fallback() -> u64 {
    1_000
}

fn default_settle() -> u64 {
    500
}

fn default_stroke_poll_attempts() -> u32 {
    60
}

fn default_stroke_poll_interval() -> u64 {
    50
}

fn default_stroke_fallback() -> u64 {
    500
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margin: default_margin(),
            fps: default_fps(),
            capture_duration_ms: default_capture_duration(),
            ready_timeout_ms: default_ready_timeout(),
            ready_fallback_ms: default_ready_fallback(),
            settle_ms: default_settle(),
            stroke_poll_attempts: default_stroke_poll_attempts(),
            stroke_poll_interval_ms: default_stroke_poll_interval(),
            stroke_fallback_ms: default_stroke_fallback(),
        }
    }
}

impl RenderConfig {
    /// Captured (and encoded) frame width including the margin.
    pub fn frame_width(&self) -> u32 {
        self.width + self.margin
    }

    /// Captured (and encoded) frame height including the margin.
    pub fn frame_height(&self) -> u32 {
        self.height + self.margin
    }

    /// Time between two captures.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }

    /// Number of frames captured per character: `ceil(duration / interval)`.
    pub fn frame_count(&self) -> u32 {
        let fps = self.fps.max(1) as u64;
        (self.capture_duration_ms * fps).div_ceil(1000) as u32
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    pub fn ready_fallback(&self) -> Duration {
        Duration::from_millis(self.ready_fallback_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn stroke_poll_interval(&self) -> Duration {
        Duration::from_millis(self.stroke_poll_interval_ms)
    }

    pub fn stroke_fallback(&self) -> Duration {
        Duration::from_millis(self.stroke_fallback_ms)
    }

    /// Settings for tests: tiny geometry and no waiting.
    pub fn instant() -> Self {
        Self {
            width: 10,
            height: 10,
            margin: 0,
            fps: 10,
            capture_duration_ms: 300,
            ready_timeout_ms: 0,
            ready_fallback_ms: 0,
            settle_ms: 0,
            stroke_poll_attempts: 2,
            stroke_poll_interval_ms: 0,
            stroke_fallback_ms: 0,
        }
    }
}

/// WebDriver endpoint used to drive the headless browser.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebDriverConfig {
    /// WebDriver server URL (e.g., "http://localhost:9515" for chromedriver)
    #[serde(default = "default_webdriver_url")]
    pub url: String,
    /// Stroke animation page. Absolute URLs are used as-is, anything else is a local file.
    #[serde(default = "default_page")]
    pub page: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Interval between readiness checks (milliseconds).
    #[serde(default = "default_ready_poll_interval")]
    pub ready_poll_interval_ms: u64,
    /// Extra browser arguments appended to the headless defaults.
    #[serde(default)]
    pub browser_args: Vec<String>,
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_page() -> String {
    "assets/stroke.html".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_ready_poll_interval() -> u64 {
    100
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: default_webdriver_url(),
            page: default_page(),
            request_timeout_secs: default_request_timeout(),
            ready_poll_interval_ms: default_ready_poll_interval(),
            browser_args: Vec::new(),
        }
    }
}

/// Configuration for the ffmpeg-based GIF encoder.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EncoderConfig {
    /// Path to ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,
    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Timeout for a single encode in seconds.
    #[serde(default = "default_encode_timeout")]
    pub timeout_secs: u64,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_log_level() -> String {
    "warning".to_string()
}

fn default_encode_timeout() -> u64 {
    300
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            log_level: default_log_level(),
            timeout_secs: default_encode_timeout(),
        }
    }
}

impl EncoderConfig {
    /// Creates a new config with a custom ffmpeg path.
    pub fn with_ffmpeg_path(ffmpeg_path: PathBuf) -> Self {
        Self {
            ffmpeg_path,
            ..Default::default()
        }
    }

    /// Sets the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Batch generation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_concurrency() -> usize {
    3
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

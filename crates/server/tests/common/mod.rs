//! Common test utilities for in-process API testing.
//!
//! The fixture builds the real router over a temporary output directory and
//! dashboard file. Generation requests run a stand-in program (`/bin/true`
//! or `/bin/false` by default) instead of the real generator.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use strokegif_core::config::{OutputConfig, ServerConfig};
use strokegif_core::Config;
use strokegif_server::{api::create_router, generate::GenerateCommand, state::AppState};

/// Dashboard markup written by the fixture.
pub const DASHBOARD_HTML: &str = "<!DOCTYPE html><title>dashboard</title>";

/// Test fixture configuration.
pub struct TestConfig {
    /// Program run for generation requests.
    pub generate_command: PathBuf,
    /// Whether to create the output directory.
    pub create_output_dir: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            generate_command: PathBuf::from("/bin/true"),
            create_output_dir: true,
        }
    }
}

/// In-process server over temporary directories.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_list() {
///     let fixture = TestFixture::new();
///     fixture.add_output("中.gif", 10);
///
///     let response = fixture.get("/api/list").await;
///     assert_eq!(response.status, StatusCode::OK);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Generated files directory
    pub output_dir: PathBuf,
    /// Keeps the directories alive
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// Parsed JSON body, `Null` when the body is not JSON
    pub body: Value,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).to_string()
    }
}

impl TestFixture {
    /// Create a fixture whose generator always succeeds.
    pub fn new() -> Self {
        Self::with_config(TestConfig::default())
    }

    /// Create a fixture whose generator always fails.
    pub fn failing_generator() -> Self {
        Self::with_config(TestConfig {
            generate_command: PathBuf::from("/bin/false"),
            ..Default::default()
        })
    }

    pub fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let output_dir = temp_dir.path().join("output");
        if test_config.create_output_dir {
            std::fs::create_dir_all(&output_dir).expect("Failed to create output dir");
        }

        let dashboard_path = temp_dir.path().join("dashboard.html");
        std::fs::write(&dashboard_path, DASHBOARD_HTML).expect("Failed to write dashboard");

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
                dashboard_path,
                generate_command: Some(test_config.generate_command.clone()),
            },
            output: OutputConfig {
                dir: output_dir.clone(),
                temp_dir: temp_dir.path().join("temp"),
                ..Default::default()
            },
            ..Default::default()
        };

        let state = Arc::new(AppState::new(
            config,
            GenerateCommand::new(test_config.generate_command),
        ));

        Self {
            router: create_router(state),
            output_dir,
            temp_dir,
        }
    }

    /// Write a file into the output directory, `age_secs` old.
    pub fn add_output(&self, name: &str, age_secs: u64) -> PathBuf {
        let path = self.output_dir.join(name);
        let file = std::fs::File::create(&path).expect("Failed to create output file");
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .expect("Failed to set mtime");
        path
    }

    pub fn write_output(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.output_dir.join(name);
        std::fs::write(&path, contents).expect("Failed to write output file");
        path
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, Body::empty(), None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request(
            "POST",
            path,
            Body::from(body.to_string()),
            Some("application/json"),
        )
        .await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        self.request(
            "POST",
            path,
            Body::from(body.to_string()),
            Some("application/json"),
        )
        .await
    }

    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Body,
        content_type: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            body,
            bytes,
            content_type,
        }
    }
}

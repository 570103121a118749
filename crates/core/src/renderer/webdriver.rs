//! W3C WebDriver renderer implementation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::config::WebDriverConfig;

use super::error::RendererError;
use super::scripts;
use super::traits::{PageRequest, RenderSession, Renderer};

/// Arguments every headless session starts with.
const HEADLESS_ARGS: &[&str] = &[
    "--headless=new",
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--hide-scrollbars",
];

/// Builds the page URL for a character.
///
/// `http(s)://` and `file://` locations are used as given. Anything else is
/// treated as a local file path and resolved against the working directory.
pub fn page_url(page: &str, character: &str) -> Result<String, RendererError> {
    let base = if is_url(page) {
        page.to_string()
    } else {
        let path = std::path::absolute(page)
            .map_err(|e| RendererError::InvalidPage(format!("{}: {}", page, e)))?;
        file_url(&path)
    };

    let separator = if base.contains('?') { '&' } else { '?' };
    Ok(format!(
        "{}{}char={}",
        base,
        separator,
        urlencoding::encode(character)
    ))
}

fn is_url(page: &str) -> bool {
    page.starts_with("http://") || page.starts_with("https://") || page.starts_with("file://")
}

fn file_url(path: &Path) -> String {
    let encoded = path
        .to_string_lossy()
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("file://{}", encoded)
}

/// Wire envelope for every WebDriver response.
#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    value: Value,
    /// Pre-W3C drivers put the session id at the top level.
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// Thin HTTP client for WebDriver commands.
#[derive(Clone)]
struct DriverClient {
    client: Client,
    base_url: String,
}

impl DriverClient {
    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<WireResponse, RendererError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(RendererError::from_reqwest)?;
        let status = response.status();
        let text = response.text().await.map_err(RendererError::from_reqwest)?;

        let wire: WireResponse = serde_json::from_str(&text).map_err(|_| {
            RendererError::InvalidResponse(format!(
                "HTTP {}: {}",
                status,
                text.chars().take(100).collect::<String>()
            ))
        })?;

        if !status.is_success() {
            let error = wire
                .value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            let message = wire
                .value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Err(RendererError::Driver { error, message });
        }

        Ok(wire)
    }
}

/// Renderer backed by a WebDriver server such as chromedriver.
pub struct WebDriverRenderer {
    driver: DriverClient,
    config: WebDriverConfig,
}

impl WebDriverRenderer {
    /// Create a new WebDriver renderer.
    pub fn new(config: WebDriverConfig) -> Result<Self, RendererError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RendererError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            driver: DriverClient {
                client,
                base_url: config.url.trim_end_matches('/').to_string(),
            },
            config,
        })
    }

    fn capabilities(&self, request: &PageRequest) -> Value {
        let mut args: Vec<String> = HEADLESS_ARGS.iter().map(|a| a.to_string()).collect();
        args.push(format!("--window-size={},{}", request.width, request.height));
        args.extend(self.config.browser_args.iter().cloned());

        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args }
                }
            }
        })
    }

    /// Local page file, if the page is not a URL.
    fn local_page(&self) -> Option<PathBuf> {
        if is_url(&self.config.page) {
            None
        } else {
            Some(PathBuf::from(&self.config.page))
        }
    }
}

#[async_trait]
impl Renderer for WebDriverRenderer {
    fn name(&self) -> &str {
        "webdriver"
    }

    async fn open(&self, request: &PageRequest) -> Result<Box<dyn RenderSession>, RendererError> {
        if let Some(path) = self.local_page() {
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return Err(RendererError::InvalidPage(format!(
                    "page not found: {}",
                    path.display()
                )));
            }
        }
        let url = page_url(&self.config.page, &request.character)?;

        let created = self
            .driver
            .send(Method::POST, "/session", Some(self.capabilities(request)))
            .await?;
        let session_id = created
            .value
            .get("sessionId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or(created.session_id)
            .ok_or_else(|| RendererError::SessionFailed("no session id returned".to_string()))?;

        debug!(session = %session_id, character = %request.character, "Browser session started");

        let mut session = WebDriverSession {
            driver: self.driver.clone(),
            session_id,
            ready_poll_interval: Duration::from_millis(self.config.ready_poll_interval_ms),
            closed: false,
        };

        // Close the session if the page never loads
        if let Err(e) = session.load(request, &url).await {
            if let Err(close_err) = session.close().await {
                warn!(error = %close_err, "Failed to close browser session");
            }
            return Err(e);
        }

        Ok(Box::new(session))
    }
}

/// One WebDriver session with the stroke page loaded.
pub struct WebDriverSession {
    driver: DriverClient,
    session_id: String,
    ready_poll_interval: Duration,
    closed: bool,
}

impl WebDriverSession {
    fn endpoint(&self, suffix: &str) -> String {
        format!("/session/{}{}", self.session_id, suffix)
    }

    async fn load(&mut self, request: &PageRequest, url: &str) -> Result<(), RendererError> {
        self.command(
            Method::POST,
            "/window/rect",
            Some(json!({ "width": request.width, "height": request.height })),
        )
        .await?;
        self.command(Method::POST, "/url", Some(json!({ "url": url })))
            .await?;
        Ok(())
    }

    async fn command(
        &self,
        method: Method,
        suffix: &str,
        body: Option<Value>,
    ) -> Result<Value, RendererError> {
        if self.closed {
            return Err(RendererError::SessionClosed);
        }
        let endpoint = self.endpoint(suffix);
        Ok(self.driver.send(method, &endpoint, body).await?.value)
    }

    async fn execute(&self, script: &str) -> Result<Value, RendererError> {
        self.command(
            Method::POST,
            "/execute/sync",
            Some(json!({ "script": script, "args": [] })),
        )
        .await
        .map_err(|e| match e {
            RendererError::Driver { error, message } => {
                RendererError::Script(format!("{}: {}", error, message))
            }
            other => other,
        })
    }
}

#[async_trait]
impl RenderSession for WebDriverSession {
    async fn wait_ready(&mut self, timeout: Duration) -> Result<bool, RendererError> {
        let deadline = Instant::now() + timeout;

        loop {
            match self.execute(scripts::READY).await {
                Ok(value) if value.as_bool() == Some(true) => return Ok(true),
                Ok(_) => {}
                // Scripts can fail while the page is still loading
                Err(RendererError::Script(msg)) => debug!("Ready check failed: {}", msg),
                Err(e) => return Err(e),
            }

            if Instant::now() + self.ready_poll_interval > deadline {
                return Ok(false);
            }
            sleep(self.ready_poll_interval).await;
        }
    }

    async fn start_animation(&mut self) -> Result<(), RendererError> {
        let started = self.execute(scripts::START_ANIMATION).await?;
        if started.as_bool() != Some(true) {
            warn!(session = %self.session_id, "Page has no writer; animation not started");
        }
        Ok(())
    }

    async fn strokes_visible(&mut self) -> Result<bool, RendererError> {
        Ok(self.execute(scripts::STROKES_VISIBLE).await?.as_bool() == Some(true))
    }

    async fn capture_frame(&mut self) -> Result<Vec<u8>, RendererError> {
        let value = self.command(Method::GET, "/screenshot", None).await?;
        let encoded = value
            .as_str()
            .ok_or_else(|| RendererError::Screenshot("no image data returned".to_string()))?;

        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| RendererError::Screenshot(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), RendererError> {
        if self.closed {
            return Ok(());
        }
        let endpoint = self.endpoint("");
        self.closed = true;
        self.driver.send(Method::DELETE, &endpoint, None).await?;
        debug!(session = %self.session_id, "Browser session closed");
        Ok(())
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        // Best-effort release of a session that was never closed
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let driver = self.driver.clone();
            let endpoint = self.endpoint("");
            handle.spawn(async move {
                let _ = driver.send(Method::DELETE, &endpoint, None).await;
            });
        }
    }
}

//! Trait definitions for the renderer module.

use std::time::Duration;

use async_trait::async_trait;

use super::error::RendererError;

/// What to load in a fresh browser session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Character passed to the page as the `char` query parameter.
    pub character: String,
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
}

impl PageRequest {
    pub fn new(character: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            character: character.into(),
            width,
            height,
        }
    }
}

/// Launches isolated page sessions.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Returns the name of this renderer implementation.
    fn name(&self) -> &str;

    /// Opens a new session with the page loaded for `request.character`.
    async fn open(&self, request: &PageRequest) -> Result<Box<dyn RenderSession>, RendererError>;
}

/// One live page. Callers must `close` it when done, on success and failure.
#[async_trait]
pub trait RenderSession: Send {
    /// Polls until the page reports it is ready to animate.
    ///
    /// Returns `Ok(false)` when `timeout` elapses first; that is not an error.
    async fn wait_ready(&mut self, timeout: Duration) -> Result<bool, RendererError>;

    /// Starts the stroke animation.
    async fn start_animation(&mut self) -> Result<(), RendererError>;

    /// Whether at least one stroke path is visibly drawn.
    async fn strokes_visible(&mut self) -> Result<bool, RendererError>;

    /// Captures the viewport as PNG bytes.
    async fn capture_frame(&mut self) -> Result<Vec<u8>, RendererError>;

    /// Ends the session and releases the browser.
    async fn close(&mut self) -> Result<(), RendererError>;
}

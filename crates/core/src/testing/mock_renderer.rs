//! Mock renderer for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::renderer::{PageRequest, RenderSession, Renderer, RendererError};

/// Minimal PNG signature used as fake frame data.
const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

#[derive(Debug, Default)]
struct State {
    requests: Vec<PageRequest>,
    closed: usize,
    frames: usize,
    not_ready: bool,
    strokes_hidden: bool,
    fail_open: bool,
    fail_capture_at: Option<usize>,
}

/// Mock implementation of the Renderer trait.
///
/// Sessions share state with the renderer, so a clone kept by the test sees
/// every open, close and capture.
#[derive(Debug, Clone, Default)]
pub struct MockRenderer {
    state: Arc<RwLock<State>>,
}

impl MockRenderer {
    /// Create a new mock renderer. Pages are ready and strokes visible.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether sessions report the page as ready.
    pub async fn set_ready(&self, ready: bool) {
        self.state.write().await.not_ready = !ready;
    }

    /// Whether sessions report visible strokes.
    pub async fn set_strokes_visible(&self, visible: bool) {
        self.state.write().await.strokes_hidden = !visible;
    }

    /// Make every subsequent `open` fail.
    pub async fn fail_open(&self) {
        self.state.write().await.fail_open = true;
    }

    /// Fail the capture of the frame with the given index.
    pub async fn fail_capture_at(&self, frame: usize) {
        self.state.write().await.fail_capture_at = Some(frame);
    }

    /// Characters of every opened session, in order.
    pub async fn opened(&self) -> Vec<String> {
        self.state
            .read()
            .await
            .requests
            .iter()
            .map(|r| r.character.clone())
            .collect()
    }

    /// Every page request received.
    pub async fn requests(&self) -> Vec<PageRequest> {
        self.state.read().await.requests.clone()
    }

    /// Number of closed sessions.
    pub async fn closed_count(&self) -> usize {
        self.state.read().await.closed
    }

    /// Number of frames captured across all sessions.
    pub async fn frames_captured(&self) -> usize {
        self.state.read().await.frames
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn open(&self, request: &PageRequest) -> Result<Box<dyn RenderSession>, RendererError> {
        let mut state = self.state.write().await;
        if state.fail_open {
            return Err(RendererError::SessionFailed("mock open failure".to_string()));
        }
        state.requests.push(request.clone());

        Ok(Box::new(MockSession {
            state: Arc::clone(&self.state),
            captured: 0,
            closed: false,
        }))
    }
}

struct MockSession {
    state: Arc<RwLock<State>>,
    captured: usize,
    closed: bool,
}

#[async_trait]
impl RenderSession for MockSession {
    async fn wait_ready(&mut self, _timeout: Duration) -> Result<bool, RendererError> {
        Ok(!self.state.read().await.not_ready)
    }

    async fn start_animation(&mut self) -> Result<(), RendererError> {
        Ok(())
    }

    async fn strokes_visible(&mut self) -> Result<bool, RendererError> {
        Ok(!self.state.read().await.strokes_hidden)
    }

    async fn capture_frame(&mut self) -> Result<Vec<u8>, RendererError> {
        let mut state = self.state.write().await;
        if state.fail_capture_at == Some(self.captured) {
            return Err(RendererError::Screenshot("mock capture failure".to_string()));
        }
        self.captured += 1;
        state.frames += 1;
        Ok(FAKE_PNG.to_vec())
    }

    async fn close(&mut self) -> Result<(), RendererError> {
        if !self.closed {
            self.closed = true;
            self.state.write().await.closed += 1;
        }
        Ok(())
    }
}

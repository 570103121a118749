//! Error types for the renderer module.

use thiserror::Error;

/// Errors that can occur while driving the browser.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Connection to browser driver failed: {0}")]
    ConnectionFailed(String),

    #[error("Failed to start browser session: {0}")]
    SessionFailed(String),

    #[error("Browser driver error ({error}): {message}")]
    Driver { error: String, message: String },

    #[error("Page script failed: {0}")]
    Script(String),

    #[error("Screenshot failed: {0}")]
    Screenshot(String),

    #[error("Invalid page location: {0}")]
    InvalidPage(String),

    #[error("Unexpected driver response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Session already closed")]
    SessionClosed,
}

impl RendererError {
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::ConnectionFailed(e.to_string())
        } else {
            Self::InvalidResponse(e.to_string())
        }
    }
}

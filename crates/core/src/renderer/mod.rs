//! Renderer module: drives a headless browser page that animates one character.
//!
//! The `Renderer` trait opens a `RenderSession` for a character. A session
//! exposes the small set of page interactions frame capture needs: waiting
//! for the page to report readiness, starting the animation, probing for the
//! first visible stroke, and taking viewport screenshots.
//!
//! `WebDriverRenderer` speaks the W3C WebDriver protocol to a running
//! chromedriver (or any compatible driver) over HTTP.

mod error;
pub mod scripts;
mod traits;
mod webdriver;

pub use error::RendererError;
pub use traits::{PageRequest, RenderSession, Renderer};
pub use webdriver::{page_url, WebDriverRenderer};

//! Rendering engine seam
//!
//! The crawler never talks to a browser directly. It opens pages through a
//! [`RenderSession`] and drives each one through a [`PageHandle`]:
//! - One session is created per run and shared by every fetch task
//! - Each fetch task owns its page exclusively and closes it on every path
//! - Timeouts are applied by the caller, not by implementations
//!
//! [`ChromeSession`] is the production implementation on top of the Chrome
//! DevTools Protocol.

mod chrome;

pub use chrome::ChromeSession;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by the rendering engine
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Browser protocol error: {0}")]
    Protocol(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Browser session is closed")]
    SessionClosed,
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// A running browser session shared by all fetch tasks of a run
#[async_trait]
pub trait RenderSession: Send + Sync {
    /// Opens a fresh page owned by the caller
    async fn open_page(&self) -> RenderResult<Box<dyn PageHandle>>;

    /// Releases the session's resources
    ///
    /// Every teardown step is attempted even if an earlier one failed;
    /// failures are logged, never returned. Calling it twice is harmless.
    async fn shutdown(&self);
}

/// A single browser page, used by exactly one fetch task
#[async_trait]
pub trait PageHandle: Send {
    /// Navigates to `url` and returns the HTTP status of the main document
    ///
    /// `Ok(None)` means the navigation produced no response at all.
    async fn navigate(&mut self, url: &str) -> RenderResult<Option<u16>>;

    /// Waits until the page has finished loading and the network is quiet
    async fn wait_until_settled(&mut self) -> RenderResult<()>;

    /// Reads the document title
    async fn title(&mut self) -> RenderResult<String>;

    /// Reads the fully rendered document markup
    async fn content(&mut self) -> RenderResult<String>;

    /// Closes the page
    async fn close(self: Box<Self>) -> RenderResult<()>;
}

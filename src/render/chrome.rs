//! Chromium rendering session over the Chrome DevTools Protocol
//!
//! This module handles:
//! - Launching Chromium headless or headed with the run's browser settings
//! - Driving the CDP connection on a background task
//! - Isolating the run's pages in a dedicated browser context
//! - Capturing the HTTP status of each navigation
//! - Ordered, best-effort teardown

use crate::config::BrowserSettings;
use crate::render::{PageHandle, RenderError, RenderResult, RenderSession};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventResponseReceived, ResourceType,
};
use chromiumoxide::cdp::browser_protocol::page::EventLifecycleEvent;
use chromiumoxide::cdp::browser_protocol::target::{CreateBrowserContextParams, CreateTargetParams};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::listeners::EventStream;
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// How long to wait for the main document response after navigation returns
const STATUS_CAPTURE_WINDOW: Duration = Duration::from_secs(5);

/// Lifecycle event Chromium emits once a frame has had no network activity for 500ms
const NETWORK_IDLE: &str = "networkIdle";

/// Lifecycle event that starts a new document load in a frame
const LOAD_INIT: &str = "init";

/// How long to wait for the browser process to exit during teardown
const BROWSER_EXIT_TIMEOUT: Duration = Duration::from_secs(5);

/// A Chromium instance with one browser context shared by all pages
pub struct ChromeSession {
    browser: RwLock<Option<Browser>>,
    context: Mutex<Option<BrowserContextId>>,
    handler: Mutex<Option<JoinHandle<()>>>,
}

impl ChromeSession {
    /// Launches Chromium and creates the run's browser context
    ///
    /// If the browser starts but the context cannot be created, whatever was
    /// acquired is torn down before the error is returned.
    ///
    /// # Arguments
    ///
    /// * `settings` - Browser settings (headless mode, user agent, viewport, ...)
    ///
    /// # Returns
    ///
    /// * `Ok(ChromeSession)` - A ready session
    /// * `Err(RenderError::Launch)` - Chromium could not be started
    pub async fn launch(settings: &BrowserSettings) -> RenderResult<Self> {
        let config = build_browser_config(settings)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler error: {}", e);
                }
            }
            tracing::debug!("Browser handler stopped");
        });

        let context = match browser
            .create_browser_context(CreateBrowserContextParams::default())
            .await
        {
            Ok(id) => id,
            Err(e) => {
                let partial = Self {
                    browser: RwLock::new(Some(browser)),
                    context: Mutex::new(None),
                    handler: Mutex::new(Some(handler_task)),
                };
                partial.shutdown().await;
                return Err(RenderError::Launch(format!(
                    "failed to create browser context: {}",
                    e
                )));
            }
        };

        tracing::debug!(
            "Browser launched ({} mode)",
            if settings.headless { "headless" } else { "GUI" }
        );

        Ok(Self {
            browser: RwLock::new(Some(browser)),
            context: Mutex::new(Some(context)),
            handler: Mutex::new(Some(handler_task)),
        })
    }
}

/// Builds the Chromium launch configuration from the browser settings
fn build_browser_config(settings: &BrowserSettings) -> RenderResult<BrowserConfig> {
    let mut builder = BrowserConfig::builder()
        .no_sandbox()
        .arg("--disable-dev-shm-usage")
        .arg(format!("--user-agent={}", settings.user_agent))
        .window_size(settings.viewport_width, settings.viewport_height)
        .viewport(Viewport {
            width: settings.viewport_width,
            height: settings.viewport_height,
            ..Viewport::default()
        });

    if settings.ignore_https_errors {
        builder = builder.arg("--ignore-certificate-errors");
    }

    if !settings.headless {
        builder = builder.with_head();
    }

    if let Some(path) = &settings.chrome_executable {
        builder = builder.chrome_executable(path);
    }

    builder.build().map_err(RenderError::Launch)
}

#[async_trait]
impl RenderSession for ChromeSession {
    async fn open_page(&self) -> RenderResult<Box<dyn PageHandle>> {
        let context = self
            .context
            .lock()
            .await
            .clone()
            .ok_or(RenderError::SessionClosed)?;

        let guard = self.browser.read().await;
        let browser = guard.as_ref().ok_or(RenderError::SessionClosed)?;

        let params = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context)
            .build()
            .map_err(RenderError::Protocol)?;

        let page = browser
            .new_page(params)
            .await
            .map_err(|e| RenderError::Protocol(e.to_string()))?;

        // Network events carry the navigation status code
        if let Err(e) = page.execute(EnableParams::default()).await {
            tracing::warn!("Failed to enable network events on new page: {}", e);
        }

        Ok(Box::new(ChromePage {
            page,
            lifecycle: None,
        }))
    }

    async fn shutdown(&self) {
        // Step 1: browser context
        let context = self.context.lock().await.take();
        if let Some(context) = context {
            let guard = self.browser.read().await;
            if let Some(browser) = guard.as_ref() {
                match browser.dispose_browser_context(context).await {
                    Ok(()) => tracing::debug!("Browser context closed"),
                    Err(e) => tracing::warn!("Failed to close browser context: {}", e),
                }
            }
        }

        // Step 2: browser process
        let browser = self.browser.write().await.take();
        if let Some(mut browser) = browser {
            if let Err(e) = browser.close().await {
                tracing::warn!("Failed to close browser: {}", e);
                if let Some(Err(e)) = browser.kill().await {
                    tracing::warn!("Failed to kill browser process: {}", e);
                }
            }

            match tokio::time::timeout(BROWSER_EXIT_TIMEOUT, browser.wait()).await {
                Ok(Ok(_)) => tracing::debug!("Browser process exited"),
                Ok(Err(e)) => tracing::warn!("Failed to reap browser process: {}", e),
                Err(_) => tracing::warn!("Browser process did not exit within {:?}", BROWSER_EXIT_TIMEOUT),
            }
        }

        // Step 3: protocol handler
        let handler = self.handler.lock().await.take();
        if let Some(handler) = handler {
            handler.abort();
            if let Err(e) = handler.await {
                if !e.is_cancelled() {
                    tracing::warn!("Browser handler task failed: {}", e);
                }
            }
        }
    }
}

/// A Chromium tab owned by one fetch task
struct ChromePage {
    page: Page,
    /// Lifecycle events of the current navigation, subscribed before it starts
    lifecycle: Option<EventStream<EventLifecycleEvent>>,
}

#[async_trait]
impl PageHandle for ChromePage {
    async fn navigate(&mut self, url: &str) -> RenderResult<Option<u16>> {
        // Subscribe before navigating so the document response is buffered
        let mut responses = self
            .page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(|e| RenderError::Protocol(e.to_string()))?;
        self.lifecycle = Some(
            self.page
                .event_listener::<EventLifecycleEvent>()
                .await
                .map_err(|e| RenderError::Protocol(e.to_string()))?,
        );

        self.page
            .goto(url)
            .await
            .map_err(|e| RenderError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        // The first Document-type response is the final (post-redirect) navigation
        let status = tokio::time::timeout(STATUS_CAPTURE_WINDOW, async {
            while let Some(event) = responses.next().await {
                if event.r#type == ResourceType::Document {
                    return u16::try_from(event.response.status).ok();
                }
            }
            None
        })
        .await
        .unwrap_or(None);

        Ok(status)
    }

    async fn wait_until_settled(&mut self) -> RenderResult<()> {
        let mut events = self
            .lifecycle
            .take()
            .ok_or_else(|| RenderError::Protocol("page was never navigated".to_string()))?;
        let main_frame = self
            .page
            .mainframe()
            .await
            .map_err(|e| RenderError::Protocol(e.to_string()))?;

        // Only an idle signal after this navigation's own `init` counts
        let mut navigation_started = false;
        while let Some(event) = events.next().await {
            if main_frame.as_ref().is_some_and(|id| *id != event.frame_id) {
                continue;
            }
            match event.name.as_str() {
                LOAD_INIT => navigation_started = true,
                NETWORK_IDLE if navigation_started => return Ok(()),
                _ => {}
            }
        }

        Err(RenderError::Protocol(
            "lifecycle event stream closed before the network settled".to_string(),
        ))
    }

    async fn title(&mut self) -> RenderResult<String> {
        self.page
            .get_title()
            .await
            .map(Option::unwrap_or_default)
            .map_err(|e| RenderError::Protocol(e.to_string()))
    }

    async fn content(&mut self) -> RenderResult<String> {
        self.page
            .content()
            .await
            .map_err(|e| RenderError::Protocol(e.to_string()))
    }

    async fn close(self: Box<Self>) -> RenderResult<()> {
        self.page
            .close()
            .await
            .map_err(|e| RenderError::Protocol(e.to_string()))
    }
}


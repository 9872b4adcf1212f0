//! Fetch task for a single URL
//!
//! This module handles one page from open to release:
//! - Opening a fresh page in the shared rendering session
//! - Navigation with a timeout, and HTTP status classification
//! - Waiting for the network to settle (non-fatal on timeout)
//! - Reading the title and rendered markup
//! - Handing the markup to the artifact writer and the link extractor
//! - Closing the page and pacing before the task finishes

use crate::config::CrawlerConfig;
use crate::crawler::parser::extract_links;
use crate::output::{ArtifactWriter, CrawlStats};
use crate::render::{PageHandle, RenderError, RenderSession};
use crate::state::FetchState;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Title used when the page title cannot be read
pub const PLACEHOLDER_TITLE: &str = "No title";

/// Why a fetch produced no content
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("navigation timed out after {0:?}")]
    NavigationTimeout(Duration),

    #[error("no response received")]
    NoResponse,

    #[error("HTTP status {status}")]
    HttpStatus { status: u16 },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("fetch task aborted: {0}")]
    TaskAborted(String),
}

impl FetchError {
    /// Returns true for failures the fetch task could not handle itself
    ///
    /// Ordinary failures are already logged by the task; unexpected ones are
    /// reported by the crawl loop.
    pub fn is_unexpected(&self) -> bool {
        matches!(self, Self::TaskAborted(_))
    }
}

/// Result of one fetch task
pub type FetchOutcome = Result<PageResult, FetchError>;

/// A successfully retrieved page
#[derive(Debug, Clone)]
pub struct PageResult {
    pub url: String,
    pub status: u16,
    pub title: String,

    /// Fully rendered document markup
    pub html: String,

    /// Accepted links found on the page, in document order
    pub links: Vec<String>,

    /// Whether the markdown artifact was written
    pub saved: bool,
}

/// Time limits applied to every fetch
#[derive(Debug, Clone, Copy)]
pub struct FetchTimings {
    pub navigation_timeout: Duration,
    pub settle_timeout: Duration,
    pub settle_grace: Duration,
    pub pacing_delay: Duration,
}

impl FetchTimings {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            navigation_timeout: config.navigation_timeout(),
            settle_timeout: config.settle_timeout(),
            settle_grace: config.settle_grace(),
            pacing_delay: config.pacing_delay(),
        }
    }
}

/// Everything a fetch task shares with its siblings
pub struct FetchContext {
    pub session: Arc<dyn RenderSession>,
    pub writer: ArtifactWriter,
    pub stats: Arc<CrawlStats>,
    pub base_domain: String,
    pub timings: FetchTimings,
}

/// Fetches, saves, and scans one URL
///
/// # Fetch Steps
///
/// 1. Open a page owned by this task
/// 2. Navigate; no response, a timeout, or status >= 400 fails the fetch
/// 3. Wait for the network to settle; a timeout here only logs a warning
/// 4. Read the title, falling back to [`PLACEHOLDER_TITLE`]
/// 5. Read the rendered markup
/// 6. Save the markdown artifact and extract links
/// 7. Count the page as crawled
///
/// The page is closed and the pacing delay applied on every path, success
/// or failure. Only step 7 touches `pages_crawled`.
///
/// # Arguments
///
/// * `ctx` - Shared session, writer, and counters
/// * `url` - The URL to fetch
///
/// # Returns
///
/// * `Ok(PageResult)` - Content was retrieved (whether or not it was saved)
/// * `Err(FetchError)` - The fetch failed; nothing was counted
pub async fn fetch_page(ctx: &FetchContext, url: &str) -> FetchOutcome {
    tracing::info!("Crawling: {}", url);
    let state = advance(url, FetchState::Dispatched, FetchState::Fetching);

    let outcome = match ctx.session.open_page().await {
        Ok(mut page) => {
            let outcome = drive_page(ctx, page.as_mut(), url, state).await;
            if let Err(e) = page.close().await {
                tracing::debug!("Failed to close page for {}: {}", url, e);
            }
            outcome
        }
        Err(e) => Err(FetchError::from(e)),
    };

    if let Err(e) = &outcome {
        tracing::warn!("  Failed {}: {}", url, e);
    }

    if !ctx.timings.pacing_delay.is_zero() {
        tokio::time::sleep(ctx.timings.pacing_delay).await;
    }

    let last = match &outcome {
        Ok(page) if page.saved => FetchState::Saved,
        Ok(_) => FetchState::SaveFailed,
        Err(_) => FetchState::Failed,
    };
    advance(url, last, FetchState::Done);

    outcome
}

async fn drive_page(
    ctx: &FetchContext,
    page: &mut dyn PageHandle,
    url: &str,
    state: FetchState,
) -> FetchOutcome {
    let timings = &ctx.timings;

    let status = match tokio::time::timeout(timings.navigation_timeout, page.navigate(url)).await {
        Err(_) => return Err(FetchError::NavigationTimeout(timings.navigation_timeout)),
        Ok(Err(e)) => return Err(e.into()),
        Ok(Ok(None)) => return Err(FetchError::NoResponse),
        Ok(Ok(Some(status))) if status >= 400 => {
            tracing::info!("  Status: {}", status);
            return Err(FetchError::HttpStatus { status });
        }
        Ok(Ok(Some(status))) => status,
    };
    tracing::info!("  Status: {}", status);

    match tokio::time::timeout(timings.settle_timeout, page.wait_until_settled()).await {
        Ok(Ok(())) => {
            if !timings.settle_grace.is_zero() {
                tokio::time::sleep(timings.settle_grace).await;
            }
        }
        Ok(Err(e)) => tracing::warn!("  Page did not settle, continuing: {}", e),
        Err(_) => tracing::warn!(
            "  Network did not settle within {:?}, continuing with current content",
            timings.settle_timeout
        ),
    }

    let title = match page.title().await {
        Ok(title) => title,
        Err(e) => {
            tracing::warn!("  Could not read title: {}", e);
            PLACEHOLDER_TITLE.to_string()
        }
    };
    tracing::info!("  Title: {}", title);

    let html = page.content().await?;
    tracing::info!("  Size: {} bytes", html.len());
    let state = advance(url, state, FetchState::ContentReady);

    let state = advance(url, state, FetchState::Extracted);
    let saved = ctx.writer.save(url, &title, &html).await;
    if saved {
        ctx.stats.record_saved();
        advance(url, state, FetchState::Saved);
    } else {
        tracing::warn!("  Content not saved");
        advance(url, state, FetchState::SaveFailed);
    }

    let links = match Url::parse(url) {
        Ok(base) => extract_links(&html, &base, &ctx.base_domain),
        Err(e) => {
            tracing::warn!("  Cannot resolve links against {}: {}", url, e);
            Vec::new()
        }
    };
    tracing::info!("  Found {} links", links.len());

    ctx.stats.record_crawled();

    Ok(PageResult {
        url: url.to_string(),
        status,
        title,
        html,
        links,
        saved,
    })
}

/// Logs a lifecycle transition and returns the new state
fn advance(url: &str, from: FetchState, to: FetchState) -> FetchState {
    debug_assert!(from.can_transition_to(to), "{} -> {}", from, to);
    tracing::trace!("{}: {} -> {}", url, from, to);
    to
}

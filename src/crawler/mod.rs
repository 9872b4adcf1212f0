//! Crawler module for rendered, single-domain crawling
//!
//! This module contains the core crawling logic, including:
//! - The breadth-first frontier and visited set
//! - Per-URL fetch tasks driving a rendering session
//! - Link extraction and filtering
//! - Batch scheduling with bounded concurrency
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod scheduler;

pub use coordinator::Coordinator;
pub use fetcher::{
    fetch_page, FetchContext, FetchError, FetchOutcome, FetchTimings, PageResult, PLACEHOLDER_TITLE,
};
pub use frontier::Frontier;
pub use parser::extract_links;
pub use scheduler::Scheduler;

use crate::config::Config;
use crate::output::CrawlSummary;
use crate::render::RenderSession;
use crate::ScribeError;
use std::sync::Arc;

/// Runs a complete crawl
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Normalize and check the seed
/// 2. Create the output directory
/// 3. Crawl breadth-first until the budget or the frontier runs out
/// 4. Write `crawl_summary.json` and print the report
///
/// The session is not shut down; its owner does that.
///
/// # Arguments
///
/// * `seed` - The start URL
/// * `config` - The validated configuration
/// * `session` - The rendering session to fetch pages with
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed
/// * `Err(ScribeError)` - Crawl could not start or the summary could not be written
pub async fn crawl(
    seed: &str,
    config: Config,
    session: Arc<dyn RenderSession>,
) -> Result<CrawlSummary, ScribeError> {
    let mut coordinator = Coordinator::new(seed, config)?;
    coordinator.run(session).await
}

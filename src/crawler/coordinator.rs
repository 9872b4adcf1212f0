//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop, including:
//! - Validating the seed and preparing the output directory
//! - Pulling budget-limited batches from the frontier
//! - Running each batch through the scheduler
//! - Absorbing discovered links once a batch has completed
//! - Writing the run summary and printing the final report

use crate::config::Config;
use crate::crawler::fetcher::{FetchContext, FetchTimings};
use crate::crawler::frontier::Frontier;
use crate::crawler::scheduler::Scheduler;
use crate::output::{
    output_dir_name, print_report, write_summary, ArtifactWriter, CrawlStats, CrawlSummary,
};
use crate::render::RenderSession;
use crate::url::{accepts, extract_domain, normalize_seed};
use crate::{ScribeError, UrlError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    seed: Url,
    domain: String,
    output_dir: PathBuf,
    frontier: Frontier,
    stats: Arc<CrawlStats>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// The seed is normalized and must pass the link filter for its own
    /// domain. The output directory `crawled_<domain>` is created under
    /// `config.output.root` if it does not exist.
    ///
    /// # Arguments
    ///
    /// * `seed` - The start URL as given by the user
    /// * `config` - The validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ScribeError)` - Bad seed, or the output directory could not be created
    pub fn new(seed: &str, config: Config) -> Result<Self, ScribeError> {
        let seed = normalize_seed(seed)?;
        let domain = extract_domain(&seed).ok_or(UrlError::MissingDomain)?;

        if !accepts(seed.as_str(), &domain) {
            return Err(ScribeError::SeedRejected {
                url: seed.to_string(),
            });
        }

        let output_dir = config.output.root.join(output_dir_name(&domain));
        std::fs::create_dir_all(&output_dir)?;

        let frontier = Frontier::new(seed.as_str(), config.crawler.max_concurrent as usize);

        Ok(Self {
            config,
            seed,
            domain,
            output_dir,
            frontier,
            stats: Arc::new(CrawlStats::new()),
        })
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Runs the main crawl loop
    ///
    /// # Loop
    ///
    /// While the frontier has URLs and the page budget is not used up:
    /// 1. Take a batch of at most `min(max_concurrent, remaining budget)` URLs
    /// 2. Fetch the whole batch
    /// 3. Absorb the links of every successful page
    /// 4. Log progress
    ///
    /// The summary is written when the loop ends on its own. A run cancelled
    /// from outside writes nothing.
    ///
    /// # Arguments
    ///
    /// * `session` - The rendering session every fetch task opens pages in
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - The summary that was written
    /// * `Err(ScribeError)` - The summary could not be written
    pub async fn run(&mut self, session: Arc<dyn RenderSession>) -> Result<CrawlSummary, ScribeError> {
        let max_pages = self.config.crawler.max_pages as usize;
        let max_concurrent = self.config.crawler.max_concurrent as usize;

        tracing::info!("Starting crawl of {}", self.seed);
        tracing::info!("Max pages: {}", max_pages);
        tracing::info!("Domain: {}", self.domain);
        tracing::info!("Concurrent pages: {}", max_concurrent);
        tracing::info!("Output directory: {}", self.output_dir.display());
        tracing::info!(
            "Browser mode: {}",
            if self.config.browser.headless { "Headless" } else { "GUI" }
        );

        let context = FetchContext {
            session,
            writer: ArtifactWriter::new(&self.output_dir),
            stats: Arc::clone(&self.stats),
            base_domain: self.domain.clone(),
            timings: FetchTimings::from_config(&self.config.crawler),
        };
        let scheduler = Scheduler::new(Arc::new(context), max_concurrent);

        while !self.frontier.is_empty() && self.stats.pages_crawled() < max_pages {
            let remaining = max_pages - self.stats.pages_crawled();
            let batch = self.frontier.next_batch(remaining);
            if batch.is_empty() {
                break;
            }

            tracing::debug!("Dispatching batch of {} URLs", batch.len());
            let results = scheduler.run_batch(&batch).await;

            for (url, result) in batch.iter().zip(results) {
                match result {
                    Ok(page) => {
                        let added = self.frontier.absorb(&page.links);
                        self.stats.record_discovered(added);
                        tracing::debug!("{} queued {} new URLs", url, added);
                    }
                    Err(e) if e.is_unexpected() => {
                        tracing::error!("Error processing {}: {}", url, e);
                    }
                    Err(_) => {}
                }
            }

            tracing::info!("Progress: {}/{}", self.stats.pages_crawled(), max_pages);
        }

        let duration = self.stats.elapsed();
        let snapshot = self.stats.snapshot();

        let summary = CrawlSummary {
            domain: self.domain.clone(),
            start_url: self.seed.to_string(),
            crawl_stats: snapshot.clone(),
            total_urls_visited: self.frontier.visited().to_vec(),
            crawl_duration: duration.as_secs_f64(),
        };

        write_summary(&self.output_dir, &summary).await?;
        print_report(&snapshot, self.frontier.len(), &self.output_dir, duration);

        Ok(summary)
    }
}

//! Crawl statistics
//!
//! Counters are updated by fetch tasks running in parallel, so they are kept
//! in atomics and read back as a [`StatsSnapshot`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Live counters for one crawl run
#[derive(Debug)]
pub struct CrawlStats {
    pages_crawled: AtomicUsize,
    pages_saved: AtomicUsize,
    urls_discovered: AtomicUsize,
    started_at: DateTime<Utc>,
    started: Instant,
}

impl CrawlStats {
    /// Starts a new set of counters with the clock running
    pub fn new() -> Self {
        Self {
            pages_crawled: AtomicUsize::new(0),
            pages_saved: AtomicUsize::new(0),
            urls_discovered: AtomicUsize::new(0),
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    /// Records a page whose content was retrieved
    pub fn record_crawled(&self) {
        self.pages_crawled.fetch_add(1, Ordering::SeqCst);
    }

    /// Records a page whose markdown artifact was written
    pub fn record_saved(&self) {
        self.pages_saved.fetch_add(1, Ordering::SeqCst);
    }

    /// Records newly queued URLs
    pub fn record_discovered(&self, count: usize) {
        self.urls_discovered.fetch_add(count, Ordering::SeqCst);
    }

    pub fn pages_crawled(&self) -> usize {
        self.pages_crawled.load(Ordering::SeqCst)
    }

    pub fn pages_saved(&self) -> usize {
        self.pages_saved.load(Ordering::SeqCst)
    }

    pub fn urls_discovered(&self) -> usize {
        self.urls_discovered.load(Ordering::SeqCst)
    }

    /// Wall-clock time since the counters were created
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Takes a consistent-enough copy of the counters
    ///
    /// Only meaningful between batches, when no fetch task is running.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            pages_crawled: self.pages_crawled(),
            pages_saved: self.pages_saved(),
            start_time: self.started_at.timestamp_micros() as f64 / 1_000_000.0,
            urls_discovered: self.urls_discovered(),
        }
    }
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the crawl counters, as stored in the run summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub pages_crawled: usize,
    pub pages_saved: usize,

    /// Run start as seconds since the Unix epoch
    pub start_time: f64,

    pub urls_discovered: usize,
}

/// Prints the end-of-run report to stdout
///
/// # Arguments
///
/// * `stats` - Final counter values
/// * `remaining` - URLs still waiting in the frontier
/// * `output_dir` - Directory the artifacts were written to
/// * `duration` - Wall-clock duration of the run
pub fn print_report(stats: &StatsSnapshot, remaining: usize, output_dir: &Path, duration: Duration) {
    println!();
    println!("=== Crawl Complete ===");
    println!("Pages crawled: {}", stats.pages_crawled);
    println!("Pages saved: {}", stats.pages_saved);
    println!("URLs discovered: {}", stats.urls_discovered);
    println!("URLs remaining in queue: {}", remaining);
    println!("Output directory: {}", output_dir.display());
    println!("Duration: {:.1} seconds", duration.as_secs_f64());
}

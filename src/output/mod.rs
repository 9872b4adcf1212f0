//! Output module for crawl artifacts and run reports
//!
//! This module handles:
//! - Converting extracted page content to markdown documents
//! - Counting fetched, saved, and discovered pages while the crawl runs
//! - Writing the `crawl_summary.json` record at the end of a run

mod markdown;
pub mod stats;
mod summary;

pub use markdown::{artifact_filename, output_dir_name, render_document, ArtifactWriter};
pub use stats::{print_report, CrawlStats, StatsSnapshot};
pub use summary::{write_summary, CrawlSummary, SUMMARY_FILE_NAME};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Markdown conversion failed: {0}")]
    Conversion(String),

    #[error("Failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

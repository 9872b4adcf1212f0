use crate::output::stats::StatsSnapshot;
use crate::output::OutputResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Name of the run summary written into the output directory
pub const SUMMARY_FILE_NAME: &str = "crawl_summary.json";

/// Record of a finished crawl run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlSummary {
    /// The crawled domain
    pub domain: String,

    /// The seed URL after normalization
    pub start_url: String,

    pub crawl_stats: StatsSnapshot,

    /// Every dispatched URL, in dispatch order
    pub total_urls_visited: Vec<String>,

    /// Wall-clock duration in seconds
    pub crawl_duration: f64,
}

/// Writes the summary as two-space indented JSON
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(OutputError)` - Serialization or writing failed
pub async fn write_summary(output_dir: &Path, summary: &CrawlSummary) -> OutputResult<PathBuf> {
    let json = serde_json::to_string_pretty(summary)?;
    let path = output_dir.join(SUMMARY_FILE_NAME);

    let mut file = tokio::fs::File::create(&path).await?;
    file.write_all(json.as_bytes()).await?;
    file.flush().await?;

    tracing::debug!("Summary written to {}", path.display());
    Ok(path)
}

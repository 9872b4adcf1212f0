use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// User agent presented by the browser: a current desktop Chrome
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure for Sumi-Scribe
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub browser: BrowserSettings,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages successfully fetched in one run
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Maximum number of fetches in flight at once
    #[serde(rename = "max-concurrent")]
    pub max_concurrent: u32,

    /// Pause after every fetch, success or failure (seconds)
    pub delay: f64,

    /// Timeout for a single navigation (milliseconds)
    #[serde(rename = "navigation-timeout-ms")]
    pub navigation_timeout_ms: u64,

    /// Timeout for the page to settle after navigation (milliseconds)
    #[serde(rename = "settle-timeout-ms")]
    pub settle_timeout_ms: u64,

    /// Extra wait once the page has settled (milliseconds)
    #[serde(rename = "settle-grace-ms")]
    pub settle_grace_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 10,
            max_concurrent: 3,
            delay: 1.0,
            navigation_timeout_ms: 30_000,
            settle_timeout_ms: 10_000,
            settle_grace_ms: 500,
        }
    }
}

impl CrawlerConfig {
    /// The pacing delay applied after every fetch
    pub fn pacing_delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay.max(0.0))
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }

    pub fn settle_grace(&self) -> Duration {
        Duration::from_millis(self.settle_grace_ms)
    }
}

/// Browser launch configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Run without a visible window
    pub headless: bool,

    /// User agent string sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    #[serde(rename = "viewport-width")]
    pub viewport_width: u32,

    #[serde(rename = "viewport-height")]
    pub viewport_height: u32,

    /// Accept invalid or self-signed TLS certificates
    #[serde(rename = "ignore-https-errors")]
    pub ignore_https_errors: bool,

    /// Explicit Chrome/Chromium binary; detected when absent
    #[serde(rename = "chrome-executable")]
    pub chrome_executable: Option<PathBuf>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            viewport_width: 1920,
            viewport_height: 1080,
            ignore_https_errors: true,
            chrome_executable: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory in which the run's `crawled_<domain>` directory is created
    pub root: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

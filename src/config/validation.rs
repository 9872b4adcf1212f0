use crate::config::types::{BrowserSettings, Config, CrawlerConfig};
use crate::ConfigError;

/// Upper bound on simultaneously open pages
pub const MAX_CONCURRENT_LIMIT: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_browser_settings(&config.browser)?;
    Ok(())
}

/// Validates a page budget given on the command line
pub fn validate_page_budget(pages: i64) -> Result<u32, ConfigError> {
    if pages <= 0 {
        return Err(ConfigError::Validation(
            "Number of pages must be positive".to_string(),
        ));
    }

    u32::try_from(pages)
        .map_err(|_| ConfigError::Validation(format!("Number of pages is too large: {}", pages)))
}

/// Validates a concurrency width given on the command line
pub fn validate_concurrency(concurrent: i64) -> Result<u32, ConfigError> {
    if concurrent < 1 || concurrent > i64::from(MAX_CONCURRENT_LIMIT) {
        return Err(ConfigError::Validation(format!(
            "Concurrent pages must be between 1 and {}",
            MAX_CONCURRENT_LIMIT
        )));
    }

    Ok(concurrent as u32)
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(
            "Number of pages must be positive".to_string(),
        ));
    }

    validate_concurrency(i64::from(config.max_concurrent))?;

    if !config.delay.is_finite() || config.delay < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay must be a non-negative number of seconds, got {}",
            config.delay
        )));
    }

    if config.navigation_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "navigation-timeout-ms must be > 0".to_string(),
        ));
    }

    if config.settle_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "settle-timeout-ms must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates browser settings
fn validate_browser_settings(settings: &BrowserSettings) -> Result<(), ConfigError> {
    if settings.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if settings.viewport_width == 0 || settings.viewport_height == 0 {
        return Err(ConfigError::Validation(format!(
            "viewport must be non-empty, got {}x{}",
            settings.viewport_width, settings.viewport_height
        )));
    }

    if let Some(path) = &settings.chrome_executable {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "chrome-executable cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

use crate::config::types::Config;
use crate::config::validation::{validate, validate_concurrency, validate_page_budget};
use crate::ConfigError;
use std::path::Path;

/// Settings given on the command line, applied over the file configuration
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Page budget (always given on the command line)
    pub max_pages: i64,

    /// Number of concurrent pages, if given
    pub max_concurrent: Option<i64>,

    /// Delay between fetches in seconds, if given
    pub delay: Option<f64>,

    /// Show the browser window instead of running headless
    pub gui: bool,
}

/// Loads and parses a configuration file from the given path
///
/// The result is not validated; [`resolve_config`] validates once the
/// command-line overrides have been applied.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded configuration
/// * `Err(ConfigError)` - Failed to read or parse the file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_scribe::config::load_config;
///
/// let config = load_config(Path::new("scribe.toml")).unwrap();
/// println!("Delay: {}s", config.crawler.delay);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses TOML configuration text without validating it
///
/// Missing sections and keys take their default values.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Builds the effective configuration for a run
///
/// # Resolution Order
///
/// 1. Built-in defaults
/// 2. The TOML file at `path`, if one is given
/// 3. Command-line overrides
///
/// The merged configuration is validated before it is returned.
///
/// # Arguments
///
/// * `path` - Optional path to a TOML configuration file
/// * `overrides` - Values from the command line
///
/// # Returns
///
/// * `Ok(Config)` - The validated effective configuration
/// * `Err(ConfigError)` - The file could not be loaded or a value is out of range
pub fn resolve_config(path: Option<&Path>, overrides: &Overrides) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    config.crawler.max_pages = validate_page_budget(overrides.max_pages)?;

    if let Some(concurrent) = overrides.max_concurrent {
        config.crawler.max_concurrent = validate_concurrency(concurrent)?;
    }

    if let Some(delay) = overrides.delay {
        config.crawler.delay = delay;
    }

    if overrides.gui {
        config.browser.headless = false;
    }

    validate(&config)?;

    Ok(config)
}

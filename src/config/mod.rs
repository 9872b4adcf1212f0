//! Configuration module for Sumi-Scribe
//!
//! Every setting has a default. An optional TOML file can change the
//! defaults, and command-line arguments override both; the merged result is
//! validated once.
//!
//! # Example
//!
//! ```no_run
//! use sumi_scribe::config::{resolve_config, Overrides};
//! use std::path::Path;
//!
//! let overrides = Overrides { max_pages: 25, ..Overrides::default() };
//! let config = resolve_config(Some(Path::new("scribe.toml")), &overrides).unwrap();
//! println!("Crawling at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BrowserSettings, Config, CrawlerConfig, OutputConfig, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::{load_config, parse_config, resolve_config, Overrides};
pub use validation::{validate, MAX_CONCURRENT_LIMIT};

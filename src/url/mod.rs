//! URL handling module for Sumi-Scribe
//!
//! This module provides seed normalization, domain extraction, and the link
//! filter that keeps the crawl inside one domain.

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::extract_domain;
pub use filter::{accepts, has_blocked_extension, BLOCKED_EXTENSIONS};
pub use normalize::normalize_seed;

//! Main-content extraction for rendered pages
//!
//! This module turns a fully rendered HTML document into the fragment worth
//! keeping:
//! - Noise elements (navigation, banners, ads, scripts, ...) are removed first
//! - The primary content element is then chosen by a fixed priority list
//!
//! Both lists are plain data in [`rules`] so they can be tested and extended
//! independently of the traversal.

mod extractor;
pub mod rules;

pub use extractor::extract_main_content;
pub use rules::{MAIN_CONTENT_SELECTORS, NOISE_SELECTORS};

//! Selector tables driving content extraction

/// Elements removed from the document before the main content is chosen
///
/// Every match and its whole subtree is dropped, in table order.
pub const NOISE_SELECTORS: &[&str] = &[
    // Structural chrome
    "nav",
    "header",
    "footer",
    "aside",
    // Navigation and sidebars
    ".navigation",
    ".nav",
    ".menu",
    ".sidebar",
    // Advertising
    ".advertisement",
    ".ads",
    ".ad",
    ".promo",
    // Social and comments
    ".social",
    ".share",
    ".comments",
    ".comment",
    // Overlays
    ".popup",
    ".modal",
    ".overlay",
    // Non-content markup
    "script",
    "style",
    "noscript",
    // ARIA landmarks
    "[role=\"navigation\"]",
    "[role=\"banner\"]",
    "[role=\"contentinfo\"]",
];

/// Candidates for the primary content element, highest priority first
///
/// The first selector with any match wins; within a selector the first match
/// in document order is taken.
pub const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    "[role=\"main\"]",
    ".main",
    ".content",
    ".post",
    ".entry",
    "#main",
    "#content",
    "#post",
    "#article",
];

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    #[test]
    fn test_all_noise_selectors_parse() {
        for sel in NOISE_SELECTORS {
            assert!(Selector::parse(sel).is_ok(), "Invalid selector: {}", sel);
        }
    }

    #[test]
    fn test_all_main_selectors_parse() {
        for sel in MAIN_CONTENT_SELECTORS {
            assert!(Selector::parse(sel).is_ok(), "Invalid selector: {}", sel);
        }
    }

    #[test]
    fn test_semantic_tags_come_first() {
        assert_eq!(&MAIN_CONTENT_SELECTORS[..3], &["main", "article", "[role=\"main\"]"]);
    }
}

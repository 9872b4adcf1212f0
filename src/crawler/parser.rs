//! Link extraction from rendered pages
//!
//! Every `<a href>` and `<area href>` in the document is resolved against the
//! page URL, stripped of its fragment, and run through the link filter.

use crate::url::accepts;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Elements whose `href` is followed
const LINK_SELECTOR: &str = "a[href], area[href]";

/// Extracts the crawlable links of a page
///
/// # Extraction Rules
///
/// - Hrefs are resolved against `base_url`, so relative links work
/// - The fragment is removed before filtering
/// - Links that fail [`accepts`] for `base_domain` are dropped
/// - Hrefs that cannot be resolved are dropped silently
/// - Duplicates are removed, keeping the first occurrence
///
/// # Arguments
///
/// * `html` - The rendered document markup
/// * `base_url` - The URL the page was fetched from
/// * `base_domain` - The domain the crawl is restricted to
///
/// # Returns
///
/// The accepted links in document order
///
/// # Example
///
/// ```
/// use sumi_scribe::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/a#top">A</a><a href="/a">A again</a><a href="https://other.com/">B</a>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &base, "example.com");
/// assert_eq!(links, vec!["https://example.com/a".to_string()]);
/// ```
pub fn extract_links(html: &str, base_url: &Url, base_domain: &str) -> Vec<String> {
    let selector = match Selector::parse(LINK_SELECTOR) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!("Invalid link selector: {:?}", e);
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(link) = resolve_link(href, base_url) else {
            continue;
        };

        if accepts(&link, base_domain) && seen.insert(link.clone()) {
            links.push(link);
        }
    }

    links
}

/// Resolves an href against the page URL and drops the fragment
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let mut absolute = base_url.join(href.trim()).ok()?;
    absolute.set_fragment(None);
    Some(absolute.to_string())
}

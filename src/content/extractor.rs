use crate::content::rules::{MAIN_CONTENT_SELECTORS, NOISE_SELECTORS};
use scraper::{Html, Selector};

/// Extracts the primary content of a rendered page as an HTML fragment
///
/// # Extraction Steps
///
/// 1. Parse the whole document
/// 2. Remove every element matching [`NOISE_SELECTORS`], subtree included
/// 3. Return the first element matching [`MAIN_CONTENT_SELECTORS`], in
///    priority order
/// 4. Otherwise return `<body>`, and failing that the whole document
///
/// Noise is removed from the whole document before the main element is
/// chosen, so a `<main>` nested inside a `<nav>` is never selected.
///
/// # Arguments
///
/// * `html` - The fully rendered document markup
///
/// # Returns
///
/// The serialized markup of the selected subtree
///
/// # Example
///
/// ```
/// use sumi_scribe::content::extract_main_content;
///
/// let html = r#"<html><body><nav>Menu</nav><article><p>Hello</p></article></body></html>"#;
/// let main = extract_main_content(html);
/// assert_eq!(main, "<article><p>Hello</p></article>");
/// ```
pub fn extract_main_content(html: &str) -> String {
    let mut document = Html::parse_document(html);

    let removed = remove_noise(&mut document);
    tracing::trace!("Removed {} noise elements", removed);

    select_main_content(&document)
}

/// Detaches every noise element from the document tree
fn remove_noise(document: &mut Html) -> usize {
    let mut removed = 0;

    for rule in NOISE_SELECTORS {
        let selector = match Selector::parse(rule) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Skipping invalid noise selector {}: {:?}", rule, e);
                continue;
            }
        };

        // Only walk the attached tree; detached subtrees stay in the arena
        let ids: Vec<_> = document
            .root_element()
            .select(&selector)
            .map(|element| element.id())
            .collect();

        for id in ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
                removed += 1;
            }
        }
    }

    removed
}

/// Picks the main content element, falling back to body, then the document
fn select_main_content(document: &Html) -> String {
    let root = document.root_element();

    for rule in MAIN_CONTENT_SELECTORS {
        if let Ok(selector) = Selector::parse(rule) {
            if let Some(element) = root.select(&selector).next() {
                return element.html();
            }
        }
    }

    if let Ok(body_selector) = Selector::parse("body") {
        if let Some(body) = root.select(&body_selector).next() {
            return body.html();
        }
    }

    document.html()
}

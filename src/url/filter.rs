use crate::url::domain::extract_domain;
use url::Url;

/// File extensions that are never followed
///
/// Documents, spreadsheets, presentations, images, stylesheets, scripts,
/// data files, archives and media. Matched case-insensitively against the
/// end of the URL path.
pub const BLOCKED_EXTENSIONS: &[&str] = &[
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", // documents
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", // images
    ".css", ".js", ".json", ".xml", // stylesheets, scripts, data
    ".zip", ".rar", ".tar", // archives
    ".mp3", ".mp4", ".avi", ".mov", ".wmv", ".flv", // media
];

/// Decides whether a discovered URL belongs in the crawl
///
/// A URL is accepted only if all of the following hold:
/// - it parses as an absolute URL
/// - its scheme is `http` or `https`
/// - its domain equals `base_domain` exactly (no subdomain matching)
/// - its path does not end with a blocked extension
///
/// The function is pure: malformed input is rejected, never raised.
///
/// # Arguments
///
/// * `url` - The absolute URL string to check
/// * `base_domain` - The domain the crawl is restricted to
///
/// # Examples
///
/// ```
/// use sumi_scribe::url::accepts;
///
/// assert!(accepts("https://example.com/docs", "example.com"));
/// assert!(!accepts("https://blog.example.com/", "example.com"));
/// assert!(!accepts("https://example.com/report.PDF", "example.com"));
/// ```
pub fn accepts(url: &str, base_domain: &str) -> bool {
    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(_) => return false,
    };

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }

    match extract_domain(&parsed) {
        Some(domain) if domain == base_domain => {}
        _ => return false,
    }

    !has_blocked_extension(parsed.path())
}

/// Returns true if the path ends with one of [`BLOCKED_EXTENSIONS`]
pub fn has_blocked_extension(path: &str) -> bool {
    let path = path.to_ascii_lowercase();
    BLOCKED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

use crate::UrlError;
use url::Url;

/// Normalizes the seed URL given on the command line
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Reject an explicit `scheme://` other than HTTP and HTTPS
/// 3. Prefix `https://` when the input has no scheme
/// 4. Parse the URL; reject if malformed
/// 5. Reject URLs without a host
/// 6. Remove fragment (everything after #)
///
/// Query strings, trailing slashes and path case are left untouched: two
/// URLs are the same page only if they are equal once the fragment is gone.
///
/// # Arguments
///
/// * `input` - The seed as typed by the user
///
/// # Returns
///
/// * `Ok(Url)` - Normalized seed URL
/// * `Err(UrlError)` - Failed to parse or validate the URL
///
/// # Examples
///
/// ```
/// use sumi_scribe::url::normalize_seed;
///
/// let url = normalize_seed("example.com/docs#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs");
/// ```
pub fn normalize_seed(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else if let Some(scheme) = explicit_scheme(trimmed) {
        return Err(UrlError::InvalidScheme(scheme.to_string()));
    } else {
        format!("https://{}", trimmed)
    };

    let mut url = Url::parse(&with_scheme).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    Ok(url)
}

/// Returns the scheme of inputs shaped like `scheme://...`
fn explicit_scheme(input: &str) -> Option<&str> {
    let (scheme, _) = input.split_once("://")?;
    let mut chars = scheme.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());

    if starts_alpha && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(scheme)
    } else {
        None
    }
}

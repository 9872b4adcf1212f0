//! Markdown artifact writer
//!
//! Each saved page becomes one `.md` file in the run's output directory:
//!
//! ```text
//! # <title>
//!
//! **URL:** <url>
//! **Crawled:** <YYYY-MM-DD HH:MM:SS>
//!
//! ---
//!
//! <markdown body>
//! ```

use crate::content::extract_main_content;
use crate::output::{OutputError, OutputResult};
use chrono::{DateTime, Local};
use htmd::HtmlToMarkdown;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Longest file stem kept before the `.md` suffix
const MAX_FILENAME_LEN: usize = 100;

/// Writes page artifacts into one output directory
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    output_dir: PathBuf,
}

impl ArtifactWriter {
    /// Creates a writer for an existing output directory
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Returns the directory artifacts are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Extracts, converts, and saves one page
    ///
    /// Failures are logged and reported as `false`; they never abort the crawl.
    ///
    /// # Arguments
    ///
    /// * `url` - The page URL, used for the filename and metadata block
    /// * `title` - The page title
    /// * `html` - The fully rendered document markup
    ///
    /// # Returns
    ///
    /// `true` if the artifact was written
    pub async fn save(&self, url: &str, title: &str, html: &str) -> bool {
        match self.try_save(url, title, html).await {
            Ok(path) => {
                tracing::info!("  Saved: {}", path.display());
                true
            }
            Err(e) => {
                tracing::warn!("  Failed to save {}: {}", url, e);
                false
            }
        }
    }

    async fn try_save(&self, url: &str, title: &str, html: &str) -> OutputResult<PathBuf> {
        // Extraction and conversion are synchronous; nothing here is held across an await
        let markdown = html_to_markdown(&extract_main_content(html))?;
        let document = render_document(title, url, &Local::now(), &markdown);

        let path = self.output_dir.join(artifact_filename(url));

        let mut file = tokio::fs::File::create(&path).await?;
        file.write_all(document.as_bytes()).await?;
        file.flush().await?;

        Ok(path)
    }
}

/// Converts an HTML fragment to markdown
///
/// Links, images, and emphasis are kept; lines are never wrapped.
fn html_to_markdown(fragment: &str) -> OutputResult<String> {
    let converter = HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style", "noscript"])
        .build();

    converter
        .convert(fragment)
        .map_err(|e| OutputError::Conversion(e.to_string()))
}

/// Lays out a markdown artifact
///
/// The URL line ends in two spaces so that it renders as a hard line break.
pub fn render_document(
    title: &str,
    url: &str,
    crawled_at: &DateTime<Local>,
    markdown: &str,
) -> String {
    format!(
        "# {}\n\n**URL:** {}  \n**Crawled:** {}\n\n---\n\n{}",
        title,
        url,
        crawled_at.format("%Y-%m-%d %H:%M:%S"),
        markdown
    )
}

/// Derives a filesystem-safe artifact filename from a URL
///
/// # Filename Rules
///
/// 1. Drop a leading `https://` or `http://`
/// 2. Replace every character outside `[A-Za-z0-9_.-]` with `_`
/// 3. Keep at most 100 characters
/// 4. Append `.md` unless the name already ends with it
///
/// # Example
///
/// ```
/// use sumi_scribe::output::artifact_filename;
///
/// assert_eq!(artifact_filename("https://example.com/a/b?x=1"), "example.com_a_b_x_1.md");
/// ```
pub fn artifact_filename(url: &str) -> String {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    let mut name: String = stripped
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILENAME_LEN)
        .collect();

    if !name.ends_with(".md") {
        name.push_str(".md");
    }

    name
}

/// Names the run's output directory after the crawled domain
///
/// Every character outside `[A-Za-z0-9_-]` becomes `_`, so
/// `docs.example.com:8080` maps to `crawled_docs_example_com_8080`.
pub fn output_dir_name(domain: &str) -> String {
    let sanitized: String = domain
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!("crawled_{}", sanitized)
}

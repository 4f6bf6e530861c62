//! LLM context artifact generators.
//!
//! Produces the two plain-text context files derived from the merged
//! content tree:
//! - `llms.txt`: a one-bullet-per-document summary index
//! - `llms-full.txt`: every document body concatenated under header banners
//!
//! Generators are pure string builders. Writing to disk is done by the
//! caller, which records an [`ArtifactMeta`] per file.

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

/// One bullet of the summary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub title: String,
    pub url: String,
    /// Empty when the document has no description.
    pub description: String,
}

/// One document of the full-text dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullPage {
    /// Path relative to the content root.
    pub path: String,
    pub url: String,
    /// Body with front matter removed.
    pub content: String,
}

/// Checksum and size of a generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactMeta {
    pub filename: String,
    pub sha256: String,
    pub size_bytes: usize,
}

impl ArtifactMeta {
    /// Describe `content` as it will be written to `filename`.
    pub fn for_content(filename: impl Into<String>, content: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());

        Self {
            filename: filename.into(),
            sha256: format!("{:x}", hasher.finalize()),
            size_bytes: content.len(),
        }
    }
}

/// Generate the `llms.txt` summary index.
///
/// `full_file_name` is linked from the footer as `<base_url>/<full_file_name>`.
pub fn generate_llms_txt(
    title: &str,
    tagline: &str,
    entries: &[SummaryEntry],
    base_url: &str,
    full_file_name: &str,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {title}\n\n"));
    out.push_str(&format!("> {tagline}\n\n"));
    out.push_str("## Documentation Map\n\n");

    for entry in entries {
        out.push_str(&format!(
            "- [{}]({}): {}\n",
            entry.title, entry.url, entry.description
        ));
    }

    out.push_str("\n\n## Full Documentation\n");
    out.push_str(&format!(
        "For the complete context, access [{full_file_name}]({base_url}/{full_file_name}).\n"
    ));

    debug!(entries = entries.len(), bytes = out.len(), "generated summary index");
    out
}

/// Generate the `llms-full.txt` full-text dump.
pub fn generate_llms_full_txt(title: &str, pages: &[FullPage]) -> String {
    let mut out = format!("# {title} (Full)\n\n");

    for page in pages {
        out.push_str("\n\n---\n\n");
        out.push_str(&format!("# File: {}\n", page.path));
        out.push_str(&format!("# URL: {}\n\n", page.url));
        out.push_str(&page.content);
    }

    debug!(pages = pages.len(), bytes = out.len(), "generated full-text dump");
    out
}

//! Markdown document handling for docgather.
//!
//! Reads front matter (structured YAML first, line scan as a fallback),
//! strips it from document bodies, and injects a minimal block into
//! READMEs that lack one.

mod frontmatter;

use std::path::Path;

use tracing::debug;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Fields extracted from a single Markdown document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocFields {
    /// `title` from front matter, if any.
    pub title: Option<String>,
    /// `description` from front matter, if any.
    pub description: Option<String>,
    /// Document body with the leading front-matter block removed, trimmed.
    pub body: String,
}

/// File extensions treated as documents.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mdx"];

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Whether `path` names a Markdown-family document.
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MARKDOWN_EXTENSIONS.contains(&ext))
}

/// Extract title, description, and clean body from a document.
///
/// The leading front-matter block is parsed as YAML. Keys it does not
/// provide (or a block that fails to parse) fall back to the first
/// `title:` / `description:` line anywhere in the file.
pub fn extract_fields(content: &str) -> DocFields {
    let (block, rest) = frontmatter::split(content);

    let parsed = block.map(frontmatter::parse_block).transpose();
    let map = match parsed {
        Ok(map) => map,
        Err(e) => {
            debug!(error = %e, "front matter unreadable, scanning lines instead");
            None
        }
    };

    let field = |key: &str| {
        map.as_ref()
            .and_then(|m| frontmatter::scalar_field(m, key))
            .or_else(|| frontmatter::scan_field(content, key))
    };

    DocFields {
        title: field("title").filter(|t| !t.is_empty()),
        description: field("description"),
        body: rest.trim().to_string(),
    }
}

/// Whether the document opens with a closed front-matter block.
///
/// Uses the same detection as [`extract_fields`], so a block reported here
/// is always stripped from the body.
pub fn has_frontmatter(content: &str) -> bool {
    frontmatter::split(content).0.is_some()
}

/// Prepend a `title` front-matter block unless one is already present.
pub fn ensure_frontmatter(content: &str, title: &str) -> String {
    if has_frontmatter(content) {
        return content.to_string();
    }

    format!(
        "---\ntitle: \"{}\"\n---\n\n{content}",
        escape_yaml_string(title)
    )
}

/// Escape special characters in a YAML string value.
fn escape_yaml_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_markdown_checks_extension() {
        assert!(is_markdown(Path::new("guides/intro.md")));
        assert!(is_markdown(Path::new("index.mdx")));
        assert!(!is_markdown(Path::new("logo.svg")));
        assert!(!is_markdown(Path::new("README")));
    }

    #[test]
    fn extract_fields_from_frontmatter() {
        let doc = "---\ntitle: Getting Started\ndescription: First steps\n---\n\n# Hello\n";
        let fields = extract_fields(doc);
        assert_eq!(fields.title.as_deref(), Some("Getting Started"));
        assert_eq!(fields.description.as_deref(), Some("First steps"));
        assert_eq!(fields.body, "# Hello");
    }

    #[test]
    fn extract_fields_missing_description() {
        let doc = "---\ntitle: Only Title\n---\nBody text.";
        let fields = extract_fields(doc);
        assert_eq!(fields.title.as_deref(), Some("Only Title"));
        assert!(fields.description.is_none());
    }

    #[test]
    fn structured_parse_reads_folded_values() {
        // A line scan would only see the `>` indicator.
        let doc = "---\ntitle: T\ndescription: >\n  Folded text\n---\n";
        let fields = extract_fields(doc);
        assert_eq!(fields.description.as_deref(), Some("Folded text"));
    }

    #[test]
    fn malformed_frontmatter_falls_back_to_scan() {
        let doc = "---\ntitle: [unclosed\ndescription: still found\n---\nBody";
        let fields = extract_fields(doc);
        assert_eq!(fields.title.as_deref(), Some("[unclosed"));
        assert_eq!(fields.description.as_deref(), Some("still found"));
        assert_eq!(fields.body, "Body");
    }

    #[test]
    fn no_frontmatter_scans_body() {
        let doc = "# Notes\n\ntitle: From Body\n";
        let fields = extract_fields(doc);
        assert_eq!(fields.title.as_deref(), Some("From Body"));
        assert_eq!(fields.body, doc.trim());
    }

    #[test]
    fn empty_title_is_none() {
        let fields = extract_fields("---\ntitle: \"\"\n---\n");
        assert!(fields.title.is_none());
    }

    #[test]
    fn body_keeps_later_rules() {
        let doc = "---\ntitle: A\n---\nPart one\n\n---\n\nPart two\n";
        assert_eq!(extract_fields(doc).body, "Part one\n\n---\n\nPart two");
    }

    #[test]
    fn detected_block_is_always_stripped() {
        for doc in [
            "---\ntitle: Billing\n---\n# Billing",
            "\n---\ntitle: Billing\n---\n# Billing",
            "\r\n---\r\ntitle: Billing\r\n---\r\n# Billing",
        ] {
            assert!(has_frontmatter(doc), "{doc:?}");
            let fields = extract_fields(doc);
            assert_eq!(fields.title.as_deref(), Some("Billing"));
            assert_eq!(fields.body, "# Billing");
        }
    }

    #[test]
    fn unclosed_block_is_not_frontmatter() {
        let doc = "---\ntitle: Billing\n# Billing";
        assert!(!has_frontmatter(doc));
        assert!(ensure_frontmatter(doc, "billing").starts_with("---\ntitle: \"billing\"\n---\n\n---"));
    }

    #[test]
    fn ensure_frontmatter_injects_title() {
        let out = ensure_frontmatter("# Billing\n\nInvoices.\n", "billing");
        assert_eq!(out, "---\ntitle: \"billing\"\n---\n\n# Billing\n\nInvoices.\n");
    }

    #[test]
    fn ensure_frontmatter_leaves_existing_block() {
        let doc = "\n---\ntitle: Custom\n---\nBody";
        assert_eq!(ensure_frontmatter(doc, "billing"), doc);
    }

    #[test]
    fn ensure_frontmatter_escapes_quotes() {
        let out = ensure_frontmatter("x", "say \"hi\"");
        assert!(out.starts_with("---\ntitle: \"say \\\"hi\\\"\"\n---"));
    }
}

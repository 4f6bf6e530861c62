//! LLM context files generated from the merged content tree.
//!
//! Every `.md`/`.mdx` document under the content root becomes one bullet of
//! the summary index and one section of the full-text dump. Documents are
//! ordered by the configured priority prefixes, then by relative path.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, instrument};

use docgather_artifacts::{
    ArtifactMeta, FullPage, SummaryEntry, generate_llms_full_txt, generate_llms_txt,
};
use docgather_shared::{BuildConfig, DocGatherError, Result};

use crate::assembler::{sorted_entries, write_artifact};

/// Runs of slashes, except the pair after a scheme colon.
static DUPLICATE_SLASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^:]/)/+").expect("valid regex"));

/// One document of the content tree, ready for the context files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDescriptor {
    /// Path relative to the content root, `/`-separated.
    pub rel_path: String,
    pub title: String,
    /// Empty when the document has none.
    pub description: String,
    pub url: String,
    pub body: String,
}

/// Result of generating the context files.
#[derive(Debug)]
pub struct ContextResult {
    /// Documents in output order.
    pub documents: Vec<DocumentDescriptor>,
    /// Summary index, then full-text dump.
    pub artifacts: Vec<ArtifactMeta>,
}

/// Generate the summary index and full-text dump for `config.content_dir`.
#[instrument(skip_all, fields(content_root = %config.content_dir.display()))]
pub fn generate_context(config: &BuildConfig) -> Result<ContextResult> {
    let mut documents = collect_documents(&config.content_dir, &config.site_url)?;
    sort_documents(&mut documents, &config.priority);

    let entries: Vec<SummaryEntry> = documents
        .iter()
        .map(|d| SummaryEntry {
            title: d.title.clone(),
            url: d.url.clone(),
            description: d.description.clone(),
        })
        .collect();
    let pages: Vec<FullPage> = documents
        .iter()
        .map(|d| FullPage {
            path: d.rel_path.clone(),
            url: d.url.clone(),
            content: d.body.clone(),
        })
        .collect();

    let full_file_name = config
        .full_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            DocGatherError::config(format!("{} has no file name", config.full_file.display()))
        })?;

    let summary = generate_llms_txt(
        &config.site_title,
        &config.site_tagline,
        &entries,
        &config.site_url,
        &full_file_name,
    );
    let full = generate_llms_full_txt(&config.site_title, &pages);

    let artifacts = vec![
        write_artifact(&config.summary_file, &summary)?,
        write_artifact(&config.full_file, &full)?,
    ];

    info!(
        documents = documents.len(),
        summary = %config.summary_file.display(),
        full = %config.full_file.display(),
        "context files generated"
    );
    Ok(ContextResult {
        documents,
        artifacts,
    })
}

/// Read every Markdown document under `content_root` in sorted walk order.
pub fn collect_documents(content_root: &Path, base_url: &str) -> Result<Vec<DocumentDescriptor>> {
    if !content_root.is_dir() {
        return Err(DocGatherError::validation(format!(
            "content directory {} does not exist; run the merge first",
            content_root.display()
        )));
    }

    let mut documents = Vec::new();
    walk(content_root, content_root, base_url, &mut documents)?;
    Ok(documents)
}

fn walk(
    root: &Path,
    dir: &Path,
    base_url: &str,
    out: &mut Vec<DocumentDescriptor>,
) -> Result<()> {
    for path in sorted_entries(dir)? {
        if path.is_dir() {
            walk(root, &path, base_url, out)?;
        } else if docgather_markdown::is_markdown(&path) {
            out.push(read_document(root, &path, base_url)?);
        }
    }
    Ok(())
}

fn read_document(root: &Path, path: &Path, base_url: &str) -> Result<DocumentDescriptor> {
    let content = std::fs::read_to_string(path).map_err(|e| DocGatherError::io(path, e))?;
    let rel_path = path
        .strip_prefix(root)
        .map_err(|_| {
            DocGatherError::validation(format!(
                "{} is outside {}",
                path.display(),
                root.display()
            ))
        })?
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    let fields = docgather_markdown::extract_fields(&content);
    Ok(DocumentDescriptor {
        title: fields.title.unwrap_or_else(|| rel_path.clone()),
        description: fields.description.unwrap_or_default(),
        url: document_url(base_url, &rel_path),
        body: fields.body,
        rel_path,
    })
}

/// Public URL of a document: extension dropped, trailing `index` dropped.
///
/// `guides/index.mdx` maps to `<base>/guides/`, `index.mdx` to `<base>/`.
pub fn document_url(base_url: &str, rel_path: &str) -> String {
    let stem = rel_path
        .strip_suffix(".mdx")
        .or_else(|| rel_path.strip_suffix(".md"))
        .unwrap_or(rel_path);

    let route = if stem == "index" {
        ""
    } else {
        stem.strip_suffix("/index")
            .map(|dir| &stem[..dir.len() + 1])
            .unwrap_or(stem)
    };

    let url = format!("{base_url}/{route}");
    DUPLICATE_SLASHES.replace_all(&url, "$1").into_owned()
}

/// Index of the longest priority prefix of `rel_path` (first on ties).
pub fn priority_rank(rel_path: &str, priority: &[String]) -> Option<usize> {
    priority
        .iter()
        .enumerate()
        .filter(|(_, prefix)| rel_path.starts_with(prefix.as_str()))
        .fold(None, |best: Option<(usize, usize)>, (i, prefix)| match best {
            Some((_, len)) if len >= prefix.len() => best,
            _ => Some((i, prefix.len())),
        })
        .map(|(i, _)| i)
}

/// Ranked documents first by rank, then the rest by relative path.
///
/// The sort is stable: equal ranks keep walk order.
pub fn sort_documents(documents: &mut [DocumentDescriptor], priority: &[String]) {
    documents.sort_by_cached_key(|d| match priority_rank(&d.rel_path, priority) {
        Some(rank) => (rank, String::new()),
        None => (usize::MAX, d.rel_path.clone()),
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

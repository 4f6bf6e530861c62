//! Source collection: turns the configured source roots into one content tree.
//!
//! Single sources merge their docs tree straight into the content root.
//! Collections contribute one entry per module: a `<module>/` directory when
//! the module has a `docs/` folder, or a `<module>.md` page when it only has
//! a `README.md`. Reserved top-level names (`assets`, `public`, and the
//! metadata file) are routed to their own destinations.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use docgather_shared::{BuildConfig, DocGatherError, Result, SourceDescriptor};

use crate::assembler::{reset_dir, sorted_entries, write_document};
use crate::merger::{MergeLog, MergeOptions, MergeRecord, RecordKind, clean_name, merge_tree};
use crate::pipeline::ProgressReporter;

/// Reserved folder routed to the assets root.
pub const ASSETS_DIR_NAME: &str = "assets";

/// Reserved folder routed to the public root.
pub const PUBLIC_DIR_NAME: &str = "public";

/// Per-module documentation folder inside a collection.
pub const DOCS_DIR_NAME: &str = "docs";

/// Module README picked up by collections.
pub const README_FILE_NAME: &str = "README.md";

/// Result of aggregating every source.
#[derive(Debug, Default)]
pub struct AggregateResult {
    /// Top-level records of the content tree.
    pub log: MergeLog,
    /// Metadata file to process (the last one found wins).
    pub metadata_candidate: Option<PathBuf>,
    /// Sources whose root existed.
    pub sources_merged: usize,
    /// Files written into the content, assets and public roots.
    pub files_copied: usize,
}

/// Delete and recreate the content, assets and public roots.
pub fn reset_outputs(config: &BuildConfig) -> Result<()> {
    for dir in [&config.content_dir, &config.assets_dir, &config.public_dir] {
        reset_dir(dir)?;
    }
    info!(
        content = %config.content_dir.display(),
        assets = %config.assets_dir.display(),
        public = %config.public_dir.display(),
        "output directories reset"
    );
    Ok(())
}

/// Merge every configured source into the content tree.
///
/// Expects the destination roots to have been reset already.
#[instrument(skip_all, fields(sources = config.sources.len()))]
pub fn aggregate(config: &BuildConfig, progress: &dyn ProgressReporter) -> Result<AggregateResult> {
    let mut collector = Collector {
        config,
        result: AggregateResult::default(),
    };

    let total = config.sources.len();
    for (i, source) in config.sources.iter().enumerate() {
        if !source.root.exists() {
            debug!(source = %source.name, root = %source.root.display(), "source not found, skipping");
            continue;
        }

        progress.source_merged(&source.name, i + 1, total);
        if source.is_collection() {
            collector.collect_modules(source)?;
        } else {
            collector.collect_single(source)?;
        }
        collector.result.sources_merged += 1;
    }

    let result = collector.result;
    info!(
        sources = result.sources_merged,
        records = result.log.records().len(),
        files = result.files_copied,
        "aggregation complete"
    );
    Ok(result)
}

struct Collector<'a> {
    config: &'a BuildConfig,
    result: AggregateResult,
}

impl Collector<'_> {
    fn reserved_names(&self) -> Vec<String> {
        vec![
            ASSETS_DIR_NAME.to_string(),
            PUBLIC_DIR_NAME.to_string(),
            self.config.metadata_file_name.clone(),
        ]
    }

    fn collect_single(&mut self, source: &SourceDescriptor) -> Result<()> {
        let docs = if source.nested_docs {
            source.root.join(DOCS_DIR_NAME)
        } else {
            source.root.clone()
        };

        let options = MergeOptions {
            exclude: self.reserved_names(),
            clean_names: self.config.strip_numeric_prefixes,
        };
        let outcome = merge_tree(&docs, &self.config.content_dir, &options)?;
        self.result.files_copied += outcome.files_copied;
        self.result.log.record_outcome(&outcome, None);

        self.route_reserved(&docs)?;

        info!(
            source = %source.name,
            entries = outcome.entries.len(),
            "merged documentation source"
        );
        Ok(())
    }

    fn collect_modules(&mut self, source: &SourceDescriptor) -> Result<()> {
        let modules: Vec<PathBuf> = sorted_entries(&source.root)?
            .into_iter()
            .filter(|p| p.is_dir())
            .collect();

        info!(source = %source.name, count = modules.len(), "found modules");

        for module_path in modules {
            self.collect_module(source, &module_path)?;
        }
        Ok(())
    }

    fn collect_module(&mut self, source: &SourceDescriptor, module_path: &Path) -> Result<()> {
        let original_name = module_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let module_name = if self.config.strip_numeric_prefixes {
            clean_name(&original_name).to_string()
        } else {
            original_name.clone()
        };

        let docs_path = module_path.join(DOCS_DIR_NAME);
        let readme_path = module_path.join(README_FILE_NAME);
        let has_docs = docs_path.is_dir();
        let has_readme = readme_path.is_file();

        if !has_docs && !has_readme {
            debug!(module = %original_name, "module has no docs, skipping");
            return Ok(());
        }

        debug!(module = %module_name, has_docs, has_readme, "processing module");

        let kind = if has_docs {
            let out_dir = self.config.content_dir.join(&module_name);

            // README first so a docs/index.md can override it.
            if has_readme {
                let readme = read_readme(&readme_path, &module_name)?;
                write_document(&out_dir.join("index.md"), &readme)?;
                self.result.files_copied += 1;
            }

            let options = MergeOptions {
                exclude: self.reserved_names(),
                clean_names: false,
            };
            let outcome = merge_tree(&docs_path, &out_dir, &options)?;
            self.result.files_copied += outcome.files_copied;
            self.route_reserved(&docs_path)?;

            RecordKind::Directory
        } else {
            let readme = read_readme(&readme_path, &module_name)?;
            write_document(
                &self.config.content_dir.join(format!("{module_name}.md")),
                &readme,
            )?;
            self.result.files_copied += 1;

            RecordKind::Link
        };

        self.result.log.record(MergeRecord {
            original_name,
            cleaned_name: module_name,
            kind,
            group: source.group.clone(),
        });
        Ok(())
    }

    /// Send `assets/`, `public/` and the metadata file of `docs` to their roots.
    fn route_reserved(&mut self, docs: &Path) -> Result<()> {
        let verbatim = MergeOptions::default();

        let assets = merge_tree(&docs.join(ASSETS_DIR_NAME), &self.config.assets_dir, &verbatim)?;
        let public = merge_tree(&docs.join(PUBLIC_DIR_NAME), &self.config.public_dir, &verbatim)?;
        self.result.files_copied += assets.files_copied + public.files_copied;

        let metadata = docs.join(&self.config.metadata_file_name);
        if metadata.is_file() {
            debug!(path = %metadata.display(), "found metadata file");
            self.result.metadata_candidate = Some(metadata);
        }
        Ok(())
    }
}

fn read_readme(path: &Path, module_name: &str) -> Result<String> {
    let content = std::fs::read_to_string(path).map_err(|e| DocGatherError::io(path, e))?;
    Ok(docgather_markdown::ensure_frontmatter(&content, module_name))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

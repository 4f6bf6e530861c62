//! End-to-end `build` pipeline: clean → aggregate → sidebar → metadata → context.

use std::time::{Duration, Instant};

use tracing::{info, instrument};

use docgather_artifacts::ArtifactMeta;
use docgather_shared::{BuildConfig, Result};

use crate::assembler::write_json;
use crate::collector::{aggregate, reset_outputs};
use crate::context::generate_context;
use crate::metadata::load_site_meta;
use crate::sidebar::derive_sidebar;

/// Result of a pipeline run.
#[derive(Debug, Default)]
pub struct BuildResult {
    /// Sources whose root existed.
    pub sources_merged: usize,
    /// Files copied or written into the output roots.
    pub files_copied: usize,
    /// Top-level sidebar entries.
    pub sidebar_entries: usize,
    /// Documents in the context files.
    pub documents: usize,
    /// Every generated file, in write order.
    pub artifacts: Vec<ArtifactMeta>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before a source is merged.
    fn source_merged(&self, name: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &BuildResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn source_merged(&self, _name: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &BuildResult) {}
}

/// Run the full build.
///
/// 1. Reset the content, assets and public roots
/// 2. Merge every source into the content tree
/// 3. Derive and write the sidebar
/// 4. Write the site metadata
/// 5. Generate the context files
#[instrument(skip_all, fields(root = %config.repo_root.display()))]
pub fn build(config: &BuildConfig, progress: &dyn ProgressReporter) -> Result<BuildResult> {
    let start = Instant::now();
    info!(sources = config.sources.len(), "starting build");

    // --- Phase 1: Clean ---
    progress.phase("Cleaning output directories");
    reset_outputs(config)?;

    // --- Phase 2: Aggregate ---
    progress.phase("Merging documentation sources");
    let aggregated = aggregate(config, progress)?;

    // --- Phase 3: Sidebar ---
    progress.phase("Building sidebar");
    let sidebar = derive_sidebar(&config.content_dir, &aggregated.log, config.sidebar_order)?;
    let mut artifacts = vec![write_json(&config.sidebar_file, &sidebar)?];

    // --- Phase 4: Metadata ---
    progress.phase("Writing site metadata");
    let meta = load_site_meta(aggregated.metadata_candidate.as_deref(), &config.site_title);
    artifacts.push(write_json(&config.meta_file, &meta)?);

    // --- Phase 5: Context ---
    progress.phase("Generating context files");
    let context = generate_context(config)?;
    artifacts.extend(context.artifacts);

    let result = BuildResult {
        sources_merged: aggregated.sources_merged,
        files_copied: aggregated.files_copied,
        sidebar_entries: sidebar.len(),
        documents: context.documents.len(),
        artifacts,
        elapsed: start.elapsed(),
    };

    info!(
        sources = result.sources_merged,
        files = result.files_copied,
        documents = result.documents,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "build complete"
    );
    progress.done(&result);
    Ok(result)
}

/// Regenerate only the context files from an existing content tree.
#[instrument(skip_all, fields(content_root = %config.content_dir.display()))]
pub fn build_context(config: &BuildConfig, progress: &dyn ProgressReporter) -> Result<BuildResult> {
    let start = Instant::now();

    progress.phase("Generating context files");
    let context = generate_context(config)?;

    let result = BuildResult {
        documents: context.documents.len(),
        artifacts: context.artifacts,
        elapsed: start.elapsed(),
        ..BuildResult::default()
    };
    progress.done(&result);
    Ok(result)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Site metadata: `meta.yaml` in, `meta.json` out.

use std::path::Path;

use tracing::{debug, warn};

use docgather_shared::{DocGatherError, Result, SiteMeta};

/// Read and parse a YAML metadata file.
pub fn read_site_meta(path: &Path) -> Result<SiteMeta> {
    let raw = std::fs::read_to_string(path).map_err(|e| DocGatherError::io(path, e))?;
    serde_yaml::from_str(&raw)
        .map_err(|e| DocGatherError::parse(format!("{}: {e}", path.display())))
}

/// Metadata for the site, falling back to `{title, social: []}`.
///
/// A missing or unreadable candidate is logged, never fatal.
pub fn load_site_meta(candidate: Option<&Path>, fallback_title: &str) -> SiteMeta {
    let Some(path) = candidate else {
        warn!(title = fallback_title, "no metadata file found, using defaults");
        return SiteMeta::fallback(fallback_title);
    };

    match read_site_meta(path) {
        Ok(mut meta) => {
            if meta.title.trim().is_empty() {
                meta.title = fallback_title.to_string();
            }
            debug!(path = %path.display(), title = %meta.title, "metadata loaded");
            meta
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read metadata, using defaults");
            SiteMeta::fallback(fallback_title)
        }
    }
}

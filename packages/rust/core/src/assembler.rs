//! Output directory and file writers.
//!
//! Everything docgather puts on disk goes through here: destination roots
//! are reset wholesale, generated files are written atomically (temp file,
//! then rename) and described by an [`ArtifactMeta`].

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use docgather_artifacts::ArtifactMeta;
use docgather_shared::{DocGatherError, Result};

/// Delete `dir` (if present) and recreate it empty.
#[instrument(skip_all, fields(path = %dir.display()))]
pub fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir).map_err(|e| DocGatherError::io(dir, e))?;
    }
    std::fs::create_dir_all(dir).map_err(|e| DocGatherError::io(dir, e))?;

    debug!("directory reset");
    Ok(())
}

/// List the entries of `dir` sorted by file name.
///
/// Sorting keeps every walk (and therefore "last source wins") deterministic.
pub fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = std::fs::read_dir(dir)
        .map_err(|e| DocGatherError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| DocGatherError::io(dir, e))?;

    entries.sort();
    Ok(entries)
}

/// Write a text document, creating parent directories as needed.
pub fn write_document(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DocGatherError::io(parent, e))?;
    }

    std::fs::write(path, content).map_err(|e| DocGatherError::io(path, e))?;
    debug!(path = %path.display(), "wrote document");
    Ok(())
}

/// Write a generated file atomically (temp file, then rename).
pub fn write_artifact(path: &Path, content: &str) -> Result<ArtifactMeta> {
    let parent = path
        .parent()
        .ok_or_else(|| DocGatherError::validation(format!("{} has no parent", path.display())))?;
    std::fs::create_dir_all(parent).map_err(|e| DocGatherError::io(parent, e))?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| DocGatherError::validation(format!("{} has no file name", path.display())))?;
    let temp = parent.join(format!(".{filename}.tmp"));

    std::fs::write(&temp, content).map_err(|e| DocGatherError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| DocGatherError::io(path, e))?;

    let meta = ArtifactMeta::for_content(filename, content);
    debug!(path = %path.display(), size = meta.size_bytes, "wrote artifact");
    Ok(meta)
}

/// Write a pretty-printed JSON file atomically.
pub fn write_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<ArtifactMeta> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| DocGatherError::Serialization(format!("{}: {e}", path.display())))?;
    write_artifact(path, &json)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_dir_removes_stale_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("content");
        std::fs::create_dir_all(dir.join("old")).unwrap();
        std::fs::write(dir.join("old/stale.md"), "stale").unwrap();

        reset_dir(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn reset_dir_creates_missing_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("src/content/docs");
        reset_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn sorted_entries_orders_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["b.md", "a", "10-c", "02-d"] {
            std::fs::write(tmp.path().join(name), "").unwrap();
        }

        let names: Vec<String> = sorted_entries(tmp.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["02-d", "10-c", "a", "b.md"]);
    }

    #[test]
    fn write_artifact_leaves_no_temp_files() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("public/llms.txt");

        let meta = write_artifact(&path, "hello").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
        assert_eq!(meta.filename, "llms.txt");
        assert_eq!(meta.size_bytes, 5);
        for entry in std::fs::read_dir(tmp.path().join("public")).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().to_string();
            assert!(!name.starts_with('.'), "temp file left behind: {name}");
        }
    }

    #[test]
    fn write_artifact_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.txt");
        write_artifact(&path, "first version").unwrap();
        write_artifact(&path, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn write_json_is_pretty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("sidebar.json");
        write_json(&path, &serde_json::json!([{ "label": "Guides" }])).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "[\n  {\n    \"label\": \"Guides\"\n  }\n]");
    }

    #[test]
    fn write_document_creates_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("billing/index.md");
        write_document(&path, "# Billing").unwrap();
        assert!(path.is_file());
    }
}

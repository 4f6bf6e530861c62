//! Directory merge with top-level name cleaning.
//!
//! [`merge_tree`] copies one source tree into a destination, skipping
//! reserved top-level names and optionally stripping `NN-` prefixes from
//! top-level entries. Every top-level entry it writes comes back as a
//! [`MergedEntry`]; the caller turns those into [`MergeRecord`]s in a
//! [`MergeLog`], which the sidebar step later reads to recover the original
//! (prefixed) names for ordering.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use docgather_shared::{DocGatherError, Result};

use crate::assembler::sorted_entries;

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Options for a single [`merge_tree`] call.
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Top-level names to skip (the caller routes them elsewhere).
    pub exclude: Vec<String>,
    /// Strip `NN-` prefixes from top-level names.
    pub clean_names: bool,
}

/// A top-level entry written by [`merge_tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedEntry {
    /// Name in the source tree.
    pub original_name: String,
    /// Name in the destination tree.
    pub cleaned_name: String,
    pub is_dir: bool,
}

/// Outcome of a [`merge_tree`] call.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Top-level entries, in the order they were copied.
    pub entries: Vec<MergedEntry>,
    /// Number of files written, at any depth.
    pub files_copied: usize,
}

/// Recursively copy `src` into `dest`.
///
/// A missing `src` is a no-op. Existing destination files are overwritten.
/// Exclusions and name cleaning only apply to the entries directly under
/// `src`; everything deeper is copied verbatim.
#[instrument(skip_all, fields(src = %src.display(), dest = %dest.display()))]
pub fn merge_tree(src: &Path, dest: &Path, options: &MergeOptions) -> Result<MergeOutcome> {
    let mut outcome = MergeOutcome::default();

    if !src.exists() {
        debug!("source missing, nothing to merge");
        return Ok(outcome);
    }

    std::fs::create_dir_all(dest).map_err(|e| DocGatherError::io(dest, e))?;

    for path in sorted_entries(src)? {
        let original_name = file_name(&path);
        if options.exclude.iter().any(|x| *x == original_name) {
            debug!(name = %original_name, "skipping reserved entry");
            continue;
        }

        let cleaned_name = if options.clean_names {
            clean_name(&original_name).to_string()
        } else {
            original_name.clone()
        };

        let target = dest.join(&cleaned_name);
        let is_dir = path.is_dir();
        if is_dir {
            outcome.files_copied += copy_recursive(&path, &target)?;
        } else {
            copy_file(&path, &target)?;
            outcome.files_copied += 1;
        }

        outcome.entries.push(MergedEntry {
            original_name,
            cleaned_name,
            is_dir,
        });
    }

    debug!(
        entries = outcome.entries.len(),
        files = outcome.files_copied,
        "merge complete"
    );
    Ok(outcome)
}

/// Strip a leading `<digits>-` prefix. A name that would become empty is kept.
pub fn clean_name(name: &str) -> &str {
    static PREFIX_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[0-9]+-").expect("valid regex"));

    match PREFIX_RE.find(name) {
        Some(m) if m.end() < name.len() => &name[m.end()..],
        _ => name,
    }
}

fn copy_recursive(src: &Path, dest: &Path) -> Result<usize> {
    std::fs::create_dir_all(dest).map_err(|e| DocGatherError::io(dest, e))?;

    let mut copied = 0;
    for path in sorted_entries(src)? {
        let target = dest.join(file_name(&path));
        if path.is_dir() {
            copied += copy_recursive(&path, &target)?;
        } else {
            copy_file(&path, &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Copy one file. An existing destination is overwritten: the last source wins.
fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    if dest.exists() {
        debug!(src = %src.display(), dest = %dest.display(), "overwriting file from an earlier source");
    }
    std::fs::copy(src, dest).map_err(|e| DocGatherError::io(src, e))?;
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Merge log
// ---------------------------------------------------------------------------

/// What a top-level record in the content tree is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A directory; listed in the sidebar as an auto-generated section.
    Directory,
    /// A plain top-level file.
    File,
    /// A single-file module (README only); listed as a sidebar link.
    Link,
}

/// One top-level name written into the content tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRecord {
    pub original_name: String,
    pub cleaned_name: String,
    pub kind: RecordKind,
    /// Sidebar group label of the contributing collection.
    pub group: Option<String>,
}

/// Every top-level record of one run, in merge order.
#[derive(Debug, Clone, Default)]
pub struct MergeLog {
    records: Vec<MergeRecord>,
}

impl MergeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn record(&mut self, record: MergeRecord) {
        self.records.push(record);
    }

    /// Append the top-level entries of a merge outcome.
    pub fn record_outcome(&mut self, outcome: &MergeOutcome, group: Option<&str>) {
        for entry in &outcome.entries {
            self.record(MergeRecord {
                original_name: entry.original_name.clone(),
                cleaned_name: entry.cleaned_name.clone(),
                kind: if entry.is_dir {
                    RecordKind::Directory
                } else {
                    RecordKind::File
                },
                group: group.map(String::from),
            });
        }
    }

    pub fn records(&self) -> &[MergeRecord] {
        &self.records
    }

    /// Cleaned name → original name. On collision the smallest original wins.
    pub fn order_map(&self) -> BTreeMap<String, String> {
        let mut map: BTreeMap<String, String> = BTreeMap::new();
        for record in &self.records {
            map.entry(record.cleaned_name.clone())
                .and_modify(|original| {
                    if record.original_name < *original {
                        original.clone_from(&record.original_name);
                    }
                })
                .or_insert_with(|| record.original_name.clone());
        }
        map
    }

    /// Group label shared by every record with this cleaned name.
    ///
    /// A name that any ungrouped source (or a second group) also wrote stays
    /// at the top level.
    pub fn group_of(&self, cleaned_name: &str) -> Option<&str> {
        let mut records = self.records.iter().filter(|r| r.cleaned_name == cleaned_name);
        let group = records.next()?.group.as_deref()?;
        records
            .all(|r| r.group.as_deref() == Some(group))
            .then_some(group)
    }

    /// Distinct group labels in first-seen order.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for group in self.records.iter().filter_map(|r| r.group.as_deref()) {
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
        groups
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

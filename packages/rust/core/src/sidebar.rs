//! Sidebar builder.
//!
//! Scans the top level of the merged content tree and turns it into the
//! ordered navigation list written to `sidebar.json`:
//! 1. One auto-generated section per directory (empty ones included)
//! 2. One link per single-page module
//! 3. Grouped collections nested under their group label, after the rest
//!
//! Ordering compares strings, never numbers: with original-name ordering,
//! `10-guides` still sorts before `2-architecture`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::{debug, instrument};

use docgather_shared::{DocGatherError, Result, SidebarEntry, SidebarOrder};

use crate::assembler::sorted_entries;
use crate::merger::{MergeLog, RecordKind};

/// Build the sidebar for `content_root`.
///
/// Fails when `content_root` does not exist: the merge must run first.
#[instrument(skip_all, fields(content_root = %content_root.display(), ?order))]
pub fn derive_sidebar(
    content_root: &Path,
    log: &MergeLog,
    order: SidebarOrder,
) -> Result<Vec<SidebarEntry>> {
    if !content_root.is_dir() {
        return Err(DocGatherError::validation(format!(
            "content directory {} does not exist; run the merge first",
            content_root.display()
        )));
    }

    let directories: BTreeSet<String> = sorted_entries(content_root)?
        .into_iter()
        .filter(|p| p.is_dir())
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();

    let links: BTreeSet<String> = log
        .records()
        .iter()
        .filter(|r| r.kind == RecordKind::Link)
        .map(|r| r.cleaned_name.clone())
        .filter(|name| !directories.contains(name))
        .collect();

    let order_map = log.order_map();
    let mut items: Vec<(String, &str, SidebarEntry)> = directories
        .iter()
        .map(|name| {
            let entry = SidebarEntry::autogenerate(label_from_name(name), name.as_str());
            (sort_key(name, &order_map, order), name.as_str(), entry)
        })
        .chain(links.iter().map(|name| {
            let entry = SidebarEntry::link(label_from_name(name), name.as_str());
            (sort_key(name, &order_map, order), name.as_str(), entry)
        }))
        .collect();

    items.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    let mut grouped: BTreeMap<&str, Vec<SidebarEntry>> = BTreeMap::new();
    let mut sidebar: Vec<SidebarEntry> = Vec::new();
    for (_, name, entry) in items {
        match log.group_of(name) {
            Some(group) => grouped.entry(group).or_default().push(entry),
            None => sidebar.push(entry),
        }
    }

    for group in log.groups() {
        if let Some(entries) = grouped.remove(group) {
            sidebar.push(SidebarEntry::group(group, entries));
        }
    }

    debug!(entries = sidebar.len(), "sidebar derived");
    Ok(sidebar)
}

/// Sort key for a cleaned top-level name.
fn sort_key(name: &str, order_map: &BTreeMap<String, String>, order: SidebarOrder) -> String {
    match order {
        SidebarOrder::Alphabetical => name.to_string(),
        SidebarOrder::Original => order_map
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string()),
    }
}

/// Turn a cleaned directory name into a label: `module-dev` → `Module Dev`.
pub fn label_from_name(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    format!("{upper}{}", chars.as_str())
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merger::MergeRecord;
    use pretty_assertions::assert_eq;

    fn record(original: &str, cleaned: &str, kind: RecordKind, group: Option<&str>) -> MergeRecord {
        MergeRecord {
            original_name: original.into(),
            cleaned_name: cleaned.into(),
            kind,
            group: group.map(String::from),
        }
    }

    fn content_with_dirs(names: &[&str]) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        for name in names {
            std::fs::create_dir_all(tmp.path().join(name)).unwrap();
        }
        tmp
    }

    fn labels(entries: &[SidebarEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.label.as_str()).collect()
    }

    #[test]
    fn label_from_name_capitalizes_words() {
        assert_eq!(label_from_name("module-dev"), "Module Dev");
        assert_eq!(label_from_name("guides"), "Guides");
        assert_eq!(label_from_name("core-api"), "Core Api");
        assert_eq!(label_from_name("ui"), "Ui");
    }

    #[test]
    fn missing_content_root_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let err = derive_sidebar(
            &tmp.path().join("missing"),
            &MergeLog::new(),
            SidebarOrder::Original,
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn only_directories_are_listed() {
        let tmp = content_with_dirs(&["guides"]);
        std::fs::write(tmp.path().join("index.mdx"), "home").unwrap();

        let sidebar =
            derive_sidebar(tmp.path(), &MergeLog::new(), SidebarOrder::Original).unwrap();
        assert_eq!(sidebar, vec![SidebarEntry::autogenerate("Guides", "guides")]);
    }

    #[test]
    fn empty_directory_still_listed() {
        let tmp = content_with_dirs(&["empty-section"]);
        let sidebar =
            derive_sidebar(tmp.path(), &MergeLog::new(), SidebarOrder::Alphabetical).unwrap();
        assert_eq!(labels(&sidebar), vec!["Empty Section"]);
    }

    #[test]
    fn prefixed_names_compare_as_strings() {
        // "02-guides" < "10-architecture" as strings, so guides leads.
        let tmp = content_with_dirs(&["guides", "architecture"]);
        let mut log = MergeLog::new();
        log.record(record("02-guides", "guides", RecordKind::Directory, None));
        log.record(record("10-architecture", "architecture", RecordKind::Directory, None));

        let original = derive_sidebar(tmp.path(), &log, SidebarOrder::Original).unwrap();
        assert_eq!(labels(&original), vec!["Guides", "Architecture"]);

        let alphabetical = derive_sidebar(tmp.path(), &log, SidebarOrder::Alphabetical).unwrap();
        assert_eq!(labels(&alphabetical), vec!["Architecture", "Guides"]);
    }

    #[test]
    fn unequal_prefix_widths_are_not_numeric() {
        let tmp = content_with_dirs(&["guides", "architecture"]);
        let mut log = MergeLog::new();
        log.record(record("10-guides", "guides", RecordKind::Directory, None));
        log.record(record("2-architecture", "architecture", RecordKind::Directory, None));

        let sidebar = derive_sidebar(tmp.path(), &log, SidebarOrder::Original).unwrap();
        assert_eq!(labels(&sidebar), vec!["Guides", "Architecture"]);
    }

    #[test]
    fn unrecorded_names_fall_back_to_cleaned_name() {
        let tmp = content_with_dirs(&["zeta", "alpha", "guides"]);
        let mut log = MergeLog::new();
        log.record(record("01-guides", "guides", RecordKind::Directory, None));

        let sidebar = derive_sidebar(tmp.path(), &log, SidebarOrder::Original).unwrap();
        assert_eq!(labels(&sidebar), vec!["Guides", "Alpha", "Zeta"]);
    }

    #[test]
    fn readme_only_modules_become_links() {
        let tmp = content_with_dirs(&["payments"]);
        std::fs::write(tmp.path().join("billing.md"), "---\ntitle: billing\n---\n").unwrap();
        let mut log = MergeLog::new();
        log.record(record("billing", "billing", RecordKind::Link, None));
        log.record(record("payments", "payments", RecordKind::Directory, None));

        let sidebar = derive_sidebar(tmp.path(), &log, SidebarOrder::Original).unwrap();
        assert_eq!(
            sidebar,
            vec![
                SidebarEntry::link("Billing", "billing"),
                SidebarEntry::autogenerate("Payments", "payments"),
            ]
        );
    }

    #[test]
    fn grouped_collections_nest_after_ungrouped_entries() {
        let tmp = content_with_dirs(&["guides", "auth", "ui-kit"]);
        let mut log = MergeLog::new();
        log.record(record("guides", "guides", RecordKind::Directory, None));
        log.record(record("auth", "auth", RecordKind::Directory, Some("Backend Modules")));
        log.record(record("mailer", "mailer", RecordKind::Link, Some("Backend Modules")));
        log.record(record("ui-kit", "ui-kit", RecordKind::Directory, Some("Frontend Modules")));

        let sidebar = derive_sidebar(tmp.path(), &log, SidebarOrder::Original).unwrap();
        assert_eq!(
            sidebar,
            vec![
                SidebarEntry::autogenerate("Guides", "guides"),
                SidebarEntry::group(
                    "Backend Modules",
                    vec![
                        SidebarEntry::autogenerate("Auth", "auth"),
                        SidebarEntry::link("Mailer", "mailer"),
                    ]
                ),
                SidebarEntry::group(
                    "Frontend Modules",
                    vec![SidebarEntry::autogenerate("Ui Kit", "ui-kit")]
                ),
            ]
        );
    }

    #[test]
    fn name_shared_with_ungrouped_source_stays_top_level() {
        let tmp = content_with_dirs(&["auth", "users"]);
        let mut log = MergeLog::new();
        log.record(record("auth", "auth", RecordKind::Directory, None));
        log.record(record("auth", "auth", RecordKind::Directory, Some("Backend Modules")));
        log.record(record("users", "users", RecordKind::Directory, Some("Backend Modules")));

        let sidebar = derive_sidebar(tmp.path(), &log, SidebarOrder::Original).unwrap();
        assert_eq!(
            sidebar,
            vec![
                SidebarEntry::autogenerate("Auth", "auth"),
                SidebarEntry::group(
                    "Backend Modules",
                    vec![SidebarEntry::autogenerate("Users", "users")]
                ),
            ]
        );
    }
}

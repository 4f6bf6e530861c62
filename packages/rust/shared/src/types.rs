//! Core domain types shared by the docgather crates.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// How a documentation source contributes to the content tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// One documentation tree merged straight into the content root.
    Single,
    /// A directory of per-module subdirectories, each with an optional `docs/`.
    Collection,
}

/// A resolved documentation source, fixed for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// Name used in logs and progress output.
    pub name: String,
    /// Absolute root path of the source.
    pub root: PathBuf,
    /// Single tree or module collection.
    pub kind: SourceKind,
    /// For single sources: merge `<root>/docs` instead of `<root>`.
    pub nested_docs: bool,
    /// For collections: nest this collection's sidebar entries under a group label.
    pub group: Option<String>,
}

impl SourceDescriptor {
    /// Whether this source is a collection of per-module subdirectories.
    pub fn is_collection(&self) -> bool {
        self.kind == SourceKind::Collection
    }
}

// ---------------------------------------------------------------------------
// Sidebar
// ---------------------------------------------------------------------------

/// A single navigation entry in `sidebar.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarEntry {
    /// Display label.
    pub label: String,
    /// What the entry points at.
    #[serde(flatten)]
    pub target: SidebarTarget,
}

/// The three shapes a sidebar entry can take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SidebarTarget {
    /// Auto-generated listing of a content directory.
    Autogenerate { autogenerate: AutogenerateDir },
    /// Explicit link to a single document.
    Link { link: String },
    /// Nested group of further entries.
    Items { items: Vec<SidebarEntry> },
}

/// Directory reference for an auto-generated sidebar listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutogenerateDir {
    /// Path relative to the content root.
    pub directory: String,
}

impl SidebarEntry {
    /// Entry listing every document under `directory`.
    pub fn autogenerate(label: impl Into<String>, directory: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: SidebarTarget::Autogenerate {
                autogenerate: AutogenerateDir {
                    directory: directory.into(),
                },
            },
        }
    }

    /// Entry linking to a single document.
    pub fn link(label: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: SidebarTarget::Link { link: link.into() },
        }
    }

    /// Entry grouping further entries.
    pub fn group(label: impl Into<String>, items: Vec<SidebarEntry>) -> Self {
        Self {
            label: label.into(),
            target: SidebarTarget::Items { items },
        }
    }
}

// ---------------------------------------------------------------------------
// Site metadata
// ---------------------------------------------------------------------------

/// Site metadata read from `meta.yaml` and written to `meta.json`.
///
/// Unknown keys are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteMeta {
    /// Site title.
    #[serde(default)]
    pub title: String,
    /// Social links shown in the site header.
    #[serde(default)]
    pub social: Vec<SocialLink>,
    /// Extra sidebar entries placed around the generated ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<SidebarExtras>,
    /// Any other keys in the metadata file.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A social link in the site header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub icon: String,
    pub label: String,
    pub href: String,
}

/// Hand-written sidebar entries surrounding the generated sidebar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarExtras {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header: Vec<SidebarEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub footer: Vec<SidebarEntry>,
}

impl SiteMeta {
    /// Fallback metadata used when no metadata file is available.
    pub fn fallback(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

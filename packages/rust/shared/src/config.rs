//! Application configuration for docgather.
//!
//! The config file lives at `<repo root>/docgather.toml`. Every field has a
//! default, so a missing file (or a partial one) is valid. The `SITE_URL`
//! environment variable overrides the configured base URL.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DocGatherError, Result};
use crate::types::{SourceDescriptor, SourceKind};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "docgather.toml";

/// Environment variable holding the site base URL.
pub const SITE_URL_ENV: &str = "SITE_URL";

/// Base URL used when neither the environment nor the config sets one.
pub const DEFAULT_SITE_URL: &str = "http://localhost:4321";

// ---------------------------------------------------------------------------
// Config structs (matching docgather.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Output locations, relative to the repository root.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Merge behaviour.
    #[serde(default)]
    pub merge: MergeConfig,

    /// Sidebar ordering.
    #[serde(default)]
    pub sidebar: SidebarConfig,

    /// Site identity used by the metadata fallback and context files.
    #[serde(default)]
    pub site: SiteConfig,

    /// Context-file generation.
    #[serde(default)]
    pub context: ContextConfig,

    /// Documentation sources, merged in declaration order.
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            merge: MergeConfig::default(),
            sidebar: SidebarConfig::default(),
            site: SiteConfig::default(),
            context: ContextConfig::default(),
            sources: default_sources(),
        }
    }
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Merged content tree consumed by the site generator.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Merged `assets/` folders.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,

    /// Merged `public/` folders; context files are written here too.
    #[serde(default = "default_public_dir")]
    pub public_dir: String,

    /// Generated sidebar descriptor.
    #[serde(default = "default_sidebar_file")]
    pub sidebar_file: String,

    /// Generated metadata descriptor.
    #[serde(default = "default_meta_file")]
    pub meta_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            assets_dir: default_assets_dir(),
            public_dir: default_public_dir(),
            sidebar_file: default_sidebar_file(),
            meta_file: default_meta_file(),
        }
    }
}

fn default_content_dir() -> String {
    "src/content/docs".into()
}
fn default_assets_dir() -> String {
    "src/assets".into()
}
fn default_public_dir() -> String {
    "public".into()
}
fn default_sidebar_file() -> String {
    "src/sidebar.json".into()
}
fn default_meta_file() -> String {
    "src/meta.json".into()
}

/// `[merge]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Strip `01-`-style prefixes from top-level names.
    #[serde(default = "default_true")]
    pub strip_numeric_prefixes: bool,

    /// Name of the metadata file looked up at the top of each source.
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            strip_numeric_prefixes: true,
            metadata_file: default_metadata_file(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_metadata_file() -> String {
    "meta.yaml".into()
}

/// How top-level sidebar entries are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SidebarOrder {
    /// Sort by cleaned name.
    Alphabetical,
    /// Sort by the original (possibly prefixed) name when known.
    #[default]
    Original,
}

/// `[sidebar]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SidebarConfig {
    #[serde(default)]
    pub order: SidebarOrder,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Title for context files and the metadata fallback.
    #[serde(default = "default_site_title")]
    pub title: String,

    /// One-line summary quoted under the `llms.txt` title.
    #[serde(default = "default_tagline")]
    pub tagline: String,

    /// Base URL for generated links. `SITE_URL` wins over this.
    #[serde(default = "default_site_url")]
    pub url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_site_title(),
            tagline: default_tagline(),
            url: default_site_url(),
        }
    }
}

fn default_site_title() -> String {
    "Documentation".into()
}
fn default_tagline() -> String {
    "Aggregated module and platform documentation.".into()
}
fn default_site_url() -> String {
    DEFAULT_SITE_URL.into()
}

/// `[context]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Summary index file name (inside the public dir).
    #[serde(default = "default_summary_file")]
    pub summary_file: String,

    /// Full-text dump file name (inside the public dir).
    #[serde(default = "default_full_file")]
    pub full_file: String,

    /// Path prefixes listed first, in this order.
    #[serde(default = "default_priority")]
    pub priority: Vec<String>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            summary_file: default_summary_file(),
            full_file: default_full_file(),
            priority: default_priority(),
        }
    }
}

fn default_summary_file() -> String {
    "llms.txt".into()
}
fn default_full_file() -> String {
    "llms-full.txt".into()
}
fn default_priority() -> Vec<String> {
    ["index", "architecture", "modules", "core-api", "ui", "guides"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// `[[sources]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Name used in logs.
    pub name: String,
    /// Path relative to the repository root.
    pub path: String,
    /// `single` or `collection`.
    pub kind: SourceKind,
    /// Single sources: merge `<path>/docs` rather than `<path>`.
    #[serde(default = "default_true")]
    pub nested_docs: bool,
    /// Collections: sidebar group label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            name: "core".into(),
            path: "core".into(),
            kind: SourceKind::Single,
            nested_docs: true,
            group: None,
        },
        SourceConfig {
            name: "docs".into(),
            path: "docs".into(),
            kind: SourceKind::Single,
            nested_docs: false,
            group: None,
        },
        SourceConfig {
            name: "backend-modules".into(),
            path: "apps/backend/modules".into(),
            kind: SourceKind::Collection,
            nested_docs: true,
            group: None,
        },
        SourceConfig {
            name: "frontend-modules".into(),
            path: "apps/frontend/modules".into(),
            kind: SourceKind::Collection,
            nested_docs: true,
            group: None,
        },
    ]
}

// ---------------------------------------------------------------------------
// Build config (runtime, resolved against the repository root)
// ---------------------------------------------------------------------------

/// Runtime configuration with absolute paths and the resolved base URL.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Repository root all relative paths were resolved against.
    pub repo_root: PathBuf,
    pub content_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub public_dir: PathBuf,
    pub sidebar_file: PathBuf,
    pub meta_file: PathBuf,
    /// Sources in merge order.
    pub sources: Vec<SourceDescriptor>,
    pub strip_numeric_prefixes: bool,
    pub metadata_file_name: String,
    pub sidebar_order: SidebarOrder,
    pub site_title: String,
    pub site_tagline: String,
    /// Base URL prefixed to every generated link.
    pub site_url: String,
    pub summary_file: PathBuf,
    pub full_file: PathBuf,
    pub priority: Vec<String>,
}

impl BuildConfig {
    /// Resolve `config` against `repo_root`.
    ///
    /// `site_url_override` is normally the value of `SITE_URL`.
    pub fn resolve(
        config: &AppConfig,
        repo_root: &Path,
        site_url_override: Option<String>,
    ) -> Result<Self> {
        let resolve = |rel: &str| normalize_path(&repo_root.join(rel));
        let root = normalize_path(repo_root);

        let sources: Vec<SourceDescriptor> = config
            .sources
            .iter()
            .map(|s| SourceDescriptor {
                name: s.name.clone(),
                root: resolve(&s.path),
                kind: s.kind,
                nested_docs: s.nested_docs,
                group: s.group.clone(),
            })
            .collect();

        let content_dir = resolve(&config.paths.content_dir);
        let assets_dir = resolve(&config.paths.assets_dir);
        let public_dir = resolve(&config.paths.public_dir);

        // These three are deleted at the start of every build.
        for dest in [&content_dir, &assets_dir, &public_dir] {
            if root.starts_with(dest) || escapes_root(dest, &root) {
                return Err(DocGatherError::config(format!(
                    "output directory {} must be strictly inside the repository root {}",
                    dest.display(),
                    root.display()
                )));
            }
            if let Some(source) = sources.iter().find(|s| s.root.starts_with(dest)) {
                return Err(DocGatherError::config(format!(
                    "output directory {} contains source '{}'",
                    dest.display(),
                    source.name
                )));
            }
        }

        let site_url = resolve_site_url(&config.site.url, site_url_override)?;

        Ok(Self {
            repo_root: root,
            summary_file: public_dir.join(&config.context.summary_file),
            full_file: public_dir.join(&config.context.full_file),
            content_dir,
            assets_dir,
            public_dir,
            sidebar_file: resolve(&config.paths.sidebar_file),
            meta_file: resolve(&config.paths.meta_file),
            sources,
            strip_numeric_prefixes: config.merge.strip_numeric_prefixes,
            metadata_file_name: config.merge.metadata_file.clone(),
            sidebar_order: config.sidebar.order,
            site_title: config.site.title.clone(),
            site_tagline: config.site.tagline.clone(),
            site_url,
            priority: config.context.priority.clone(),
        })
    }
}

/// Lexically drop `.` components and fold `..` into the preceding name.
///
/// Leading `..` components of a relative path are kept; `..` at the
/// filesystem root is dropped.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// Whether a normalized `dest` lies outside the normalized `root`.
fn escapes_root(dest: &Path, root: &Path) -> bool {
    !dest.starts_with(root) || dest.components().any(|c| c == Component::ParentDir)
}

/// Pick the base URL (override first, then config) and check it parses.
pub fn resolve_site_url(configured: &str, override_url: Option<String>) -> Result<String> {
    let candidate = match override_url {
        Some(url) if !url.trim().is_empty() => url.trim().to_string(),
        _ => configured.trim().to_string(),
    };

    Url::parse(&candidate)
        .map_err(|e| DocGatherError::config(format!("invalid site URL '{candidate}': {e}")))?;

    Ok(candidate)
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Path of the config file for a repository root.
pub fn config_file_path(repo_root: &Path) -> PathBuf {
    repo_root.join(CONFIG_FILE_NAME)
}

/// Load the config for `repo_root`. Returns defaults if the file does not exist.
pub fn load_config(repo_root: &Path) -> Result<AppConfig> {
    let path = config_file_path(repo_root);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocGatherError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DocGatherError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file into `repo_root`. Refuses to overwrite.
pub fn init_config(repo_root: &Path) -> Result<PathBuf> {
    let path = config_file_path(repo_root);
    if path.exists() {
        return Err(DocGatherError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| DocGatherError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocGatherError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        assert!(toml_str.contains("content_dir"));
        assert!(toml_str.contains("apps/backend/modules"));
    }

    #[test]
    fn config_roundtrip() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.sources.len(), 4);
        assert_eq!(parsed.sidebar.order, SidebarOrder::Original);
        assert_eq!(parsed.context.priority[0], "index");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let toml_str = r#"
[sidebar]
order = "alphabetical"

[[sources]]
name = "handbook"
path = "handbook"
kind = "single"
nested_docs = false
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.sidebar.order, SidebarOrder::Alphabetical);
        assert_eq!(config.sources.len(), 1);
        assert!(!config.sources[0].nested_docs);
        assert!(config.merge.strip_numeric_prefixes);
        assert_eq!(config.paths.public_dir, "public");
    }

    #[test]
    fn collection_group_parses() {
        let toml_str = r#"
[[sources]]
name = "backend"
path = "apps/backend/modules"
kind = "collection"
group = "Backend Modules"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.sources[0].kind, SourceKind::Collection);
        assert_eq!(config.sources[0].group.as_deref(), Some("Backend Modules"));
    }

    #[test]
    fn site_url_override_wins() {
        let url = resolve_site_url(DEFAULT_SITE_URL, Some("https://docs.example.com".into()))
            .expect("valid");
        assert_eq!(url, "https://docs.example.com");

        let url = resolve_site_url(DEFAULT_SITE_URL, Some("   ".into())).expect("valid");
        assert_eq!(url, DEFAULT_SITE_URL);

        let url = resolve_site_url(DEFAULT_SITE_URL, None).expect("valid");
        assert_eq!(url, DEFAULT_SITE_URL);
    }

    #[test]
    fn invalid_site_url_rejected() {
        let err = resolve_site_url("not a url", None).unwrap_err();
        assert!(err.to_string().contains("invalid site URL"));
    }

    #[test]
    fn build_config_resolves_against_root() {
        let root = Path::new("/repo");
        let build = BuildConfig::resolve(&AppConfig::default(), root, None).expect("resolve");
        assert_eq!(build.content_dir, root.join("src/content/docs"));
        assert_eq!(build.summary_file, root.join("public/llms.txt"));
        assert_eq!(build.sources[2].root, root.join("apps/backend/modules"));
        assert!(build.sources[2].is_collection());
    }

    #[test]
    fn build_config_refuses_to_clean_repo_root() {
        let mut config = AppConfig::default();
        config.paths.public_dir = ".".into();
        let err = BuildConfig::resolve(&config, Path::new("/repo"), None).unwrap_err();
        assert!(err.to_string().contains("repository root"));
    }

    #[test]
    fn build_config_refuses_parent_directories() {
        for escape in ["..", "../..", "public/../..", "/tmp/site", "./."] {
            let mut config = AppConfig::default();
            config.paths.public_dir = escape.into();
            let result = BuildConfig::resolve(&config, Path::new("/repo/site"), None);
            assert!(result.is_err(), "{escape} should be rejected");
        }
    }

    #[test]
    fn build_config_refuses_escapes_from_relative_root() {
        let mut config = AppConfig::default();
        config.paths.content_dir = "../content".into();
        assert!(BuildConfig::resolve(&config, Path::new("."), None).is_err());
    }

    #[test]
    fn build_config_folds_dot_segments() {
        let mut config = AppConfig::default();
        config.paths.public_dir = "./site/../public".into();
        let build = BuildConfig::resolve(&config, Path::new("/repo"), None).expect("resolve");
        assert_eq!(build.public_dir, PathBuf::from("/repo/public"));
    }

    #[test]
    fn normalize_path_folds_lexically() {
        assert_eq!(normalize_path(Path::new("/repo/site/..")), PathBuf::from("/repo"));
        assert_eq!(normalize_path(Path::new("/repo/./a/../b")), PathBuf::from("/repo/b"));
        assert_eq!(normalize_path(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize_path(Path::new("./../x")), PathBuf::from("../x"));
    }

    #[test]
    fn build_config_refuses_output_over_source() {
        let mut config = AppConfig::default();
        config.paths.assets_dir = "apps".into();
        let err = BuildConfig::resolve(&config, Path::new("/repo"), None).unwrap_err();
        assert!(err.to_string().contains("backend-modules"));
    }

    #[test]
    fn load_config_missing_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = load_config(tmp.path()).expect("defaults");
        assert_eq!(config.site.url, DEFAULT_SITE_URL);
    }

    #[test]
    fn init_config_writes_once() {
        let tmp = tempfile::tempdir().unwrap();
        let path = init_config(tmp.path()).expect("init");
        assert!(path.exists());

        let loaded = load_config(tmp.path()).expect("load");
        assert_eq!(loaded.sources.len(), 4);

        let err = init_config(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}

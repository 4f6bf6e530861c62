//! Shared types, error model, and configuration for docgather.
//!
//! This crate is the foundation depended on by all other docgather crates.
//! It provides:
//! - [`DocGatherError`]: the unified error type
//! - Domain types ([`SourceDescriptor`], [`SidebarEntry`], [`SiteMeta`])
//! - Configuration ([`AppConfig`], [`BuildConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BuildConfig, CONFIG_FILE_NAME, ContextConfig, DEFAULT_SITE_URL, MergeConfig,
    PathsConfig, SITE_URL_ENV, SidebarConfig, SidebarOrder, SiteConfig, SourceConfig,
    config_file_path, init_config, load_config, load_config_from, normalize_path, resolve_site_url,
};
pub use error::{DocGatherError, Result};
pub use types::{
    AutogenerateDir, SidebarEntry, SidebarExtras, SidebarTarget, SiteMeta, SocialLink,
    SourceDescriptor, SourceKind,
};

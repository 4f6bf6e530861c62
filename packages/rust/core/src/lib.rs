//! Core pipeline orchestration and domain logic for docgather.
//!
//! This crate merges the configured documentation sources into one content
//! tree, derives the sidebar and site metadata from it, and generates the
//! LLM context files (e.g., `build`).

pub mod assembler;
pub mod collector;
pub mod context;
pub mod merger;
pub mod metadata;
pub mod pipeline;
pub mod sidebar;

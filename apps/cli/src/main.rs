//! docgather CLI: merges scattered documentation into one site content tree.
//!
//! Collects Markdown from the configured source roots, derives the sidebar
//! and site metadata, and emits the `llms.txt` context files.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}

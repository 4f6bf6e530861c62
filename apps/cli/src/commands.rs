//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use docgather_core::pipeline::{BuildResult, ProgressReporter};
use docgather_shared::{
    AppConfig, BuildConfig, SITE_URL_ENV, init_config, load_config, load_config_from,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docgather: merge scattered documentation into one site.
#[derive(Parser)]
#[command(
    name = "docgather",
    version,
    about = "Merge scattered Markdown docs into one site content tree with sidebar and llms.txt.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Repository root that source and output paths are relative to.
    #[arg(long, default_value = ".", global = true)]
    pub root: PathBuf,

    /// Config file (defaults to <root>/docgather.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL for generated links.
    #[arg(long, env = SITE_URL_ENV, global = true)]
    pub site_url: Option<String>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Clean, merge every source, and regenerate sidebar, metadata and context files.
    Build,

    /// Regenerate only llms.txt and llms-full.txt from the existing content tree.
    Context,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docgather=info",
        1 => "docgather=debug",
        _ => "docgather=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build => cmd_build(&cli.root, cli.config.as_deref(), cli.site_url),
        Command::Context => cmd_context(&cli.root, cli.config.as_deref(), cli.site_url),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(&cli.root),
            ConfigAction::Show => cmd_config_show(&cli.root, cli.config.as_deref()),
        },
    }
}

/// Load the config file (explicit path first) and resolve it against `root`.
fn resolve_config(
    root: &Path,
    config_path: Option<&Path>,
    site_url: Option<String>,
) -> Result<BuildConfig> {
    if !root.is_dir() {
        return Err(eyre!("repository root '{}' is not a directory", root.display()));
    }
    let root = std::fs::canonicalize(root)
        .map_err(|e| eyre!("cannot resolve repository root '{}': {e}", root.display()))?;

    let app = read_app_config(&root, config_path)?;
    let build = BuildConfig::resolve(&app, &root, site_url)?;
    info!(root = %root.display(), site_url = %build.site_url, "configuration resolved");
    Ok(build)
}

fn read_app_config(root: &Path, config_path: Option<&Path>) -> Result<AppConfig> {
    let app = match config_path {
        Some(path) => load_config_from(path)?,
        None => load_config(root)?,
    };
    Ok(app)
}

fn cmd_build(root: &Path, config_path: Option<&Path>, site_url: Option<String>) -> Result<()> {
    let config = resolve_config(root, config_path, site_url)?;

    let reporter = CliProgress::new();
    let result = docgather_core::pipeline::build(&config, &reporter)?;

    println!();
    println!("  Documentation merged successfully!");
    println!("  Sources:   {}", result.sources_merged);
    println!("  Files:     {}", result.files_copied);
    println!("  Sidebar:   {} entries", result.sidebar_entries);
    println!("  Documents: {}", result.documents);
    print_artifacts(&result);
    println!("  Time:      {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_context(root: &Path, config_path: Option<&Path>, site_url: Option<String>) -> Result<()> {
    let config = resolve_config(root, config_path, site_url)?;

    let reporter = CliProgress::new();
    let result = docgather_core::pipeline::build_context(&config, &reporter)?;

    println!();
    println!("  Context files generated!");
    println!("  Documents: {}", result.documents);
    print_artifacts(&result);
    println!("  Time:      {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn print_artifacts(result: &BuildResult) {
    for artifact in &result.artifacts {
        println!(
            "  {:<16} {:>8} bytes  sha256:{}",
            artifact.filename,
            artifact.size_bytes,
            &artifact.sha256[..12.min(artifact.sha256.len())]
        );
    }
}

fn cmd_config_init(root: &Path) -> Result<()> {
    let path = init_config(root)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(root: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = read_app_config(root, config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn source_merged(&self, name: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Merging [{current}/{total}] {name}"));
    }

    fn done(&self, _result: &BuildResult) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

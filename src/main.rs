//! Toucan Keymap - keymap drawing, watching and PDF export
//!
//! Command-line front end for the Toucan ZMK config. Each subcommand replaces
//! one of the old `make` targets.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use toucan_keymap::cli::{
    CliResult, ConfigArgs, DoctorArgs, DrawArgs, GlobalOptions, ParseArgs, PdfArgs, SplitArgs,
    WatchArgs,
};
use toucan_keymap::watch::report::color_enabled_by_default;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Toucan Keymap - draw, watch and export the keymap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project root containing the keymap and draw config
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    project: PathBuf,

    /// Config file (default: <project>/toucan-keymap.toml, then the user config)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse the ZMK keymap into keymap.yaml
    Parse(ParseArgs),
    /// Parse the keymap and draw keymap.svg
    Draw(DrawArgs),
    /// Regenerate keymap.svg whenever the keymap or draw config changes
    Watch(WatchArgs),
    /// Export keymap.svg as a multi-page PDF
    Pdf(PdfArgs),
    /// Split keymap.svg into standalone pages
    Split(SplitArgs),
    /// Check the environment
    Doctor(DoctorArgs),
    /// Manage configuration
    Config(ConfigArgs),
}

impl Command {
    fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        match self {
            Self::Parse(args) => args.execute(global),
            Self::Draw(args) => args.execute(global),
            Self::Watch(args) => args.execute(global),
            Self::Pdf(args) => args.execute(global),
            Self::Split(args) => args.execute(global),
            Self::Doctor(args) => args.execute(global),
            Self::Config(args) => args.execute(global),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so status lines on stdout stay clean
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Tools run with the project as their working directory, so every path
    // handed to them must already be absolute
    let project = std::env::current_dir()
        .map(|cwd| cwd.join(&cli.project))
        .unwrap_or_else(|_| cli.project.clone());

    let global = GlobalOptions {
        project,
        config: cli.config.clone(),
        color: !cli.no_color && color_enabled_by_default(),
    };

    if let Err(e) = cli.command.execute(&global) {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

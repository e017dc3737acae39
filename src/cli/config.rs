//! Configuration management CLI commands.

use crate::cli::common::{CliError, CliResult, GlobalOptions};
use crate::config::Config;
use crate::constants::APP_NAME;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display the effective configuration
    Show(ConfigShowArgs),
    /// Write a default toucan-keymap.toml into the project
    Init(ConfigInitArgs),
}

/// Display the effective configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Write a default configuration file
#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Overwrite an existing file
    #[arg(long)]
    force: bool,

    /// Write to the per-user config file instead of the project
    #[arg(long)]
    user: bool,
}

/// JSON output: the configuration plus where it came from
#[derive(Serialize, Debug)]
struct ConfigOutput<'a> {
    source: Option<String>,
    #[serde(flatten)]
    config: &'a Config,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(global),
            ConfigCommand::Init(args) => args.execute(global),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let config = global.load_config()?;
        let source = match &global.config {
            Some(path) => Some(path.clone()),
            None => Config::locate(&global.project)
                .map_err(|e| CliError::io(format!("Failed to locate configuration: {e}")))?,
        };

        if self.json {
            let output = ConfigOutput {
                source: source.map(|p| p.to_string_lossy().to_string()),
                config: &config,
            };
            let json = serde_json::to_string_pretty(&output).map_err(|e| {
                CliError::io(format!("Failed to serialize configuration to JSON: {e}"))
            })?;
            println!("{json}");
        } else {
            output_human_readable(&config, source.as_ref());
        }

        Ok(())
    }
}

impl ConfigInitArgs {
    /// Execute init command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let path = if self.user {
            Config::user_config_file()
                .map_err(|e| CliError::io(format!("Failed to locate config directory: {e}")))?
        } else {
            Config::project_config_file(&global.project)
        };

        if path.exists() && !self.force {
            return Err(CliError::validation(format!(
                "Config file already exists: {} (use --force to overwrite)",
                path.display()
            )));
        }

        Config::new()
            .save_to(&path)
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Wrote {}", path.display());
        Ok(())
    }
}

/// Output configuration in human-readable format
fn output_human_readable(config: &Config, source: Option<&PathBuf>) {
    println!("{APP_NAME} Configuration");
    println!("===========================");
    match source {
        Some(path) => println!("Source: {}", path.display()),
        None => println!("Source: (defaults)"),
    }
    println!();

    println!("Paths:");
    println!("  Keymap:       {}", config.paths.keymap.display());
    println!("  Keymap YAML:  {}", config.paths.keymap_yaml.display());
    println!("  Draw Config:  {}", config.paths.draw_config.display());
    println!("  SVG:          {}", config.paths.svg.display());
    println!("  PDF:          {}", config.paths.pdf.display());
    println!();

    println!("Tools:");
    println!("  keymap-drawer: {}", config.tools.keymap_drawer);
    println!("  rsvg-convert:  {}", config.tools.rsvg_convert);
    println!();

    println!("Layout Override:");
    if config.layout.enabled {
        println!(
            "  zmk_keyboard {} -> {} {}",
            config.layout.zmk_keyboard, config.layout.qmk_keyboard, config.layout.layout_name
        );
    } else {
        println!("  (disabled)");
    }
    println!();

    println!("PDF:");
    println!("  Layers per page: {}", config.pdf.layers_per_page);
    if !config.pdf.exclude_layers.is_empty() {
        println!("  Excluded: {}", config.pdf.exclude_layers.join(", "));
    }
    println!();

    println!("Watch:");
    println!("  Debounce: {} ms", config.watch.debounce_ms);
    if config.watch.poll {
        println!("  Backend: poll ({} ms)", config.watch.poll_interval_ms);
    } else {
        println!("  Backend: native");
    }
}

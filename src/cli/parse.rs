//! `parse` command: ZMK keymap to keymap-drawer YAML.

use crate::cli::common::{step_error, CliError, CliResult, GlobalOptions};
use crate::drawer::{KeymapDrawer, StepOutcome};
use crate::watch::StatusReporter;
use clap::Args;
use std::path::PathBuf;

/// Parse the ZMK keymap into the intermediate YAML document
#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Keymap to parse (default: paths.keymap)
    #[arg(long, value_name = "FILE")]
    pub keymap: Option<PathBuf>,

    /// Output document (default: paths.keymap_yaml)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Keep the layout reference emitted by the parser
    #[arg(long)]
    pub no_layout_fix: bool,
}

impl ParseArgs {
    /// Execute the parse command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let mut config = global.load_config()?;
        if let Some(keymap) = &self.keymap {
            config.paths.keymap.clone_from(keymap);
        }
        if let Some(output) = &self.output {
            config.paths.keymap_yaml.clone_from(output);
        }
        if self.no_layout_fix {
            config.layout.enabled = false;
        }

        let keymap = global.resolve(&config.paths.keymap);
        if !keymap.exists() {
            return Err(CliError::io(format!(
                "Keymap file not found: {}",
                keymap.display()
            )));
        }

        let drawer = KeymapDrawer::new(&config, &global.project);
        let parsed = drawer.parse();
        if !parsed.is_success() {
            return Err(step_error(&parsed));
        }
        let fixed = drawer.fix_layout();
        if !fixed.is_success() {
            return Err(step_error(&fixed));
        }

        let mut reporter = StatusReporter::stdout(global.color);
        let mut message = format!("{} written", drawer.keymap_yaml_path().display());
        if fixed == StepOutcome::Ok {
            message.push_str(&format!(
                " (layout: {} {})",
                config.layout.qmk_keyboard, config.layout.layout_name
            ));
        }
        reporter
            .success(&message)
            .map_err(|e| CliError::io(format!("Failed to write output: {e}")))
    }
}

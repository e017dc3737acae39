//! `draw` command: parse, fix the layout and render the SVG once.

use crate::cli::common::{step_error, CliError, CliResult, GlobalOptions};
use crate::drawer::KeymapDrawer;
use crate::watch::StatusReporter;
use clap::Args;
use std::path::PathBuf;

/// Regenerate the keymap SVG
#[derive(Debug, Args)]
pub struct DrawArgs {
    /// Output SVG (default: paths.svg)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// keymap-drawer style file (default: paths.draw_config)
    #[arg(short = 'c', long = "draw-config", value_name = "FILE")]
    pub draw_config: Option<PathBuf>,
}

impl DrawArgs {
    /// Execute the draw command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let mut config = global.load_config()?;
        if let Some(output) = &self.output {
            config.paths.svg.clone_from(output);
        }
        if let Some(draw_config) = &self.draw_config {
            config.paths.draw_config.clone_from(draw_config);
        }

        for (label, path) in [
            ("Keymap file", &config.paths.keymap),
            ("Draw config", &config.paths.draw_config),
        ] {
            let resolved = global.resolve(path);
            if !resolved.exists() {
                return Err(CliError::io(format!(
                    "{label} not found: {}",
                    resolved.display()
                )));
            }
        }

        let outcome = KeymapDrawer::new(&config, &global.project).regenerate();
        if let Some(failure) = &outcome.failure {
            return Err(step_error(failure));
        }

        StatusReporter::stdout(global.color)
            .success(&format!("{} updated successfully", outcome.svg.display()))
            .map_err(|e| CliError::io(format!("Failed to write output: {e}")))
    }
}

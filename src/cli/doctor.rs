//! Doctor command for dependency checking.

use crate::cli::common::{CliError, CliResult, GlobalOptions};
use crate::doctor::{DependencyChecker, DoctorFormatter, OutputFormat, ToolStatus};
use clap::Args;

/// Check that keymap-drawer, rsvg-convert and the input files are present
#[derive(Debug, Clone, Args)]
pub struct DoctorArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl DoctorArgs {
    /// Execute the doctor command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        // A broken config file should not hide the tool checks
        let config = global.load_config().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            crate::config::Config::default()
        });

        let statuses = DependencyChecker::new(&config, &global.project).check_all();

        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Terminal
        };
        println!("{}", DoctorFormatter::with_format(format).format_results(&statuses));

        if statuses.iter().any(|s| s.status == ToolStatus::Missing) {
            Err(CliError::validation("Some dependencies are missing"))
        } else {
            Ok(())
        }
    }
}

//! `watch` command: regenerate the SVG whenever the inputs change.

use crate::cli::common::{CliError, CliResult, GlobalOptions};
use crate::watch::{KeymapWatcher, StatusReporter};
use clap::Args;
use signal_hook::consts::{SIGINT, SIGTERM};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Watch the keymap and draw config, regenerating on every change
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll file timestamps instead of using native notifications
    #[arg(long)]
    pub poll: bool,

    /// Polling interval in milliseconds (implies --poll)
    #[arg(long, value_name = "MS")]
    pub poll_interval: Option<u64>,

    /// Debounce window in milliseconds
    #[arg(long, value_name = "MS")]
    pub debounce: Option<u64>,
}

impl WatchArgs {
    /// Execute the watch command
    ///
    /// Runs until SIGINT or SIGTERM sets the stop flag.
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let mut config = global.load_config()?;
        if self.poll {
            config.watch.poll = true;
        }
        if let Some(interval) = self.poll_interval {
            config.watch.poll = true;
            config.watch.poll_interval_ms = interval;
        }
        if let Some(debounce) = self.debounce {
            config.watch.debounce_ms = debounce;
        }
        config
            .validate()
            .map_err(|e| CliError::validation(format!("Invalid watch options: {e}")))?;

        let reporter = StatusReporter::stdout(global.color);
        let stop = Arc::new(AtomicBool::new(false));
        for signal in [SIGINT, SIGTERM] {
            signal_hook::flag::register(signal, Arc::clone(&stop))
                .map_err(|e| CliError::io(format!("Failed to install signal handler: {e}")))?;
        }
        let summary = KeymapWatcher::new(&config, &global.project, reporter)
            .run(&stop)
            .map_err(|e| CliError::io(format!("{e:#}")))?;

        tracing::info!(
            regenerations = summary.regenerations,
            failures = summary.failures,
            "watcher stopped"
        );
        Ok(())
    }
}

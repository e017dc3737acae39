//! Shared plumbing for the command handlers.

use crate::config::Config;
use crate::drawer::StepOutcome;
use crate::watch::report::KEYMAP_DRAWER_INSTALL_HINT;
use std::fmt;
use std::path::{Path, PathBuf};

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Tool failure or invalid input
    ValidationError = 1,
    /// File system or configuration error
    IoError = 2,
}

impl ExitCode {
    /// Numeric code passed to `std::process::exit`.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error surfaced to the user by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Exit code the process ends with
    pub kind: ExitCode,
    /// Message printed after `Error: `
    pub message: String,
}

impl CliError {
    /// I/O or configuration failure (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::IoError,
            message: message.into(),
        }
    }

    /// Tool failure or invalid input (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::ValidationError,
            message: message.into(),
        }
    }

    /// Numeric exit code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.kind.code()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type of every command handler.
pub type CliResult<T> = Result<T, CliError>;

/// Options shared by all subcommands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Project root
    pub project: PathBuf,
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Colored output
    pub color: bool,
}

impl GlobalOptions {
    /// Loads the configuration these options point at.
    ///
    /// An explicit `--config` must exist; otherwise the project and user
    /// files are tried before falling back to defaults.
    pub fn load_config(&self) -> CliResult<Config> {
        let loaded = match &self.config {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::io(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Config::load_from(path)
            }
            None => Config::load(&self.project),
        };
        loaded.map_err(|e| CliError::io(format!("Failed to load configuration: {e:#}")))
    }

    /// Resolves a path given on the command line or in the config.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        Config::resolve(&self.project, path)
    }
}

/// Turns a failed pipeline step into a tool failure (exit code 1).
#[must_use]
pub fn step_error(failure: &StepOutcome) -> CliError {
    match failure {
        StepOutcome::ToolMissing { tool, .. } => CliError::validation(format!(
            "'{tool}' command not found. {KEYMAP_DRAWER_INSTALL_HINT}"
        )),
        StepOutcome::Failed { step, detail } => {
            let detail = detail.trim();
            if detail.is_empty() {
                CliError::validation(step.failure_message())
            } else {
                CliError::validation(format!("{}: {detail}", step.failure_message()))
            }
        }
        StepOutcome::Ok | StepOutcome::Skipped => CliError::validation("Step did not fail"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(CliError::validation("bad").exit_code(), 1);
        assert_eq!(CliError::io("disk").exit_code(), 2);
        assert_eq!(CliError::io("disk").to_string(), "disk");
    }

    #[test]
    fn test_step_error_messages() {
        use crate::drawer::Step;

        let err = step_error(&StepOutcome::Failed {
            step: Step::Draw,
            detail: "bad config\n".to_string(),
        });
        assert_eq!(err.message, "Failed to generate SVG: bad config");
        assert_eq!(err.kind, ExitCode::ValidationError);

        let err = step_error(&StepOutcome::ToolMissing {
            step: Step::Parse,
            tool: "keymap".to_string(),
        });
        assert!(err.message.starts_with("'keymap' command not found"));
        assert!(err.message.contains("pip install keymap-drawer"));
    }

    #[test]
    fn test_missing_explicit_config() {
        let options = GlobalOptions {
            project: PathBuf::from("."),
            config: Some(PathBuf::from("/nonexistent/toucan-keymap.toml")),
            color: false,
        };
        let err = options.load_config().unwrap_err();
        assert_eq!(err.kind, ExitCode::IoError);
        assert!(err.message.contains("Config file not found"));
    }

    #[test]
    fn test_invalid_config_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toucan-keymap.toml");
        std::fs::write(&path, "[pdf]\nlayers_per_page = 0\n").unwrap();

        let options = GlobalOptions {
            project: dir.path().to_path_buf(),
            config: None,
            color: false,
        };
        let err = options.load_config().unwrap_err();
        assert_eq!(err.kind, ExitCode::IoError);
        assert!(err.message.contains("layers_per_page"));
    }
}

//! Checks for the external tools and project files the drawer needs.
//!
//! Tools are probed with `--version` through [`crate::process::run_tool`],
//! so "not installed" is told apart from "installed but broken" by the
//! spawn error rather than by matching error text.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use toucan_keymap::config::Config;
//! use toucan_keymap::doctor::{DependencyChecker, ToolStatus};
//!
//! let config = Config::new();
//! let checker = DependencyChecker::new(&config, Path::new("."));
//! for status in checker.check_all() {
//!     if status.status != ToolStatus::Available {
//!         println!("{}: {}", status.name, status.message);
//!     }
//! }
//! ```

use crate::config::Config;
use crate::process::{run_tool, ToolError};
use std::path::{Path, PathBuf};

/// Display name of the keymap-drawer check.
pub const KEYMAP_DRAWER: &str = "keymap-drawer";
/// Display name of the rsvg-convert check.
pub const RSVG_CONVERT: &str = "rsvg-convert";
/// Display name of the keymap source check.
pub const KEYMAP_FILE: &str = "Keymap file";
/// Display name of the draw config check.
pub const DRAW_CONFIG: &str = "Draw config";

/// Status of a single dependency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    /// Dependency is present and working
    Available,
    /// Dependency is not found
    Missing,
    /// Found, but its state could not be determined
    Unknown,
}

/// Result of checking a single dependency.
#[derive(Debug, Clone)]
pub struct DependencyStatus {
    /// Name of the dependency (e.g., "keymap-drawer")
    pub name: String,
    /// Status of the dependency
    pub status: ToolStatus,
    /// Version string if detected (e.g., "0.18.0")
    pub version: Option<String>,
    /// Human-readable message about the status
    pub message: String,
}

impl DependencyStatus {
    /// Creates a new dependency status.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        status: ToolStatus,
        version: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            version,
            message: message.into(),
        }
    }

    /// Creates a status for an available tool with a known version.
    #[must_use]
    pub fn available(name: impl Into<String>, version: impl Into<String>) -> Self {
        let version = version.into();
        let message = format!("Found version {version}");
        Self::new(name, ToolStatus::Available, Some(version), message)
    }

    /// Creates a status for a present file.
    #[must_use]
    pub fn present(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, ToolStatus::Available, None, message)
    }

    /// Creates a status for a missing dependency.
    #[must_use]
    pub fn missing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, ToolStatus::Missing, None, message)
    }

    /// Creates a status for an unknown dependency state.
    #[must_use]
    pub fn unknown(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, ToolStatus::Unknown, None, message)
    }
}

/// Checker for the keymap drawing environment.
#[derive(Debug, Clone)]
pub struct DependencyChecker {
    keymap_drawer: String,
    rsvg_convert: String,
    keymap: PathBuf,
    draw_config: PathBuf,
    project_root: PathBuf,
}

impl DependencyChecker {
    /// Creates a checker for the tools and files named in `config`.
    #[must_use]
    pub fn new(config: &Config, project_root: &Path) -> Self {
        Self {
            keymap_drawer: config.tools.keymap_drawer.clone(),
            rsvg_convert: config.tools.rsvg_convert.clone(),
            keymap: Config::resolve(project_root, &config.paths.keymap),
            draw_config: Config::resolve(project_root, &config.paths.draw_config),
            project_root: project_root.to_path_buf(),
        }
    }

    /// Runs every check, tools first.
    pub fn check_all(&self) -> Vec<DependencyStatus> {
        vec![
            self.check_keymap_drawer(),
            self.check_rsvg_convert(),
            Self::check_file(KEYMAP_FILE, &self.keymap),
            Self::check_file(DRAW_CONFIG, &self.draw_config),
        ]
    }

    /// Runs `keymap --version`.
    pub fn check_keymap_drawer(&self) -> DependencyStatus {
        self.check_tool(KEYMAP_DRAWER, &self.keymap_drawer)
    }

    /// Runs `rsvg-convert --version`.
    pub fn check_rsvg_convert(&self) -> DependencyStatus {
        self.check_tool(RSVG_CONVERT, &self.rsvg_convert)
    }

    fn check_tool(&self, name: &str, program: &str) -> DependencyStatus {
        match run_tool(program, ["--version"], &self.project_root) {
            Ok(output) if output.success => {
                let text = if output.stdout.trim().is_empty() {
                    &output.stderr
                } else {
                    &output.stdout
                };
                match parse_version(text) {
                    Some(version) => DependencyStatus::available(name, version),
                    None => DependencyStatus::unknown(
                        name,
                        format!(
                            "Found but could not parse version: {}",
                            text.lines().next().unwrap_or("").trim()
                        ),
                    ),
                }
            }
            Ok(output) => DependencyStatus::unknown(
                name,
                format!("'{program} --version' failed: {}", output.failure_detail()),
            ),
            Err(ToolError::NotFound { .. }) => {
                DependencyStatus::missing(name, format!("'{program}' not found in PATH"))
            }
            Err(e) => DependencyStatus::unknown(name, format!("Error checking: {e}")),
        }
    }

    fn check_file(name: &str, path: &Path) -> DependencyStatus {
        if path.is_file() {
            DependencyStatus::present(name, format!("Found {}", path.display()))
        } else if path.exists() {
            DependencyStatus::missing(name, format!("Not a file: {}", path.display()))
        } else {
            DependencyStatus::missing(name, format!("File does not exist: {}", path.display()))
        }
    }
}

/// Finds the first `X.Y[.Z]` token in version output.
///
/// Examples:
/// - "keymap-drawer 0.18.0" -> Some("0.18.0")
/// - "rsvg-convert version 2.56.3" -> Some("2.56.3")
/// - "keymap, version 0.18.0," -> Some("0.18.0")
fn parse_version(output: &str) -> Option<String> {
    output
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_ascii_digit()))
        .find(|word| {
            let parts: Vec<&str> = word.split('.').collect();
            parts.len() >= 2
                && parts
                    .iter()
                    .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
        })
        .map(String::from)
}

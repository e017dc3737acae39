//! Rendering of doctor results.
//!
//! The terminal report lists one line per check, followed by the install
//! hint for anything missing. `--json` emits the same data for scripts.

use crate::constants::{
    APP_BINARY_NAME, APP_NAME, DEFAULT_DRAW_CONFIG, DEFAULT_KEYMAP, PROJECT_CONFIG_FILE,
};
use crate::doctor::checker::{DRAW_CONFIG, KEYMAP_DRAWER, KEYMAP_FILE, RSVG_CONVERT};
use crate::doctor::{DependencyStatus, ToolStatus};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// How the report is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned, human-readable lines
    Terminal,
    /// Pretty-printed JSON
    Json,
}

/// Operating system the install hints are written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// macOS (Homebrew)
    MacOs,
    /// Linux distributions
    Linux,
    /// Windows (MSYS2)
    Windows,
    /// Anything else
    Unknown,
}

impl Platform {
    /// Platform the binary was built for.
    #[must_use]
    pub fn detect() -> Self {
        match std::env::consts::OS {
            "macos" => Self::MacOs,
            "linux" => Self::Linux,
            "windows" => Self::Windows,
            _ => Self::Unknown,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MacOs => "macOS",
            Self::Linux => "Linux",
            Self::Windows => "Windows",
            Self::Unknown => "Unknown",
        }
    }
}

/// Overall verdict across all checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Every check passed
    Ready,
    /// At least one check is missing
    MissingDependencies,
    /// Nothing missing, but some checks were inconclusive
    Warnings,
}

/// Top-level JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Overall verdict
    pub status: Verdict,
    /// Checks that passed
    pub passed: usize,
    /// Checks that are missing
    pub failed: usize,
    /// Inconclusive checks
    pub unknown: usize,
    /// One entry per check, in check order
    pub dependencies: Vec<JsonDependency>,
    /// Platform the hints were written for
    pub platform: String,
}

/// JSON representation of a single check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDependency {
    /// Tool or file label
    pub name: String,
    /// `available`, `missing` or `unknown`
    pub status: String,
    /// Parsed tool version
    pub version: Option<String>,
    /// Detail from the check
    pub message: String,
    /// How to fix a missing entry
    pub installation_hint: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    passed: usize,
    failed: usize,
    unknown: usize,
}

impl Tally {
    fn of(statuses: &[DependencyStatus]) -> Self {
        statuses.iter().fold(Self::default(), |mut t, s| {
            match s.status {
                ToolStatus::Available => t.passed += 1,
                ToolStatus::Missing => t.failed += 1,
                ToolStatus::Unknown => t.unknown += 1,
            }
            t
        })
    }

    const fn verdict(self) -> Verdict {
        if self.failed > 0 {
            Verdict::MissingDependencies
        } else if self.unknown > 0 {
            Verdict::Warnings
        } else {
            Verdict::Ready
        }
    }
}

const fn status_label(status: ToolStatus) -> &'static str {
    match status {
        ToolStatus::Available => "available",
        ToolStatus::Missing => "missing",
        ToolStatus::Unknown => "unknown",
    }
}

const fn status_marker(status: ToolStatus) -> char {
    match status {
        ToolStatus::Available => '✓',
        ToolStatus::Missing => '✗',
        ToolStatus::Unknown => '⚠',
    }
}

/// Renders a list of [`DependencyStatus`] values.
#[derive(Debug, Clone, Copy)]
pub struct DoctorFormatter {
    format: OutputFormat,
    platform: Platform,
}

impl DoctorFormatter {
    /// Terminal output for the current platform.
    #[must_use]
    pub fn new() -> Self {
        Self::with_format(OutputFormat::Terminal)
    }

    /// Given output format for the current platform.
    #[must_use]
    pub fn with_format(format: OutputFormat) -> Self {
        Self {
            format,
            platform: Platform::detect(),
        }
    }

    /// Terminal output with hints for `platform`.
    #[must_use]
    pub fn with_platform(platform: Platform) -> Self {
        Self {
            format: OutputFormat::Terminal,
            platform,
        }
    }

    /// Renders the results.
    pub fn format_results(&self, statuses: &[DependencyStatus]) -> String {
        match self.format {
            OutputFormat::Terminal => self.render_terminal(statuses),
            OutputFormat::Json => self.render_json(statuses),
        }
    }

    fn render_terminal(&self, statuses: &[DependencyStatus]) -> String {
        let tally = Tally::of(statuses);
        let width = statuses.iter().map(|s| s.name.len()).max().unwrap_or(0);
        let mut out = String::new();

        let title = format!("{APP_NAME} Environment Status");
        let _ = writeln!(out, "{title}");
        let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
        out.push('\n');

        for status in statuses {
            let marker = status_marker(status.status);
            let label = status_label(status.status);
            match &status.version {
                Some(version) => {
                    let _ = writeln!(
                        out,
                        "{marker} {:<width$}  {label} (v{version})",
                        status.name
                    );
                }
                None => {
                    let _ = writeln!(out, "{marker} {:<width$}  {label}", status.name);
                }
            }

            if status.status != ToolStatus::Available {
                for line in status.message.lines() {
                    let _ = writeln!(out, "    {line}");
                }
            }
            if status.status == ToolStatus::Missing {
                if let Some(hint) = self.installation_instructions(&status.name) {
                    let _ = writeln!(out, "    Install: {hint}");
                }
            }
        }

        out.push('\n');
        let _ = write!(out, "{} of {} checks passed", tally.passed, statuses.len());
        if tally.failed > 0 {
            let _ = write!(out, ", {} missing", tally.failed);
        }
        if tally.unknown > 0 {
            let _ = write!(out, ", {} inconclusive", tally.unknown);
        }
        out.push('\n');

        match tally.verdict() {
            Verdict::Ready => {
                let _ = writeln!(
                    out,
                    "Ready. Run '{APP_BINARY_NAME} draw' or '{APP_BINARY_NAME} watch'."
                );
            }
            Verdict::MissingDependencies => {
                let _ = writeln!(
                    out,
                    "Install what is missing, then run '{APP_BINARY_NAME} doctor' again."
                );
            }
            Verdict::Warnings => {
                out.push_str("Some checks were inconclusive; see the notes above.\n");
            }
        }

        out
    }

    fn render_json(&self, statuses: &[DependencyStatus]) -> String {
        let tally = Tally::of(statuses);
        let document = JsonOutput {
            status: tally.verdict(),
            passed: tally.passed,
            failed: tally.failed,
            unknown: tally.unknown,
            dependencies: statuses
                .iter()
                .map(|s| JsonDependency {
                    name: s.name.clone(),
                    status: status_label(s.status).to_string(),
                    version: s.version.clone(),
                    message: s.message.clone(),
                    installation_hint: (s.status == ToolStatus::Missing)
                        .then(|| self.installation_instructions(&s.name))
                        .flatten(),
                })
                .collect(),
            platform: self.platform.name().to_string(),
        };

        serde_json::to_string_pretty(&document).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to serialize doctor report");
            r#"{"status":"error"}"#.to_string()
        })
    }

    fn installation_instructions(&self, name: &str) -> Option<String> {
        let hint = match (name, self.platform) {
            (KEYMAP_DRAWER, Platform::Windows) => "pip install keymap-drawer".to_string(),
            (KEYMAP_DRAWER, _) => {
                "pipx install keymap-drawer (or: pip install keymap-drawer)".to_string()
            }
            (RSVG_CONVERT, Platform::MacOs) => "brew install librsvg".to_string(),
            (RSVG_CONVERT, Platform::Linux) => {
                "sudo apt-get install librsvg2-bin (Debian/Ubuntu), sudo pacman -S librsvg (Arch)"
                    .to_string()
            }
            (RSVG_CONVERT, Platform::Windows) => {
                "pacman -S mingw-w64-x86_64-librsvg (MSYS2)".to_string()
            }
            (RSVG_CONVERT, Platform::Unknown) => {
                "install librsvg from your package manager".to_string()
            }
            (KEYMAP_FILE, _) => format!(
                "Expected the ZMK keymap at {DEFAULT_KEYMAP}; set paths.keymap in {PROJECT_CONFIG_FILE}"
            ),
            (DRAW_CONFIG, _) => format!(
                "Expected the keymap-drawer config at {DEFAULT_DRAW_CONFIG}; set paths.draw_config in {PROJECT_CONFIG_FILE}"
            ),
            _ => return None,
        };
        Some(hint)
    }
}

impl Default for DoctorFormatter {
    fn default() -> Self {
        Self::new()
    }
}

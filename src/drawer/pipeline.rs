//! Parse → fix layout → draw pipeline around keymap-drawer.
//!
//! Each step shells out to the `keymap` CLI from the project root. Failures
//! of the external tool are reported as [`StepOutcome`] values rather than
//! errors: the watcher prints them and waits for the next edit.

use crate::config::{Config, LayoutConfig, PathConfig};
use crate::drawer::layout_fix::apply_layout_override;
use crate::process::{run_tool, ToolError};
use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Pipeline status tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    /// Nothing run yet
    Idle,
    /// Running `keymap parse`
    Parsing,
    /// Rewriting the layout reference
    FixingLayout,
    /// Running `keymap draw`
    Drawing,
    /// SVG written
    Success,
    /// A step failed
    Failed,
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Parsing => write!(f, "Parsing..."),
            Self::FixingLayout => write!(f, "Fixing layout..."),
            Self::Drawing => write!(f, "Drawing..."),
            Self::Success => write!(f, "✓ Success"),
            Self::Failed => write!(f, "✗ Failed"),
        }
    }
}

/// A single pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// ZMK keymap → keymap YAML
    Parse,
    /// Layout reference rewrite
    FixLayout,
    /// keymap YAML + style → SVG
    Draw,
}

impl Step {
    /// Status reported while the step runs.
    #[must_use]
    pub const fn status(self) -> PipelineStatus {
        match self {
            Self::Parse => PipelineStatus::Parsing,
            Self::FixLayout => PipelineStatus::FixingLayout,
            Self::Draw => PipelineStatus::Drawing,
        }
    }

    /// Failure headline used in status output.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Parse => "Failed to parse ZMK keymap",
            Self::FixLayout => "Failed to fix keymap layout",
            Self::Draw => "Failed to generate SVG",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "parse"),
            Self::FixLayout => write!(f, "fix-layout"),
            Self::Draw => write!(f, "draw"),
        }
    }
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step completed
    Ok,
    /// Step skipped (layout override disabled or not applicable)
    Skipped,
    /// External tool or file operation failed
    Failed {
        /// Step that failed
        step: Step,
        /// Trimmed error output
        detail: String,
    },
    /// External executable not installed
    ToolMissing {
        /// Step that needed the tool
        step: Step,
        /// Program name
        tool: String,
    },
}

impl StepOutcome {
    /// True for `Ok` and `Skipped`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok | Self::Skipped)
    }
}

/// Outcome of a full regeneration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegenerateOutcome {
    /// Final status, `Success` or `Failed`
    pub status: PipelineStatus,
    /// The failing step outcome, if any
    pub failure: Option<StepOutcome>,
    /// Whether the layout line was rewritten
    pub layout_fixed: bool,
    /// Rendered SVG path
    pub svg: PathBuf,
}

impl RegenerateOutcome {
    /// True when the SVG was written.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == PipelineStatus::Success
    }
}

/// Runs keymap-drawer for one project.
#[derive(Debug, Clone)]
pub struct KeymapDrawer {
    project_root: PathBuf,
    program: String,
    keymap: PathBuf,
    keymap_yaml: PathBuf,
    draw_config: PathBuf,
    svg: PathBuf,
    layout: LayoutConfig,
}

impl KeymapDrawer {
    /// Creates a drawer with paths resolved against `project_root`.
    #[must_use]
    pub fn new(config: &Config, project_root: &Path) -> Self {
        let PathConfig {
            keymap,
            keymap_yaml,
            draw_config,
            svg,
            ..
        } = &config.paths;

        Self {
            project_root: project_root.to_path_buf(),
            program: config.tools.keymap_drawer.clone(),
            keymap: Config::resolve(project_root, keymap),
            keymap_yaml: Config::resolve(project_root, keymap_yaml),
            draw_config: Config::resolve(project_root, draw_config),
            svg: Config::resolve(project_root, svg),
            layout: config.layout.clone(),
        }
    }

    /// Rendered SVG path.
    #[must_use]
    pub fn svg_path(&self) -> &Path {
        &self.svg
    }

    /// Intermediate keymap YAML path.
    #[must_use]
    pub fn keymap_yaml_path(&self) -> &Path {
        &self.keymap_yaml
    }

    /// Runs `keymap parse -z <keymap> -o <keymap_yaml>`.
    pub fn parse(&self) -> StepOutcome {
        self.run_step(
            Step::Parse,
            [
                OsStr::new("parse"),
                OsStr::new("-z"),
                self.keymap.as_os_str(),
                OsStr::new("-o"),
                self.keymap_yaml.as_os_str(),
            ],
        )
    }

    /// Swaps the ZMK layout reference for the configured QMK layout.
    pub fn fix_layout(&self) -> StepOutcome {
        if !self.layout.enabled {
            return StepOutcome::Skipped;
        }

        match self.try_fix_layout() {
            Ok(true) => StepOutcome::Ok,
            Ok(false) => {
                tracing::debug!(
                    path = %self.keymap_yaml.display(),
                    "no zmk layout line found, leaving document untouched"
                );
                StepOutcome::Skipped
            }
            Err(e) => StepOutcome::Failed {
                step: Step::FixLayout,
                detail: format!("{e:#}"),
            },
        }
    }

    fn try_fix_layout(&self) -> Result<bool> {
        let content = fs::read_to_string(&self.keymap_yaml).context(format!(
            "Failed to read keymap document: {}",
            self.keymap_yaml.display()
        ))?;

        let Some(fixed) = apply_layout_override(&content, &self.layout) else {
            return Ok(false);
        };

        fs::write(&self.keymap_yaml, fixed).context(format!(
            "Failed to write keymap document: {}",
            self.keymap_yaml.display()
        ))?;

        Ok(true)
    }

    /// Runs `keymap -c <draw_config> draw <keymap_yaml> -o <svg>`.
    pub fn draw(&self) -> StepOutcome {
        self.run_step(
            Step::Draw,
            [
                OsStr::new("-c"),
                self.draw_config.as_os_str(),
                OsStr::new("draw"),
                self.keymap_yaml.as_os_str(),
                OsStr::new("-o"),
                self.svg.as_os_str(),
            ],
        )
    }

    /// Runs parse, layout fix and draw, stopping at the first failure.
    pub fn regenerate(&self) -> RegenerateOutcome {
        let mut layout_fixed = false;

        for step in [Step::Parse, Step::FixLayout, Step::Draw] {
            tracing::debug!(status = %step.status(), "running step");
            let outcome = match step {
                Step::Parse => self.parse(),
                Step::FixLayout => self.fix_layout(),
                Step::Draw => self.draw(),
            };

            if step == Step::FixLayout && outcome == StepOutcome::Ok {
                layout_fixed = true;
            }

            if !outcome.is_success() {
                tracing::info!(%step, "regeneration failed");
                return RegenerateOutcome {
                    status: PipelineStatus::Failed,
                    failure: Some(outcome),
                    layout_fixed,
                    svg: self.svg.clone(),
                };
            }
        }

        tracing::info!(svg = %self.svg.display(), "keymap regenerated");
        RegenerateOutcome {
            status: PipelineStatus::Success,
            failure: None,
            layout_fixed,
            svg: self.svg.clone(),
        }
    }

    fn run_step<'a>(
        &self,
        step: Step,
        args: impl IntoIterator<Item = &'a OsStr>,
    ) -> StepOutcome {
        match run_tool(&self.program, args, &self.project_root) {
            Ok(output) if output.success => StepOutcome::Ok,
            Ok(output) => StepOutcome::Failed {
                step,
                detail: output.failure_detail(),
            },
            Err(ToolError::NotFound { program }) => StepOutcome::ToolMissing {
                step,
                tool: program,
            },
            Err(e) => StepOutcome::Failed {
                step,
                detail: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_pipeline_status_display() {
        assert_eq!(PipelineStatus::Idle.to_string(), "Idle");
        assert_eq!(PipelineStatus::Parsing.to_string(), "Parsing...");
        assert_eq!(PipelineStatus::Success.to_string(), "✓ Success");
        assert_eq!(PipelineStatus::Failed.to_string(), "✗ Failed");
    }

    #[test]
    fn test_step_failure_messages() {
        assert_eq!(Step::Parse.failure_message(), "Failed to parse ZMK keymap");
        assert_eq!(Step::Draw.failure_message(), "Failed to generate SVG");
        assert_eq!(Step::FixLayout.status(), PipelineStatus::FixingLayout);
    }

    #[test]
    fn test_paths_resolve_against_project_root() {
        let drawer = KeymapDrawer::new(&Config::new(), Path::new("/project"));
        assert_eq!(drawer.svg_path(), Path::new("/project/keymap.svg"));
        assert_eq!(drawer.keymap_yaml_path(), Path::new("/project/keymap.yaml"));
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::new();
        config.tools.keymap_drawer = "no-such-keymap-drawer-9c1e".to_string();

        let drawer = KeymapDrawer::new(&config, temp_dir.path());
        let outcome = drawer.regenerate();

        assert_eq!(outcome.status, PipelineStatus::Failed);
        assert_eq!(
            outcome.failure,
            Some(StepOutcome::ToolMissing {
                step: Step::Parse,
                tool: "no-such-keymap-drawer-9c1e".to_string(),
            })
        );
    }

    #[test]
    fn test_fix_layout_skipped_when_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::new();
        config.layout.enabled = false;

        let drawer = KeymapDrawer::new(&config, temp_dir.path());
        assert_eq!(drawer.fix_layout(), StepOutcome::Skipped);
    }

    #[test]
    fn test_fix_layout_rewrites_document() {
        let temp_dir = TempDir::new().unwrap();
        let yaml = temp_dir.path().join("keymap.yaml");
        fs::write(&yaml, "layout: {zmk_keyboard: toucan}\nlayers: {}\n").unwrap();

        let drawer = KeymapDrawer::new(&Config::new(), temp_dir.path());
        assert_eq!(drawer.fix_layout(), StepOutcome::Ok);

        let content = fs::read_to_string(&yaml).unwrap();
        assert!(content.contains("qmk_keyboard: crkbd/rev1"));
        assert!(!content.contains("zmk_keyboard"));
    }

    #[test]
    fn test_fix_layout_fails_without_document() {
        let temp_dir = TempDir::new().unwrap();
        let drawer = KeymapDrawer::new(&Config::new(), temp_dir.path());

        match drawer.fix_layout() {
            StepOutcome::Failed { step, detail } => {
                assert_eq!(step, Step::FixLayout);
                assert!(detail.contains("Failed to read keymap document"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}

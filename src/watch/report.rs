//! Colored, timestamped status output for the watcher and one-shot commands.

use crate::drawer::{RegenerateOutcome, StepOutcome};
use crossterm::style::{style, Color, Stylize};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Installation hint shown when keymap-drawer is missing.
pub const KEYMAP_DRAWER_INSTALL_HINT: &str = "Install keymap-drawer: pip install keymap-drawer";

/// Writes human-readable status lines.
pub struct StatusReporter<W: Write> {
    out: W,
    color: bool,
    clock: fn() -> String,
}

/// Current local time as `HH:MM:SS`.
pub fn local_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Whether colored output should be used by default.
///
/// Honors the `NO_COLOR` convention.
pub fn color_enabled_by_default() -> bool {
    !matches!(std::env::var_os("NO_COLOR"), Some(v) if !v.is_empty())
}

impl StatusReporter<io::Stdout> {
    /// Reporter writing to stdout.
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> StatusReporter<W> {
    /// Creates a reporter over any writer.
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            clock: local_timestamp,
        }
    }

    /// Replaces the timestamp source.
    pub fn with_clock(mut self, clock: fn() -> String) -> Self {
        self.clock = clock;
        self
    }

    /// Consumes the reporter and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn stamp(&self) -> String {
        format!("[{}]", (self.clock)())
    }

    /// Prints the startup banner.
    pub fn banner(&mut self) -> io::Result<()> {
        let lines = [
            "╔════════════════════════════════════════════╗",
            "║     Keymap SVG Watcher - Toucan Keyboard   ║",
            "╚════════════════════════════════════════════╝",
        ];
        for line in lines {
            writeln!(self.out, "{}", self.paint(line, Color::Cyan))?;
        }
        writeln!(self.out)
    }

    /// Announces the first regeneration.
    pub fn initial_generation(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "{}",
            self.paint("Generating initial SVG...", Color::Yellow)
        )
    }

    /// Lists the watched files, shown relative to `root` where possible.
    pub fn watching(&mut self, root: &Path, files: &[PathBuf]) -> io::Result<()> {
        writeln!(
            self.out,
            "{}",
            self.paint("Watching for changes in:", Color::Cyan)
        )?;
        for file in files {
            let shown = file.strip_prefix(root).unwrap_or(file.as_path());
            writeln!(self.out, "  • {}", shown.display())?;
        }
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{}",
            self.paint("Press Ctrl+C to stop watching", Color::Cyan)
        )?;
        writeln!(self.out)
    }

    /// Announces a detected change.
    pub fn change_detected(&mut self) -> io::Result<()> {
        let stamp = self.paint(&self.stamp(), Color::Yellow);
        writeln!(self.out, "{stamp} Change detected, regenerating SVG...")
    }

    /// Reports the result of a regeneration.
    pub fn outcome(&mut self, outcome: &RegenerateOutcome) -> io::Result<()> {
        match &outcome.failure {
            None => {
                let name = outcome
                    .svg
                    .file_name()
                    .map_or_else(|| outcome.svg.display().to_string(), |n| {
                        n.to_string_lossy().into_owned()
                    });
                self.success(&format!("{name} updated successfully"))?;
            }
            Some(failure) => self.failure(failure)?,
        }
        writeln!(self.out)
    }

    /// Prints a green timestamped `✓ message` line.
    pub fn success(&mut self, message: &str) -> io::Result<()> {
        let stamp = self.paint(&self.stamp(), Color::Green);
        writeln!(self.out, "{stamp} ✓ {message}")
    }

    /// Prints the red failure line for a failed step, with its error output.
    pub fn failure(&mut self, failure: &StepOutcome) -> io::Result<()> {
        match failure {
            StepOutcome::ToolMissing { tool, .. } => {
                let line = format!("{} ✗ '{}' command not found", self.stamp(), tool);
                writeln!(self.out, "{}", self.paint(&line, Color::Red))?;
                writeln!(self.out, "  {KEYMAP_DRAWER_INSTALL_HINT}")
            }
            StepOutcome::Failed { step, detail } => {
                let line = format!("{} ✗ {}", self.stamp(), step.failure_message());
                writeln!(self.out, "{}", self.paint(&line, Color::Red))?;
                if detail.trim().is_empty() {
                    Ok(())
                } else {
                    writeln!(self.out, "  Error: {}", detail.trim())
                }
            }
            StepOutcome::Ok | StepOutcome::Skipped => Ok(()),
        }
    }

    /// Announces shutdown.
    pub fn stopping(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", self.paint("Stopping watcher...", Color::Cyan))
    }
}

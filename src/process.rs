//! Thin wrapper around `std::process::Command` for the external tools.
//!
//! Every external program (keymap-drawer, rsvg-convert) goes through
//! [`run_tool`], which captures output and separates "the tool is not
//! installed" from "the tool ran and failed".

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Captured result of a finished external command.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Whether the process exited with status 0
    pub success: bool,
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    /// Captured stdout (lossy UTF-8)
    pub stdout: String,
    /// Captured stderr (lossy UTF-8)
    pub stderr: String,
}

impl ToolOutput {
    /// Best single-line-ish explanation for a failed run.
    ///
    /// Prefers stderr, falls back to stdout, then to the exit code.
    #[must_use]
    pub fn failure_detail(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.code {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Why an external command could not produce a [`ToolOutput`].
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Executable not found on PATH
    #[error("'{program}' command not found")]
    NotFound {
        /// Program that was looked up
        program: String,
    },
    /// Spawning or waiting failed for another reason
    #[error("failed to run '{program}': {source}")]
    Io {
        /// Program that was started
        program: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

impl ToolError {
    fn from_io(program: &str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound {
                program: program.to_string(),
            }
        } else {
            Self::Io {
                program: program.to_string(),
                source,
            }
        }
    }
}

/// Runs `program args...` in `cwd` and captures its output.
///
/// Stdin is closed so a tool waiting for input fails instead of hanging.
pub fn run_tool<I, S>(program: &str, args: I, cwd: &Path) -> Result<ToolOutput, ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    tracing::debug!(command = ?cmd, "spawning external tool");

    let output = cmd.output().map_err(|e| ToolError::from_io(program, e))?;

    let result = ToolOutput {
        success: output.status.success(),
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    tracing::debug!(program, code = ?result.code, "external tool finished");
    Ok(result)
}

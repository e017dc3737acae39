//! Environment checks.
//!
//! Verifies that keymap-drawer and rsvg-convert are installed and that the
//! project files the drawer reads are where the configuration says.

pub mod checker;
pub mod formatter;

pub use checker::{DependencyChecker, DependencyStatus, ToolStatus};
pub use formatter::{DoctorFormatter, OutputFormat, Platform};

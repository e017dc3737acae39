//! Export of the rendered keymap.
//!
//! This module turns the single tall keymap SVG into printable output:
//! a paginated PDF rendered through `rsvg-convert`, or standalone SVG pages.

pub mod pdf;
pub mod split;

pub use pdf::{PdfExporter, PdfOptions, PdfReport};
pub use split::{split_pages, SplitOptions};

use crate::svg::SvgError;
use std::path::PathBuf;

/// Errors raised by the exporters.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Input SVG does not exist
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),
    /// Input SVG could not be understood
    #[error("Failed to read SVG {}: {source}", .path.display())]
    InvalidSvg {
        /// Input path
        path: PathBuf,
        /// Parser error
        #[source]
        source: SvgError,
    },
    /// Nothing left to export after exclusions
    #[error("No layers to export (found {found}, all excluded)")]
    NoLayers {
        /// Layers present before exclusion
        found: usize,
    },
    /// External converter not installed
    #[error("{tool} not found. Install it with: {hint}")]
    ToolMissing {
        /// Program name
        tool: String,
        /// Installation hint for this platform
        hint: &'static str,
    },
    /// External converter ran and failed
    #[error("Error running {tool}: {detail}")]
    ToolFailed {
        /// Program name
        tool: String,
        /// Error output
        detail: String,
    },
    /// File system or other failure
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

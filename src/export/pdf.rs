//! Multi-page PDF export at native layer scale.
//!
//! The tall keymap SVG is cut into pages of a few layers each. Every page is
//! an SVG that keeps only its layers and whose `viewBox` frames exactly the
//! band those layers occupy. The page size is set in points so that it fits
//! on US Letter. A single `rsvg-convert` call then turns the page SVGs into
//! one PDF, one page per input file.

use crate::export::ExportError;
use crate::process::{run_tool, ToolError};
use crate::svg::{
    exclude_layers, fit_to_letter, format_number, page_window, paginate, render_document, Layer,
    SvgDocument,
};
use anyhow::Context;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// What to export and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfOptions {
    /// Source SVG
    pub input: PathBuf,
    /// Destination PDF
    pub output: PathBuf,
    /// Layers per page
    pub layers_per_page: usize,
    /// Layer names left out
    pub exclude: Vec<String>,
}

/// Summary of a finished export.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfReport {
    /// Written PDF
    pub output: PathBuf,
    /// Source width and height
    pub svg_size: (f64, f64),
    /// All layers found in the source
    pub found: Vec<Layer>,
    /// Layer names on each page
    pub pages: Vec<Vec<String>>,
}

impl PdfReport {
    /// Number of exported layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }
}

/// A single prepared page.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfPage {
    /// Layers on the page
    pub layers: Vec<String>,
    /// Standalone page SVG
    pub svg: String,
    /// Rendered size in points
    pub size_pt: (f64, f64),
}

/// Installation hint for librsvg on this platform.
#[must_use]
pub const fn rsvg_install_hint() -> &'static str {
    if cfg!(target_os = "macos") {
        "brew install librsvg"
    } else if cfg!(target_os = "windows") {
        "choco install rsvg-convert  (or use MSYS2: pacman -S mingw-w64-x86_64-librsvg)"
    } else {
        "sudo apt-get install librsvg2-bin  (Debian/Ubuntu)"
    }
}

/// Builds the page SVGs for `doc`.
///
/// Layers in `exclude` are removed from every page. Non-layer content such
/// as `<style>` and `<defs>` is kept on each page.
pub fn build_pages(
    doc: &SvgDocument,
    layers_per_page: usize,
    exclude: &[String],
) -> Result<Vec<PdfPage>, ExportError> {
    let found = doc.layers();
    let found_count = found.len();
    let included = exclude_layers(found, exclude);
    if included.is_empty() {
        return Err(ExportError::NoLayers { found: found_count });
    }

    let width = doc.width();
    let pages = paginate(&included, layers_per_page)
        .into_iter()
        .filter_map(|page| {
            let (y_start, height) = page_window(&page)?;
            let (w_pt, h_pt) = fit_to_letter(width, height);
            let names: Vec<String> = page.iter().map(|l| l.name.clone()).collect();

            let root_attrs = doc.root_attrs_with(&[
                (
                    "viewBox",
                    format!(
                        "0 {} {} {}",
                        format_number(y_start),
                        format_number(width),
                        format_number(height)
                    ),
                ),
                ("width", format!("{}pt", format_number(w_pt))),
                ("height", format!("{}pt", format_number(h_pt))),
            ]);

            let children = doc.children().iter().filter_map(|child| match child.layer_name() {
                Some(name) if !names.iter().any(|n| n == name) => None,
                _ => Some(child.raw()),
            });

            Some(PdfPage {
                svg: render_document(&root_attrs, children),
                layers: names,
                size_pt: (w_pt, h_pt),
            })
        })
        .collect();

    Ok(pages)
}

/// Renders paginated PDFs with `rsvg-convert`.
#[derive(Debug, Clone)]
pub struct PdfExporter {
    program: String,
    working_dir: PathBuf,
}

impl PdfExporter {
    /// Creates an exporter running `program` from `working_dir`.
    #[must_use]
    pub fn new(program: impl Into<String>, working_dir: &Path) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.to_path_buf(),
        }
    }

    /// Exports `options.input` to `options.output`.
    pub fn export(&self, options: &PdfOptions) -> Result<PdfReport, ExportError> {
        if !options.input.exists() {
            return Err(ExportError::InputNotFound(options.input.clone()));
        }

        let content = fs::read_to_string(&options.input).context(format!(
            "Failed to read SVG: {}",
            options.input.display()
        ))?;
        let doc = SvgDocument::parse(&content).map_err(|source| ExportError::InvalidSvg {
            path: options.input.clone(),
            source,
        })?;

        let pages = build_pages(&doc, options.layers_per_page, &options.exclude)?;
        tracing::info!(
            input = %options.input.display(),
            pages = pages.len(),
            "prepared pdf pages"
        );

        let temp_dir = tempfile::Builder::new()
            .prefix("toucan-keymap-pdf")
            .tempdir()
            .context("Failed to create temporary directory")?;

        let mut args: Vec<OsString> = vec![
            "-f".into(),
            "pdf".into(),
            "-o".into(),
            options.output.clone().into_os_string(),
        ];
        for (index, page) in pages.iter().enumerate() {
            let page_path = temp_dir.path().join(format!("page_{}.svg", index + 1));
            fs::write(&page_path, &page.svg).context(format!(
                "Failed to write page SVG: {}",
                page_path.display()
            ))?;
            args.push(page_path.into_os_string());
        }

        let output = match run_tool(&self.program, &args, &self.working_dir) {
            Ok(output) => output,
            Err(ToolError::NotFound { program }) => {
                return Err(ExportError::ToolMissing {
                    tool: program,
                    hint: rsvg_install_hint(),
                })
            }
            Err(e) => return Err(ExportError::Other(e.into())),
        };

        if !output.success {
            return Err(ExportError::ToolFailed {
                tool: self.program.clone(),
                detail: output.failure_detail(),
            });
        }

        Ok(PdfReport {
            output: options.output.clone(),
            svg_size: (doc.width(), doc.height()),
            found: doc.layers(),
            pages: pages.into_iter().map(|p| p.layers).collect(),
        })
    }
}

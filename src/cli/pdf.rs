//! `pdf` command: paginated PDF at native layer scale.

use crate::cli::common::{CliError, CliResult, GlobalOptions};
use crate::constants::COLEMAK_LAYER;
use crate::export::{ExportError, PdfExporter, PdfOptions, PdfReport};
use clap::Args;
use std::path::PathBuf;

/// Export the keymap SVG as a multi-page US Letter PDF
#[derive(Debug, Args)]
pub struct PdfArgs {
    /// Input SVG (default: paths.svg)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output PDF (default: paths.pdf)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Layers per page (default: pdf.layers_per_page)
    #[arg(short = 'n', long, value_name = "N")]
    pub layers_per_page: Option<usize>,

    /// Exclude the COLEMAK layer
    #[arg(long)]
    pub no_colemak: bool,

    /// Exclude another layer (repeatable)
    #[arg(long = "exclude", value_name = "LAYER")]
    pub exclude: Vec<String>,
}

impl PdfArgs {
    /// Execute the pdf command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let config = global.load_config()?;

        let layers_per_page = self.layers_per_page.unwrap_or(config.pdf.layers_per_page);
        if layers_per_page == 0 {
            return Err(CliError::validation("--layers-per-page must be at least 1"));
        }

        let mut exclude: Vec<String> = Vec::new();
        let colemak = self.no_colemak.then(|| COLEMAK_LAYER.to_string());
        for layer in config
            .pdf
            .exclude_layers
            .iter()
            .chain(&self.exclude)
            .chain(colemak.as_ref())
        {
            if !exclude.contains(layer) {
                exclude.push(layer.clone());
            }
        }

        let options = PdfOptions {
            input: global.resolve(self.input.as_ref().unwrap_or(&config.paths.svg)),
            output: global.resolve(self.output.as_ref().unwrap_or(&config.paths.pdf)),
            layers_per_page,
            exclude,
        };

        println!("Reading: {}", options.input.display());
        let report = PdfExporter::new(config.tools.rsvg_convert.clone(), &global.project)
            .export(&options)
            .map_err(export_error)?;
        print_summary(&options, &report);
        Ok(())
    }
}

/// Maps exporter errors onto exit codes.
pub(crate) fn export_error(err: ExportError) -> CliError {
    match err {
        ExportError::InputNotFound(_) | ExportError::Other(_) => CliError::io(format!("{err:#}")),
        ExportError::InvalidSvg { .. }
        | ExportError::NoLayers { .. }
        | ExportError::ToolMissing { .. }
        | ExportError::ToolFailed { .. } => CliError::validation(err.to_string()),
    }
}

fn print_summary(options: &PdfOptions, report: &PdfReport) {
    let (width, height) = report.svg_size;
    println!("SVG dimensions: {width} x {height}");
    println!("Found {} layers:", report.found.len());
    for layer in &report.found {
        println!(
            "  - {}: y={}, height≈{:.0}",
            layer.name, layer.y_offset, layer.height
        );
    }
    if !options.exclude.is_empty() {
        println!("Excluding: {}", options.exclude.join(", "));
    }

    println!();
    println!(
        "Generated {} page(s) with up to {} layer(s) per page:",
        report.pages.len(),
        options.layers_per_page
    );
    for (number, page) in report.pages.iter().enumerate() {
        println!("  Page {}: {}", number + 1, page.join(", "));
    }

    println!();
    println!("Done! Created {}", report.output.display());
    println!("  - {} page(s)", report.pages.len());
    println!("  - {} layer(s)", report.layer_count());
}

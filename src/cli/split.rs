//! `split` command: standalone SVG pages, three layers each.

use crate::cli::common::{CliResult, GlobalOptions};
use crate::cli::pdf::export_error;
use crate::constants::COLEMAK_LAYER;
use crate::export::{split_pages, SplitOptions};
use clap::Args;
use std::path::PathBuf;

/// Split the keymap SVG into keymap_page<N>.svg files
#[derive(Debug, Args)]
pub struct SplitArgs {
    /// Input SVG (default: paths.svg)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Directory for the page files (default: project root)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Layers per page
    #[arg(short = 'n', long, value_name = "N", default_value_t = 3)]
    pub layers_per_page: usize,

    /// Keep the COLEMAK layer
    #[arg(long)]
    pub keep_colemak: bool,
}

impl SplitArgs {
    /// Execute the split command
    pub fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let config = global.load_config()?;

        let mut options = SplitOptions::new(
            global.resolve(self.input.as_ref().unwrap_or(&config.paths.svg)),
            self.output_dir
                .as_ref()
                .map_or_else(|| global.project.clone(), |dir| global.resolve(dir)),
        );
        options.layers_per_page = self.layers_per_page.max(1);
        if self.keep_colemak {
            options.exclude.retain(|layer| layer != COLEMAK_LAYER);
        }

        let written = split_pages(&options).map_err(export_error)?;
        for path in &written {
            println!("Created {}", path.display());
        }
        println!();
        println!("Created {} page(s)", written.len());
        Ok(())
    }
}

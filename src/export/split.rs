//! Splits the keymap SVG into standalone letter-height pages.

use crate::constants::COLEMAK_LAYER;
use crate::export::ExportError;
use crate::svg::{exclude_layers, format_number, paginate, render_document, SvgDocument};
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// Page width in SVG units.
pub const SPLIT_PAGE_WIDTH: u32 = 960;
/// Page height in SVG units (11in at 72dpi).
pub const SPLIT_PAGE_HEIGHT: u32 = 792;
/// Top and bottom margin around the stacked layers.
const SPLIT_MARGIN: u32 = 30;

/// Options for [`split_pages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOptions {
    /// Source SVG
    pub input: PathBuf,
    /// Directory receiving `keymap_page<N>.svg`
    pub output_dir: PathBuf,
    /// Layers per page
    pub layers_per_page: usize,
    /// Layer names left out
    pub exclude: Vec<String>,
}

impl SplitOptions {
    /// Three layers per page, COLEMAK excluded.
    #[must_use]
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            layers_per_page: 3,
            exclude: vec![COLEMAK_LAYER.to_string()],
        }
    }
}

/// Vertical offset of the `index`-th of `count` layers on a split page.
#[must_use]
pub fn split_offset(index: usize, count: usize) -> u32 {
    let usable = (SPLIT_PAGE_HEIGHT - 2 * SPLIT_MARGIN) as usize;
    SPLIT_MARGIN + (index * usable / count.max(1)) as u32
}

/// Renders the split pages without touching the file system.
pub fn render_pages(
    doc: &SvgDocument,
    layers_per_page: usize,
    exclude: &[String],
) -> Result<Vec<String>, ExportError> {
    let found = doc.layers();
    let found_count = found.len();
    let included = exclude_layers(found, exclude);
    if included.is_empty() {
        return Err(ExportError::NoLayers { found: found_count });
    }

    let style = doc.children().iter().find(|c| c.name() == "style");
    let root_attrs: Vec<(String, String)> = [
        ("width", SPLIT_PAGE_WIDTH.to_string()),
        ("height", SPLIT_PAGE_HEIGHT.to_string()),
        (
            "viewBox",
            format!("0 0 {SPLIT_PAGE_WIDTH} {SPLIT_PAGE_HEIGHT}"),
        ),
        ("class", "keymap".to_string()),
        ("xmlns", "http://www.w3.org/2000/svg".to_string()),
        ("xmlns:xlink", "http://www.w3.org/1999/xlink".to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    let pages = paginate(&included, layers_per_page)
        .iter()
        .map(|page| {
            let mut children: Vec<String> =
                style.map(|s| s.raw().to_string()).into_iter().collect();
            for (idx, layer) in page.iter().enumerate() {
                let Some(element) = doc
                    .children()
                    .iter()
                    .find(|c| c.layer_name() == Some(layer.name.as_str()))
                else {
                    continue;
                };
                if element.attr("transform").is_some() {
                    let transform = format!(
                        "translate({}, {})",
                        format_number(layer.x),
                        split_offset(idx, page.len())
                    );
                    children.push(element.with_attr("transform", &transform));
                } else {
                    children.push(element.raw().to_string());
                }
            }
            render_document(&root_attrs, children)
        })
        .collect();

    Ok(pages)
}

/// Writes `keymap_page<N>.svg` files and returns their paths.
pub fn split_pages(options: &SplitOptions) -> Result<Vec<PathBuf>, ExportError> {
    if !options.input.exists() {
        return Err(ExportError::InputNotFound(options.input.clone()));
    }
    let content = fs::read_to_string(&options.input)
        .with_context(|| format!("Failed to read SVG: {}", options.input.display()))?;
    let doc = SvgDocument::parse(&content).map_err(|source| ExportError::InvalidSvg {
        path: options.input.clone(),
        source,
    })?;

    let pages = render_pages(&doc, options.layers_per_page, &options.exclude)?;
    fs::create_dir_all(&options.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            options.output_dir.display()
        )
    })?;

    let mut written = Vec::with_capacity(pages.len());
    for (index, page) in pages.iter().enumerate() {
        let path = page_path(&options.output_dir, index + 1);
        fs::write(&path, page)
            .with_context(|| format!("Failed to write page: {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote split page");
        written.push(path);
    }
    Ok(written)
}

fn page_path(dir: &Path, number: usize) -> PathBuf {
    dir.join(format!("keymap_page{number}.svg"))
}

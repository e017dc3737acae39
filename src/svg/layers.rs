//! Layer geometry and pagination.

use crate::constants::{LETTER_HEIGHT_PT, LETTER_WIDTH_PT};
use regex::Regex;
use std::sync::OnceLock;

/// One keymap layer as drawn in the SVG.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Layer name (class without the `layer-` prefix)
    pub name: String,
    /// Horizontal translate of the group
    pub x: f64,
    /// Vertical translate of the group
    pub y_offset: f64,
    /// Distance to the next layer, or to the bottom of the drawing
    pub height: f64,
}

impl Layer {
    /// Bottom edge of the layer.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y_offset + self.height
    }
}

fn translate_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"translate\s*\(\s*([-+]?[0-9.]+(?:[eE][-+]?[0-9]+)?)(?:\s*,\s*|\s+)([-+]?[0-9.]+(?:[eE][-+]?[0-9]+)?)\s*\)")
            .expect("translate pattern is valid")
    })
}

/// Extracts `(x, y)` from a `translate(x, y)` transform.
///
/// Returns `None` when the transform has no two-argument translate.
#[must_use]
pub fn parse_translate(transform: &str) -> Option<(f64, f64)> {
    let caps = translate_regex().captures(transform)?;
    let x = caps.get(1)?.as_str().parse().ok()?;
    let y = caps.get(2)?.as_str().parse().ok()?;
    Some((x, y))
}

/// Fills in each layer's height from the offset of the layer below it.
///
/// The last layer extends to `total_height`.
pub fn compute_layer_heights(layers: &mut [Layer], total_height: f64) {
    let offsets: Vec<f64> = layers.iter().map(|l| l.y_offset).collect();
    for (i, layer) in layers.iter_mut().enumerate() {
        let next = offsets.get(i + 1).copied().unwrap_or(total_height);
        layer.height = next - layer.y_offset;
    }
}

/// Removes the named layers, keeping order.
#[must_use]
pub fn exclude_layers(layers: Vec<Layer>, excluded: &[String]) -> Vec<Layer> {
    layers
        .into_iter()
        .filter(|l| !excluded.iter().any(|e| *e == l.name))
        .collect()
}

/// Groups layers into pages of at most `per_page` layers.
///
/// `per_page` of zero is treated as one.
#[must_use]
pub fn paginate(layers: &[Layer], per_page: usize) -> Vec<Vec<Layer>> {
    layers
        .chunks(per_page.max(1))
        .map(<[Layer]>::to_vec)
        .collect()
}

/// Vertical window `(y_start, height)` spanning the layers of a page.
#[must_use]
pub fn page_window(page: &[Layer]) -> Option<(f64, f64)> {
    let first = page.first()?;
    let last = page.last()?;
    Some((first.y_offset, last.bottom() - first.y_offset))
}

/// Scales `width × height` onto a US Letter page.
///
/// Fits the width first; if the scaled height overflows, fits the height.
#[must_use]
pub fn fit_to_letter(width: f64, height: f64) -> (f64, f64) {
    if width <= 0.0 || height <= 0.0 {
        return (0.0, 0.0);
    }
    let mut scale = LETTER_WIDTH_PT / width;
    if height * scale > LETTER_HEIGHT_PT {
        scale = LETTER_HEIGHT_PT / height;
    }
    (width * scale, height * scale)
}

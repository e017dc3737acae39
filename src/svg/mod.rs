//! Reading and rewriting keymap-drawer SVG output.

pub mod document;
pub mod layers;

pub use document::{format_number, render_document, Element, SvgDocument, SvgError};
pub use layers::{
    compute_layer_heights, exclude_layers, fit_to_letter, page_window, paginate, parse_translate,
    Layer,
};

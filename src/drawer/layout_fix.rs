//! Physical layout override for the parsed keymap document.

use crate::config::LayoutConfig;

/// The line `keymap parse` emits for a ZMK keyboard.
#[must_use]
pub fn zmk_layout_line(zmk_keyboard: &str) -> String {
    format!("layout: {{zmk_keyboard: {zmk_keyboard}}}")
}

/// The replacement block pointing at a QMK layout.
#[must_use]
pub fn qmk_layout_block(qmk_keyboard: &str, layout_name: &str) -> String {
    format!("layout:\n  qmk_keyboard: {qmk_keyboard}\n  layout_name: {layout_name}")
}

/// Rewrites the ZMK layout reference in `yaml` to the configured QMK layout.
///
/// Returns `None` when the document does not contain the ZMK line, which is
/// the case when the document was already fixed or the keyboard differs.
#[must_use]
pub fn apply_layout_override(yaml: &str, layout: &LayoutConfig) -> Option<String> {
    let needle = zmk_layout_line(&layout.zmk_keyboard);
    if !yaml.contains(&needle) {
        return None;
    }
    Some(yaml.replace(
        &needle,
        &qmk_layout_block(&layout.qmk_keyboard, &layout.layout_name),
    ))
}

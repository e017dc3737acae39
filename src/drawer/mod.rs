//! keymap-drawer integration.
//!
//! This module runs the external `keymap` CLI to turn the ZMK keymap into
//! the intermediate keymap document and then into the rendered SVG.

pub mod layout_fix;
pub mod pipeline;

pub use pipeline::{KeymapDrawer, PipelineStatus, RegenerateOutcome, Step, StepOutcome};

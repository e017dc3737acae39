//! Toucan Keymap Library
//!
//! Keymap tooling for the Toucan split keyboard ZMK config: runs
//! keymap-drawer to turn the devicetree keymap into an SVG, watches the
//! inputs to regenerate it, and exports the drawing as a paginated PDF or
//! standalone SVG pages.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod doctor;
pub mod drawer;
pub mod export;
pub mod process;
pub mod svg;
pub mod watch;

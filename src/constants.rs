//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and the default project file locations.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "Toucan Keymap";

/// The binary name of the application (used in command examples, lowercase with hyphens).
pub const APP_BINARY_NAME: &str = "toucan-keymap";

/// Project-local configuration file name.
pub const PROJECT_CONFIG_FILE: &str = "toucan-keymap.toml";

/// Environment variable overriding the user configuration directory.
pub const CONFIG_DIR_ENV: &str = "TOUCAN_KEYMAP_CONFIG_DIR";

/// ZMK keymap source, relative to the project root.
pub const DEFAULT_KEYMAP: &str = "config/toucan.keymap";

/// Intermediate keymap-drawer document.
pub const DEFAULT_KEYMAP_YAML: &str = "keymap.yaml";

/// keymap-drawer style configuration.
pub const DEFAULT_DRAW_CONFIG: &str = "config.yaml";

/// Rendered keymap.
pub const DEFAULT_SVG: &str = "keymap.svg";

/// Paginated PDF export.
pub const DEFAULT_PDF: &str = "keymap.pdf";

/// Layer left out by `pdf --no-colemak` and by `split`.
pub const COLEMAK_LAYER: &str = "COLEMAK";

/// US Letter width in points (8.5 in at 72 pt/in).
pub const LETTER_WIDTH_PT: f64 = 612.0;

/// US Letter height in points (11 in at 72 pt/in).
pub const LETTER_HEIGHT_PT: f64 = 792.0;

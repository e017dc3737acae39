//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving the keymap tooling
//! configuration in TOML format. A project-local `toucan-keymap.toml` wins
//! over the per-user file in the platform config directory; without either,
//! the defaults describe the standard Toucan ZMK config layout.

use crate::constants::{
    CONFIG_DIR_ENV, DEFAULT_DRAW_CONFIG, DEFAULT_KEYMAP, DEFAULT_KEYMAP_YAML, DEFAULT_PDF,
    DEFAULT_SVG, PROJECT_CONFIG_FILE,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Longest accepted debounce window.
const MAX_DEBOUNCE_MS: u64 = 60_000;

/// File locations, relative to the project root unless absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// ZMK devicetree keymap
    pub keymap: PathBuf,
    /// Intermediate keymap document written by `keymap parse`
    pub keymap_yaml: PathBuf,
    /// keymap-drawer style file
    pub draw_config: PathBuf,
    /// Rendered SVG
    pub svg: PathBuf,
    /// Paginated PDF
    pub pdf: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            keymap: PathBuf::from(DEFAULT_KEYMAP),
            keymap_yaml: PathBuf::from(DEFAULT_KEYMAP_YAML),
            draw_config: PathBuf::from(DEFAULT_DRAW_CONFIG),
            svg: PathBuf::from(DEFAULT_SVG),
            pdf: PathBuf::from(DEFAULT_PDF),
        }
    }
}

/// External executables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// keymap-drawer CLI
    pub keymap_drawer: String,
    /// librsvg converter used for PDF export
    pub rsvg_convert: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            keymap_drawer: "keymap".to_string(),
            rsvg_convert: "rsvg-convert".to_string(),
        }
    }
}

/// Layout override applied to the parsed keymap document.
///
/// keymap-drawer has no physical layout for the Toucan, so the parsed
/// `zmk_keyboard` reference is swapped for the matching Corne QMK layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Apply the override after parsing
    pub enabled: bool,
    /// Keyboard name emitted by `keymap parse`
    pub zmk_keyboard: String,
    /// QMK keyboard providing the physical layout
    pub qmk_keyboard: String,
    /// QMK layout macro name
    pub layout_name: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            zmk_keyboard: "toucan".to_string(),
            qmk_keyboard: "crkbd/rev1".to_string(),
            layout_name: "LAYOUT_split_3x6_3".to_string(),
        }
    }
}

/// PDF export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Layers placed on each page
    pub layers_per_page: usize,
    /// Layer names always left out of the export
    pub exclude_layers: Vec<String>,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            layers_per_page: 2,
            exclude_layers: Vec::new(),
        }
    }
}

/// Watcher settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Events closer together than this are collapsed
    pub debounce_ms: u64,
    /// Use the polling backend instead of native OS notifications
    pub poll: bool,
    /// Interval of the polling backend
    pub poll_interval_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            poll: false,
            poll_interval_ms: 1000,
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// 1. `<project>/toucan-keymap.toml`
/// 2. Linux: `~/.config/toucan-keymap/config.toml`
///    macOS: `~/Library/Application Support/toucan-keymap/config.toml`
///    Windows: `%APPDATA%\toucan-keymap\config.toml`
///
/// The user directory can be redirected with `TOUCAN_KEYMAP_CONFIG_DIR`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// File locations
    pub paths: PathConfig,
    /// External executables
    pub tools: ToolConfig,
    /// Layout override
    pub layout: LayoutConfig,
    /// PDF export
    pub pdf: PdfConfig,
    /// File watcher
    pub watch: WatchConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the per-user config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("toucan-keymap");

        Ok(config_dir)
    }

    /// Gets the full path to the per-user config file.
    pub fn user_config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Path of the project-local config file.
    #[must_use]
    pub fn project_config_file(project_root: &Path) -> PathBuf {
        project_root.join(PROJECT_CONFIG_FILE)
    }

    /// Returns the config file that [`Config::load`] would read, if any.
    pub fn locate(project_root: &Path) -> Result<Option<PathBuf>> {
        let project_file = Self::project_config_file(project_root);
        if project_file.exists() {
            return Ok(Some(project_file));
        }

        let user_file = Self::user_config_file()?;
        if user_file.exists() {
            return Ok(Some(user_file));
        }

        Ok(None)
    }

    /// Loads the configuration for a project.
    ///
    /// Falls back to defaults when no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        match Self::locate(project_root)? {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::new()),
        }
    }

    /// Loads and validates a specific config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .context(format!("Invalid config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Saves configuration to `path` using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context(format!(
                "Failed to create config directory: {}",
                parent.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let temp_path = path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, path).context(format!(
            "Failed to rename temp config file to: {}",
            path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - `layers_per_page` is at least 1
    /// - tool names are not empty
    /// - `debounce_ms` stays within a minute
    pub fn validate(&self) -> Result<()> {
        if self.pdf.layers_per_page == 0 {
            anyhow::bail!("pdf.layers_per_page must be at least 1");
        }

        if self.tools.keymap_drawer.trim().is_empty() {
            anyhow::bail!("tools.keymap_drawer must not be empty");
        }

        if self.tools.rsvg_convert.trim().is_empty() {
            anyhow::bail!("tools.rsvg_convert must not be empty");
        }

        if self.watch.debounce_ms > MAX_DEBOUNCE_MS {
            anyhow::bail!(
                "watch.debounce_ms must be at most {MAX_DEBOUNCE_MS} (got {})",
                self.watch.debounce_ms
            );
        }

        if self.layout.enabled && self.layout.zmk_keyboard.trim().is_empty() {
            anyhow::bail!("layout.zmk_keyboard must not be empty when the override is enabled");
        }

        Ok(())
    }

    /// Resolves a configured path against the project root.
    #[must_use]
    pub fn resolve(project_root: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            project_root.join(path)
        }
    }

    /// Files whose modification triggers a regeneration.
    #[must_use]
    pub fn watched_files(&self, project_root: &Path) -> Vec<PathBuf> {
        vec![
            Self::resolve(project_root, &self.paths.keymap),
            Self::resolve(project_root, &self.paths.draw_config),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::new();
        assert_eq!(config.paths.keymap, PathBuf::from("config/toucan.keymap"));
        assert_eq!(config.paths.svg, PathBuf::from("keymap.svg"));
        assert_eq!(config.tools.keymap_drawer, "keymap");
        assert_eq!(config.pdf.layers_per_page, 2);
        assert_eq!(config.watch.debounce_ms, 500);
        assert!(config.layout.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_layers_per_page() {
        let mut config = Config::new();
        config.pdf.layers_per_page = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_tool() {
        let mut config = Config::new();
        config.tools.rsvg_convert = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_huge_debounce() {
        let mut config = Config::new();
        config.watch.debounce_ms = 120_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("toucan-keymap.toml");
        fs::write(&path, "[pdf]\nlayers_per_page = 3\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.pdf.layers_per_page, 3);
        assert_eq!(config.paths, PathConfig::default());
        assert_eq!(config.layout.qmk_keyboard, "crkbd/rev1");
    }

    #[test]
    fn test_load_from_invalid_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("toucan-keymap.toml");
        fs::write(&path, "[pdf]\nlayers_per_page = 0\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::new();
        config.tools.keymap_drawer = "/opt/bin/keymap".to_string();
        config.pdf.exclude_layers = vec!["GAME".to_string()];
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_project_file_wins() {
        let temp_dir = TempDir::new().unwrap();
        let project_file = Config::project_config_file(temp_dir.path());
        fs::write(&project_file, "[watch]\ndebounce_ms = 250\n").unwrap();

        assert_eq!(
            Config::locate(temp_dir.path()).unwrap(),
            Some(project_file)
        );
        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.watch.debounce_ms, 250);
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let root = Path::new("/project");
        assert_eq!(
            Config::resolve(root, Path::new("keymap.svg")),
            PathBuf::from("/project/keymap.svg")
        );
        assert_eq!(
            Config::resolve(root, Path::new("/tmp/out.svg")),
            PathBuf::from("/tmp/out.svg")
        );
    }

    #[test]
    fn test_watched_files() {
        let config = Config::new();
        let files = config.watched_files(Path::new("/project"));
        assert_eq!(
            files,
            vec![
                PathBuf::from("/project/config/toucan.keymap"),
                PathBuf::from("/project/config.yaml"),
            ]
        );
    }
}

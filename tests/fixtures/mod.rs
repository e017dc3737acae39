//! Shared fixtures for the integration tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Path to the toucan-keymap binary (set by cargo at compile time)
pub fn toucan_bin() -> &'static str {
    env!("CARGO_BIN_EXE_toucan-keymap")
}

/// Command running the binary against `project` with an isolated user
/// config directory and colors off.
pub fn isolated_command(project: &Path, config_dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(toucan_bin());
    cmd.env("TOUCAN_KEYMAP_CONFIG_DIR", config_dir)
        .env_remove("RUST_LOG")
        .arg("--no-color")
        .arg("--project")
        .arg(project)
        .args(args);
    cmd
}

/// Minimal ZMK keymap source.
pub const KEYMAP_SOURCE: &str = r#"#include <behaviors.dtsi>
/ {
    keymap {
        compatible = "zmk,keymap";
        base_layer { bindings = <&kp Q &kp W &kp E>; };
    };
};
"#;

/// Creates a project with `config/toucan.keymap` and `config.yaml`.
pub fn create_project() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir_all(dir.path().join("config")).expect("Failed to create config dir");
    fs::write(dir.path().join("config/toucan.keymap"), KEYMAP_SOURCE)
        .expect("Failed to write keymap");
    fs::write(dir.path().join("config.yaml"), "draw_config:\n  key_h: 56\n")
        .expect("Failed to write draw config");
    dir
}

/// Keymap-drawer SVG with one stacked layer group per name, 350 units apart.
pub fn keymap_svg(layers: &[&str]) -> String {
    let height = 350 * layers.len().max(1);
    let mut svg = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg width=\"960\" height=\"{height}\" viewBox=\"0 0 960 {height}\" class=\"keymap\" xmlns=\"http://www.w3.org/2000/svg\">\n<style>rect.key {{ fill: #fdfdfd; }}</style>\n"
    );
    for (i, name) in layers.iter().enumerate() {
        svg.push_str(&format!(
            "<g transform=\"translate(30, {})\" class=\"layer-{name}\">\n<text x=\"0\" y=\"28\" class=\"label\">{name}:</text>\n<rect x=\"0\" y=\"56\" width=\"54\" height=\"54\" class=\"key\"/>\n</g>\n",
            i * 350
        ));
    }
    svg.push_str("</svg>\n");
    svg
}

/// Writes an executable shell script.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, body).expect("Failed to write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
    path
}

/// Stand-in for the keymap-drawer CLI.
///
/// `parse` fails when the keymap contains `BROKEN`; `draw` fails unless the
/// layout line was rewritten to a QMK layout.
#[cfg(unix)]
pub fn fake_keymap_drawer(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "fake-keymap",
        r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "keymap-drawer 0.18.0"
  exit 0
fi
if [ "$1" = "parse" ]; then
  if grep -q BROKEN "$3"; then
    echo "syntax error in keymap" >&2
    exit 1
  fi
  printf 'layout: {zmk_keyboard: toucan}\nlayers:\n  BASE: [Q, W, E]\n' > "$5"
  exit 0
fi
if [ "$3" = "draw" ]; then
  if ! grep -q qmk_keyboard "$4"; then
    echo "unknown physical layout" >&2
    exit 2
  fi
  printf '<svg width="960" height="700" xmlns="http://www.w3.org/2000/svg"><g transform="translate(30, 0)" class="layer-BASE"/><g transform="translate(30, 350)" class="layer-NAV"/></svg>\n' > "$6"
  exit 0
fi
echo "unexpected arguments: $*" >&2
exit 64
"#,
    )
}

/// Stand-in for rsvg-convert: records the layers of every page it is given.
#[cfg(unix)]
pub fn fake_rsvg_convert(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "fake-rsvg-convert",
        r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "rsvg-convert version 2.56.3"
  exit 0
fi
out="$4"
shift 4
printf '%%PDF-1.4 fake\n' > "$out"
for page in "$@"; do
  echo "page" >> "$out"
  grep -o 'class="layer-[A-Z]*"' "$page" >> "$out"
done
"#,
    )
}

/// Writes `toucan-keymap.toml` into `project` pointing at the given tools.
pub fn write_project_config(project: &Path, keymap_drawer: &Path, rsvg_convert: &Path) {
    let content = format!(
        "[tools]\nkeymap_drawer = \"{}\"\nrsvg_convert = \"{}\"\n",
        keymap_drawer.display(),
        rsvg_convert.display()
    );
    fs::write(project.join("toucan-keymap.toml"), content).expect("Failed to write config");
}

/// Writer shared between a test and a reporter moved into another thread.
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    /// Everything written so far.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

//! End-to-end tests for the `config` command.

use serde_json::Value;
use std::fs;
use tempfile::TempDir;

mod fixtures;
use fixtures::*;

#[test]
fn test_config_show_defaults_json() {
    let project = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();

    let output = isolated_command(project.path(), config_dir.path(), &["config", "show", "--json"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("Invalid JSON");
    assert!(json["source"].is_null());
    assert_eq!(json["paths"]["keymap"], "config/toucan.keymap");
    assert_eq!(json["paths"]["svg"], "keymap.svg");
    assert_eq!(json["tools"]["keymap_drawer"], "keymap");
    assert_eq!(json["layout"]["qmk_keyboard"], "crkbd/rev1");
    assert_eq!(json["pdf"]["layers_per_page"], 2);
    assert_eq!(json["watch"]["debounce_ms"], 500);
}

#[test]
fn test_config_show_project_file_wins() {
    let project = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();
    fs::write(
        config_dir.path().join("config.toml"),
        "[pdf]\nlayers_per_page = 4\n",
    )
    .unwrap();

    let output = isolated_command(project.path(), config_dir.path(), &["config", "show", "--json"])
        .output()
        .expect("Failed to execute command");
    let json: Value = serde_json::from_slice(&output.stdout).expect("Invalid JSON");
    assert_eq!(json["pdf"]["layers_per_page"], 4);
    assert!(json["source"].as_str().unwrap().ends_with("config.toml"));

    fs::write(
        project.path().join("toucan-keymap.toml"),
        "[pdf]\nlayers_per_page = 3\n",
    )
    .unwrap();

    let output = isolated_command(project.path(), config_dir.path(), &["config", "show", "--json"])
        .output()
        .expect("Failed to execute command");
    let json: Value = serde_json::from_slice(&output.stdout).expect("Invalid JSON");
    assert_eq!(json["pdf"]["layers_per_page"], 3);
    assert!(json["source"]
        .as_str()
        .unwrap()
        .ends_with("toucan-keymap.toml"));
}

#[test]
fn test_config_show_human_readable() {
    let project = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();

    let output = isolated_command(project.path(), config_dir.path(), &["config", "show"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Toucan Keymap Configuration"));
    assert!(stdout.contains("Source: (defaults)"));
    assert!(stdout.contains("zmk_keyboard toucan -> crkbd/rev1 LAYOUT_split_3x6_3"));
}

#[test]
fn test_config_invalid_file_is_io_error() {
    let project = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();
    fs::write(
        project.path().join("toucan-keymap.toml"),
        "[pdf]\nlayers_per_page = 0\n",
    )
    .unwrap();

    let output = isolated_command(project.path(), config_dir.path(), &["config", "show"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load configuration"), "stderr: {stderr}");
}

#[test]
fn test_config_init_writes_project_file() {
    let project = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();

    let output = isolated_command(project.path(), config_dir.path(), &["config", "init"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let written = fs::read_to_string(project.path().join("toucan-keymap.toml")).unwrap();
    assert!(written.contains("[tools]"));
    assert!(written.contains("rsvg_convert = \"rsvg-convert\""));

    // Second run refuses to overwrite
    let output = isolated_command(project.path(), config_dir.path(), &["config", "init"])
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("already exists"), "stderr: {stderr}");

    let output = isolated_command(
        project.path(),
        config_dir.path(),
        &["config", "init", "--force"],
    )
    .output()
    .expect("Failed to execute command");
    assert!(output.status.success());
}

#[test]
fn test_config_init_user() {
    let project = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();
    let user_dir = config_dir.path().join("nested");

    let output = isolated_command(project.path(), &user_dir, &["config", "init", "--user"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(user_dir.join("config.toml").exists());
    assert!(!project.path().join("toucan-keymap.toml").exists());
}

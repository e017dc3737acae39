//! End-to-end tests for the `parse` and `draw` commands.

use std::fs;
use tempfile::TempDir;

mod fixtures;
use fixtures::*;

#[test]
fn test_draw_missing_keymap_is_io_error() {
    let project = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();

    let output = isolated_command(project.path(), config_dir.path(), &["draw"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Keymap file not found"), "stderr: {stderr}");
}

#[test]
fn test_draw_missing_draw_config_is_io_error() {
    let project = create_project();
    fs::remove_file(project.path().join("config.yaml")).unwrap();
    let config_dir = TempDir::new().unwrap();

    let output = isolated_command(project.path(), config_dir.path(), &["draw"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Draw config not found"), "stderr: {stderr}");
}

#[test]
fn test_parse_explicit_config_must_exist() {
    let project = create_project();
    let config_dir = TempDir::new().unwrap();

    let output = isolated_command(
        project.path(),
        config_dir.path(),
        &["--config", "/nonexistent/toucan-keymap.toml", "parse"],
    )
    .output()
    .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Config file not found"), "stderr: {stderr}");
}

#[cfg(unix)]
#[test]
fn test_draw_success() {
    let project = create_project();
    let config_dir = TempDir::new().unwrap();
    let tools = TempDir::new().unwrap();
    write_project_config(
        project.path(),
        &fake_keymap_drawer(tools.path()),
        &fake_rsvg_convert(tools.path()),
    );

    let output = isolated_command(project.path(), config_dir.path(), &["draw"])
        .output()
        .expect("Failed to execute command");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✓"));
    assert!(stdout.contains("keymap.svg updated successfully"));
    assert!(project.path().join("keymap.svg").exists());
}

#[cfg(unix)]
#[test]
fn test_draw_custom_output() {
    let project = create_project();
    let config_dir = TempDir::new().unwrap();
    let tools = TempDir::new().unwrap();
    write_project_config(
        project.path(),
        &fake_keymap_drawer(tools.path()),
        &fake_rsvg_convert(tools.path()),
    );

    fs::create_dir_all(project.path().join("out")).unwrap();
    let output = isolated_command(
        project.path(),
        config_dir.path(),
        &["draw", "--output", "out/custom.svg"],
    )
    .output()
    .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(project.path().join("out/custom.svg").exists());
    assert!(!project.path().join("keymap.svg").exists());
}

#[cfg(unix)]
#[test]
fn test_draw_reports_parse_failure() {
    let project = create_project();
    fs::write(project.path().join("config/toucan.keymap"), "BROKEN").unwrap();
    let config_dir = TempDir::new().unwrap();
    let tools = TempDir::new().unwrap();
    write_project_config(
        project.path(),
        &fake_keymap_drawer(tools.path()),
        &fake_rsvg_convert(tools.path()),
    );

    let output = isolated_command(project.path(), config_dir.path(), &["draw"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to parse ZMK keymap: syntax error in keymap"),
        "stderr: {stderr}"
    );
}

#[test]
fn test_draw_missing_keymap_drawer() {
    let project = create_project();
    let config_dir = TempDir::new().unwrap();
    fs::write(
        project.path().join("toucan-keymap.toml"),
        "[tools]\nkeymap_drawer = \"toucan-keymap-drawer-not-installed\"\n",
    )
    .unwrap();

    let output = isolated_command(project.path(), config_dir.path(), &["draw"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("'toucan-keymap-drawer-not-installed' command not found"));
    assert!(stderr.contains("pip install keymap-drawer"));
}

#[cfg(unix)]
#[test]
fn test_parse_writes_fixed_document() {
    let project = create_project();
    let config_dir = TempDir::new().unwrap();
    let tools = TempDir::new().unwrap();
    write_project_config(
        project.path(),
        &fake_keymap_drawer(tools.path()),
        &fake_rsvg_convert(tools.path()),
    );

    let output = isolated_command(project.path(), config_dir.path(), &["parse"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(layout: crkbd/rev1 LAYOUT_split_3x6_3)"));

    let yaml = fs::read_to_string(project.path().join("keymap.yaml")).unwrap();
    assert!(yaml.contains("qmk_keyboard: crkbd/rev1"));
    assert!(!project.path().join("keymap.svg").exists());
}

#[cfg(unix)]
#[test]
fn test_parse_without_layout_fix() {
    let project = create_project();
    let config_dir = TempDir::new().unwrap();
    let tools = TempDir::new().unwrap();
    write_project_config(
        project.path(),
        &fake_keymap_drawer(tools.path()),
        &fake_rsvg_convert(tools.path()),
    );

    let output = isolated_command(
        project.path(),
        config_dir.path(),
        &["parse", "--no-layout-fix"],
    )
    .output()
    .expect("Failed to execute command");

    assert!(output.status.success());
    let yaml = fs::read_to_string(project.path().join("keymap.yaml")).unwrap();
    assert!(yaml.contains("zmk_keyboard: toucan"));
}

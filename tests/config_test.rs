//! Integration tests for Settings loading.
//!
//! Most tests use `Settings::load_file` so neither a global config nor the
//! process environment leaks in.

use std::fs;

use tempfile::TempDir;

use probtree::application::{ApplicationError, OutputFormat};
use probtree::config::Settings;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("probtree.toml");
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn given_partial_file_when_loading_then_missing_keys_fall_back_to_defaults() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        r#"
separator = "/"

[layout]
vertical_spacing = 4.5

[render]
format = "svg"
"#,
    );

    let settings = Settings::load_file(&path).expect("load settings");

    assert_eq!(settings.separator, "/");
    assert_eq!(settings.layout.vertical_spacing, 4.5);
    assert_eq!(settings.layout.horizontal_spacing, 2.0);
    assert_eq!(settings.render.format, OutputFormat::Svg);
    assert_eq!(settings.render.node_color, "lightblue");
    assert_eq!(settings.max_nodes, Settings::default().max_nodes);
}

#[test]
fn given_invalid_value_when_loading_then_settings_error() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        r#"
[layout]
vertical_spacing = -1.0
"#,
    );

    let err = Settings::load_file(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::Settings { .. }));
}

#[test]
fn given_unknown_format_when_loading_then_settings_error() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "[render]\nformat = \"png\"\n");

    assert!(matches!(
        Settings::load_file(&path),
        Err(ApplicationError::Settings { .. })
    ));
}

#[test]
fn given_missing_explicit_file_when_loading_then_settings_error() {
    let temp = TempDir::new().unwrap();

    let err = Settings::load(Some(temp.path().join("nope.toml").as_path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Settings { .. }));
}

#[test]
fn given_env_override_when_loading_then_env_wins_over_file() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "max_nodes = 500\n");
    std::env::set_var("PROBTREE_MAX_NODES", "42");

    let settings = Settings::load(Some(path.as_path()));
    std::env::remove_var("PROBTREE_MAX_NODES");

    assert_eq!(settings.expect("load settings").max_nodes, 42);
}

#[test]
fn given_template_when_loading_then_equals_defaults() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, &Settings::template());

    let settings = Settings::load_file(&path).expect("load template");

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_settings_when_serializing_then_toml_reloads_identically() {
    let temp = TempDir::new().unwrap();
    let original = Settings {
        separator: "::".into(),
        max_nodes: 1234,
        ..Settings::default()
    };
    let path = write_config(&temp, &original.to_toml().unwrap());

    let reloaded = Settings::load_file(&path).unwrap();

    assert_eq!(reloaded, original);
}

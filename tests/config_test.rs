//! Integration tests for Settings layered loading.
//!
//! These tests pass explicit global/explicit paths (temp directories only), so
//! a real global config on the machine running them is never read.

use std::fs;

use tempfile::TempDir;

use calltree::config::Settings;
use calltree::domain::IdStyle;

#[test]
fn given_no_files_when_loading_layers_then_defaults() {
    let settings = Settings::load_layers(None, None).expect("load defaults");
    assert_eq!(settings.placeholder, "(empty)");
    assert!(settings.show_hidden_count);
}

#[test]
fn given_global_file_when_loading_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("calltree.toml");
    fs::write(&global, "id_style = \"random\"\nplaceholder = \"?\"\n").unwrap();

    let settings = Settings::load_layers(Some(&global), None).expect("load");
    assert_eq!(settings.id_style, IdStyle::Random);
    assert_eq!(settings.placeholder, "?");
    assert_eq!(settings.id_prefix, "n");
}

#[test]
fn given_explicit_file_when_loading_then_wins_over_global() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("global.toml");
    let explicit = dir.path().join("explicit.toml");
    fs::write(&global, "id_prefix = \"g\"\nshow_ids = false\n").unwrap();
    fs::write(&explicit, "id_prefix = \"call\"\n").unwrap();

    let settings = Settings::load_layers(Some(&global), Some(&explicit)).expect("load");
    assert_eq!(settings.id_prefix, "call");
    assert!(!settings.show_ids, "global value kept where explicit is silent");
}

#[test]
fn given_missing_global_file_when_loading_then_ignored() {
    let dir = TempDir::new().unwrap();
    let settings = Settings::load_layers(Some(&dir.path().join("nope.toml")), None);
    assert!(settings.is_ok());
}

#[test]
fn given_missing_explicit_file_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let err = Settings::load_layers(None, Some(&dir.path().join("nope.toml"))).unwrap_err();
    assert!(err.to_string().contains("config file not found"));
}

#[test]
fn given_invalid_toml_when_loading_then_config_error_names_file() {
    let dir = TempDir::new().unwrap();
    let explicit = dir.path().join("broken.toml");
    fs::write(&explicit, "id_style = \"sideways\"\n").unwrap();

    let err = Settings::load_layers(None, Some(&explicit)).unwrap_err();
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn given_template_when_parsed_then_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let explicit = dir.path().join("template.toml");
    fs::write(&explicit, Settings::template()).unwrap();

    let settings = Settings::load_layers(None, Some(&explicit)).expect("load template");
    assert_eq!(settings, Settings::default());
}

//! Integration tests for Settings loading with layered precedence.
//!
//! Note: these tests rely on no global config being present for the test user,
//! so the explicit file is layered directly over the compiled defaults.

use std::fs;

use config::Map;
use tempfile::TempDir;

use costtree::application::ApplicationError;
use costtree::config::Settings;
use costtree::domain::{Category, IdStyle};

// ============================================================
// Explicit config file
// ============================================================

#[test]
fn given_explicit_config_when_load_then_fields_override_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("costtree.toml");
    fs::write(
        &path,
        r#"
currency = "EUR"
id_style = "random"
default_category = "internal-failure"
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert: specified fields win, the rest keep their defaults
    assert_eq!(settings.currency, "EUR");
    assert_eq!(settings.id_style, IdStyle::Random);
    assert_eq!(settings.default_category, Category::InternalFailure);
    assert_eq!(settings.root_description, Settings::default().root_description);
}

#[test]
fn given_legacy_category_name_when_load_then_alias_accepted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("costtree.toml");
    fs::write(&path, "default_category = \"falla_externa\"\n").unwrap();

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.default_category, Category::ExternalFailure);
}

#[test]
fn given_missing_config_file_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("does-not-exist.toml");

    let result = Settings::load(Some(&path));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_invalid_toml_when_load_then_config_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "id_style = \"alphabetical\"\n").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(err.to_string().contains("broken.toml"));
}

// ============================================================
// Environment overrides
// ============================================================

#[test]
fn given_env_var_when_load_then_overrides_file() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("costtree.toml");
    fs::write(&path, "prompt = \"from-file>\"\ncurrency = \"EUR\"\n").unwrap();
    let env = Map::from([("COSTTREE_PROMPT".to_string(), "from-env>".to_string())]);

    // Act
    let settings = Settings::load_with_env(Some(&path), Some(env)).expect("load settings");

    // Assert: env wins where set, the file fills the rest
    assert_eq!(settings.prompt, "from-env>");
    assert_eq!(settings.currency, "EUR");
}

#[test]
fn given_env_with_invalid_id_style_when_load_then_error() {
    let env = Map::from([("COSTTREE_ID_STYLE".to_string(), "alphabetical".to_string())]);

    let result = Settings::load_with_env(None, Some(env));

    assert!(result.is_err());
}

#[test]
fn given_empty_env_map_when_load_then_file_values_kept() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("costtree.toml");
    fs::write(&path, "prompt = \"from-file>\"\n").unwrap();

    let settings = Settings::load_with_env(Some(&path), Some(Map::new())).expect("load settings");

    assert_eq!(settings.prompt, "from-file>");
}

// ============================================================
// Template
// ============================================================

#[test]
fn given_template_written_when_load_then_equals_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("costtree.toml");
    fs::write(&path, Settings::template()).unwrap();

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.currency, Settings::default().currency);
    assert_eq!(settings.id_style, Settings::default().id_style);
    assert_eq!(settings.default_category, Settings::default().default_category);
}

//! Integration tests for loading configuration files from disk.

use std::io::Write;

use sieve_config::{ConfigError, ConfigLoader, LogFormat};
use tempfile::NamedTempFile;

fn file_with(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_toml_file() {
    let file = file_with(
        ".toml",
        r#"
        [logging]
        format = "pretty"

        [registry]
        builtin_type_handlers = true

        [schemas.by_number.number]
        type = "integer"

        [schemas.by_number.active]
        type = "boolean"
        optional = true

        [schemas.tagged.tags]
        type = "array"
        element_type = { type = "hash", value_type = "integer" }
        "#,
    );

    let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();

    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert!(config.registry.builtin_type_handlers);

    let schemas = config.argument_schemas().unwrap();
    assert_eq!(
        schemas.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["by_number", "tagged"]
    );
    assert!(schemas["by_number"].get("active").unwrap().is_optional());
}

#[test]
fn test_json_file() {
    let file = file_with(
        ".json",
        r#"{"schemas": {"find_owner": {"owner": {"type": {"class": "User"}}}}}"#,
    );

    let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();

    assert_eq!(config.schemas["find_owner"].len(), 1);
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_unknown_field_in_file() {
    let file = file_with(".toml", "[logging]\ncolour = true\n");

    let result = ConfigLoader::new().with_file(file.path());

    assert!(matches!(result, Err(ConfigError::TomlError(_))));
}

#[test]
fn test_unsupported_extension() {
    let file = file_with(".yaml", "logging: {}\n");

    let result = ConfigLoader::new().with_file(file.path());

    assert!(matches!(result, Err(ConfigError::UnsupportedFormat { .. })));
}

#[test]
fn test_env_override_applies_after_file() {
    let file = file_with(".toml", "[logging]\nlevel = \"warn\"\n");
    std::env::set_var("SIEVECFGTEST__LOGGING__LEVEL", "debug");

    let config = ConfigLoader::new()
        .with_file(file.path())
        .unwrap()
        .with_env_prefix("SIEVECFGTEST")
        .load()
        .unwrap();

    std::env::remove_var("SIEVECFGTEST__LOGGING__LEVEL");
    assert_eq!(config.logging.level, "debug");
}

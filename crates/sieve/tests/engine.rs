//! Integration tests for assembling and using the engine.

use std::sync::Arc;

use sieve::config::ConfigError;
use sieve::core::fixtures::sample_store;
use sieve::prelude::*;

const CATALOG: &str = r#"
    [registry]
    builtin_type_handlers = false

    [schemas.by_number.number]
    type = "integer"

    [schemas.by_number.active]
    type = "boolean"
    optional = true

    [schemas.profile.user]
    type = "record"
    class = "User"

    [schemas.profile.fields]
    type = "array"
    element_type = "symbol"
    default = ["name"]
"#;

fn config() -> SieveConfig {
    toml::from_str(CATALOG).unwrap()
}

fn args(pairs: &[(&str, Value)]) -> Arguments {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), value.clone()))
        .collect()
}

#[test]
fn test_from_config_registers_declared_schemas() {
    let sieve = Sieve::from_config(&config()).unwrap();
    assert_eq!(sieve.validator().schema_names(), vec!["by_number", "profile"]);
}

#[test]
fn test_validate_configured_schema() {
    let sieve = Sieve::from_config(&config()).unwrap();

    let normalized = sieve
        .validate("by_number", args(&[("number", Value::from("9"))]))
        .unwrap();

    assert_eq!(normalized["number"], Value::Integer(9));
    assert!(normalized["active"].is_null());
}

#[test]
fn test_validate_unknown_schema() {
    let sieve = Sieve::from_config(&config()).unwrap();
    let err = sieve.validate("nothing", Arguments::new()).unwrap_err();
    assert!(matches!(err, SieveError::UnknownSchema { schema } if schema == "nothing"));
}

#[test]
fn test_record_lookup_through_entity_store() {
    let sieve = Sieve::builder()
        .config(config())
        .entity_store(Arc::new(sample_store()))
        .build()
        .unwrap();

    let normalized = sieve
        .validate("profile", args(&[("user", Value::from("42"))]))
        .unwrap();

    let user = normalized["user"].as_entity().unwrap();
    assert_eq!(user.get("name"), Some(&Value::from("Ada")));
    assert_eq!(normalized["fields"], Value::from(vec![Value::symbol("name")]));

    let err = sieve
        .validate("profile", args(&[("user", Value::Integer(999_999))]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "argument `user`: User record not found with id: 999999"
    );
}

#[test]
fn test_record_lookup_without_store() {
    let sieve = Sieve::from_config(&config()).unwrap();
    let err = sieve
        .validate("profile", args(&[("user", Value::Integer(42))]))
        .unwrap_err();
    assert!(matches!(err, SieveError::EntityStoreUnavailable { .. }));
}

#[test]
fn test_code_schema_replaces_configured_one() {
    let sieve = Sieve::builder()
        .config(config())
        .schema(
            "by_number",
            ArgumentSchema::new().arg("number", ArgSpec::string()),
        )
        .build()
        .unwrap();

    let normalized = sieve
        .validate("by_number", args(&[("number", Value::Integer(9))]))
        .unwrap();
    assert_eq!(normalized["number"], Value::from("9"));
    assert!(!normalized.contains_key("active"));
}

#[test]
fn test_invalid_configured_schema_fails_build() {
    let config: SieveConfig = toml::from_str(
        r#"
        [schemas.search.page]
        type = "integer"
        optional = true
        default = 1
        "#,
    )
    .unwrap();

    let err = Sieve::from_config(&config).unwrap_err();
    assert!(matches!(err, EngineError::Config(ConfigError::Schema { schema, .. }) if schema == "search"));
}

#[test]
fn test_unknown_tag_in_code_schema_fails_build() {
    let err = Sieve::builder()
        .schema("odd", ArgumentSchema::new().arg("x", ArgSpec::new("uuid")))
        .build()
        .unwrap_err();
    assert!(matches!(err, EngineError::Schema(_)));
}

#[test]
fn test_builtin_type_handlers_from_config() {
    let mut config = config();
    config.registry.builtin_type_handlers = true;
    let sieve = Sieve::from_config(&config).unwrap();

    assert!(sieve.type_registry().has_coercer(&TypeId::from(BuiltinType::Integer)));

    let err = sieve
        .validate("by_number", args(&[("number", Value::from("nine"))]))
        .unwrap_err();
    assert_eq!(err.to_string(), "argument `number` must be of type Integer");
}

#[test]
fn test_register_schema_after_build() {
    let sieve = Sieve::builder().build().unwrap();
    sieve
        .register_schema("late", ArgumentSchema::new().arg("on", ArgSpec::boolean()))
        .unwrap();

    let normalized = sieve
        .validate("late", args(&[("on", Value::from("true"))]))
        .unwrap();
    assert_eq!(normalized["on"], Value::Bool(true));
}

#[test]
fn test_query_registry_shares_schemas() {
    let sieve = Sieve::from_config(&config()).unwrap();
    let mut queries = sieve.query_registry::<Vec<i64>, i64>();

    queries
        .query_with_args(
            "nth",
            "",
            ArgumentSchema::new().arg("index", ArgSpec::integer()),
            |numbers: &Vec<i64>, args: &Arguments| -> anyhow::Result<i64> {
                let index = usize::try_from(args["index"].as_i64().unwrap_or(0))?;
                numbers
                    .get(index)
                    .copied()
                    .ok_or_else(|| anyhow::anyhow!("index out of range"))
            },
        )
        .unwrap();

    let value = queries
        .call_with(&vec![10, 20, 30], "nth", args(&[("index", Value::from("2"))]))
        .unwrap();
    assert_eq!(value, 30);
    assert!(sieve.validator().schema("nth").is_some());
}

#[test]
fn test_debug_lists_schemas() {
    let sieve = Sieve::from_config(&config()).unwrap();
    let debug = format!("{sieve:?}");
    assert!(debug.contains("by_number"));
    assert!(debug.contains("profile"));
}

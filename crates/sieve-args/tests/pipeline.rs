//! Integration tests for the argument validation pipeline.
//!
//! Exercises declaration checks, default injection, completeness errors,
//! coercion precedence and entity lookups end to end.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use proptest::prelude::*;
use sieve_args::{schema_from_definitions, ArgDefinition, ArgSpec, ArgumentSchema, ArgumentValidator};
use sieve_core::fixtures::{sample_store, user_class};
use sieve_core::{BuiltinType, ErrorKind, SieveError, Value};
use sieve_filters::FilterRegistry;
use sieve_types::{TypeRegistration, TypeRegistry};

fn validator() -> ArgumentValidator {
    ArgumentValidator::new(
        Arc::new(TypeRegistry::new()),
        Arc::new(FilterRegistry::new().with_entity_store(Arc::new(sample_store()))),
    )
}

fn args<const N: usize>(entries: [(&str, Value); N]) -> Value {
    entries.into_iter().collect()
}

#[test]
fn test_scenario_number_and_optional_active() {
    let schema = ArgumentSchema::new()
        .arg("number", ArgSpec::integer())
        .arg("active", ArgSpec::boolean().optional());

    let normalized = validator()
        .validate("by_number", args([("number", Value::from("5"))]), &schema)
        .unwrap();

    assert_eq!(Value::Map(normalized), args([("number", Value::Integer(5)), ("active", Value::Null)]));
}

#[test]
fn test_scenario_default_only() {
    let schema = ArgumentSchema::new().arg("name", ArgSpec::string().default("x"));

    let normalized = validator().validate("named", args([]), &schema).unwrap();

    assert_eq!(Value::Map(normalized), args([("name", Value::from("x"))]));
}

#[test]
fn test_optional_with_default_rejected_at_declaration() {
    let schema = ArgumentSchema::new()
        .arg("page", ArgSpec::integer().optional().default(1))
        .arg("query", ArgSpec::string());

    let err = validator().register_schema("search", schema).unwrap_err();

    match err {
        SieveError::SchemaDefinition { schema, arguments } => {
            assert_eq!(schema, "search");
            assert_eq!(arguments, vec!["page".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_arguments_listed_in_declaration_order() {
    let schema = ArgumentSchema::new()
        .arg("c", ArgSpec::integer())
        .arg("a", ArgSpec::integer())
        .arg("b", ArgSpec::integer().optional())
        .arg("d", ArgSpec::integer().default(4));

    let err = validator().validate("q", args([]), &schema).unwrap_err();

    assert_eq!(err.to_string(), "arguments missing for `q`: c, a");
}

#[test]
fn test_unknown_arguments_listed_in_given_order() {
    let schema = ArgumentSchema::new().arg("a", ArgSpec::integer());

    let err = validator()
        .validate(
            "q",
            args([("zeta", Value::Null), ("a", Value::Integer(1)), ("alpha", Value::Null)]),
            &schema,
        )
        .unwrap_err();

    assert_eq!(err.to_string(), "unknown arguments for `q`: zeta, alpha");
}

#[test]
fn test_textual_integer_without_any_coercer_uses_filter_cast() {
    let schema = ArgumentSchema::new().arg("n", ArgSpec::integer());
    let validator = validator();

    let normalized = validator.validate("q", args([("n", Value::from("1"))]), &schema).unwrap();
    assert_eq!(normalized["n"], Value::Integer(1));

    let err = validator
        .validate("q", args([("n", Value::from("one"))]), &schema)
        .unwrap_err();
    assert_eq!(err.to_string(), "argument `n` must be of type Integer");
}

#[test]
fn test_argument_coerce_takes_precedence_over_registry_coercer() {
    let registry_calls = Arc::new(AtomicUsize::new(0));
    let spy = Arc::clone(&registry_calls);
    let types = Arc::new(TypeRegistry::new());
    types.register(
        BuiltinType::Integer,
        TypeRegistration::new().coercer(move |value| {
            spy.fetch_add(1, Ordering::SeqCst);
            value
        }),
    );
    let validator = ArgumentValidator::new(types, Arc::new(FilterRegistry::new()));

    let own = ArgumentSchema::new().arg(
        "n",
        ArgSpec::integer().coerce(|value| match value {
            Value::Integer(n) => Value::Integer(n * 10),
            other => other,
        }),
    );
    let normalized = validator.validate("q", args([("n", Value::Integer(2))]), &own).unwrap();
    assert_eq!(normalized["n"], Value::Integer(20));
    assert_eq!(registry_calls.load(Ordering::SeqCst), 0);

    let plain = ArgumentSchema::new().arg("n", ArgSpec::integer());
    validator.validate("q", args([("n", Value::Integer(2))]), &plain).unwrap();
    assert_eq!(registry_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_argument_coerce_replaces_filter() {
    let validator = validator();
    let schema = ArgumentSchema::new().arg(
        "code",
        ArgSpec::string().coerce(|value| match value.as_str() {
            Some("five") => Value::Integer(5),
            _ => Value::Null,
        }),
    );

    let normalized = validator
        .validate("q", args([("code", Value::from("five"))]), &schema)
        .unwrap();
    assert_eq!(normalized["code"], Value::Integer(5));
}

#[test]
fn test_builtin_handlers_take_registry_branch() {
    let validator = ArgumentValidator::new(
        Arc::new(TypeRegistry::with_builtin_handlers()),
        Arc::new(FilterRegistry::new()),
    );
    let schema = ArgumentSchema::new()
        .arg("n", ArgSpec::integer())
        .arg("flag", ArgSpec::boolean());

    let normalized = validator
        .validate("q", args([("n", Value::from(" 7 ")), ("flag", Value::from("1"))]), &schema)
        .unwrap();
    assert_eq!(normalized["n"], Value::Integer(7));
    assert_eq!(normalized["flag"], Value::Bool(true));

    let err = validator
        .validate("q", args([("n", Value::Float(1.5)), ("flag", Value::Bool(true))]), &schema)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgumentType);
}

#[test]
fn test_record_argument_looks_up_entity() {
    let schema = ArgumentSchema::new().arg("owner", ArgSpec::record(user_class()));
    let validator = validator();

    let normalized = validator
        .validate("q", args([("owner", Value::from("42"))]), &schema)
        .unwrap();
    let owner = normalized["owner"].as_entity().unwrap();
    assert_eq!(owner.get("name"), Some(&Value::from("Ada")));

    let err = validator
        .validate("q", args([("owner", Value::Integer(999_999))]), &schema)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EntityNotFound);
    assert_eq!(
        err.to_string(),
        "argument `owner`: User record not found with id: 999999"
    );
}

#[test]
fn test_entity_type_identifier_falls_back_to_record_filter() {
    let schema = ArgumentSchema::new().arg("owner", ArgSpec::new(user_class()));

    let normalized = validator()
        .validate("q", args([("owner", Value::Integer(7))]), &schema)
        .unwrap();

    assert_eq!(normalized["owner"].as_entity().unwrap().id().to_string(), "7");
}

#[test]
fn test_schema_loaded_from_toml() {
    let raw = r#"
        [number]
        type = "integer"

        [tags]
        type = "array"
        element_type = "symbol"
        optional = true

        [owner]
        type = { class = "User" }
        default = 42
    "#;
    let definitions: IndexMap<String, ArgDefinition> = toml::from_str(raw).unwrap();
    let schema = schema_from_definitions(&definitions).unwrap();
    let validator = validator();
    validator.register_schema("configured", schema).unwrap();

    let normalized = validator
        .validate_registered(
            "configured",
            args([
                ("number", Value::from("3")),
                ("tags", Value::Array(vec![Value::from("a")])),
            ]),
        )
        .unwrap();

    assert_eq!(normalized["number"], Value::Integer(3));
    assert_eq!(normalized["tags"], Value::Array(vec![Value::symbol("a")]));
    assert_eq!(normalized["owner"].as_entity().unwrap().id().to_string(), "42");
}

fn arg_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{1,8}", 1..6).prop_map(|names| names.into_iter().collect())
}

proptest! {
    #[test]
    fn test_missing_names_are_exactly_the_absent_required(
        names in arg_names(),
        supplied in prop::collection::vec(any::<bool>(), 6),
    ) {
        let schema: ArgumentSchema = names
            .iter()
            .map(|name| (name.clone(), ArgSpec::integer()))
            .collect();
        let given: Value = names
            .iter()
            .zip(&supplied)
            .filter(|(_, keep)| **keep)
            .map(|(name, _)| (name.clone(), Value::Integer(1)))
            .collect();
        let expected: Vec<String> = names
            .iter()
            .zip(&supplied)
            .filter(|(_, keep)| !**keep)
            .map(|(name, _)| name.clone())
            .collect();

        let result = validator().validate("q", given, &schema);
        if expected.is_empty() {
            prop_assert!(result.is_ok());
        } else {
            match result {
                Err(SieveError::MissingArguments { names, .. }) => prop_assert_eq!(names, expected),
                other => prop_assert!(false, "unexpected result: {:?}", other),
            }
        }
    }

    #[test]
    fn test_unknown_names_are_exactly_the_extras(
        names in arg_names(),
        extras in prop::collection::btree_set("[A-Z]{1,8}", 1..4),
    ) {
        let schema: ArgumentSchema = names
            .iter()
            .map(|name| (name.clone(), ArgSpec::string().optional()))
            .collect();
        let given: Value = extras
            .iter()
            .map(|name| (name.clone(), Value::Null))
            .collect();

        match validator().validate("q", given, &schema) {
            Err(SieveError::UnknownArguments { names, .. }) => {
                prop_assert_eq!(names, extras.into_iter().collect::<Vec<_>>());
            }
            other => prop_assert!(false, "unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_result_keys_match_schema(names in arg_names()) {
        let schema: ArgumentSchema = names
            .iter()
            .map(|name| (name.clone(), ArgSpec::string().optional()))
            .collect();

        let normalized = validator().validate("q", args([]), &schema).unwrap();
        prop_assert_eq!(normalized.keys().cloned().collect::<Vec<_>>(), names);
    }
}

//! Integration tests for the entity model and the in-memory store.
//!
//! These tests exercise the public surface the filter crate relies on:
//! class resolution by name, identifier lookup across textual and numeric
//! keys, subtype acceptance, and the structural instance check.

use std::sync::Arc;

use sieve_core::fixtures::{admin_class, post_class, sample_store, user_class, InMemoryEntityStore};
use sieve_core::{Entity, EntityId, EntityStore, TypeId, TypeSpec, Value};

#[test]
fn test_store_as_trait_object() {
    let store: Arc<dyn EntityStore> = Arc::new(sample_store());
    let class = store.resolve_class("User").unwrap();

    let by_int = store.find_by_id(&class, &EntityId::Int(42)).unwrap();
    let by_str = store.find_by_id(&class, &EntityId::from("42")).unwrap();

    assert_eq!(by_int, by_str);
    assert_eq!(by_int.unwrap().get("name"), Some(&Value::from("Ada")));
}

#[test]
fn test_missing_identifier_is_none() {
    let store = sample_store();
    let found = store
        .find_by_id(&user_class(), &EntityId::Int(999_999))
        .unwrap();
    assert!(found.is_none());
}

#[test]
fn test_entity_value_instance_checks() {
    let admin = Value::Entity(Entity::new(admin_class(), 7));

    assert!(TypeId::from(user_class()).is_instance(&admin));
    assert!(TypeId::from(admin_class()).is_instance(&admin));
    assert!(!TypeId::from(post_class()).is_instance(&admin));
}

#[test]
fn test_inserted_entities_define_their_classes() {
    let store = InMemoryEntityStore::new();
    assert!(store.is_empty());

    store.insert(Entity::new(admin_class(), "root"));

    assert_eq!(store.len(), 1);
    assert!(store.resolve_class("Admin").is_some());
    assert!(store.resolve_class("User").is_some());
    assert!(store
        .find_by_id(&user_class(), &EntityId::from("root"))
        .unwrap()
        .is_some());
}

#[test]
fn test_entity_type_spec_from_config_shape() {
    let spec = TypeSpec::from_json(&serde_json::json!({"class": "User"})).unwrap();
    let id = spec.type_id().unwrap();

    assert_eq!(id.entity_class(), Some(&user_class()));
    assert_eq!(spec.to_string(), "User");
}

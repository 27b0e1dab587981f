//! Test fixtures for Sieve development and testing.
//!
//! This module provides an in-memory [`EntityStore`] and a few pre-built
//! entity classes that can be used in tests across the Sieve crates.
//!
//! # Example
//!
//! ```
//! use sieve_core::fixtures;
//! use sieve_core::{EntityId, EntityStore};
//!
//! let store = fixtures::sample_store();
//! let user = fixtures::user_class();
//!
//! assert!(store.find_by_id(&user, &EntityId::Int(42)).unwrap().is_some());
//! assert!(store.find_by_id(&user, &EntityId::Int(999_999)).unwrap().is_none());
//! ```

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::entity::{Entity, EntityClass, EntityId, EntityStore};

/// An [`EntityStore`] backed by in-memory collections.
///
/// Class names resolve to the classes registered with
/// [`define_class`](Self::define_class) or implicitly by
/// [`insert`](Self::insert). Lookups by class also return entities of
/// subclasses.
#[derive(Default)]
pub struct InMemoryEntityStore {
    classes: RwLock<IndexMap<String, EntityClass>>,
    records: RwLock<Vec<Entity>>,
}

impl InMemoryEntityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `class` resolvable by name, along with its ancestors.
    pub fn define_class(&self, class: &EntityClass) {
        let mut classes = self.classes.write();
        let mut current = Some(class);
        while let Some(class) = current {
            classes
                .entry(class.name().to_string())
                .or_insert_with(|| class.clone());
            current = class.parent();
        }
    }

    /// Stores an entity and defines its class.
    pub fn insert(&self, entity: Entity) {
        self.define_class(entity.class());
        self.records.write().push(entity);
    }

    /// Returns a store with `entity` inserted.
    #[must_use]
    pub fn with_entity(self, entity: Entity) -> Self {
        self.insert(entity);
        self
    }

    /// Returns the number of stored entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns `true` if no entities are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl EntityStore for InMemoryEntityStore {
    fn resolve_class(&self, name: &str) -> Option<EntityClass> {
        self.classes.read().get(name).cloned()
    }

    fn find_by_id(&self, class: &EntityClass, id: &EntityId) -> anyhow::Result<Option<Entity>> {
        Ok(self
            .records
            .read()
            .iter()
            .find(|entity| entity.is_a(class) && entity.id().matches(id))
            .cloned())
    }
}

/// The `User` entity class.
#[must_use]
pub fn user_class() -> EntityClass {
    EntityClass::new("User")
}

/// The `Admin` entity class, a subclass of `User`.
#[must_use]
pub fn admin_class() -> EntityClass {
    EntityClass::new("Admin").with_parent(user_class())
}

/// The `Post` entity class, unrelated to `User`.
#[must_use]
pub fn post_class() -> EntityClass {
    EntityClass::new("Post")
}

/// Creates a store holding user 42, admin 7 and post 1.
///
/// # Example
///
/// ```
/// use sieve_core::fixtures::sample_store;
///
/// assert_eq!(sample_store().len(), 3);
/// ```
#[must_use]
pub fn sample_store() -> InMemoryEntityStore {
    InMemoryEntityStore::new()
        .with_entity(Entity::new(user_class(), 42).with_attribute("name", "Ada"))
        .with_entity(Entity::new(admin_class(), 7).with_attribute("name", "Grace"))
        .with_entity(Entity::new(post_class(), 1).with_attribute("title", "Hello"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_class_includes_ancestors() {
        let store = InMemoryEntityStore::new();
        store.define_class(&admin_class());

        assert_eq!(store.resolve_class("Admin"), Some(admin_class()));
        assert_eq!(store.resolve_class("User"), Some(user_class()));
        assert_eq!(store.resolve_class("Post"), None);
    }

    #[test]
    fn test_find_by_textual_id() {
        let store = sample_store();
        let found = store
            .find_by_id(&user_class(), &EntityId::from("42"))
            .unwrap()
            .unwrap();
        assert_eq!(found.get("name"), Some(&crate::Value::from("Ada")));
    }

    #[test]
    fn test_find_includes_subclasses() {
        let store = sample_store();
        assert!(store
            .find_by_id(&user_class(), &EntityId::Int(7))
            .unwrap()
            .is_some());
        assert!(store
            .find_by_id(&admin_class(), &EntityId::Int(42))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_find_respects_class() {
        let store = sample_store();
        assert!(store
            .find_by_id(&user_class(), &EntityId::Int(1))
            .unwrap()
            .is_none());
    }
}

//! Entity reference filter.
//!
//! Accepts an entity of the declared class (or a subclass) as-is, and turns
//! an integer or string identifier into the entity by looking it up in the
//! [`EntityStore`]. The class is resolved when a value is processed, so an
//! unresolvable class name only fails calls that actually supply a value.

use std::fmt;
use std::sync::Arc;

use sieve_core::{
    EntityClass, EntityClassRef, EntityId, EntityStore, SieveError, SieveResult, Value,
};
use tracing::trace;

use crate::filter::{Filter, FilterBase};

/// Resolves entity references by class and identifier.
#[derive(Clone)]
pub struct RecordFilter {
    base: FilterBase,
    class: Option<EntityClassRef>,
    store: Option<Arc<dyn EntityStore>>,
}

impl RecordFilter {
    /// Creates the filter.
    ///
    /// The class comes from the `class` option, else from an entity type
    /// identifier declared as the type.
    pub fn new(base: FilterBase, store: Option<Arc<dyn EntityStore>>) -> Self {
        let options = base.options();
        let class = options.class.clone().or_else(|| {
            options
                .type_spec
                .type_id()
                .and_then(|id| id.entity_class().cloned())
                .map(EntityClassRef::Class)
        });
        Self { base, class, store }
    }

    /// Returns the declared class reference.
    #[must_use]
    pub fn class_ref(&self) -> Option<&EntityClassRef> {
        self.class.as_ref()
    }

    /// Resolves the declared class.
    ///
    /// With a store attached, class handles are resolved by name as well, so
    /// a class the store does not know fails the same way as an unknown name
    /// and the store's parent chain is used.
    pub fn record_class(&self) -> SieveResult<EntityClass> {
        match (&self.class, &self.store) {
            (Some(class), Some(store)) => store
                .resolve_class(class.name())
                .ok_or_else(|| SieveError::unresolvable_class(self.name(), class.name())),
            (Some(EntityClassRef::Class(class)), None) => Ok(class.clone()),
            (Some(EntityClassRef::Name(name)), None) => Err(SieveError::EntityStoreUnavailable {
                argument: self.name().to_string(),
                class: name.clone(),
            }),
            (None, _) => Err(SieveError::unresolvable_class(
                self.name(),
                self.options().type_spec.to_string(),
            )),
        }
    }

    fn find(&self, class: &EntityClass, id: &EntityId) -> SieveResult<Value> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| SieveError::EntityStoreUnavailable {
                argument: self.name().to_string(),
                class: class.name().to_string(),
            })?;

        trace!(argument = self.name(), class = class.name(), id = %id, "looking up entity");

        match store.find_by_id(class, id) {
            Ok(Some(entity)) => Ok(Value::Entity(entity)),
            Ok(None) => Err(SieveError::entity_not_found(
                self.name(),
                class.name(),
                id.to_string(),
            )),
            Err(source) => Err(SieveError::EntityStore {
                argument: self.name().to_string(),
                source,
            }),
        }
    }
}

impl fmt::Debug for RecordFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordFilter")
            .field("base", &self.base)
            .field("class", &self.class)
            .field("store", &self.store.is_some())
            .finish()
    }
}

impl Filter for RecordFilter {
    fn base(&self) -> &FilterBase {
        &self.base
    }

    fn type_name(&self) -> String {
        self.class
            .as_ref()
            .map_or_else(|| "Record".to_string(), ToString::to_string)
    }

    fn accepts(&self, value: &Value) -> bool {
        match (value, self.record_class()) {
            (Value::Entity(entity), Ok(class)) => entity.is_a(&class),
            _ => false,
        }
    }

    fn cast(&self, value: Value) -> SieveResult<Value> {
        let class = self.record_class()?;
        match EntityId::from_value(&value) {
            Some(id) => self.find(&class, &id),
            None => Err(SieveError::invalid_type(self.name(), class.name())),
        }
    }

    fn process(&self, value: Value) -> SieveResult<Value> {
        if value.is_null() {
            return Ok(value);
        }
        let class = self.record_class()?;
        match &value {
            Value::Entity(entity) if entity.is_a(&class) => Ok(value),
            _ => match EntityId::from_value(&value) {
                Some(id) => self.find(&class, &id),
                None => Err(SieveError::invalid_type(self.name(), class.name())),
            },
        }
    }
}

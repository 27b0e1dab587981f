//! Type registry.
//!
//! The registry maps a [`TypeId`] to up to three forms: an explicit
//! validator, an explicit coercer and a [`TypeHandler`]. Lookups prefer the
//! explicit forms over the handler, and fall back to the structural
//! [`TypeId::is_instance`] check (for validation) or the identity (for
//! coercion) when nothing is registered.
//!
//! # Thread Safety
//!
//! The table sits behind a read-write lock, so a registry shared through an
//! `Arc` can be registered into and queried from several threads. Callbacks
//! are invoked after the lock is released. Ordering between registration and
//! concurrent validation is up to the embedding application; register at
//! start-up if you need every call to observe the same table.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use sieve_core::{BuiltinType, TypeId, Value};
use tracing::{debug, warn};

use crate::handlers::{BooleanType, FloatType, IntegerType, StringType, TypeHandler};

/// Validation callback.
pub type Validator = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Coercion callback.
pub type Coercer = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// The forms to register for one type identifier.
///
/// Forms left unset are not touched by [`TypeRegistry::register`].
#[derive(Clone, Default)]
pub struct TypeRegistration {
    validator: Option<Validator>,
    coercer: Option<Coercer>,
    handler: Option<Arc<dyn TypeHandler>>,
}

impl TypeRegistration {
    /// Creates an empty registration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the validator.
    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Sets the coercer.
    pub fn coercer<F>(mut self, coercer: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.coercer = Some(Arc::new(coercer));
        self
    }

    /// Sets the type handler.
    pub fn handler<H: TypeHandler + 'static>(self, handler: H) -> Self {
        self.shared_handler(Arc::new(handler))
    }

    /// Sets an already shared type handler.
    pub fn shared_handler(mut self, handler: Arc<dyn TypeHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    fn is_empty(&self) -> bool {
        self.validator.is_none() && self.coercer.is_none() && self.handler.is_none()
    }
}

impl fmt::Debug for TypeRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistration")
            .field("validator", &self.validator.is_some())
            .field("coercer", &self.coercer.is_some())
            .field("handler", &self.handler.as_ref().map(|h| h.name().to_string()))
            .finish()
    }
}

/// Registry of validation and coercion behaviour keyed by type identifier.
#[derive(Default)]
pub struct TypeRegistry {
    entries: RwLock<HashMap<TypeId, TypeRegistration>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in string, integer, float and
    /// boolean handlers registered.
    ///
    /// # Example
    ///
    /// ```
    /// use sieve_core::{BuiltinType, TypeId, Value};
    /// use sieve_types::TypeRegistry;
    ///
    /// let registry = TypeRegistry::with_builtin_handlers();
    /// let boolean = TypeId::from(BuiltinType::Boolean);
    ///
    /// assert!(registry.has_coercer(&boolean));
    /// assert_eq!(registry.coerce(&boolean, Value::from("1")), Value::Bool(true));
    /// ```
    #[must_use]
    pub fn with_builtin_handlers() -> Self {
        let registry = Self::new();
        registry.register_builtin_handlers();
        registry
    }

    /// Registers the built-in handlers into this registry.
    pub fn register_builtin_handlers(&self) {
        self.register(BuiltinType::String, TypeRegistration::new().handler(StringType));
        self.register(BuiltinType::Integer, TypeRegistration::new().handler(IntegerType));
        self.register(BuiltinType::Float, TypeRegistration::new().handler(FloatType));
        self.register(BuiltinType::Boolean, TypeRegistration::new().handler(BooleanType));
    }

    /// Registers forms for `type_id`.
    ///
    /// Supplied forms replace any previously registered form of the same
    /// kind; forms not supplied are kept.
    pub fn register(&self, type_id: impl Into<TypeId>, registration: TypeRegistration) {
        let type_id = type_id.into();
        if registration.is_empty() {
            debug!(type_id = %type_id, "ignoring empty type registration");
            return;
        }

        let mut entries = self.entries.write();
        let entry = entries.entry(type_id.clone()).or_default();

        if entry.validator.is_some() && registration.validator.is_some() {
            warn!(type_id = %type_id, "replacing registered validator");
        }
        if entry.coercer.is_some() && registration.coercer.is_some() {
            warn!(type_id = %type_id, "replacing registered coercer");
        }
        if entry.handler.is_some() && registration.handler.is_some() {
            warn!(type_id = %type_id, "replacing registered type handler");
        }

        debug!(
            type_id = %type_id,
            validator = registration.validator.is_some(),
            coercer = registration.coercer.is_some(),
            handler = registration.handler.is_some(),
            "registered type"
        );

        if let Some(validator) = registration.validator {
            entry.validator = Some(validator);
        }
        if let Some(coercer) = registration.coercer {
            entry.coercer = Some(coercer);
        }
        if let Some(handler) = registration.handler {
            entry.handler = Some(handler);
        }
    }

    /// Removes every form registered for `type_id`.
    ///
    /// Returns `true` if anything was registered.
    pub fn unregister(&self, type_id: &TypeId) -> bool {
        let removed = self.entries.write().remove(type_id).is_some();
        if removed {
            debug!(type_id = %type_id, "unregistered type");
        }
        removed
    }

    /// Checks `value` against `type_id`.
    ///
    /// Uses the registered validator, else the handler's `valid`, else the
    /// structural instance check.
    #[must_use]
    pub fn valid(&self, type_id: &TypeId, value: &Value) -> bool {
        match self.lookup(type_id) {
            Some(TypeRegistration {
                validator: Some(validator),
                ..
            }) => validator(value),
            Some(TypeRegistration {
                handler: Some(handler),
                ..
            }) => handler.valid(value),
            _ => type_id.is_instance(value),
        }
    }

    /// Coerces `value` for `type_id`.
    ///
    /// Uses the registered coercer, else the handler's `coerce`, else
    /// returns the value unchanged.
    #[must_use]
    pub fn coerce(&self, type_id: &TypeId, value: Value) -> Value {
        match self.lookup(type_id) {
            Some(TypeRegistration {
                coercer: Some(coercer),
                ..
            }) => coercer(value),
            Some(TypeRegistration {
                handler: Some(handler),
                ..
            }) => handler.coerce(value),
            _ => value,
        }
    }

    /// Returns `true` if a coercer or a handler is registered for `type_id`.
    #[must_use]
    pub fn has_coercer(&self, type_id: &TypeId) -> bool {
        self.entries
            .read()
            .get(type_id)
            .is_some_and(|entry| entry.coercer.is_some() || entry.handler.is_some())
    }

    /// Returns `true` if any form is registered for `type_id`.
    #[must_use]
    pub fn is_registered(&self, type_id: &TypeId) -> bool {
        self.entries.read().contains_key(type_id)
    }

    /// Returns the number of registered type identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    // Clones the entry so callbacks run without holding the lock.
    fn lookup(&self, type_id: &TypeId) -> Option<TypeRegistration> {
        self.entries.read().get(type_id).cloned()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("type_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sieve_core::{Entity, EntityClass};

    fn integer() -> TypeId {
        TypeId::from(BuiltinType::Integer)
    }

    #[test]
    fn test_default_validation_is_structural() {
        let registry = TypeRegistry::new();
        let string = TypeId::from(BuiltinType::String);

        assert!(registry.valid(&string, &Value::from("hello")));
        assert!(!registry.valid(&string, &Value::Integer(42)));
        assert!(registry.valid(&integer(), &Value::Integer(42)));
    }

    #[test]
    fn test_default_validation_accepts_subclasses() {
        let registry = TypeRegistry::new();
        let user = EntityClass::new("User");
        let admin = EntityClass::new("Admin").with_parent(user.clone());

        assert!(registry.valid(&TypeId::from(user), &Value::Entity(Entity::new(admin, 1))));
    }

    #[test]
    fn test_boolean_structural_check_rejects_null() {
        let registry = TypeRegistry::new();
        let boolean = TypeId::from(BuiltinType::Boolean);

        assert!(registry.valid(&boolean, &Value::Bool(true)));
        assert!(!registry.valid(&boolean, &Value::from("true")));
        assert!(!registry.valid(&boolean, &Value::Null));
    }

    #[test]
    fn test_custom_validator() {
        let registry = TypeRegistry::new();
        let custom = TypeId::from(EntityClass::new("Custom"));
        registry.register(
            custom.clone(),
            TypeRegistration::new().validator(|v| matches!(v, Value::Symbol(_))),
        );

        assert!(registry.valid(&custom, &Value::symbol("foo")));
        assert!(!registry.valid(&custom, &Value::from("foo")));
    }

    #[test]
    fn test_coerce_without_coercer_is_identity() {
        let registry = TypeRegistry::new();
        let string = TypeId::from(BuiltinType::String);

        assert_eq!(registry.coerce(&string, Value::Integer(42)), Value::Integer(42));
        assert!(!registry.has_coercer(&string));
    }

    #[test]
    fn test_register_is_additive() {
        let registry = TypeRegistry::new();
        registry.register(integer(), TypeRegistration::new().validator(|_| false));
        registry.register(integer(), TypeRegistration::new().coercer(|_| Value::Integer(0)));

        assert!(!registry.valid(&integer(), &Value::Integer(1)));
        assert_eq!(registry.coerce(&integer(), Value::from("x")), Value::Integer(0));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_explicit_forms_win_over_handler() {
        let registry = TypeRegistry::with_builtin_handlers();
        registry.register(
            integer(),
            TypeRegistration::new().coercer(|_| Value::Integer(-1)),
        );

        assert_eq!(registry.coerce(&integer(), Value::from("5")), Value::Integer(-1));
        assert!(registry.valid(&integer(), &Value::Integer(5)));
        assert!(!registry.valid(&integer(), &Value::from("5")));
    }

    #[test]
    fn test_handler_counts_as_coercer() {
        let registry = TypeRegistry::new();
        registry.register(BuiltinType::Float, TypeRegistration::new().handler(FloatType));

        assert!(registry.has_coercer(&TypeId::from(BuiltinType::Float)));
    }

    #[test]
    fn test_unregister_restores_fallback() {
        let registry = TypeRegistry::new();
        registry.register(integer(), TypeRegistration::new().validator(|_| false));
        assert!(registry.unregister(&integer()));
        assert!(!registry.unregister(&integer()));

        assert!(registry.valid(&integer(), &Value::Integer(1)));
        assert!(!registry.is_registered(&integer()));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_empty_registration_is_ignored() {
        let registry = TypeRegistry::new();
        registry.register(integer(), TypeRegistration::new());
        assert!(!registry.is_registered(&integer()));
    }

    #[test]
    fn test_callbacks_may_reenter_registry() {
        let registry = Arc::new(TypeRegistry::new());
        let inner = Arc::downgrade(&registry);
        registry.register(
            integer(),
            TypeRegistration::new().validator(move |v| {
                inner
                    .upgrade()
                    .is_some_and(|r| r.is_registered(&TypeId::from(BuiltinType::Integer)))
                    && v.as_i64().is_some()
            }),
        );

        assert!(registry.valid(&integer(), &Value::Integer(3)));
    }
}

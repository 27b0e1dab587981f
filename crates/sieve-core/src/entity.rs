//! Entity references and the persistence lookup contract.
//!
//! Sieve never talks to storage itself. An argument typed as an entity class
//! accepts either an [`Entity`] or a primary-key identifier, and identifiers
//! are resolved through an [`EntityStore`] supplied by the embedding
//! application.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::value::{Arguments, Value};

/// A named entity class, optionally descending from a parent class.
///
/// Classes compare by name. The parent chain models subtype acceptance: an
/// entity of class `Admin` whose parent is `User` is an instance of `User`.
///
/// # Example
///
/// ```
/// use sieve_core::EntityClass;
///
/// let user = EntityClass::new("User");
/// let admin = EntityClass::new("Admin").with_parent(user.clone());
///
/// assert!(admin.is_a(&user));
/// assert!(!user.is_a(&admin));
/// ```
#[derive(Clone)]
pub struct EntityClass {
    inner: Arc<ClassInner>,
}

struct ClassInner {
    name: String,
    parent: Option<EntityClass>,
}

impl EntityClass {
    /// Creates a root entity class.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ClassInner {
                name: name.into(),
                parent: None,
            }),
        }
    }

    /// Returns a copy of this class descending from `parent`.
    #[must_use]
    pub fn with_parent(self, parent: EntityClass) -> Self {
        Self {
            inner: Arc::new(ClassInner {
                name: self.inner.name.clone(),
                parent: Some(parent),
            }),
        }
    }

    /// Returns the class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the parent class, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&EntityClass> {
        self.inner.parent.as_ref()
    }

    /// Returns `true` if this class is `other` or descends from it.
    #[must_use]
    pub fn is_a(&self, other: &EntityClass) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class == other {
                return true;
            }
            current = class.parent();
        }
        false
    }
}

impl PartialEq for EntityClass {
    fn eq(&self, other: &Self) -> bool {
        self.inner.name == other.inner.name
    }
}

impl Eq for EntityClass {}

impl Hash for EntityClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.name.hash(state);
    }
}

impl fmt::Debug for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityClass").field(&self.inner.name).finish()
    }
}

impl fmt::Display for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}

/// Reference to an entity class as written in a schema.
///
/// Either the class itself or its name, which is resolved through
/// [`EntityStore::resolve_class`] when the argument is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityClassRef {
    /// A concrete class handle.
    Class(EntityClass),
    /// A class name awaiting resolution.
    Name(String),
}

impl EntityClassRef {
    /// Returns the referenced class name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Class(class) => class.name(),
            Self::Name(name) => name,
        }
    }
}

impl fmt::Display for EntityClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<EntityClass> for EntityClassRef {
    fn from(class: EntityClass) -> Self {
        Self::Class(class)
    }
}

impl From<&str> for EntityClassRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for EntityClassRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// Primary-key identifier of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityId {
    /// Numeric key.
    Int(i64),
    /// Textual key.
    Str(String),
}

impl EntityId {
    /// Extracts an identifier from an integer or string value.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(Self::Int(*i)),
            Value::String(s) => Some(Self::Str(s.clone())),
            _ => None,
        }
    }

    /// Compares identifiers the way a relational primary key does: a textual
    /// identifier matches a numeric one when it parses to the same integer.
    #[must_use]
    pub fn matches(&self, other: &EntityId) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Int(n), Self::Str(s)) | (Self::Str(s), Self::Int(n)) => {
                s.trim().parse::<i64>().is_ok_and(|parsed| parsed == *n)
            }
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

/// A persisted entity as returned by an [`EntityStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    class: EntityClass,
    id: EntityId,
    attributes: Arguments,
}

impl Entity {
    /// Creates an entity with no attributes.
    pub fn new(class: EntityClass, id: impl Into<EntityId>) -> Self {
        Self {
            class,
            id: id.into(),
            attributes: Arguments::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Returns the entity class.
    #[must_use]
    pub fn class(&self) -> &EntityClass {
        &self.class
    }

    /// Returns the primary-key identifier.
    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Returns all attributes.
    #[must_use]
    pub fn attributes(&self) -> &Arguments {
        &self.attributes
    }

    /// Returns a single attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Returns `true` if this entity is an instance of `class` or a subclass.
    #[must_use]
    pub fn is_a(&self, class: &EntityClass) -> bool {
        self.class.is_a(class)
    }
}

/// Lookup capability supplied by the persistence layer.
///
/// Implementations are called synchronously from argument validation; a
/// blocked store blocks the validating caller.
///
/// # Example
///
/// ```
/// use sieve_core::{Entity, EntityClass, EntityId, EntityStore};
///
/// struct SingleUser;
///
/// impl EntityStore for SingleUser {
///     fn resolve_class(&self, name: &str) -> Option<EntityClass> {
///         (name == "User").then(|| EntityClass::new("User"))
///     }
///
///     fn find_by_id(&self, class: &EntityClass, id: &EntityId) -> anyhow::Result<Option<Entity>> {
///         let found = class.name() == "User" && id.matches(&EntityId::Int(1));
///         Ok(found.then(|| Entity::new(class.clone(), 1)))
///     }
/// }
///
/// let store = SingleUser;
/// let user = store.resolve_class("User").unwrap();
/// assert!(store.find_by_id(&user, &EntityId::from("1")).unwrap().is_some());
/// ```
pub trait EntityStore: Send + Sync {
    /// Resolves a class name to a class handle.
    fn resolve_class(&self, name: &str) -> Option<EntityClass>;

    /// Finds an entity of `class` (or a subclass) by primary key.
    ///
    /// Returns `Ok(None)` when no entity matches.
    fn find_by_id(&self, class: &EntityClass, id: &EntityId) -> anyhow::Result<Option<Entity>>;
}

//! Type identifiers and declared argument types.
//!
//! A [`TypeId`] is the key used to look up validation and coercion behaviour
//! for a logical type. A [`TypeSpec`] is what a schema declares as an
//! argument's type: either a symbolic tag (`"integer"`) or a type identifier
//! (`BuiltinType::Integer`, an entity class).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityClass;
use crate::error::{SieveError, SieveResult};
use crate::value::Value;

/// The built-in scalar and container types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point
    Float,
    /// Arbitrary-precision decimal
    Decimal,
    /// Boolean
    Boolean,
    /// Atom
    Symbol,
    /// Calendar date
    Date,
    /// Date and time
    DateTime,
    /// Sequence
    Array,
    /// String-keyed mapping
    Hash,
}

impl BuiltinType {
    /// Every builtin type, in registration order.
    pub const ALL: [BuiltinType; 10] = [
        Self::String,
        Self::Integer,
        Self::Float,
        Self::Decimal,
        Self::Boolean,
        Self::Symbol,
        Self::Date,
        Self::DateTime,
        Self::Array,
        Self::Hash,
    ];

    /// Returns the symbolic tag for this type.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Symbol => "symbol",
            Self::Date => "date",
            Self::DateTime => "date_time",
            Self::Array => "array",
            Self::Hash => "hash",
        }
    }

    /// Returns the type name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Decimal => "Decimal",
            Self::Boolean => "Boolean",
            Self::Symbol => "Symbol",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
            Self::Array => "Array",
            Self::Hash => "Hash",
        }
    }

    /// Looks up a builtin type by its symbolic tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    /// Structural membership check.
    ///
    /// A date-time is also a date, and a date-time type accepts offset
    /// timestamps.
    #[must_use]
    pub const fn is_instance(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::String, Value::String(_))
                | (Self::Integer, Value::Integer(_))
                | (Self::Float, Value::Float(_))
                | (Self::Decimal, Value::Decimal(_))
                | (Self::Boolean, Value::Bool(_))
                | (Self::Symbol, Value::Symbol(_))
                | (Self::Date, Value::Date(_) | Value::DateTime(_))
                | (Self::DateTime, Value::DateTime(_) | Value::Timestamp(_))
                | (Self::Array, Value::Array(_))
                | (Self::Hash, Value::Map(_))
        )
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifier of a logical type.
///
/// Identifiers compare by equality; the only subtype relation is the
/// structural one in [`TypeId::is_instance`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeId {
    /// A builtin scalar or container type.
    Builtin(BuiltinType),
    /// A persisted entity class.
    Entity(EntityClass),
}

impl TypeId {
    /// Returns the type name used in error messages.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Builtin(builtin) => builtin.name(),
            Self::Entity(class) => class.name(),
        }
    }

    /// Returns the entity class if this identifies one.
    #[must_use]
    pub fn entity_class(&self) -> Option<&EntityClass> {
        match self {
            Self::Entity(class) => Some(class),
            Self::Builtin(_) => None,
        }
    }

    /// Structural "is instance of" check, including subtype acceptance.
    ///
    /// # Example
    ///
    /// ```
    /// use sieve_core::{BuiltinType, Entity, EntityClass, TypeId, Value};
    ///
    /// let user = EntityClass::new("User");
    /// let admin = EntityClass::new("Admin").with_parent(user.clone());
    ///
    /// assert!(TypeId::from(BuiltinType::String).is_instance(&Value::from("hi")));
    /// assert!(TypeId::from(user).is_instance(&Value::Entity(Entity::new(admin, 1))));
    /// ```
    #[must_use]
    pub fn is_instance(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Builtin(builtin), _) => builtin.is_instance(value),
            (Self::Entity(class), Value::Entity(entity)) => entity.is_a(class),
            (Self::Entity(_), _) => false,
        }
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<BuiltinType> for TypeId {
    fn from(builtin: BuiltinType) -> Self {
        Self::Builtin(builtin)
    }
}

impl From<EntityClass> for TypeId {
    fn from(class: EntityClass) -> Self {
        Self::Entity(class)
    }
}

/// The declared type of an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec {
    /// A symbolic filter tag such as `"integer"` or `"record"`.
    Tag(String),
    /// A type identifier.
    Id(TypeId),
}

impl TypeSpec {
    /// Creates a tag-based type.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    /// Converts a raw declared type, as found in configuration files.
    ///
    /// Strings are symbolic tags and `{ "class": "Name" }` objects are entity
    /// type identifiers. Anything else is rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    /// use sieve_core::{TypeSpec, TypeId, EntityClass};
    ///
    /// assert_eq!(TypeSpec::from_json(&json!("integer")).unwrap(), TypeSpec::tag("integer"));
    /// assert_eq!(
    ///     TypeSpec::from_json(&json!({"class": "User"})).unwrap(),
    ///     TypeSpec::Id(TypeId::Entity(EntityClass::new("User")))
    /// );
    /// assert!(TypeSpec::from_json(&json!(42)).is_err());
    /// ```
    pub fn from_json(raw: &serde_json::Value) -> SieveResult<Self> {
        match raw {
            serde_json::Value::String(tag) => Ok(Self::Tag(tag.clone())),
            serde_json::Value::Object(fields) => match fields.get("class") {
                Some(serde_json::Value::String(name)) if fields.len() == 1 => {
                    Ok(Self::Id(TypeId::Entity(EntityClass::new(name.clone()))))
                }
                _ => Err(SieveError::invalid_filter_type(raw.to_string())),
            },
            _ => Err(SieveError::invalid_filter_type(raw.to_string())),
        }
    }

    /// Renders the declaration in the shape [`from_json`](Self::from_json)
    /// reads.
    ///
    /// Builtin identifiers render as their tag.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Tag(tag) => serde_json::Value::String(tag.clone()),
            Self::Id(TypeId::Builtin(builtin)) => {
                serde_json::Value::String(builtin.tag().to_string())
            }
            Self::Id(TypeId::Entity(class)) => serde_json::json!({ "class": class.name() }),
        }
    }

    /// Returns the type identifier this declaration denotes, if any.
    ///
    /// Builtin tags map to their builtin identifier; custom tags have none.
    #[must_use]
    pub fn type_id(&self) -> Option<TypeId> {
        match self {
            Self::Tag(tag) => BuiltinType::from_tag(tag).map(TypeId::Builtin),
            Self::Id(id) => Some(id.clone()),
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => f.write_str(tag),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

impl From<BuiltinType> for TypeSpec {
    fn from(builtin: BuiltinType) -> Self {
        Self::Id(TypeId::Builtin(builtin))
    }
}

impl From<TypeId> for TypeSpec {
    fn from(id: TypeId) -> Self {
        Self::Id(id)
    }
}

impl From<EntityClass> for TypeSpec {
    fn from(class: EntityClass) -> Self {
        Self::Id(TypeId::Entity(class))
    }
}

impl From<&str> for TypeSpec {
    fn from(tag: &str) -> Self {
        Self::Tag(tag.to_string())
    }
}

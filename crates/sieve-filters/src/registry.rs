//! Filter registry.
//!
//! Maps symbolic tags (`"integer"`) and type identifiers
//! (`BuiltinType::Integer`) to a [`FilterKind`], and builds filters from an
//! argument name and [`FilterOptions`]. A type identifier with no
//! registration is treated as an entity class and gets a record filter.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use sieve_core::{BuiltinType, EntityStore, SieveError, SieveResult, TypeId, TypeSpec};
use tracing::{trace, warn};

use crate::container::{ArrayFilter, HashFilter};
use crate::filter::{Filter, FilterBase, FilterOptions};
use crate::record::RecordFilter;
use crate::scalar::{
    BooleanFilter, DecimalFilter, FloatFilter, IntegerFilter, StringFilter, SymbolFilter,
};
use crate::temporal::{DateFilter, DateTimeFilter};

/// Builds a custom filter.
///
/// Implemented for closures taking the registry (for building children) and
/// the filter base.
pub trait FilterFactory: Send + Sync {
    /// Builds the filter.
    fn build(&self, registry: &FilterRegistry, base: FilterBase) -> SieveResult<Box<dyn Filter>>;
}

impl<F> FilterFactory for F
where
    F: Fn(&FilterRegistry, FilterBase) -> SieveResult<Box<dyn Filter>> + Send + Sync,
{
    fn build(&self, registry: &FilterRegistry, base: FilterBase) -> SieveResult<Box<dyn Filter>> {
        self(registry, base)
    }
}

/// The filter implementation a type resolves to.
#[derive(Clone)]
pub enum FilterKind {
    /// [`StringFilter`]
    String,
    /// [`IntegerFilter`]
    Integer,
    /// [`FloatFilter`]
    Float,
    /// [`DecimalFilter`]
    Decimal,
    /// [`BooleanFilter`]
    Boolean,
    /// [`SymbolFilter`]
    Symbol,
    /// [`DateFilter`]
    Date,
    /// [`DateTimeFilter`]
    DateTime,
    /// [`ArrayFilter`]
    Array,
    /// [`HashFilter`]
    Hash,
    /// [`RecordFilter`]
    Record,
    /// An embedder-supplied filter.
    Custom(Arc<dyn FilterFactory>),
}

impl FilterKind {
    /// Short name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
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
            Self::Record => "record",
            Self::Custom(_) => "custom",
        }
    }

    /// Creates a custom kind from a factory.
    pub fn custom<F: FilterFactory + 'static>(factory: F) -> Self {
        Self::Custom(Arc::new(factory))
    }
}

impl fmt::Debug for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<BuiltinType> for FilterKind {
    fn from(builtin: BuiltinType) -> Self {
        match builtin {
            BuiltinType::String => Self::String,
            BuiltinType::Integer => Self::Integer,
            BuiltinType::Float => Self::Float,
            BuiltinType::Decimal => Self::Decimal,
            BuiltinType::Boolean => Self::Boolean,
            BuiltinType::Symbol => Self::Symbol,
            BuiltinType::Date => Self::Date,
            BuiltinType::DateTime => Self::DateTime,
            BuiltinType::Array => Self::Array,
            BuiltinType::Hash => Self::Hash,
        }
    }
}

/// Registry of filter implementations.
///
/// # Example
///
/// ```
/// use sieve_core::Value;
/// use sieve_filters::{FilterOptions, FilterRegistry};
///
/// let registry = FilterRegistry::new();
/// let filter = registry
///     .build("ids", FilterOptions::new("array").element_type("integer"))
///     .unwrap();
///
/// let ids = Value::Array(vec![Value::from("1"), Value::from("2")]);
/// assert_eq!(
///     filter.process(ids).unwrap(),
///     Value::Array(vec![Value::Integer(1), Value::Integer(2)])
/// );
/// ```
pub struct FilterRegistry {
    tags: IndexMap<String, FilterKind>,
    ids: HashMap<TypeId, FilterKind>,
    store: Option<Arc<dyn EntityStore>>,
}

impl FilterRegistry {
    /// Creates a registry with every built-in filter registered under its
    /// tag and builtin type identifier, plus the `record` tag.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for builtin in BuiltinType::ALL {
            registry.register(builtin.tag(), FilterKind::from(builtin), &[TypeId::from(builtin)]);
        }
        registry.register("record", FilterKind::Record, &[]);
        registry
    }

    /// Creates a registry with nothing registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            tags: IndexMap::new(),
            ids: HashMap::new(),
            store: None,
        }
    }

    /// Attaches the store record filters use for identifier lookups.
    #[must_use]
    pub fn with_entity_store(mut self, store: Arc<dyn EntityStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Returns the attached entity store.
    #[must_use]
    pub fn entity_store(&self) -> Option<&Arc<dyn EntityStore>> {
        self.store.as_ref()
    }

    /// Associates `tag` and any legacy type identifiers with `kind`.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        kind: FilterKind,
        legacy_ids: &[TypeId],
    ) {
        let tag = tag.into();
        for id in legacy_ids {
            if self.ids.insert(id.clone(), kind.clone()).is_some() {
                warn!(type_id = %id, kind = kind.as_str(), "replacing filter for type identifier");
            }
        }
        if self.tags.insert(tag.clone(), kind.clone()).is_some() {
            warn!(tag = %tag, kind = kind.as_str(), "replacing filter for tag");
        }
    }

    /// Resolves a declared type to a filter kind.
    ///
    /// Tags must be registered. Type identifiers fall back to
    /// [`FilterKind::Record`].
    pub fn resolve(&self, type_spec: &TypeSpec) -> SieveResult<FilterKind> {
        match type_spec {
            TypeSpec::Tag(tag) => self
                .tags
                .get(tag)
                .cloned()
                .ok_or_else(|| SieveError::unknown_filter_type(tag.as_str())),
            TypeSpec::Id(id) => Ok(self.ids.get(id).cloned().unwrap_or(FilterKind::Record)),
        }
    }

    /// Builds the filter for argument `name`.
    ///
    /// Container element and value filters are built eagerly, so an unknown
    /// element type fails here rather than when a value is processed.
    pub fn build(&self, name: impl Into<String>, options: FilterOptions) -> SieveResult<Box<dyn Filter>> {
        let kind = self.resolve(&options.type_spec)?;
        let base = FilterBase::new(name, options);
        trace!(argument = base.name(), kind = kind.as_str(), "building filter");

        Ok(match kind {
            FilterKind::String => Box::new(StringFilter::new(base)),
            FilterKind::Integer => Box::new(IntegerFilter::new(base)),
            FilterKind::Float => Box::new(FloatFilter::new(base)),
            FilterKind::Decimal => Box::new(DecimalFilter::new(base)),
            FilterKind::Boolean => Box::new(BooleanFilter::new(base)),
            FilterKind::Symbol => Box::new(SymbolFilter::new(base)),
            FilterKind::Date => Box::new(DateFilter::new(base)),
            FilterKind::DateTime => Box::new(DateTimeFilter::new(base)),
            FilterKind::Array => {
                let element = self.build_child(&base, base.options().element.as_deref())?;
                Box::new(ArrayFilter::new(base, element))
            }
            FilterKind::Hash => {
                let value = self.build_child(&base, base.options().value.as_deref())?;
                Box::new(HashFilter::new(base, value))
            }
            FilterKind::Record => Box::new(RecordFilter::new(base, self.store.clone())),
            FilterKind::Custom(factory) => factory.build(self, base)?,
        })
    }

    fn build_child(
        &self,
        parent: &FilterBase,
        options: Option<&FilterOptions>,
    ) -> SieveResult<Option<Box<dyn Filter>>> {
        options
            .map(|options| self.build(parent.child_name(), options.clone()))
            .transpose()
    }

    /// Returns the registered tags in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// Returns `true` if `tag` is registered.
    #[must_use]
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("tags", &self.tags.keys().collect::<Vec<_>>())
            .field("type_id_count", &self.ids.len())
            .field("entity_store", &self.store.is_some())
            .finish()
    }
}

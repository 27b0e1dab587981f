//! # Sieve Filters
//!
//! Per-type cast and validation strategies for Sieve arguments.
//!
//! Every argument is normalized by a [`Filter`] built from its declared type:
//!
//! - Scalars: [`StringFilter`], [`IntegerFilter`], [`FloatFilter`],
//!   [`DecimalFilter`], [`BooleanFilter`], [`SymbolFilter`]
//! - Temporal: [`DateFilter`], [`DateTimeFilter`]
//! - Containers: [`ArrayFilter`], [`HashFilter`], which apply a child filter
//!   to every element
//! - Entity references: [`RecordFilter`], which looks identifiers up in an
//!   [`EntityStore`](sieve_core::EntityStore)
//!
//! [`FilterRegistry`] resolves declared types to filter kinds and builds
//! filters, recursing for container element types.

#![doc(html_root_url = "https://docs.rs/sieve-filters/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod container;
mod filter;
mod record;
mod registry;
mod scalar;
pub mod temporal;

pub use container::{ArrayFilter, HashFilter};
pub use filter::{Filter, FilterBase, FilterOptions};
pub use record::RecordFilter;
pub use registry::{FilterFactory, FilterKind, FilterRegistry};
pub use scalar::{
    BooleanFilter, DecimalFilter, FloatFilter, IntegerFilter, StringFilter, SymbolFilter,
};
pub use temporal::{DateFilter, DateTimeFilter};

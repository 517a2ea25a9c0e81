#![forbid(unsafe_code)]
//! catsel-catalog: the in-memory columnar catalog and its selection engine.
//!
//! - `catalog`: import protocol, description readers, typed value access.
//! - `roles`: generic-role resolution (known catalogs, UCDs, error columns).
//! - `engine`: cut/list/region mutation with incremental bit updates.
//! - `compact`: row erasure and sorting, kept in step with the matrix.
//! - `document`: YAML selection documents.
//!
//! A `Catalog` has exactly one owner; callers serialize access themselves.

pub mod catalog;
pub mod compact;
pub mod document;
pub mod engine;
pub mod roles;

pub use catalog::{Catalog, CatalogInfo};
pub use compact::SortOrder;
pub use document::{DocumentError, SelectionDocument};
pub use engine::StringListMode;

pub use catsel_core::prelude::{
    CatalogConfig, CombineMode, Criteria, Error, GenericRole, Quantity, QuantityDescriptor,
    QuantityKind, Result, Value, NO_CUT,
};
pub use catsel_select::{Ellipse, RowSelectionMatrix};

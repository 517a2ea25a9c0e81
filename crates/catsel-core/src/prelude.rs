//! Convenient re-exports for downstream crates.

pub use crate::columns::ColumnStore;
pub use crate::config::{CatalogConfig, CombineMode};
pub use crate::error::{Error, Result};
pub use crate::quantity::{
    normalize_cut, Criteria, GenericRole, Quantity, QuantityDescriptor, QuantityKind, NO_CUT,
};
pub use crate::value::Value;

#![forbid(unsafe_code)]
//! catsel: in-memory columnar astronomical catalogs with incremental row
//! selection.
//!
//! Facade over the workspace crates. Most users want `Catalog` plus a reader
//! from `io`.

pub use catsel_catalog as catalog;
pub use catsel_core as model;
pub use catsel_io as io;
pub use catsel_select as select;

pub use catsel_catalog::{Catalog, CatalogInfo, SelectionDocument};

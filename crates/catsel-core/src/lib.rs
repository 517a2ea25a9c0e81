#![forbid(unsafe_code)]
//! catsel-core: data model shared by the store, the selection engine, and
//! the I/O collaborators.
//!
//! No I/O and no logging here. Column descriptors, the equal-length column
//! store, the error taxonomy, static registries, and configuration only.

pub mod columns;
pub mod config;
pub mod error;
pub mod prelude;
pub mod quantity;
pub mod registry;
pub mod value;

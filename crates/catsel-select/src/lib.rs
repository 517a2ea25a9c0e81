#![forbid(unsafe_code)]
//! catsel-select: the pieces of the selection engine that do not need the
//! catalog itself.
//!
//! - `matrix`: the bit-packed per-row verdict matrix and its layout contract.
//! - `criteria`: numeric range and string membership evaluators, plus the
//!   AND/OR combination rule over active criteria.
//! - `region`: the sky region and its spherical membership test.
//!
//! Everything here is synchronous and allocation-bounded by the row count.

pub mod criteria;
pub mod matrix;
pub mod region;

pub use catsel_core::config::CombineMode;
pub use criteria::{combine, evaluate_numeric, evaluate_string, numeric_passes, string_passes};
pub use matrix::{quantity_bit, RowSelectionMatrix, AGGREGATE_BIT, REGION_BIT};
pub use region::{evaluate_region, Ellipse, RegionGeometry, MIN_AXIS_DEG};

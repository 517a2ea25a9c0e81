use thiserror::Error;

use crate::quantity::QuantityKind;

/// Canonical result for core and the selection engine.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("catalog description not imported: {0}")]
    NotImported(String),

    #[error("catalog already imported: {0}")]
    AlreadyImported(String),

    #[error("unknown quantity '{0}'")]
    UnknownQuantity(String),

    #[error("quantity name '{0}' defined twice")]
    DuplicateQuantity(String),

    #[error("quantity '{name}' is {actual:?}, expected {expected:?}")]
    WrongQuantityKind {
        name: String,
        expected: QuantityKind,
        actual: QuantityKind,
    },

    #[error("row {row} out of range (catalog has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },

    #[error("missing generic position quantities (RA and Dec): {0}")]
    MissingPositionRoles(String),

    #[error("invalid region geometry: {0}")]
    InvalidRegionGeometry(String),

    #[error("unsupported column kind for '{0}' (vector quantities are not implemented)")]
    UnsupportedColumnKind(String),

    // Growth of parallel columns failed before any length changed.
    #[error("allocation failed while growing {what} to {rows} rows")]
    AllocationFailure { what: &'static str, rows: usize },

    #[error("quantity '{0}' has no linked error quantity")]
    NoErrorQuantity(String),

    #[error("column block mismatch: {0}")]
    ColumnLengthMismatch(String),

    #[error("no quantity holds the generic role {0}")]
    MissingRole(String),

    #[error("not implemented: {0}")]
    NotImplemented(String),
}


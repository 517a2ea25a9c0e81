use std::path::PathBuf;

use thiserror::Error;

/// Result type local to catsel-io.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Catalog(#[from] catsel_core::error::Error),

    #[error("malformed catalog text at line {line}: {msg}")]
    Format { line: u64, msg: String },

    #[error("'{quantity}' row {row}: string cell contains the ';' separator or a line break")]
    UnwritableCell { quantity: String, row: usize },

    #[error("file '{0}' exists (clobber=no)")]
    FileExists(PathBuf),

    #[error("unknown catalog '{0}'")]
    UnknownCatalog(String),

    #[error("unknown mirror site '{0}'")]
    UnknownMirror(String),
}

impl Error {
    pub(crate) fn format(line: u64, msg: impl Into<String>) -> Self {
        Error::Format {
            line,
            msg: msg.into(),
        }
    }
}

#![forbid(unsafe_code)]
//! catsel-io: producers and consumers around `catsel_catalog::Catalog`.
//!
//! - `readers::text`: the `;`-separated text dump, via the `csv` crate.
//! - `writers`: the same text dump and NDJSON, all rows or selected rows.
//! - `web`: VizieR query source (request validation only).

pub mod error;
pub mod readers;
pub mod source;
pub mod web;
pub mod writers;

pub use error::{Error, Result};
pub use readers::text::{TextCatalogReader, TextHeader};
pub use source::CatalogSource;
pub use web::WebCatalogSource;
pub use writers::jsonl::JsonlCatalogWriter;
pub use writers::text::TextCatalogWriter;

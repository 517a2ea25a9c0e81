//! Catalog consumers: the text dump and NDJSON.

pub mod jsonl;
pub mod text;

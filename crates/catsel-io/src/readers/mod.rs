//! Catalog producers.

pub mod text;

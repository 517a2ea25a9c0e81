//! NDJSON export: one object per row, keyed by quantity name.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use catsel_catalog::{Catalog, Value};

use crate::error::Result;

pub struct JsonlCatalogWriter<W: Write> {
    writer: BufWriter<W>,
}

impl JsonlCatalogWriter<File> {
    pub fn to_path(path: impl AsRef<Path>) -> Result<Self> {
        let f = File::create(path)?;
        Ok(Self::to_writer(f))
    }
}

impl<W: Write> JsonlCatalogWriter<W> {
    pub fn to_writer(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Write every row, or the selected rows only. Returns rows written.
    pub fn write_catalog(&mut self, catalog: &Catalog, selected_only: bool) -> Result<usize> {
        let names = catalog.quantity_names();
        let rows: Box<dyn Iterator<Item = usize> + '_> = if selected_only {
            Box::new(catalog.selection_matrix().selected_rows())
        } else {
            Box::new(0..catalog.row_count())
        };
        let mut written = 0;
        for r in rows {
            let mut obj = BTreeMap::new();
            for name in &names {
                obj.insert(name.as_str(), value_to_json(catalog.get_value(name, r)?));
            }
            let line = serde_json::to_string(&obj)?;
            writeln!(self.writer, "{}", line)?;
            written += 1;
        }
        self.writer.flush()?;
        Ok(written)
    }
}

fn value_to_json(v: Value) -> serde_json::Value {
    match v {
        Value::Numeric(f) if f.is_nan() => serde_json::Value::Null,
        Value::Numeric(f) => serde_json::Value::from(f),
        Value::Text(s) => serde_json::Value::String(s),
    }
}

#[cfg(test)]
mod tests {
    use catsel_catalog::{CatalogInfo, QuantityDescriptor};

    use super::*;

    #[test]
    fn nan_becomes_null_and_selection_filters() {
        let mut cat = Catalog::from_columns(
            CatalogInfo::default(),
            vec![
                QuantityDescriptor::string("name"),
                QuantityDescriptor::numeric("flux"),
            ],
            vec![vec![f64::NAN, 2.0]],
            vec![vec!["a".into(), "b".into()]],
        )
        .unwrap();
        let mut buf = Vec::new();
        let n = JsonlCatalogWriter::to_writer(&mut buf)
            .write_catalog(&cat, false)
            .unwrap();
        assert_eq!(n, 2);
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().next().unwrap(), r#"{"flux":null,"name":"a"}"#);

        cat.set_reject_nan("flux", true).unwrap();
        cat.set_lower_cut("flux", 0.0).unwrap();
        let mut buf = Vec::new();
        let n = JsonlCatalogWriter::to_writer(&mut buf)
            .write_catalog(&cat, true)
            .unwrap();
        assert_eq!(n, 1);
        assert!(String::from_utf8(buf).unwrap().contains("\"b\""));
    }
}

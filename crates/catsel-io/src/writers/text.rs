//! Writer for the `;`-separated catalog text dump (see `readers::text`).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use catsel_catalog::{Catalog, GenericRole, Quantity, QuantityKind};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct TextCatalogWriter {
    /// Overwrite an existing file.
    pub clobber: bool,
    /// Write only the selected rows.
    pub selected_only: bool,
}

/// Per-column cell layout derived from the format hint.
#[derive(Debug, Clone, Copy, PartialEq)]
enum CellFormat {
    Raw,
    Text { width: usize },
    Integer { width: usize },
    Fixed { width: usize, decimals: usize, pad: Pad },
    Exponent { width: usize, decimals: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Pad {
    Blank,
    /// RA: zero padded.
    Zero,
    /// Dec: zero padded with explicit sign.
    SignedZero,
}

impl CellFormat {
    fn parse(format: &str, role: Option<GenericRole>) -> Self {
        let Some(first) = format.chars().next() else {
            return CellFormat::Raw;
        };
        let rest = &format[first.len_utf8()..];
        let (width, decimals) = match rest.split_once('.') {
            Some((w, d)) => (w.parse().unwrap_or(0), d.parse().unwrap_or(0)),
            None => (rest.parse().unwrap_or(0), 0),
        };
        if width == 0 {
            return CellFormat::Raw;
        }
        match first {
            'A' => CellFormat::Text { width },
            'I' => CellFormat::Integer { width },
            'F' => CellFormat::Fixed {
                width,
                decimals,
                pad: match role {
                    Some(GenericRole::Ra) => Pad::Zero,
                    Some(GenericRole::Dec) => Pad::SignedZero,
                    _ => Pad::Blank,
                },
            },
            _ => CellFormat::Exponent { width, decimals },
        }
    }

    fn width(&self) -> usize {
        match *self {
            CellFormat::Raw => 0,
            CellFormat::Text { width }
            | CellFormat::Integer { width }
            | CellFormat::Fixed { width, .. }
            | CellFormat::Exponent { width, .. } => width,
        }
    }

    fn numeric(&self, v: f64) -> String {
        if v.is_nan() {
            return " ".repeat(self.width().max(1));
        }
        match *self {
            CellFormat::Raw | CellFormat::Text { .. } => v.to_string(),
            CellFormat::Integer { width } => format!("{:>width$.0}", v),
            CellFormat::Fixed { width, decimals, pad } => match pad {
                Pad::Blank => format!("{:>width$.decimals$}", v),
                Pad::Zero => format!("{:0width$.decimals$}", v),
                Pad::SignedZero => format!("{:+0width$.decimals$}", v),
            },
            CellFormat::Exponent { width, decimals } => {
                format!("{:>width$}", c_exponent(v, decimals))
            }
        }
    }

    /// Never empty: a blank line would not read back as a row.
    fn text(&self, s: &str) -> String {
        match *self {
            CellFormat::Text { width } => format!("{:>width$}", s),
            _ if s.is_empty() => " ".to_string(),
            _ => s.to_string(),
        }
    }
}

/// `1.500e+03` style: at least two exponent digits, explicit sign.
fn c_exponent(v: f64, decimals: usize) -> String {
    let s = format!("{:.decimals$e}", v);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            format!("{}e{:+03}", mantissa, exp)
        }
        None => s,
    }
}

impl TextCatalogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clobber(mut self, clobber: bool) -> Self {
        self.clobber = clobber;
        self
    }

    pub fn selected_only(mut self, selected_only: bool) -> Self {
        self.selected_only = selected_only;
        self
    }

    /// Write to `path`. Returns the number of data rows written.
    pub fn write_path(&self, catalog: &Catalog, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        if path.exists() && !self.clobber {
            return Err(Error::FileExists(path.to_path_buf()));
        }
        let file = File::create(path)?;
        let rows = self.write_to(catalog, file)?;
        info!(rows, path = %path.display(), "text catalog written");
        Ok(rows)
    }

    pub fn write_to<W: Write>(&self, catalog: &Catalog, writer: W) -> Result<usize> {
        catalog
            .quantities()
            .first()
            .ok_or_else(|| catsel_core::error::Error::NotImported("nothing to write".into()))?;
        let mut w = BufWriter::new(writer);
        let info = catalog.info();
        writeln!(w, "#RESOURCE=catalogAccess({})", info.code)?;
        writeln!(w, "#Name: {}", info.catalog_name)?;
        writeln!(w, "#Title:\t{}", info.catalog_ref)?;
        writeln!(w, "#Name: {}", info.table_name)?;
        writeln!(w, "#Title:\t{}", info.table_ref)?;
        let quantities = catalog.quantities();
        for q in quantities {
            let pad = if q.name.len() < 8 { "        " } else { "" };
            // An empty hint would read back as numeric.
            let format = match q.kind {
                QuantityKind::Numeric => q.format.as_str(),
                _ if q.format.is_empty() => "A",
                _ => q.format.as_str(),
            };
            writeln!(
                w,
                "#Column\t{}\t({})\t{}{}\t[ucd={}]",
                q.name, format, pad, q.comment, q.ucd
            )?;
        }
        writeln!(w)?;
        writeln!(w, "{}", join(quantities.iter().map(|q| q.name.as_str())))?;
        writeln!(w, "{}", join(quantities.iter().map(|q| q.unit.as_str())))?;
        writeln!(w, "---")?;

        let formats: Vec<CellFormat> = quantities
            .iter()
            .map(|q| CellFormat::parse(&q.format, q.role))
            .collect();
        let all = !self.selected_only || catalog.selected_row_count() == catalog.row_count();
        let mut written = 0;
        for row in 0..catalog.row_count() {
            if !all && !catalog.is_row_selected(row)? {
                continue;
            }
            let cells = quantities
                .iter()
                .zip(&formats)
                .map(|(q, f)| cell(catalog, q, f, row))
                .collect::<Result<Vec<_>>>()?;
            writeln!(w, "{}", cells.join(";"))?;
            written += 1;
        }
        w.flush()?;
        Ok(written)
    }
}

fn cell(catalog: &Catalog, q: &Quantity, format: &CellFormat, row: usize) -> Result<String> {
    Ok(match q.kind {
        QuantityKind::Numeric => format.numeric(catalog.get_numeric(&q.name, row)?),
        _ => {
            let s = catalog.get_string(&q.name, row)?;
            if s.contains([';', '\n', '\r']) {
                return Err(Error::UnwritableCell {
                    quantity: q.name.clone(),
                    row,
                });
            }
            format.text(s)
        }
    })
}

fn join<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.collect::<Vec<_>>().join(";")
}

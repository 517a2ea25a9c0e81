//! Reader for the `;`-separated catalog text dump.
//!
//! ```text
//! #RESOURCE=catalogAccess(<code>)
//! #Name: <catalog name>
//! #Title:<TAB><catalog reference>
//! #Name: <table name>
//! #Title:<TAB><table reference>
//! #Column<TAB><name><TAB>(<format>)<TAB><comment><TAB>[ucd=<ucd>]
//! ...
//!
//! name1;name2;...
//! unit1;unit2;...
//! ---
//! value;value;...
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use catsel_catalog::{Catalog, CatalogInfo, QuantityDescriptor, QuantityKind};
use catsel_core::error::Error as CoreError;

use crate::error::{Error, Result};
use crate::source::CatalogSource;

const RESOURCE_TAG: &str = "#RESOURCE=";
const NAME_TAG: &str = "#Name:";
const TITLE_TAG: &str = "#Title:";
const COLUMN_TAG: &str = "#Column";
const DATA_SEPARATOR: &str = "---";

/// Rows handed to the catalog per `append_column_block` call.
const BLOCK_ROWS: usize = 4096;

#[derive(Debug, Clone)]
pub struct TextCatalogReader {
    path: PathBuf,
    code: Option<String>,
}

/// Everything above the `---` line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextHeader {
    pub info: CatalogInfo,
    pub descriptors: Vec<QuantityDescriptor>,
    /// Lines consumed, separator included.
    pub lines: u64,
}

impl TextCatalogReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            code: None,
        }
    }

    /// Override the catalog identity read from `#RESOURCE=`.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    fn open(&self) -> Result<(BufReader<File>, TextHeader)> {
        let mut reader = BufReader::new(File::open(&self.path)?);
        let mut header = parse_header(&mut reader)?;
        header.info.url = self.path.display().to_string();
        if let Some(code) = &self.code {
            header.info.code = code.clone();
        }
        Ok((reader, header))
    }

    pub fn read_header(&self) -> Result<TextHeader> {
        self.open().map(|(_, header)| header)
    }
}

impl CatalogSource for TextCatalogReader {
    fn name(&self) -> &str {
        "text"
    }

    fn describe(&mut self, catalog: &mut Catalog) -> Result<usize> {
        let header = self.read_header()?;
        Ok(catalog.begin_import(header.info, header.descriptors)?)
    }

    fn load(&mut self, catalog: &mut Catalog, max_rows: usize) -> Result<usize> {
        if catalog.row_count() > 0 {
            return Err(CoreError::AlreadyImported(format!(
                "'{}' already holds {} rows",
                catalog.info().code,
                catalog.row_count()
            ))
            .into());
        }
        let (mut reader, header) = self.open()?;
        if !catalog.is_imported() {
            catalog.begin_import(header.info.clone(), header.descriptors.clone())?;
        } else if catalog.quantities().len() != header.descriptors.len() {
            return Err(Error::format(
                header.lines,
                format!(
                    "file has {} columns, catalog describes {}",
                    header.descriptors.len(),
                    catalog.quantities().len()
                ),
            ));
        }
        // 0 reads the whole file.
        let limit = (max_rows > 0).then_some(max_rows);
        catalog.reserve_rows(limit.unwrap_or(BLOCK_ROWS))?;

        let kinds: Vec<QuantityKind> = catalog.quantity_kinds();
        let storage: Vec<usize> = catalog.quantities().iter().map(|q| q.storage_index).collect();
        let n_num = kinds.iter().filter(|k| **k == QuantityKind::Numeric).count();
        let n_str = kinds.len() - n_num;

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::None)
            .from_reader(&mut reader);

        let mut block = Block::new(n_num, n_str);
        let mut total = 0usize;
        let mut truncated = false;
        for record in rdr.records() {
            let record = record?;
            // Whitespace-only lines are rows: a NaN in a one-column catalog
            // is written as blanks.
            if record.len() == 1 && record.get(0).map_or(true, str::is_empty) {
                continue;
            }
            if limit == Some(total) {
                truncated = true;
                break;
            }
            let line = header.lines + record.position().map_or(0, |p| p.line());
            for (i, kind) in kinds.iter().enumerate() {
                let cell = record.get(i).map_or("", str::trim);
                match kind {
                    QuantityKind::Numeric => {
                        let v = parse_numeric(cell).ok_or_else(|| {
                            Error::format(line, format!("column {} is not numeric: '{}'", i + 1, cell))
                        })?;
                        block.numeric[storage[i]].push(v);
                    }
                    _ => block.strings[storage[i]].push(cell.to_string()),
                }
            }
            block.rows += 1;
            total += 1;
            if block.rows == BLOCK_ROWS {
                block.flush(catalog)?;
            }
        }
        block.flush(catalog)?;
        if truncated {
            warn!(max_rows, path = %self.path.display(), "row limit reached, remaining rows ignored");
        }
        let rows = catalog.finish_import()?;
        info!(rows, path = %self.path.display(), "text catalog loaded");
        Ok(rows)
    }
}

struct Block {
    numeric: Vec<Vec<f64>>,
    strings: Vec<Vec<String>>,
    rows: usize,
}

impl Block {
    fn new(n_num: usize, n_str: usize) -> Self {
        Self {
            numeric: vec![Vec::with_capacity(BLOCK_ROWS); n_num],
            strings: vec![Vec::with_capacity(BLOCK_ROWS); n_str],
            rows: 0,
        }
    }

    fn flush(&mut self, catalog: &mut Catalog) -> Result<()> {
        if self.rows == 0 {
            return Ok(());
        }
        let fresh = Block::new(self.numeric.len(), self.strings.len());
        let full = std::mem::replace(self, fresh);
        catalog.append_column_block(full.numeric, full.strings)?;
        Ok(())
    }
}

/// Blank cells are NaN.
fn parse_numeric(cell: &str) -> Option<f64> {
    if cell.is_empty() {
        return Some(f64::NAN);
    }
    cell.parse::<f64>().ok()
}

/// Parse everything up to and including the `---` separator.
pub fn parse_header<R: BufRead>(reader: &mut R) -> Result<TextHeader> {
    let mut header = TextHeader::default();
    let mut names_seen = 0;
    let mut titles_seen = 0;
    let mut column_names: Option<Vec<String>> = None;
    let mut units: Option<Vec<String>> = None;
    let mut buf = String::new();

    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            return Err(Error::format(header.lines, "missing '---' before data"));
        }
        header.lines += 1;
        let line = buf.trim_end_matches(['\r', '\n']);

        if line.starts_with(DATA_SEPARATOR) {
            break;
        }
        if let Some(rest) = line.strip_prefix(RESOURCE_TAG) {
            header.info.code = resource_code(rest.trim());
        } else if let Some(rest) = line.strip_prefix(NAME_TAG) {
            let value = rest.trim().to_string();
            match names_seen {
                0 => header.info.catalog_name = value,
                _ => header.info.table_name = value,
            }
            names_seen += 1;
        } else if let Some(rest) = line.strip_prefix(TITLE_TAG) {
            let value = rest.trim().to_string();
            match titles_seen {
                0 => header.info.catalog_ref = value,
                _ => header.info.table_ref = value,
            }
            titles_seen += 1;
        } else if let Some(rest) = line.strip_prefix(COLUMN_TAG) {
            if rest.trim().is_empty() {
                continue;
            }
            header.descriptors.push(parse_column(rest, header.lines)?);
        } else if line.starts_with('#') || line.trim().is_empty() {
            continue;
        } else if column_names.is_none() {
            column_names = Some(split_cells(line));
        } else if units.is_none() {
            units = Some(split_cells(line));
        } else {
            return Err(Error::format(header.lines, "unexpected line before '---'"));
        }
    }

    if header.descriptors.is_empty() {
        return Err(Error::format(header.lines, "no #Column description"));
    }
    if let Some(names) = column_names {
        let expected: Vec<&str> = header.descriptors.iter().map(|d| d.name.as_str()).collect();
        if names != expected {
            return Err(Error::format(
                header.lines,
                format!("name line {:?} does not match #Column lines {:?}", names, expected),
            ));
        }
    }
    if let Some(units) = units {
        for (desc, unit) in header.descriptors.iter_mut().zip(units) {
            desc.unit = unit;
        }
    }
    debug!(quantities = header.descriptors.len(), code = %header.info.code, "text header parsed");
    Ok(header)
}

fn resource_code(value: &str) -> String {
    value
        .strip_prefix("catalogAccess(")
        .and_then(|v| v.strip_suffix(')'))
        .unwrap_or(value)
        .to_string()
}

fn split_cells(line: &str) -> Vec<String> {
    line.split(';').map(|s| s.trim().to_string()).collect()
}

/// `<name>\t(<format>)\t<comment>\t[ucd=<ucd>]`; comment and ucd may be absent.
fn parse_column(rest: &str, line: u64) -> Result<QuantityDescriptor> {
    let mut parts = rest.split('\t').map(str::trim).filter(|s| !s.is_empty());
    let name = parts
        .next()
        .ok_or_else(|| Error::format(line, "column without a name"))?;
    let format = parts
        .next()
        .and_then(|f| f.strip_prefix('('))
        .and_then(|f| f.strip_suffix(')'))
        .ok_or_else(|| Error::format(line, format!("column '{}' lacks a (format)", name)))?;

    let mut comment = Vec::new();
    let mut ucd = String::new();
    for part in parts {
        match part.strip_prefix("[ucd=").and_then(|u| u.strip_suffix(']')) {
            Some(u) => ucd = u.to_string(),
            None => comment.push(part),
        }
    }

    let kind = match format.chars().next() {
        Some('A') => QuantityKind::String,
        Some('V') => return Err(CoreError::UnsupportedColumnKind(name.to_string()).into()),
        _ => QuantityKind::Numeric,
    };
    Ok(QuantityDescriptor::new(name, kind)
        .with_format(format)
        .with_comment(comment.join(" "))
        .with_ucd(ucd))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "#RESOURCE=catalogAccess(IX/10A/1rxs)\n\
#Name: IX/10A\n\
#Title:\tROSAT All-Sky Survey\n\
#Name: IX/10A/1rxs\n\
#Title:\tBright Source Catalogue\n\
#Column\t1RXS\t(A16)\t        Source name\t[ucd=ID_MAIN]\n\
#Column\tRAJ2000\t(F9.5)\tRight ascension\t[ucd=POS_EQ_RA_MAIN]\n\
#Column\tCount\t(I4)\t        \t[ucd=]\n\
\n\
1RXS;RAJ2000;Count\n\
;deg;ct\n\
---\n";

    #[test]
    fn header_fields() {
        let header = parse_header(&mut HEADER.as_bytes()).unwrap();
        assert_eq!(header.info.code, "IX/10A/1rxs");
        assert_eq!(header.info.catalog_ref, "ROSAT All-Sky Survey");
        assert_eq!(header.info.table_name, "IX/10A/1rxs");
        assert_eq!(header.descriptors.len(), 3);
        let name = &header.descriptors[0];
        assert_eq!(name.kind, QuantityKind::String);
        assert_eq!(name.comment, "Source name");
        assert_eq!(name.ucd, "ID_MAIN");
        let ra = &header.descriptors[1];
        assert_eq!(ra.kind, QuantityKind::Numeric);
        assert_eq!(ra.format, "F9.5");
        assert_eq!(ra.unit, "deg");
        assert_eq!(header.descriptors[2].comment, "");
        assert_eq!(header.lines, 12);
    }

    #[test]
    fn vector_column_is_rejected() {
        let text = "#Column\tv\t(V3)\tvector\t[ucd=]\n---\n";
        let err = parse_header(&mut text.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Catalog(CoreError::UnsupportedColumnKind(_))));
    }

    #[test]
    fn name_line_must_match() {
        let text = "#Column\ta\t(F4.1)\tx\t[ucd=]\n\nb\n\n---\n";
        assert!(matches!(
            parse_header(&mut text.as_bytes()),
            Err(Error::Format { .. })
        ));
    }

    #[test]
    fn blank_numeric_cell_is_nan() {
        assert!(parse_numeric("").unwrap().is_nan());
        assert_eq!(parse_numeric("-1.5e2"), Some(-150.0));
        assert_eq!(parse_numeric("abc"), None);
    }
}

//! The columnar catalog store: import protocol, description readers, and
//! typed value access over all rows or over the selected subset.
//!
//! Row data lives in a `ColumnStore`; the paired `RowSelectionMatrix` always
//! has the same row count. Selection mutation lives in `engine`, compaction
//! and sorting in `compact`, generic roles in `roles`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use catsel_core::columns::ColumnStore;
use catsel_core::config::{CatalogConfig, CombineMode};
use catsel_core::error::{Error, Result};
use catsel_core::quantity::{GenericRole, Quantity, QuantityDescriptor, QuantityKind};
use catsel_core::registry::{KnownCatalog, MirrorSite, KNOWN_CATALOGS, MIRROR_SITES};
use catsel_core::value::Value;
use catsel_select::{Ellipse, RegionGeometry, RowSelectionMatrix};

/// Provenance strings describing where a catalog came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogInfo {
    /// Catalog identity (known-catalog name or VizieR id), used for role lookup.
    pub code: String,
    pub url: String,
    pub catalog_name: String,
    pub catalog_ref: String,
    pub table_name: String,
    pub table_ref: String,
}

impl CatalogInfo {
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }
}

/// In-memory catalog. `Clone` is a deep copy.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub(crate) info: CatalogInfo,
    pub(crate) quantities: Vec<Quantity>,
    pub(crate) columns: ColumnStore,
    pub(crate) matrix: RowSelectionMatrix,
    pub(crate) selected_rows: usize,
    /// Quantity position holding each generic role, by `GenericRole::slot`.
    pub(crate) roles: [Option<usize>; 6],
    pub(crate) pos_error_factor: f64,
    pub(crate) region: Option<Ellipse>,
    pub(crate) geometry: Option<RegionGeometry>,
    pub(crate) combine: CombineMode,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            info: CatalogInfo::default(),
            quantities: Vec::new(),
            columns: ColumnStore::default(),
            matrix: RowSelectionMatrix::default(),
            selected_rows: 0,
            roles: [None; 6],
            pos_error_factor: catsel_core::registry::DEFAULT_POSITION_ERROR_FACTOR,
            region: None,
            geometry: None,
            combine: CombineMode::And,
        }
    }

    pub fn with_config(cfg: &CatalogConfig) -> Self {
        let mut cat = Self::new();
        cat.combine = cfg.combine_mode;
        cat
    }

    /// Describe, fill, and finish in one call.
    pub fn from_columns(
        info: CatalogInfo,
        descriptors: Vec<QuantityDescriptor>,
        numeric: Vec<Vec<f64>>,
        strings: Vec<Vec<String>>,
    ) -> Result<Self> {
        let mut cat = Self::new();
        cat.begin_import(info, descriptors)?;
        cat.append_column_block(numeric, strings)?;
        cat.finish_import()?;
        Ok(cat)
    }

    pub fn known_catalogs() -> &'static [KnownCatalog] {
        &KNOWN_CATALOGS
    }

    pub fn mirror_sites() -> &'static [MirrorSite] {
        &MIRROR_SITES
    }

    // ----- import protocol -----

    /// Define the columns. Returns the number of quantities.
    ///
    /// A catalog that has a description but no rows may be re-described.
    pub fn begin_import(
        &mut self,
        info: CatalogInfo,
        descriptors: Vec<QuantityDescriptor>,
    ) -> Result<usize> {
        if !self.quantities.is_empty() {
            if self.row_count() > 0 {
                return Err(Error::AlreadyImported(
                    "call clear_content before importing again".into(),
                ));
            }
            info!(table = %self.info.table_name, "deleting previous catalog description");
            self.clear_description();
        }
        if descriptors.is_empty() {
            return Err(Error::NotImported("description has no quantities".into()));
        }

        let mut quantities = Vec::with_capacity(descriptors.len());
        let (mut n_num, mut n_str) = (0usize, 0usize);
        for desc in descriptors {
            if quantities.iter().any(|q: &Quantity| q.name == desc.name) {
                return Err(Error::DuplicateQuantity(desc.name));
            }
            let slot = match desc.kind {
                QuantityKind::Numeric => {
                    n_num += 1;
                    n_num - 1
                }
                QuantityKind::String => {
                    n_str += 1;
                    n_str - 1
                }
                QuantityKind::Vector => return Err(Error::UnsupportedColumnKind(desc.name)),
            };
            quantities.push(Quantity::from_descriptor(desc, slot));
        }

        self.info = info;
        self.columns = ColumnStore::new(n_num, n_str);
        self.matrix = RowSelectionMatrix::new(quantities.len());
        self.quantities = quantities;
        self.selected_rows = 0;
        self.resolve_generic_roles();
        debug!(
            quantities = self.quantities.len(),
            numeric = n_num,
            strings = n_str,
            "catalog description imported"
        );
        Ok(self.quantities.len())
    }

    /// Pre-allocate for up to `max_rows` total rows.
    pub fn reserve_rows(&mut self, max_rows: usize) -> Result<()> {
        self.ensure_imported()?;
        let additional = max_rows.saturating_sub(self.row_count());
        self.matrix.try_reserve_rows(additional)?;
        self.columns.try_reserve(additional)
    }

    /// Append rows given column-wise (numeric bank, then string bank, each in
    /// storage-index order). Criteria already configured are evaluated on the
    /// new rows. Returns the number of rows appended.
    pub fn append_column_block(
        &mut self,
        numeric: Vec<Vec<f64>>,
        strings: Vec<Vec<String>>,
    ) -> Result<usize> {
        self.ensure_imported()?;
        let incoming = numeric
            .first()
            .map(Vec::len)
            .or_else(|| strings.first().map(Vec::len))
            .unwrap_or(0);
        // Matrix capacity first: once the columns grow, the matrix append
        // below cannot fail.
        self.matrix.try_reserve_rows(incoming)?;
        let start = self.row_count();
        let added = self.columns.append_block(numeric, strings)?;
        self.matrix.try_append_rows(added)?;
        self.evaluate_rows(start..start + added);
        Ok(added)
    }

    /// Trim spare capacity and report the memory footprint. Returns the row count.
    pub fn finish_import(&mut self) -> Result<usize> {
        self.ensure_imported()?;
        self.columns.shrink_to_fit();
        self.matrix.shrink_to_fit();
        let rows = self.row_count();
        info!(
            rows,
            selected = self.selected_rows,
            bytes = self.estimated_memory_bytes(rows),
            "catalog import finished"
        );
        Ok(rows)
    }

    /// Drop row data; keep quantity definitions and selection configuration.
    pub fn clear_content(&mut self) {
        self.columns.clear_rows();
        self.matrix.clear_rows();
        self.selected_rows = 0;
    }

    /// Drop row data, quantity definitions, roles, and region.
    pub fn clear_description(&mut self) {
        self.clear_content();
        self.info = CatalogInfo::default();
        self.quantities.clear();
        self.columns = ColumnStore::default();
        self.matrix = RowSelectionMatrix::default();
        self.roles = [None; 6];
        self.pos_error_factor = catsel_core::registry::DEFAULT_POSITION_ERROR_FACTOR;
        self.region = None;
        self.geometry = None;
    }

    /// Bytes needed for `rows` rows: numerics, declared string widths, matrix banks.
    pub fn estimated_memory_bytes(&self, rows: usize) -> usize {
        let numeric = self
            .quantities
            .iter()
            .filter(|q| q.kind == QuantityKind::Numeric)
            .count()
            * std::mem::size_of::<f64>();
        let chars: usize = self
            .quantities
            .iter()
            .filter(|q| q.kind == QuantityKind::String)
            .filter_map(Quantity::format_width)
            .sum();
        let bits = self.matrix.words_per_row() * std::mem::size_of::<u64>();
        (numeric + chars + bits) * rows
    }

    // ----- description -----

    pub fn is_imported(&self) -> bool {
        !self.quantities.is_empty()
    }

    pub(crate) fn ensure_imported(&self) -> Result<()> {
        if self.quantities.is_empty() {
            return Err(Error::NotImported("must first import a description".into()));
        }
        Ok(())
    }

    pub fn info(&self) -> &CatalogInfo {
        &self.info
    }

    pub fn row_count(&self) -> usize {
        self.columns.rows()
    }

    pub fn selected_row_count(&self) -> usize {
        self.selected_rows
    }

    pub fn quantities(&self) -> &[Quantity] {
        &self.quantities
    }

    /// Position of `name` in column order. Linear scan; catalogs carry tens of columns.
    pub fn quantity_index_by_name(&self, name: &str) -> Result<usize> {
        self.quantities
            .iter()
            .position(|q| q.name == name)
            .ok_or_else(|| Error::UnknownQuantity(name.to_string()))
    }

    pub fn quantity(&self, name: &str) -> Result<&Quantity> {
        self.ensure_imported()?;
        let pos = self.quantity_index_by_name(name)?;
        Ok(&self.quantities[pos])
    }

    pub fn quantity_names(&self) -> Vec<String> {
        self.quantities.iter().map(|q| q.name.clone()).collect()
    }

    pub fn quantity_units(&self) -> Vec<String> {
        self.quantities.iter().map(|q| q.unit.clone()).collect()
    }

    pub fn quantity_ucds(&self) -> Vec<String> {
        self.quantities.iter().map(|q| q.ucd.clone()).collect()
    }

    pub fn quantity_kinds(&self) -> Vec<QuantityKind> {
        self.quantities.iter().map(|q| q.kind).collect()
    }

    pub fn stat_error_name(&self, name: &str) -> Result<Option<&str>> {
        Ok(self.quantity(name)?.stat_error_name.as_deref())
    }

    pub fn sys_error_name(&self, name: &str) -> Result<Option<&str>> {
        Ok(self.quantity(name)?.sys_error_name.as_deref())
    }

    /// Quantity position holding `role`, if any.
    pub fn role_position(&self, role: GenericRole) -> Option<usize> {
        self.roles[role.slot()]
    }

    pub fn combine_mode(&self) -> CombineMode {
        self.combine
    }

    pub fn region(&self) -> Option<&Ellipse> {
        self.region.as_ref()
    }

    pub fn selection_matrix(&self) -> &RowSelectionMatrix {
        &self.matrix
    }

    // ----- typed access, all rows -----

    pub(crate) fn check_row(&self, row: usize) -> Result<()> {
        let len = self.row_count();
        if row >= len {
            return Err(Error::RowOutOfRange { row, len });
        }
        Ok(())
    }

    /// Map a dense selected-row index to the underlying row. O(rows).
    pub(crate) fn selected_to_row(&self, srow: usize) -> Result<usize> {
        self.matrix
            .nth_selected(srow)
            .ok_or(Error::RowOutOfRange {
                row: srow,
                len: self.selected_rows,
            })
    }

    fn typed(&self, name: &str, expected: QuantityKind) -> Result<&Quantity> {
        let q = self.quantity(name)?;
        if q.kind != expected {
            return Err(Error::WrongQuantityKind {
                name: name.to_string(),
                expected,
                actual: q.kind,
            });
        }
        Ok(q)
    }

    pub(crate) fn numeric_column(&self, name: &str) -> Result<&[f64]> {
        let q = self.typed(name, QuantityKind::Numeric)?;
        self.columns
            .numeric(q.storage_index)
            .ok_or_else(|| Error::UnknownQuantity(name.to_string()))
    }

    pub(crate) fn string_column(&self, name: &str) -> Result<&[String]> {
        let q = self.typed(name, QuantityKind::String)?;
        self.columns
            .string(q.storage_index)
            .ok_or_else(|| Error::UnknownQuantity(name.to_string()))
    }

    pub fn get_numeric(&self, name: &str, row: usize) -> Result<f64> {
        let col = self.numeric_column(name)?;
        self.check_row(row)?;
        Ok(col[row])
    }

    pub fn get_string(&self, name: &str, row: usize) -> Result<&str> {
        let col = self.string_column(name)?;
        self.check_row(row)?;
        Ok(&col[row])
    }

    pub fn get_value(&self, name: &str, row: usize) -> Result<Value> {
        match self.quantity(name)?.kind {
            QuantityKind::Numeric => self.get_numeric(name, row).map(Value::Numeric),
            QuantityKind::String => self
                .get_string(name, row)
                .map(|s| Value::Text(s.to_string())),
            QuantityKind::Vector => Err(Error::UnsupportedColumnKind(name.to_string())),
        }
    }

    fn linked_error(&self, name: &str, row: usize, stat: bool) -> Result<f64> {
        let q = self.quantity(name)?;
        let linked = if stat {
            q.stat_error_name.as_deref()
        } else {
            q.sys_error_name.as_deref()
        };
        let linked = linked.ok_or_else(|| Error::NoErrorQuantity(name.to_string()))?;
        self.get_numeric(linked, row)
    }

    /// Statistical uncertainty of `name` at `row`, read from its linked quantity.
    pub fn stat_error(&self, name: &str, row: usize) -> Result<f64> {
        self.linked_error(name, row, true)
    }

    pub fn sys_error(&self, name: &str, row: usize) -> Result<f64> {
        self.linked_error(name, row, false)
    }

    // ----- typed access, selected rows -----

    pub fn get_selected_numeric(&self, name: &str, srow: usize) -> Result<f64> {
        self.numeric_column(name)?;
        let row = self.selected_to_row(srow)?;
        self.get_numeric(name, row)
    }

    pub fn get_selected_string(&self, name: &str, srow: usize) -> Result<&str> {
        self.string_column(name)?;
        let row = self.selected_to_row(srow)?;
        self.get_string(name, row)
    }

    pub fn get_selected_value(&self, name: &str, srow: usize) -> Result<Value> {
        self.quantity(name)?;
        let row = self.selected_to_row(srow)?;
        self.get_value(name, row)
    }

    pub fn selected_stat_error(&self, name: &str, srow: usize) -> Result<f64> {
        self.quantity(name)?;
        let row = self.selected_to_row(srow)?;
        self.stat_error(name, row)
    }

    pub fn selected_sys_error(&self, name: &str, srow: usize) -> Result<f64> {
        self.quantity(name)?;
        let row = self.selected_to_row(srow)?;
        self.sys_error(name, row)
    }

    // ----- ranges and distinct values -----

    pub fn min_value(&self, name: &str) -> Result<Option<f64>> {
        let col = self.numeric_column(name)?;
        Ok(extreme(col.iter().copied(), |v, acc| v < acc))
    }

    pub fn max_value(&self, name: &str) -> Result<Option<f64>> {
        let col = self.numeric_column(name)?;
        Ok(extreme(col.iter().copied(), |v, acc| v > acc))
    }

    pub fn selected_min_value(&self, name: &str) -> Result<Option<f64>> {
        let col = self.numeric_column(name)?;
        let values = self.matrix.selected_rows().map(|r| col[r]);
        Ok(extreme(values, |v, acc| v < acc))
    }

    pub fn selected_max_value(&self, name: &str) -> Result<Option<f64>> {
        let col = self.numeric_column(name)?;
        let values = self.matrix.selected_rows().map(|r| col[r]);
        Ok(extreme(values, |v, acc| v > acc))
    }

    /// Distinct values in order of first appearance.
    pub fn distinct_string_values(&self, name: &str) -> Result<Vec<String>> {
        let col = self.string_column(name)?;
        Ok(distinct(col.iter()))
    }

    pub fn selected_distinct_string_values(&self, name: &str) -> Result<Vec<String>> {
        let col = self.string_column(name)?;
        Ok(distinct(self.matrix.selected_rows().map(|r| &col[r])))
    }
}

/// Fold ignoring NaN; the first non-NaN value seeds the accumulator.
/// `None` when there is no non-NaN value.
fn extreme<I, F>(values: I, better: F) -> Option<f64>
where
    I: Iterator<Item = f64>,
    F: Fn(f64, f64) -> bool,
{
    values.filter(|v| !v.is_nan()).fold(None, |acc, v| match acc {
        None => Some(v),
        Some(a) if better(v, a) => Some(v),
        keep => keep,
    })
}

// Linear de-duplication; fine for role/flag columns, not for free text.
fn distinct<'a, I>(values: I) -> Vec<String>
where
    I: Iterator<Item = &'a String>,
{
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.iter().any(|seen| seen == v) {
            out.push(v.clone());
        }
    }
    out
}

//! Selection engine: criteria mutation and incremental bit recomputation.
//!
//! Every entry point validates first, returns early when the configuration
//! does not change, and with rows loaded recomputes only the changed
//! quantity's (or the region's) bit before refreshing the aggregate bit.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use catsel_core::config::CombineMode;
use catsel_core::error::{Error, Result};
use catsel_core::quantity::{normalize_cut, GenericRole, QuantityKind};
use catsel_select::{
    combine, evaluate_region, numeric_passes, quantity_bit, string_passes, Ellipse,
    AGGREGATE_BIT, REGION_BIT,
};

use crate::catalog::Catalog;

/// Whether a string list keeps or drops its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringListMode {
    #[default]
    UseOnly,
    Exclude,
}

#[derive(Clone, Copy)]
enum Bound {
    Lower,
    Upper,
}

impl Catalog {
    fn position_of_kind(&self, name: &str, expected: QuantityKind) -> Result<usize> {
        self.ensure_imported()?;
        let pos = self.quantity_index_by_name(name)?;
        let actual = self.quantities[pos].kind;
        if actual != expected {
            return Err(Error::WrongQuantityKind {
                name: name.to_string(),
                expected,
                actual,
            });
        }
        Ok(pos)
    }

    fn set_bound(&mut self, name: &str, bound: Bound, value: Option<f64>) -> Result<()> {
        let pos = self.position_of_kind(name, QuantityKind::Numeric)?;
        let criteria = &mut self.quantities[pos].criteria;
        let slot = match bound {
            Bound::Lower => &mut criteria.lower_cut,
            Bound::Upper => &mut criteria.upper_cut,
        };
        if *slot == value {
            return Ok(());
        }
        *slot = value;
        match value {
            Some(v) => info!(quantity = %name, cut = v, "enabling cut"),
            None => info!(quantity = %name, "disabling cut"),
        }
        self.after_quantity_change(pos, value.is_none());
        Ok(())
    }

    /// Lower bound (inclusive). `NO_CUT` or NaN unsets it.
    pub fn set_lower_cut(&mut self, name: &str, value: f64) -> Result<()> {
        self.set_bound(name, Bound::Lower, normalize_cut(value))
    }

    /// Upper bound (inclusive). `NO_CUT` or NaN unsets it.
    pub fn set_upper_cut(&mut self, name: &str, value: f64) -> Result<()> {
        self.set_bound(name, Bound::Upper, normalize_cut(value))
    }

    pub fn unset_lower_cut(&mut self, name: &str) -> Result<()> {
        self.set_bound(name, Bound::Lower, None)
    }

    pub fn unset_upper_cut(&mut self, name: &str) -> Result<()> {
        self.set_bound(name, Bound::Upper, None)
    }

    /// Replace the membership list of a string quantity. An empty list unsets it.
    pub fn set_string_list<I, S>(
        &mut self,
        name: &str,
        values: I,
        mode: StringListMode,
        caseless: bool,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pos = self.position_of_kind(name, QuantityKind::String)?;
        let list: Vec<String> = values.into_iter().map(Into::into).collect();
        let inclusive = mode == StringListMode::UseOnly;
        let criteria = &mut self.quantities[pos].criteria;
        let unchanged = if list.is_empty() {
            criteria.string_list.is_empty()
        } else {
            criteria.string_list == list
                && criteria.string_inclusive == inclusive
                && criteria.string_caseless == caseless
        };
        if unchanged {
            return Ok(());
        }
        let disabling = list.is_empty();
        if disabling {
            criteria.string_list.clear();
            criteria.string_inclusive = false;
            criteria.string_caseless = false;
            info!(quantity = %name, "disabling string list");
        } else {
            info!(quantity = %name, values = list.len(), ?mode, caseless, "enabling string list");
            criteria.string_list = list;
            criteria.string_inclusive = inclusive;
            criteria.string_caseless = caseless;
        }
        self.after_quantity_change(pos, disabling);
        Ok(())
    }

    pub fn use_only_strings<I, S>(&mut self, name: &str, values: I, caseless: bool) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_string_list(name, values, StringListMode::UseOnly, caseless)
    }

    pub fn exclude_strings<I, S>(&mut self, name: &str, values: I, caseless: bool) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_string_list(name, values, StringListMode::Exclude, caseless)
    }

    pub fn unset_string_list(&mut self, name: &str) -> Result<()> {
        self.set_string_list(name, Vec::<String>::new(), StringListMode::UseOnly, false)
    }

    /// Whether NaN fails an active bound of `name` (and region membership
    /// when `name` holds RA or Dec). Does not activate the quantity.
    pub fn set_reject_nan(&mut self, name: &str, reject: bool) -> Result<()> {
        let pos = self.position_of_kind(name, QuantityKind::Numeric)?;
        if self.quantities[pos].criteria.reject_nan == reject {
            return Ok(());
        }
        self.quantities[pos].criteria.reject_nan = reject;
        debug!(quantity = %name, reject, "NaN rejection changed");
        if self.row_count() == 0 {
            return Ok(());
        }
        let all = 0..self.row_count();
        if self.quantities[pos].is_active() {
            self.refresh_quantity(pos, all.clone());
        }
        let holds_position = matches!(
            self.quantities[pos].role,
            Some(GenericRole::Ra) | Some(GenericRole::Dec)
        );
        if holds_position && self.region.is_some() {
            self.refresh_region(all.clone());
        }
        self.refresh_aggregate(all);
        Ok(())
    }

    /// Drop every criterion of one quantity. `reject_nan` is kept.
    pub fn unset_cuts(&mut self, name: &str) -> Result<()> {
        self.ensure_imported()?;
        let pos = self.quantity_index_by_name(name)?;
        if !self.quantities[pos].is_active() {
            return Ok(());
        }
        self.quantities[pos].criteria.clear();
        info!(quantity = %name, "all cuts disabled");
        self.after_quantity_change(pos, true);
        Ok(())
    }

    /// Drop the criteria of every quantity. The region stays.
    pub fn unset_all_cuts(&mut self) -> Result<()> {
        self.ensure_imported()?;
        let changed: Vec<usize> = (0..self.quantities.len())
            .filter(|&p| self.quantities[p].is_active())
            .collect();
        if changed.is_empty() {
            return Ok(());
        }
        for &pos in &changed {
            self.quantities[pos].criteria.clear();
        }
        info!(quantities = changed.len(), "all quantity cuts disabled");
        if self.row_count() == 0 {
            warn!("disabling criteria with no rows loaded");
            return Ok(());
        }
        let all = 0..self.row_count();
        for pos in changed {
            self.refresh_quantity(pos, all.clone());
        }
        self.refresh_aggregate(all);
        Ok(())
    }

    /// Select rows within `major_axis_deg` of the ellipse center.
    pub fn set_region(&mut self, ellipse: Ellipse) -> Result<()> {
        self.ensure_imported()?;
        if self.role_position(GenericRole::Ra).is_none()
            || self.role_position(GenericRole::Dec).is_none()
        {
            return Err(Error::MissingPositionRoles(format!(
                "catalog '{}' has no RA/Dec quantities",
                self.info.code
            )));
        }
        ellipse.validate()?;
        if self.region == Some(ellipse) {
            return Ok(());
        }
        if ellipse.rotation_deg > 0.0 {
            warn!(rotation = ellipse.rotation_deg, "ellipse rotation ignored");
        }
        if ellipse.is_elongated() {
            warn!(
                major = ellipse.major_axis_deg,
                minor = ellipse.minor_axis_deg,
                "ellipse axes differ, using major axis as circle radius"
            );
        }
        self.region = Some(ellipse);
        self.geometry = Some(ellipse.geometry());
        info!(
            ra = ellipse.center_ra_deg,
            dec = ellipse.center_dec_deg,
            radius = ellipse.major_axis_deg,
            "selection ellipse set"
        );
        if self.row_count() == 0 {
            return Ok(());
        }
        let all = 0..self.row_count();
        self.refresh_region(all.clone());
        self.refresh_aggregate(all);
        Ok(())
    }

    pub fn unset_region(&mut self) -> Result<()> {
        self.ensure_imported()?;
        if self.region.take().is_none() {
            return Ok(());
        }
        self.geometry = None;
        info!("selection ellipse disabled");
        if self.row_count() == 0 {
            warn!("disabling region with no rows loaded");
            return Ok(());
        }
        self.refresh_aggregate(0..self.row_count());
        Ok(())
    }

    /// Switch between AND and OR combination; recomputes every aggregate bit.
    pub fn set_combine_mode(&mut self, mode: CombineMode) -> Result<()> {
        if self.combine == mode {
            return Ok(());
        }
        self.combine = mode;
        info!(%mode, "criteria combine mode changed");
        if self.row_count() > 0 {
            self.refresh_aggregate(0..self.row_count());
        }
        Ok(())
    }

    pub fn is_row_selected(&self, row: usize) -> Result<bool> {
        self.ensure_imported()?;
        self.check_row(row)?;
        Ok(self.matrix.is_selected(row))
    }

    // ----- recomputation -----

    fn after_quantity_change(&mut self, pos: usize, disabling: bool) {
        if self.row_count() == 0 {
            if disabling {
                warn!(quantity = %self.quantities[pos].name, "disabling criterion with no rows loaded");
            }
            return;
        }
        let all = 0..self.row_count();
        self.refresh_quantity(pos, all.clone());
        self.refresh_aggregate(all);
    }

    fn quantity_verdict(&self, pos: usize, row: usize) -> bool {
        let q = &self.quantities[pos];
        match q.kind {
            QuantityKind::Numeric => self
                .columns
                .numeric(q.storage_index)
                .map_or(true, |col| numeric_passes(col[row], &q.criteria)),
            QuantityKind::String => self
                .columns
                .string(q.storage_index)
                .map_or(true, |col| string_passes(&col[row], &q.criteria)),
            QuantityKind::Vector => true,
        }
    }

    fn region_verdict(&self, row: usize) -> bool {
        let (Some(geometry), Some(ra_pos), Some(dec_pos)) = (
            self.geometry.as_ref(),
            self.role_position(GenericRole::Ra),
            self.role_position(GenericRole::Dec),
        ) else {
            return true;
        };
        let ra = &self.quantities[ra_pos];
        let dec = &self.quantities[dec_pos];
        let (Some(ra_col), Some(dec_col)) = (
            self.columns.numeric(ra.storage_index),
            self.columns.numeric(dec.storage_index),
        ) else {
            return false;
        };
        evaluate_region(
            ra_col[row],
            dec_col[row],
            geometry,
            ra.criteria.reject_nan,
            dec.criteria.reject_nan,
        )
    }

    pub(crate) fn refresh_quantity(&mut self, pos: usize, rows: Range<usize>) {
        for row in rows {
            let pass = self.quantity_verdict(pos, row);
            self.matrix.set_bit(row, quantity_bit(pos), pass);
        }
    }

    pub(crate) fn refresh_region(&mut self, rows: Range<usize>) {
        for row in rows {
            let pass = self.region_verdict(row);
            self.matrix.set_bit(row, REGION_BIT, pass);
        }
    }

    /// Recompute bit 0 over `rows` from the currently active criteria and
    /// recount the selected rows.
    pub(crate) fn refresh_aggregate(&mut self, rows: Range<usize>) {
        let active: Vec<usize> = (0..self.quantities.len())
            .filter(|&p| self.quantities[p].is_active())
            .collect();
        let region_active = self.region.is_some();
        for row in rows {
            let m = &self.matrix;
            let verdicts = active
                .iter()
                .map(|&p| m.quantity_passes(row, p))
                .chain(region_active.then(|| m.region_bit(row)));
            let selected = combine(self.combine, verdicts);
            self.matrix.set_bit(row, AGGREGATE_BIT, selected);
        }
        self.selected_rows = self.matrix.selected_count();
    }

    /// Evaluate freshly appended rows against the configured criteria.
    pub(crate) fn evaluate_rows(&mut self, rows: Range<usize>) {
        if rows.is_empty() {
            return;
        }
        for pos in 0..self.quantities.len() {
            if self.quantities[pos].is_active() {
                self.refresh_quantity(pos, rows.clone());
            }
        }
        if self.region.is_some() {
            self.refresh_region(rows.clone());
        }
        self.refresh_aggregate(rows);
    }
}

#[cfg(test)]
mod tests {
    use catsel_core::quantity::QuantityDescriptor;

    use super::*;
    use crate::catalog::CatalogInfo;

    fn flux_catalog() -> Catalog {
        Catalog::from_columns(
            CatalogInfo::default(),
            vec![
                QuantityDescriptor::numeric("flux"),
                QuantityDescriptor::string("class"),
            ],
            vec![vec![5.0, f64::NAN, 25.0, 60.0]],
            vec![vec!["AGN".into(), "QSO".into(), "Agn".into(), "star".into()]],
        )
        .unwrap()
    }

    fn selected(cat: &Catalog) -> Vec<bool> {
        (0..cat.row_count())
            .map(|r| cat.is_row_selected(r).unwrap())
            .collect()
    }

    #[test]
    fn new_rows_start_selected() {
        let cat = flux_catalog();
        assert_eq!(cat.selected_row_count(), 4);
    }

    #[test]
    fn cut_then_reject_nan() {
        let mut cat = flux_catalog();
        cat.set_lower_cut("flux", 10.0).unwrap();
        cat.set_upper_cut("flux", 50.0).unwrap();
        assert_eq!(selected(&cat), vec![false, true, true, false]);
        cat.set_reject_nan("flux", true).unwrap();
        assert_eq!(selected(&cat), vec![false, false, true, false]);
        assert_eq!(cat.selected_row_count(), 1);
    }

    #[test]
    fn unsetting_last_criterion_selects_everything() {
        let mut cat = flux_catalog();
        cat.set_lower_cut("flux", 100.0).unwrap();
        assert_eq!(cat.selected_row_count(), 0);
        cat.unset_lower_cut("flux").unwrap();
        assert_eq!(cat.selected_row_count(), 4);
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let mut cat = flux_catalog();
        assert!(matches!(
            cat.set_lower_cut("class", 1.0),
            Err(Error::WrongQuantityKind { .. })
        ));
        assert!(matches!(
            cat.use_only_strings("flux", ["x"], false),
            Err(Error::WrongQuantityKind { .. })
        ));
        assert!(matches!(
            cat.set_lower_cut("nope", 1.0),
            Err(Error::UnknownQuantity(_))
        ));
    }

    #[test]
    fn criteria_before_rows_apply_on_append() {
        let mut cat = Catalog::new();
        cat.begin_import(CatalogInfo::default(), vec![QuantityDescriptor::numeric("x")])
            .unwrap();
        cat.set_upper_cut("x", 2.0).unwrap();
        cat.append_column_block(vec![vec![1.0, 3.0]], vec![]).unwrap();
        cat.append_column_block(vec![vec![2.0, 4.0]], vec![]).unwrap();
        assert_eq!(selected(&cat), vec![true, false, true, false]);
    }

    #[test]
    fn region_without_roles_fails() {
        let mut cat = flux_catalog();
        assert!(matches!(
            cat.set_region(Ellipse::circle(0.0, 0.0, 1.0)),
            Err(Error::MissingPositionRoles(_))
        ));
    }

    #[test]
    fn not_imported_catalog_rejects_mutation() {
        let mut cat = Catalog::new();
        assert!(matches!(
            cat.set_lower_cut("x", 1.0),
            Err(Error::NotImported(_))
        ));
        assert!(matches!(cat.unset_region(), Err(Error::NotImported(_))));
    }
}

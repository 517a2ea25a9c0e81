//! Row compaction and sorting. Both rebuild the column store and the
//! selection matrix inside one `&mut self` call so readers never see them
//! out of step.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use catsel_core::error::Result;
use catsel_core::quantity::QuantityKind;
use catsel_core::value::numeric_cmp;

use crate::catalog::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl Catalog {
    /// Erase unselected rows. Returns the number of rows removed.
    ///
    /// With `keep_criteria == false` the cuts, lists, and region are cleared
    /// and every remaining row is marked selected.
    pub fn retain_selected(&mut self, keep_criteria: bool) -> Result<usize> {
        self.compact(true, keep_criteria)
    }

    /// Erase selected rows. Returns the number of rows removed.
    pub fn retain_unselected(&mut self, keep_criteria: bool) -> Result<usize> {
        self.compact(false, keep_criteria)
    }

    fn compact(&mut self, keep_selected: bool, keep_criteria: bool) -> Result<usize> {
        self.ensure_imported()?;
        let before = self.row_count();
        let mut keep = self.matrix.aggregate_mask();
        if !keep_selected {
            keep.iter_mut().for_each(|k| *k = !*k);
        }
        let kept = keep.iter().filter(|k| **k).count();
        let removed = before - kept;

        if before == 0 {
            warn!("catalog is empty, nothing to erase");
        } else if removed == 0 {
            warn!(rows = before, "no row matches, nothing to erase");
        } else {
            self.columns.retain_rows(&keep)?;
            self.matrix.retain_rows(&keep)?;
            info!(removed, rows = kept, "rows deleted");
        }

        if keep_criteria {
            if removed > 0 {
                self.selected_rows = self.matrix.selected_count();
            }
        } else {
            for q in &mut self.quantities {
                q.criteria.clear();
            }
            self.region = None;
            self.geometry = None;
            self.matrix.reset(true);
            self.selected_rows = self.row_count();
        }
        Ok(removed)
    }

    /// Stable reorder of every row by one quantity. NaN sorts last in both
    /// directions; strings compare bytewise.
    pub fn sort_by(&mut self, name: &str, order: SortOrder) -> Result<()> {
        let q = self.quantity(name)?;
        let mut perm: Vec<usize> = (0..self.row_count()).collect();
        match q.kind {
            QuantityKind::Numeric => {
                let col = self.numeric_column(name)?;
                perm.sort_by(|&a, &b| {
                    let (x, y) = (col[a], col[b]);
                    match (x.is_nan(), y.is_nan(), order) {
                        (false, false, SortOrder::Descending) => numeric_cmp(y, x),
                        _ => numeric_cmp(x, y),
                    }
                });
            }
            QuantityKind::String => {
                let col = self.string_column(name)?;
                perm.sort_by(|&a, &b| directed(col[a].cmp(&col[b]), order));
            }
            QuantityKind::Vector => {
                return Err(catsel_core::error::Error::UnsupportedColumnKind(
                    name.to_string(),
                ))
            }
        }
        self.columns.permute_rows(&perm)?;
        self.matrix.permute_rows(&perm)?;
        info!(quantity = %name, ?order, rows = perm.len(), "catalog sorted");
        Ok(())
    }
}

fn directed(ord: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Ascending => ord,
        SortOrder::Descending => ord.reverse(),
    }
}

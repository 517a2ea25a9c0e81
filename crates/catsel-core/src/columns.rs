//! Type-partitioned column storage with a single row count.
//!
//! Every inner vector always has exactly `rows` elements. All operations that
//! change the row count touch every column before returning, and growth
//! reserves capacity for all columns before any length changes, so a failed
//! allocation leaves the store exactly as it was.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnStore {
    numeric: Vec<Vec<f64>>,
    strings: Vec<Vec<String>>,
    rows: usize,
}

impl ColumnStore {
    /// Empty store with the given column banks and zero rows.
    pub fn new(numeric_columns: usize, string_columns: usize) -> Self {
        Self {
            numeric: vec![Vec::new(); numeric_columns],
            strings: vec![Vec::new(); string_columns],
            rows: 0,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn numeric_width(&self) -> usize {
        self.numeric.len()
    }

    pub fn string_width(&self) -> usize {
        self.strings.len()
    }

    pub fn numeric(&self, index: usize) -> Option<&[f64]> {
        self.numeric.get(index).map(Vec::as_slice)
    }

    pub fn string(&self, index: usize) -> Option<&[String]> {
        self.strings.get(index).map(Vec::as_slice)
    }

    /// Reserve room for `additional` more rows in every column.
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        let target = self.rows.saturating_add(additional);
        for col in &mut self.numeric {
            col.try_reserve(additional)
                .map_err(|_| Error::AllocationFailure {
                    what: "numeric columns",
                    rows: target,
                })?;
        }
        for col in &mut self.strings {
            col.try_reserve(additional)
                .map_err(|_| Error::AllocationFailure {
                    what: "string columns",
                    rows: target,
                })?;
        }
        Ok(())
    }

    /// Append a block of rows given column-wise. Returns the number of rows added.
    ///
    /// The block must provide one vector per column of each bank, all of the
    /// same length. Nothing is appended if validation or reservation fails.
    pub fn append_block(
        &mut self,
        numeric: Vec<Vec<f64>>,
        strings: Vec<Vec<String>>,
    ) -> Result<usize> {
        if numeric.len() != self.numeric.len() || strings.len() != self.strings.len() {
            return Err(Error::ColumnLengthMismatch(format!(
                "block has {} numeric and {} string columns, store has {} and {}",
                numeric.len(),
                strings.len(),
                self.numeric.len(),
                self.strings.len()
            )));
        }

        let added = numeric
            .first()
            .map(Vec::len)
            .or_else(|| strings.first().map(Vec::len))
            .unwrap_or(0);
        let uneven = numeric.iter().map(Vec::len).any(|n| n != added)
            || strings.iter().map(Vec::len).any(|n| n != added);
        if uneven {
            return Err(Error::ColumnLengthMismatch(format!(
                "block columns do not all have {} rows",
                added
            )));
        }

        self.try_reserve(added)?;
        for (col, block) in self.numeric.iter_mut().zip(numeric) {
            col.extend(block);
        }
        for (col, block) in self.strings.iter_mut().zip(strings) {
            col.extend(block);
        }
        self.rows += added;
        Ok(added)
    }

    /// Release capacity beyond the current row count.
    pub fn shrink_to_fit(&mut self) {
        for col in &mut self.numeric {
            col.shrink_to_fit();
        }
        for col in &mut self.strings {
            col.shrink_to_fit();
        }
    }

    /// Keep only the rows whose `keep` flag is set, preserving order.
    pub fn retain_rows(&mut self, keep: &[bool]) -> Result<usize> {
        if keep.len() != self.rows {
            return Err(Error::ColumnLengthMismatch(format!(
                "retain mask has {} entries for {} rows",
                keep.len(),
                self.rows
            )));
        }
        for col in &mut self.numeric {
            let mut i = 0;
            col.retain(|_| {
                let k = keep[i];
                i += 1;
                k
            });
        }
        for col in &mut self.strings {
            let mut i = 0;
            col.retain(|_| {
                let k = keep[i];
                i += 1;
                k
            });
        }
        self.rows = keep.iter().filter(|k| **k).count();
        Ok(self.rows)
    }

    /// Reorder rows so that new row `i` is old row `order[i]`.
    pub fn permute_rows(&mut self, order: &[usize]) -> Result<()> {
        if order.len() != self.rows || order.iter().any(|&r| r >= self.rows) {
            return Err(Error::ColumnLengthMismatch(format!(
                "permutation of {} entries does not cover {} rows",
                order.len(),
                self.rows
            )));
        }
        for col in &mut self.numeric {
            let reordered: Vec<f64> = order.iter().map(|&r| col[r]).collect();
            *col = reordered;
        }
        for col in &mut self.strings {
            let mut taken: Vec<Option<String>> = col.drain(..).map(Some).collect();
            *col = order
                .iter()
                .map(|&r| taken[r].take().unwrap_or_default())
                .collect();
        }
        Ok(())
    }

    /// Drop all rows, keep the column banks.
    pub fn clear_rows(&mut self) {
        for col in &mut self.numeric {
            col.clear();
            col.shrink_to_fit();
        }
        for col in &mut self.strings {
            col.clear();
            col.shrink_to_fit();
        }
        self.rows = 0;
    }
}

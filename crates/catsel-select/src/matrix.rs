//! Bit-packed per-row selection verdicts.
//!
//! Layout contract (export/debug tooling relies on it):
//! - each row owns `words_per_row` consecutive `u64` words (its bank);
//! - bit 0 of word 0 is the aggregate verdict ("row is selected");
//! - bit 1 of word 0 is the region verdict;
//! - bit `position + 2` (packed across the bank) is the own verdict of the
//!   quantity at `position` in the catalog's quantity order.
//!
//! Word/bit arithmetic stays inside this type.

use catsel_core::error::{Error, Result};

pub const AGGREGATE_BIT: usize = 0;
pub const REGION_BIT: usize = 1;
const WORD_BITS: usize = u64::BITS as usize;

/// Bit index of the quantity at `position`.
pub fn quantity_bit(position: usize) -> usize {
    position + 2
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelectionMatrix {
    words: Vec<u64>,
    words_per_row: usize,
    quantities: usize,
    rows: usize,
}

impl RowSelectionMatrix {
    /// Empty matrix sized for `quantities` per-quantity bits.
    pub fn new(quantities: usize) -> Self {
        Self {
            words: Vec::new(),
            words_per_row: Self::words_for(quantities),
            quantities,
            rows: 0,
        }
    }

    fn words_for(quantities: usize) -> usize {
        (quantities + 2).div_ceil(WORD_BITS)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn quantities(&self) -> usize {
        self.quantities
    }

    pub fn words_per_row(&self) -> usize {
        self.words_per_row
    }

    /// Raw bank of one row, for debug dumps.
    pub fn row_words(&self, row: usize) -> Option<&[u64]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.words_per_row;
        Some(&self.words[start..start + self.words_per_row])
    }

    fn locate(&self, row: usize, bit: usize) -> Option<(usize, u64)> {
        if row >= self.rows || bit >= self.quantities + 2 {
            return None;
        }
        let word = row * self.words_per_row + bit / WORD_BITS;
        Some((word, 1u64 << (bit % WORD_BITS)))
    }

    /// Read one bit; out-of-range rows or bits read as unset.
    pub fn get_bit(&self, row: usize, bit: usize) -> bool {
        match self.locate(row, bit) {
            Some((word, mask)) => self.words[word] & mask != 0,
            None => false,
        }
    }

    /// Write one bit. Returns false (and writes nothing) when out of range.
    pub fn set_bit(&mut self, row: usize, bit: usize, value: bool) -> bool {
        match self.locate(row, bit) {
            Some((word, mask)) => {
                if value {
                    self.words[word] |= mask;
                } else {
                    self.words[word] &= !mask;
                }
                true
            }
            None => false,
        }
    }

    pub fn is_selected(&self, row: usize) -> bool {
        self.get_bit(row, AGGREGATE_BIT)
    }

    pub fn region_bit(&self, row: usize) -> bool {
        self.get_bit(row, REGION_BIT)
    }

    pub fn quantity_passes(&self, row: usize, position: usize) -> bool {
        self.get_bit(row, quantity_bit(position))
    }

    /// Reserve banks for `additional` more rows without changing the row count.
    pub fn try_reserve_rows(&mut self, additional: usize) -> Result<()> {
        self.words
            .try_reserve(additional.saturating_mul(self.words_per_row))
            .map_err(|_| Error::AllocationFailure {
                what: "selection matrix",
                rows: self.rows.saturating_add(additional),
            })
    }

    /// Append `additional` all-zero rows; nothing changes on allocation failure.
    pub fn try_append_rows(&mut self, additional: usize) -> Result<()> {
        let extra = additional.saturating_mul(self.words_per_row);
        self.words
            .try_reserve(extra)
            .map_err(|_| Error::AllocationFailure {
                what: "selection matrix",
                rows: self.rows.saturating_add(additional),
            })?;
        self.words.resize(self.words.len() + extra, 0);
        self.rows += additional;
        Ok(())
    }

    /// Keep only rows whose flag is set, preserving order.
    pub fn retain_rows(&mut self, keep: &[bool]) -> Result<usize> {
        if keep.len() != self.rows {
            return Err(Error::ColumnLengthMismatch(format!(
                "retain mask has {} entries for {} matrix rows",
                keep.len(),
                self.rows
            )));
        }
        let wpr = self.words_per_row;
        let mut dst = 0;
        for (row, &k) in keep.iter().enumerate() {
            if k {
                if dst != row {
                    self.words.copy_within(row * wpr..(row + 1) * wpr, dst * wpr);
                }
                dst += 1;
            }
        }
        self.words.truncate(dst * wpr);
        self.rows = dst;
        Ok(dst)
    }

    /// Reorder banks so that new row `i` is old row `order[i]`.
    pub fn permute_rows(&mut self, order: &[usize]) -> Result<()> {
        if order.len() != self.rows || order.iter().any(|&r| r >= self.rows) {
            return Err(Error::ColumnLengthMismatch(format!(
                "permutation of {} entries does not cover {} matrix rows",
                order.len(),
                self.rows
            )));
        }
        let wpr = self.words_per_row;
        let mut words = Vec::with_capacity(self.words.len());
        for &r in order {
            words.extend_from_slice(&self.words[r * wpr..(r + 1) * wpr]);
        }
        self.words = words;
        Ok(())
    }

    /// Zero every bit, then set the aggregate bit of every row to `selected`.
    pub fn reset(&mut self, selected: bool) {
        self.words.iter_mut().for_each(|w| *w = 0);
        if selected {
            for row in 0..self.rows {
                self.words[row * self.words_per_row] |= 1;
            }
        }
    }

    pub fn shrink_to_fit(&mut self) {
        self.words.shrink_to_fit();
    }

    pub fn clear_rows(&mut self) {
        self.words.clear();
        self.words.shrink_to_fit();
        self.rows = 0;
    }

    pub fn selected_count(&self) -> usize {
        (0..self.rows).filter(|&r| self.is_selected(r)).count()
    }

    /// Row index of the `n`-th selected row (dense selected numbering).
    pub fn nth_selected(&self, n: usize) -> Option<usize> {
        (0..self.rows).filter(|&r| self.is_selected(r)).nth(n)
    }

    pub fn selected_rows(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.rows).filter(move |&r| self.is_selected(r))
    }

    /// Aggregate bit of every row, as a compaction mask.
    pub fn aggregate_mask(&self) -> Vec<bool> {
        (0..self.rows).map(|r| self.is_selected(r)).collect()
    }
}

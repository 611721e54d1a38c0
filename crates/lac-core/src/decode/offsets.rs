//! # Batch Offset Table
//!
//! A batch of variable-length sequences is packed into one flat array; the
//! offset table records where each sequence starts. Sequence `i` occupies
//! `offsets[i]..offsets[i + 1]`, and the last offset is the flat length.

use std::ops::Range;

use crate::error::{LacError, Result};

/// Prefix-sum offsets for a batch of `N` sequences (`N + 1` entries).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetTable {
    offsets: Vec<usize>,
}

impl Default for OffsetTable {
    fn default() -> Self {
        Self { offsets: vec![0] }
    }
}

impl OffsetTable {
    /// An empty batch: `[0]`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from per-sequence lengths.
    ///
    /// # Examples
    /// ```
    /// use lac_core::decode::OffsetTable;
    ///
    /// let table = OffsetTable::build([3, 0, 2]);
    /// assert_eq!(table.as_slice(), &[0, 3, 3, 5]);
    /// assert_eq!(table.total(), 5);
    /// ```
    pub fn build<I>(lengths: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut table = Self::new();
        for len in lengths {
            table.push(len);
        }
        table
    }

    /// Adopt raw offsets, checking that they start at 0 and never decrease.
    pub fn from_offsets(offsets: Vec<usize>) -> Result<Self> {
        match offsets.first() {
            None => return Err(LacError::InvalidOffsets("table is empty".into())),
            Some(&first) if first != 0 => {
                return Err(LacError::InvalidOffsets(format!(
                    "first offset is {first}, expected 0"
                )));
            }
            Some(_) => {}
        }
        if let Some(i) = offsets.windows(2).position(|w| w[1] < w[0]) {
            return Err(LacError::InvalidOffsets(format!(
                "offset {} ({}) is smaller than offset {} ({})",
                i + 1,
                offsets[i + 1],
                i,
                offsets[i]
            )));
        }
        Ok(Self { offsets })
    }

    /// Append a sequence of `len` tokens.
    pub fn push(&mut self, len: usize) {
        let last = self.total();
        self.offsets.push(last + len);
    }

    /// Reset to an empty batch, keeping the allocation.
    pub fn clear(&mut self) {
        self.offsets.clear();
        self.offsets.push(0);
    }

    /// Number of sequences in the batch.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Returns `true` if the batch has no sequences.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total flat token count.
    pub fn total(&self) -> usize {
        self.offsets.last().copied().unwrap_or(0)
    }

    /// The raw offsets.
    pub fn as_slice(&self) -> &[usize] {
        &self.offsets
    }

    /// Flat index range of sequence `index`.
    pub fn range(&self, index: usize) -> Result<Range<usize>> {
        if index >= self.len() {
            return Err(LacError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(self.offsets[index]..self.offsets[index + 1])
    }

    /// Length of sequence `index`.
    pub fn seq_len(&self, index: usize) -> Result<usize> {
        self.range(index).map(|r| r.len())
    }

    /// Iterate over the flat ranges of all sequences in order.
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.offsets.windows(2).map(|w| w[0]..w[1])
    }

    /// Fail unless a flat array of `len` items matches this table.
    pub fn check_flat(&self, context: &'static str, len: usize) -> Result<()> {
        if len != self.total() {
            return Err(LacError::LengthMismatch {
                context,
                expected: self.total(),
                actual: len,
            });
        }
        Ok(())
    }

    /// The slice of `flat` belonging to sequence `index`.
    pub fn slice<'a, T>(&self, flat: &'a [T], index: usize) -> Result<&'a [T]> {
        let range = self.range(index)?;
        flat.get(range).ok_or(LacError::LengthMismatch {
            context: "flat array",
            expected: self.total(),
            actual: flat.len(),
        })
    }
}

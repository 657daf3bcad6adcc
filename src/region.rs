//! Transformable regions: write-capable translated fragments
//!
//! A region borrows a backing store mutably and implements the write
//! contract through a pure coordinate translation, so multiply kernels and
//! bulk transfers deposit results directly where they belong with no
//! copy/merge step. Writes land in the backing store immediately; there is
//! no buffering.
//!
//! Regions compose by nesting: an [`OffsetRegion`] over a [`LimitRegion`]
//! addresses an interior rectangle, a [`TransposedRegion`] over an offset
//! deposits a transposed block, and so on. Each layer only subtracts,
//! clamps, swaps or maps coordinates before delegating.

use crate::error::{Error, Result};
use crate::scalar::Scalar;
use crate::store::{Mutate, Structure};

/// Identity region covering the whole backing store
pub struct FullRegion<'a, S> {
    base: &'a mut S,
}

impl<'a, S: Structure> FullRegion<'a, S> {
    /// Wrap the whole of `base`
    pub fn new(base: &'a mut S) -> Self {
        Self { base }
    }
}

impl<S: Structure> Structure for FullRegion<'_, S> {
    fn rows(&self) -> usize {
        self.base.rows()
    }

    fn cols(&self) -> usize {
        self.base.cols()
    }
}

impl<T: Scalar, S: Mutate<T>> Mutate<T> for FullRegion<'_, S> {
    fn set(&mut self, row: usize, col: usize, value: T) {
        self.base.set(row, col, value);
    }

    fn add(&mut self, row: usize, col: usize, value: T) {
        self.base.add(row, col, value);
    }

    fn reset(&mut self) {
        self.base.reset();
    }
}

/// Region shifted by a constant (row, col) offset
///
/// Covers the rectangle from the offset to the backing store's far corner.
pub struct OffsetRegion<'a, S> {
    base: &'a mut S,
    row_offset: usize,
    col_offset: usize,
}

impl<'a, S: Structure> OffsetRegion<'a, S> {
    /// Shift `base` by `(row_offset, col_offset)`
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] when an offset exceeds the
    /// corresponding dimension.
    pub fn new(base: &'a mut S, row_offset: usize, col_offset: usize) -> Result<Self> {
        if row_offset > base.rows() {
            return Err(Error::IndexOutOfBounds {
                index: row_offset,
                size: base.rows(),
            });
        }
        if col_offset > base.cols() {
            return Err(Error::IndexOutOfBounds {
                index: col_offset,
                size: base.cols(),
            });
        }
        Ok(Self {
            base,
            row_offset,
            col_offset,
        })
    }
}

impl<S: Structure> Structure for OffsetRegion<'_, S> {
    fn rows(&self) -> usize {
        self.base.rows() - self.row_offset
    }

    fn cols(&self) -> usize {
        self.base.cols() - self.col_offset
    }
}

impl<T: Scalar, S: Mutate<T>> Mutate<T> for OffsetRegion<'_, S> {
    fn set(&mut self, row: usize, col: usize, value: T) {
        self.base
            .set(row + self.row_offset, col + self.col_offset, value);
    }

    fn add(&mut self, row: usize, col: usize, value: T) {
        self.base
            .add(row + self.row_offset, col + self.col_offset, value);
    }

    fn reset(&mut self) {
        for c in 0..self.cols() {
            for r in 0..self.rows() {
                self.set(r, c, T::ZERO);
            }
        }
    }
}

/// Region clamped to the top-left `rows` x `cols` rectangle
pub struct LimitRegion<'a, S> {
    base: &'a mut S,
    rows: usize,
    cols: usize,
}

impl<'a, S: Structure> LimitRegion<'a, S> {
    /// Clamp `base` to `rows` x `cols`
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] when a limit exceeds the
    /// corresponding dimension.
    pub fn new(base: &'a mut S, rows: usize, cols: usize) -> Result<Self> {
        if rows > base.rows() {
            return Err(Error::IndexOutOfBounds {
                index: rows,
                size: base.rows(),
            });
        }
        if cols > base.cols() {
            return Err(Error::IndexOutOfBounds {
                index: cols,
                size: base.cols(),
            });
        }
        Ok(Self { base, rows, cols })
    }
}

impl<S: Structure> Structure for LimitRegion<'_, S> {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }
}

impl<T: Scalar, S: Mutate<T>> Mutate<T> for LimitRegion<'_, S> {
    fn set(&mut self, row: usize, col: usize, value: T) {
        debug_assert!(row < self.rows && col < self.cols);
        self.base.set(row, col, value);
    }

    fn add(&mut self, row: usize, col: usize, value: T) {
        debug_assert!(row < self.rows && col < self.cols);
        self.base.add(row, col, value);
    }

    fn reset(&mut self) {
        for c in 0..self.cols {
            for r in 0..self.rows {
                self.base.set(r, c, T::ZERO);
            }
        }
    }
}

/// Region with swapped coordinates: a write at `(r, c)` lands at `(c, r)`
pub struct TransposedRegion<'a, S> {
    base: &'a mut S,
}

impl<'a, S: Structure> TransposedRegion<'a, S> {
    /// Transpose the write side of `base`
    pub fn new(base: &'a mut S) -> Self {
        Self { base }
    }
}

impl<S: Structure> Structure for TransposedRegion<'_, S> {
    fn rows(&self) -> usize {
        self.base.cols()
    }

    fn cols(&self) -> usize {
        self.base.rows()
    }
}

impl<T: Scalar, S: Mutate<T>> Mutate<T> for TransposedRegion<'_, S> {
    fn set(&mut self, row: usize, col: usize, value: T) {
        self.base.set(col, row, value);
    }

    fn add(&mut self, row: usize, col: usize, value: T) {
        self.base.add(col, row, value);
    }

    fn reset(&mut self) {
        self.base.reset();
    }
}

/// Region with an explicit row permutation, for pivoted deposits
///
/// A write at view row `i` lands at base row `row_map[i]`.
pub struct PermutedRegion<'a, S> {
    base: &'a mut S,
    row_map: Vec<usize>,
}

impl<'a, S: Structure> PermutedRegion<'a, S> {
    /// Map view rows onto base rows through `row_map`
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] when any mapped row is outside
    /// the base store.
    pub fn new(base: &'a mut S, row_map: Vec<usize>) -> Result<Self> {
        for &r in &row_map {
            if r >= base.rows() {
                return Err(Error::IndexOutOfBounds {
                    index: r,
                    size: base.rows(),
                });
            }
        }
        Ok(Self { base, row_map })
    }
}

impl<S: Structure> Structure for PermutedRegion<'_, S> {
    fn rows(&self) -> usize {
        self.row_map.len()
    }

    fn cols(&self) -> usize {
        self.base.cols()
    }
}

impl<T: Scalar, S: Mutate<T>> Mutate<T> for PermutedRegion<'_, S> {
    fn set(&mut self, row: usize, col: usize, value: T) {
        self.base.set(self.row_map[row], col, value);
    }

    fn add(&mut self, row: usize, col: usize, value: T) {
        self.base.add(self.row_map[row], col, value);
    }

    fn reset(&mut self) {
        for c in 0..self.base.cols() {
            for r in 0..self.row_map.len() {
                let base_row = self.row_map[r];
                self.base.set(base_row, c, T::ZERO);
            }
        }
    }
}

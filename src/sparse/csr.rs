//! CSR (compressed sparse row) store
//!
//! Three parallel arrays: `values`, `col_indices` (both length nnz) and
//! `row_pointers` (length rows + 1). The entries of row `i` occupy
//! `row_pointers[i] .. row_pointers[i + 1]`, sorted by column with no
//! duplicate column inside a row.
//!
//! Multiply iterates each row block and, for every stored value, accumulates
//! into all target columns - an AXPY-style scaling pass that touches each
//! stored nonzero exactly once regardless of the right-hand-side width.

use super::csc::CscStore;
use super::SparseStructure;
use crate::dense::DenseStore;
use crate::dispatch::{self, THRESHOLD};
use crate::error::{Error, Result};
use crate::scalar::{Scalar, ZERO_TOLERANCE};
use crate::store::{Access, Mutate, Nonzeros, Structure};

/// Compressed-sparse-row store
#[derive(Debug, Clone, PartialEq)]
pub struct CsrStore<T> {
    rows: usize,
    cols: usize,
    values: Vec<T>,
    col_indices: Vec<usize>,
    row_pointers: Vec<usize>,
}

impl<T: Scalar> CsrStore<T> {
    /// Create from raw compressed arrays
    ///
    /// # Errors
    ///
    /// Returns an error when the pointer array has the wrong length, the
    /// pointers are not monotonic or do not span the value count, a column
    /// index is out of range, or a row block is not strictly increasing by
    /// column.
    pub fn new(
        rows: usize,
        cols: usize,
        row_pointers: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        if row_pointers.len() != rows + 1 {
            return Err(Error::ShapeMismatch {
                expected: vec![rows + 1],
                got: vec![row_pointers.len()],
            });
        }
        if col_indices.len() != values.len() {
            return Err(Error::ShapeMismatch {
                expected: vec![values.len()],
                got: vec![col_indices.len()],
            });
        }
        if row_pointers[0] != 0 || row_pointers[rows] != values.len() {
            return Err(Error::Internal(format!(
                "invalid row pointers: [0]={}, [{}]={}, nnz={}",
                row_pointers[0],
                rows,
                row_pointers[rows],
                values.len()
            )));
        }
        for r in 0..rows {
            let (start, end) = (row_pointers[r], row_pointers[r + 1]);
            if start > end {
                return Err(Error::Internal(format!(
                    "row pointers not monotonic at row {r}"
                )));
            }
            for p in start..end {
                let c = col_indices[p];
                if c >= cols {
                    return Err(Error::IndexOutOfBounds { index: c, size: cols });
                }
                if p > start && col_indices[p - 1] >= c {
                    return Err(Error::Internal(format!(
                        "row {r} not strictly increasing by column at position {p}"
                    )));
                }
            }
        }
        Ok(Self {
            rows,
            cols,
            values,
            col_indices,
            row_pointers,
        })
    }

    /// Create an empty store
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: Vec::new(),
            col_indices: Vec::new(),
            row_pointers: vec![0; rows + 1],
        }
    }

    /// Build from `(row, col, value)` triples in any order
    ///
    /// Values within tolerance of zero are dropped. Duplicate coordinates
    /// are an error.
    pub fn from_triplets(rows: usize, cols: usize, triplets: &[(usize, usize, T)]) -> Result<Self> {
        let mut kept: Vec<(usize, usize, T)> = Vec::with_capacity(triplets.len());
        for &(r, c, v) in triplets {
            if r >= rows {
                return Err(Error::IndexOutOfBounds { index: r, size: rows });
            }
            if c >= cols {
                return Err(Error::IndexOutOfBounds { index: c, size: cols });
            }
            if !v.is_small(ZERO_TOLERANCE) {
                kept.push((r, c, v));
            }
        }

        let mut counts = vec![0usize; rows];
        for &(r, _, _) in &kept {
            counts[r] += 1;
        }
        let mut row_pointers = vec![0usize; rows + 1];
        for r in 0..rows {
            row_pointers[r + 1] = row_pointers[r] + counts[r];
        }

        let nnz = kept.len();
        let mut cursor: Vec<usize> = row_pointers[..rows].to_vec();
        let mut col_indices = vec![0usize; nnz];
        let mut values = vec![T::ZERO; nnz];
        for &(r, c, v) in &kept {
            let slot = cursor[r];
            cursor[r] += 1;
            col_indices[slot] = c;
            values[slot] = v;
        }

        // Order each row block by column and reject duplicates
        let mut order: Vec<usize> = Vec::new();
        for r in 0..rows {
            let (start, end) = (row_pointers[r], row_pointers[r + 1]);
            order.clear();
            order.extend(start..end);
            order.sort_unstable_by_key(|&p| col_indices[p]);

            let sorted_cols: Vec<usize> = order.iter().map(|&p| col_indices[p]).collect();
            let sorted_vals: Vec<T> = order.iter().map(|&p| values[p]).collect();
            for w in sorted_cols.windows(2) {
                if w[0] == w[1] {
                    return Err(Error::Internal(format!(
                        "duplicate entry at ({r}, {})",
                        w[0]
                    )));
                }
            }
            col_indices[start..end].copy_from_slice(&sorted_cols);
            values[start..end].copy_from_slice(&sorted_vals);
        }

        Self::new(rows, cols, row_pointers, col_indices, values)
    }

    pub(super) fn from_parts_unchecked(
        rows: usize,
        cols: usize,
        row_pointers: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        Self {
            rows,
            cols,
            values,
            col_indices,
            row_pointers,
        }
    }

    /// First stored column index of `row`, if the row is not empty
    pub fn first_in_row(&self, row: usize) -> Option<usize> {
        let (start, end) = (self.row_pointers[row], self.row_pointers[row + 1]);
        (start < end).then(|| self.col_indices[start])
    }

    /// One past the last stored column index of `row`, or 0 for an empty row
    pub fn limit_of_row(&self, row: usize) -> usize {
        let (start, end) = (self.row_pointers[row], self.row_pointers[row + 1]);
        if start < end {
            self.col_indices[end - 1] + 1
        } else {
            0
        }
    }

    /// The row pointer array, length `rows + 1`
    pub fn row_pointers(&self) -> &[usize] {
        &self.row_pointers
    }

    /// The stored column indices, length `nnz`
    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    /// The stored values, length `nnz`
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Convert to CSC losslessly
    ///
    /// Counts entries per column, builds prefix-sum pointers, then scatters
    /// the row traversal into destination slots through a per-column cursor.
    /// One linear pass, no sort: visiting rows in order delivers each
    /// column's entries already sorted by row.
    pub fn to_csc(&self) -> CscStore<T> {
        let nnz = self.values.len();
        let mut counts = vec![0usize; self.cols];
        for &c in &self.col_indices {
            counts[c] += 1;
        }
        let mut col_pointers = vec![0usize; self.cols + 1];
        for c in 0..self.cols {
            col_pointers[c + 1] = col_pointers[c] + counts[c];
        }

        let mut cursor: Vec<usize> = col_pointers[..self.cols].to_vec();
        let mut row_indices = vec![0usize; nnz];
        let mut values = vec![T::ZERO; nnz];
        for r in 0..self.rows {
            for p in self.row_pointers[r]..self.row_pointers[r + 1] {
                let c = self.col_indices[p];
                let slot = cursor[c];
                cursor[c] += 1;
                row_indices[slot] = r;
                values[slot] = self.values[p];
            }
        }

        CscStore::from_parts_unchecked(self.rows, self.cols, col_pointers, row_indices, values)
    }

    /// Multiply by a dense store: `self * right`
    ///
    /// For every row block and every stored `(col k, value v)` the kernel
    /// accumulates `v * right[k][j]` into all target columns `j` - each
    /// stored nonzero is touched exactly once per target column block.
    pub fn multiply(&self, right: &DenseStore<T>) -> Result<DenseStore<T>> {
        if self.cols != right.rows() {
            return Err(Error::ShapeMismatch {
                expected: vec![self.cols, right.cols()],
                got: vec![right.rows(), right.cols()],
            });
        }
        let (m, n) = (self.rows, right.cols());
        let mut target = DenseStore::zeros(m, n)?;
        if m == 0 || n == 0 {
            return Ok(target);
        }

        let k_rows = right.rows();
        let rdata = right.data();
        dispatch::divide_columns(
            target.data_mut(),
            m,
            0,
            THRESHOLD,
            &|first, block: &mut [T]| {
                let width = block.len() / m;
                for i in 0..m {
                    for p in self.row_pointers[i]..self.row_pointers[i + 1] {
                        let k = self.col_indices[p];
                        let v = self.values[p];
                        for jj in 0..width {
                            let factor = rdata[(first + jj) * k_rows + k];
                            block[jj * m + i] += v * factor;
                        }
                    }
                }
                Ok(())
            },
        )?;
        Ok(target)
    }

    fn position(&self, row: usize, col: usize) -> std::result::Result<usize, usize> {
        let (start, end) = (self.row_pointers[row], self.row_pointers[row + 1]);
        for p in start..end {
            match self.col_indices[p].cmp(&col) {
                std::cmp::Ordering::Equal => return Ok(p),
                std::cmp::Ordering::Greater => return Err(p),
                std::cmp::Ordering::Less => {}
            }
        }
        Err(end)
    }

    fn insert_at(&mut self, position: usize, row: usize, col: usize, value: T) {
        self.values.insert(position, value);
        self.col_indices.insert(position, col);
        for p in &mut self.row_pointers[row + 1..] {
            *p += 1;
        }
    }

    fn remove_at(&mut self, position: usize, row: usize) {
        self.values.remove(position);
        self.col_indices.remove(position);
        for p in &mut self.row_pointers[row + 1..] {
            *p -= 1;
        }
    }
}

impl<T> Structure for CsrStore<T> {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }
}

impl<T: Scalar> SparseStructure for CsrStore<T> {
    fn nnz(&self) -> usize {
        self.values.len()
    }

    fn memory_usage(&self) -> usize {
        self.values.len() * std::mem::size_of::<T>()
            + self.col_indices.len() * std::mem::size_of::<usize>()
            + self.row_pointers.len() * std::mem::size_of::<usize>()
    }
}

impl<T: Scalar> Access<T> for CsrStore<T> {
    /// Linear scan of the row block; cost proportional to the row's density
    fn get(&self, row: usize, col: usize) -> T {
        debug_assert!(row < self.rows && col < self.cols);
        for p in self.row_pointers[row]..self.row_pointers[row + 1] {
            if self.col_indices[p] == col {
                return self.values[p];
            }
        }
        T::ZERO
    }

    /// Row-major traversal of the stored entries
    fn nonzeros(&self) -> Nonzeros<'_, T> {
        Box::new((0..self.rows).flat_map(move |r| {
            (self.row_pointers[r]..self.row_pointers[r + 1])
                .map(move |p| (r, self.col_indices[p], self.values[p]))
        }))
    }
}

impl<T: Scalar> Mutate<T> for CsrStore<T> {
    fn set(&mut self, row: usize, col: usize, value: T) {
        debug_assert!(row < self.rows && col < self.cols);
        let evict = value.is_small(ZERO_TOLERANCE);
        match self.position(row, col) {
            Ok(p) => {
                if evict {
                    self.remove_at(p, row);
                } else {
                    self.values[p] = value;
                }
            }
            Err(p) => {
                if !evict {
                    self.insert_at(p, row, col, value);
                }
            }
        }
    }

    fn add(&mut self, row: usize, col: usize, value: T) {
        let sum = self.get(row, col) + value;
        self.set(row, col, sum);
    }

    fn reset(&mut self) {
        self.values.clear();
        self.col_indices.clear();
        self.row_pointers.fill(0);
    }
}

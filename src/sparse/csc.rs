//! CSC (compressed sparse column) store
//!
//! Mirror image of [`CsrStore`](super::CsrStore): `values`, `row_indices`
//! (both length nnz) and `col_pointers` (length cols + 1). The entries of
//! column `j` occupy `col_pointers[j] .. col_pointers[j + 1]`, sorted by row
//! with no duplicate row inside a column.

use super::csr::CsrStore;
use super::SparseStructure;
use crate::dense::DenseStore;
use crate::dispatch::{self, THRESHOLD};
use crate::error::{Error, Result};
use crate::scalar::{Scalar, ZERO_TOLERANCE};
use crate::store::{Access, Mutate, Nonzeros, Structure};

/// Compressed-sparse-column store
#[derive(Debug, Clone, PartialEq)]
pub struct CscStore<T> {
    rows: usize,
    cols: usize,
    values: Vec<T>,
    row_indices: Vec<usize>,
    col_pointers: Vec<usize>,
}

impl<T: Scalar> CscStore<T> {
    /// Create from raw compressed arrays
    ///
    /// # Errors
    ///
    /// Same validation as [`CsrStore::new`], with the axes swapped.
    pub fn new(
        rows: usize,
        cols: usize,
        col_pointers: Vec<usize>,
        row_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        if col_pointers.len() != cols + 1 {
            return Err(Error::ShapeMismatch {
                expected: vec![cols + 1],
                got: vec![col_pointers.len()],
            });
        }
        if row_indices.len() != values.len() {
            return Err(Error::ShapeMismatch {
                expected: vec![values.len()],
                got: vec![row_indices.len()],
            });
        }
        if col_pointers[0] != 0 || col_pointers[cols] != values.len() {
            return Err(Error::Internal(format!(
                "invalid column pointers: [0]={}, [{}]={}, nnz={}",
                col_pointers[0],
                cols,
                col_pointers[cols],
                values.len()
            )));
        }
        for c in 0..cols {
            let (start, end) = (col_pointers[c], col_pointers[c + 1]);
            if start > end {
                return Err(Error::Internal(format!(
                    "column pointers not monotonic at column {c}"
                )));
            }
            for p in start..end {
                let r = row_indices[p];
                if r >= rows {
                    return Err(Error::IndexOutOfBounds { index: r, size: rows });
                }
                if p > start && row_indices[p - 1] >= r {
                    return Err(Error::Internal(format!(
                        "column {c} not strictly increasing by row at position {p}"
                    )));
                }
            }
        }
        Ok(Self {
            rows,
            cols,
            values,
            row_indices,
            col_pointers,
        })
    }

    /// Create an empty store
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: Vec::new(),
            row_indices: Vec::new(),
            col_pointers: vec![0; cols + 1],
        }
    }

    /// Build from full columns, keeping only values outside the zero
    /// tolerance
    pub fn from_columns(columns: &[Vec<T>]) -> Result<Self> {
        let cols = columns.len();
        let rows = columns.first().map_or(0, Vec::len);

        let mut col_pointers = vec![0usize; cols + 1];
        let mut row_indices = Vec::new();
        let mut values = Vec::new();
        for (c, col) in columns.iter().enumerate() {
            if col.len() != rows {
                return Err(Error::ShapeMismatch {
                    expected: vec![rows],
                    got: vec![col.len()],
                });
            }
            for (r, &v) in col.iter().enumerate() {
                if !v.is_small(ZERO_TOLERANCE) {
                    row_indices.push(r);
                    values.push(v);
                }
            }
            col_pointers[c + 1] = values.len();
        }
        Self::new(rows, cols, col_pointers, row_indices, values)
    }

    /// Build from `(row, col, value)` triples in any order
    pub fn from_triplets(rows: usize, cols: usize, triplets: &[(usize, usize, T)]) -> Result<Self> {
        // Reuse the CSR build, then convert - the conversion is exact.
        Ok(CsrStore::from_triplets(rows, cols, triplets)?.to_csc())
    }

    pub(super) fn from_parts_unchecked(
        rows: usize,
        cols: usize,
        col_pointers: Vec<usize>,
        row_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        Self {
            rows,
            cols,
            values,
            row_indices,
            col_pointers,
        }
    }

    /// First stored row index of `col`, if the column is not empty
    pub fn first_in_column(&self, col: usize) -> Option<usize> {
        let (start, end) = (self.col_pointers[col], self.col_pointers[col + 1]);
        (start < end).then(|| self.row_indices[start])
    }

    /// One past the last stored row index of `col`, or 0 for an empty column
    pub fn limit_of_column(&self, col: usize) -> usize {
        let (start, end) = (self.col_pointers[col], self.col_pointers[col + 1]);
        if start < end {
            self.row_indices[end - 1] + 1
        } else {
            0
        }
    }

    /// The column pointer array, length `cols + 1`
    pub fn col_pointers(&self) -> &[usize] {
        &self.col_pointers
    }

    /// The stored row indices, length `nnz`
    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    /// The stored values, length `nnz`
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Convert to CSR losslessly
    ///
    /// Same single counting + prefix-sum + scatter pass as
    /// [`CsrStore::to_csc`], mirrored: the column traversal visits rows in
    /// the order CSR pointer construction needs.
    pub fn to_csr(&self) -> CsrStore<T> {
        let nnz = self.values.len();
        let mut counts = vec![0usize; self.rows];
        for &r in &self.row_indices {
            counts[r] += 1;
        }
        let mut row_pointers = vec![0usize; self.rows + 1];
        for r in 0..self.rows {
            row_pointers[r + 1] = row_pointers[r] + counts[r];
        }

        let mut cursor: Vec<usize> = row_pointers[..self.rows].to_vec();
        let mut col_indices = vec![0usize; nnz];
        let mut values = vec![T::ZERO; nnz];
        for c in 0..self.cols {
            for p in self.col_pointers[c]..self.col_pointers[c + 1] {
                let r = self.row_indices[p];
                let slot = cursor[r];
                cursor[r] += 1;
                col_indices[slot] = c;
                values[slot] = self.values[p];
            }
        }

        // The scatter preserves both invariants, so skip revalidation
        CsrStore::from_parts_unchecked(self.rows, self.cols, row_pointers, col_indices, values)
    }

    /// Multiply by a dense store: `self * right`
    ///
    /// Iterates each column block once; every stored `(row r, value v)` in
    /// column `k` contributes `v * right[k][j]` to target row `r` across all
    /// target columns `j`.
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
                for k in 0..self.cols {
                    for p in self.col_pointers[k]..self.col_pointers[k + 1] {
                        let r = self.row_indices[p];
                        let v = self.values[p];
                        for jj in 0..width {
                            let factor = rdata[(first + jj) * k_rows + k];
                            block[jj * m + r] += v * factor;
                        }
                    }
                }
                Ok(())
            },
        )?;
        Ok(target)
    }

    fn position(&self, row: usize, col: usize) -> std::result::Result<usize, usize> {
        let (start, end) = (self.col_pointers[col], self.col_pointers[col + 1]);
        for p in start..end {
            match self.row_indices[p].cmp(&row) {
                std::cmp::Ordering::Equal => return Ok(p),
                std::cmp::Ordering::Greater => return Err(p),
                std::cmp::Ordering::Less => {}
            }
        }
        Err(end)
    }

    fn insert_at(&mut self, position: usize, row: usize, col: usize, value: T) {
        self.values.insert(position, value);
        self.row_indices.insert(position, row);
        for p in &mut self.col_pointers[col + 1..] {
            *p += 1;
        }
    }

    fn remove_at(&mut self, position: usize, col: usize) {
        self.values.remove(position);
        self.row_indices.remove(position);
        for p in &mut self.col_pointers[col + 1..] {
            *p -= 1;
        }
    }
}

impl<T> Structure for CscStore<T> {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }
}

impl<T: Scalar> SparseStructure for CscStore<T> {
    fn nnz(&self) -> usize {
        self.values.len()
    }

    fn memory_usage(&self) -> usize {
        self.values.len() * std::mem::size_of::<T>()
            + self.row_indices.len() * std::mem::size_of::<usize>()
            + self.col_pointers.len() * std::mem::size_of::<usize>()
    }
}

impl<T: Scalar> Access<T> for CscStore<T> {
    /// Linear scan of the column block; cost proportional to the column's
    /// density
    fn get(&self, row: usize, col: usize) -> T {
        debug_assert!(row < self.rows && col < self.cols);
        for p in self.col_pointers[col]..self.col_pointers[col + 1] {
            if self.row_indices[p] == row {
                return self.values[p];
            }
        }
        T::ZERO
    }

    /// Column-major traversal of the stored entries
    fn nonzeros(&self) -> Nonzeros<'_, T> {
        Box::new((0..self.cols).flat_map(move |c| {
            (self.col_pointers[c]..self.col_pointers[c + 1])
                .map(move |p| (self.row_indices[p], c, self.values[p]))
        }))
    }
}

impl<T: Scalar> Mutate<T> for CscStore<T> {
    fn set(&mut self, row: usize, col: usize, value: T) {
        debug_assert!(row < self.rows && col < self.cols);
        let evict = value.is_small(ZERO_TOLERANCE);
        match self.position(row, col) {
            Ok(p) => {
                if evict {
                    self.remove_at(p, col);
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
        self.row_indices.clear();
        self.col_pointers.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CscStore<f64> {
        // Columns of:
        // [1 0]
        // [0 5]
        // [3 0]
        CscStore::from_columns(&[vec![1.0, 0.0, 3.0], vec![0.0, 5.0, 0.0]]).unwrap()
    }

    #[test]
    fn test_from_columns() {
        let a = sample();
        assert_eq!(a.rows(), 3);
        assert_eq!(a.cols(), 2);
        assert_eq!(a.nnz(), 3);
        assert_eq!(a.get(0, 0), 1.0);
        assert_eq!(a.get(2, 0), 3.0);
        assert_eq!(a.get(1, 1), 5.0);
        assert_eq!(a.get(1, 0), 0.0);
    }

    #[test]
    fn test_round_trip_preserves_triples() {
        // Scenario: CSC -> CSR -> CSC keeps the exact coordinate/value set
        let a = sample();
        let back = a.to_csr().to_csc();

        let mut original: Vec<_> = a.nonzeros().collect();
        let mut returned: Vec<_> = back.nonzeros().collect();
        original.sort_by_key(|&(r, c, _)| (c, r));
        returned.sort_by_key(|&(r, c, _)| (c, r));
        assert_eq!(original, returned);
        assert_eq!(a, back);
    }

    #[test]
    fn test_first_and_limit_of_column() {
        let a = sample();
        assert_eq!(a.first_in_column(0), Some(0));
        assert_eq!(a.limit_of_column(0), 3);
        assert_eq!(a.first_in_column(1), Some(1));
        assert_eq!(a.limit_of_column(1), 2);

        let empty = CscStore::<f64>::empty(3, 2);
        assert_eq!(empty.first_in_column(1), None);
        assert_eq!(empty.limit_of_column(1), 0);
    }

    #[test]
    fn test_nonzeros_column_major() {
        let a = sample();
        let entries: Vec<_> = a.nonzeros().collect();
        assert_eq!(entries, vec![(0, 0, 1.0), (2, 0, 3.0), (1, 1, 5.0)]);
    }

    #[test]
    fn test_set_get_duality_with_eviction() {
        let mut a = sample();
        a.set(1, 0, 2.5);
        assert_eq!(a.get(1, 0), 2.5);

        a.set(1, 0, 1e-16); // within tolerance of zero: evicted
        assert_eq!(a.get(1, 0), 0.0);
        assert_eq!(a.nnz(), 3);
    }

    #[test]
    fn test_multiply_dense() {
        let a = sample();
        let b = DenseStore::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let c = a.multiply(&b).unwrap();
        // [1 0; 0 5; 3 0] * [1 2; 3 4] = [1 2; 15 20; 3 6]
        assert_eq!(c.get(0, 0), 1.0);
        assert_eq!(c.get(0, 1), 2.0);
        assert_eq!(c.get(1, 0), 15.0);
        assert_eq!(c.get(1, 1), 20.0);
        assert_eq!(c.get(2, 0), 3.0);
        assert_eq!(c.get(2, 1), 6.0);
    }

    #[test]
    fn test_validation_mirrors_csr() {
        assert!(CscStore::new(2, 2, vec![0, 1], vec![0], vec![1.0]).is_err());
        assert!(CscStore::new(2, 1, vec![0, 2], vec![1, 1], vec![1.0, 2.0]).is_err());
    }
}

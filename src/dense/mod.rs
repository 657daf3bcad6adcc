//! Dense physical stores
//!
//! A [`DenseStore`] is one contiguous column-major `Vec<T>` of
//! `rows * cols` elements with the shape fixed at construction. It carries
//! the full mutation family (set/add/fill/modify/exchange) and is the
//! deposit target of every multiply kernel.
//!
//! Column-major layout means a column is one contiguous slice, which is what
//! lets the dispatch layer hand disjoint column ranges to parallel tasks
//! without locking.

mod kernels;

pub use kernels::{multiply_both, multiply_left, multiply_neither, multiply_right};

use crate::dispatch::{self, THRESHOLD};
use crate::error::{Error, Result};
use crate::scalar::Scalar;
use crate::store::{Access, Mutate, Nonzeros, Structure};

/// Mutable dense store backed by one contiguous column-major array
#[derive(Debug, Clone, PartialEq)]
pub struct DenseStore<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Scalar> DenseStore<T> {
    /// Create an all-zero store
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionTooLarge`] when `rows * cols` overflows the
    /// native index range.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        let count = rows
            .checked_mul(cols)
            .ok_or(Error::DimensionTooLarge { rows, cols })?;
        Ok(Self {
            rows,
            cols,
            data: vec![T::ZERO; count],
        })
    }

    /// Wrap an existing column-major array
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] when `data.len() != rows * cols`.
    pub fn from_column_major(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        let count = rows
            .checked_mul(cols)
            .ok_or(Error::DimensionTooLarge { rows, cols })?;
        if data.len() != count {
            return Err(Error::ShapeMismatch {
                expected: vec![count],
                got: vec![data.len()],
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build from a slice of columns, each of equal length
    pub fn from_columns(columns: &[Vec<T>]) -> Result<Self> {
        let cols = columns.len();
        let rows = columns.first().map_or(0, Vec::len);
        for col in columns {
            if col.len() != rows {
                return Err(Error::ShapeMismatch {
                    expected: vec![rows],
                    got: vec![col.len()],
                });
            }
        }
        let mut data = Vec::with_capacity(rows * cols);
        for col in columns {
            data.extend_from_slice(col);
        }
        Self::from_column_major(rows, cols, data)
    }

    /// Build from a slice of rows, each of equal length
    pub fn from_rows(rows_data: &[Vec<T>]) -> Result<Self> {
        let rows = rows_data.len();
        let cols = rows_data.first().map_or(0, Vec::len);
        for row in rows_data {
            if row.len() != cols {
                return Err(Error::ShapeMismatch {
                    expected: vec![cols],
                    got: vec![row.len()],
                });
            }
        }
        let mut store = Self::zeros(rows, cols)?;
        for (r, row) in rows_data.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                store.set(r, c, v);
            }
        }
        Ok(store)
    }

    /// The n-by-n identity
    pub fn identity(n: usize) -> Result<Self> {
        let mut store = Self::zeros(n, n)?;
        store.fill_diagonal(T::ONE);
        Ok(store)
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        col * self.rows + row
    }

    /// One column as a contiguous slice
    #[inline]
    pub fn column(&self, col: usize) -> &[T] {
        &self.data[col * self.rows..(col + 1) * self.rows]
    }

    /// One column as a contiguous mutable slice
    #[inline]
    pub fn column_mut(&mut self, col: usize) -> &mut [T] {
        let rows = self.rows;
        &mut self.data[col * rows..(col + 1) * rows]
    }

    /// The backing column-major array
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Broadcast `value` over one column
    pub fn fill_column(&mut self, col: usize, value: T) {
        self.column_mut(col).fill(value);
    }

    /// Broadcast `value` over one row
    pub fn fill_row(&mut self, row: usize, value: T) {
        for c in 0..self.cols {
            let idx = self.index(row, c);
            self.data[idx] = value;
        }
    }

    /// Broadcast `value` over the main diagonal
    pub fn fill_diagonal(&mut self, value: T) {
        let n = self.rows.min(self.cols);
        for i in 0..n {
            let idx = self.index(i, i);
            self.data[idx] = value;
        }
    }

    /// Broadcast `value` over a half-open column-major linear range
    pub fn fill_range(&mut self, first: usize, limit: usize, value: T) {
        self.data[first..limit].fill(value);
    }

    /// Apply `f` to every element in place
    ///
    /// Goes through the parallel dispatch when the column count crosses the
    /// threshold; the per-column work is independent, so splitting is safe.
    pub fn modify_all<F>(&mut self, f: F) -> Result<()>
    where
        F: Fn(T) -> T + Sync,
    {
        let rows = self.rows;
        dispatch::divide_columns(&mut self.data, rows, 0, THRESHOLD, &|_, block: &mut [T]| {
            for v in block.iter_mut() {
                *v = f(*v);
            }
            Ok(())
        })
    }

    /// Apply `f` to one column in place
    pub fn modify_column<F>(&mut self, col: usize, f: F)
    where
        F: Fn(T) -> T,
    {
        for v in self.column_mut(col) {
            *v = f(*v);
        }
    }

    /// Apply `f` to one row in place
    pub fn modify_row<F>(&mut self, row: usize, f: F)
    where
        F: Fn(T) -> T,
    {
        for c in 0..self.cols {
            let idx = self.index(row, c);
            self.data[idx] = f(self.data[idx]);
        }
    }

    /// Apply `f` to the main diagonal in place
    pub fn modify_diagonal<F>(&mut self, f: F)
    where
        F: Fn(T) -> T,
    {
        let n = self.rows.min(self.cols);
        for i in 0..n {
            let idx = self.index(i, i);
            self.data[idx] = f(self.data[idx]);
        }
    }

    /// Swap two rows, O(cols) strided
    pub fn exchange_rows(&mut self, row_a: usize, row_b: usize) {
        if row_a == row_b {
            return;
        }
        for c in 0..self.cols {
            let a = self.index(row_a, c);
            let b = self.index(row_b, c);
            self.data.swap(a, b);
        }
    }

    /// Swap two columns, O(rows) contiguous
    pub fn exchange_columns(&mut self, col_a: usize, col_b: usize) {
        if col_a == col_b {
            return;
        }
        let rows = self.rows;
        let (lo, hi) = (col_a.min(col_b), col_a.max(col_b));
        let (left, right) = self.data.split_at_mut(hi * rows);
        left[lo * rows..(lo + 1) * rows].swap_with_slice(&mut right[..rows]);
    }

    /// Write this store's transpose into `target`
    pub fn transpose_into(&self, target: &mut DenseStore<T>) -> Result<()> {
        if target.rows != self.cols || target.cols != self.rows {
            return Err(Error::ShapeMismatch {
                expected: vec![self.cols, self.rows],
                got: vec![target.rows, target.cols],
            });
        }
        for c in 0..self.cols {
            for r in 0..self.rows {
                let v = self.data[self.index(r, c)];
                let idx = target.index(c, r);
                target.data[idx] = v;
            }
        }
        Ok(())
    }

    /// Multiply by another dense store of the same domain
    ///
    /// Dispatches to the `neither`-boxed kernel; see [`kernels`] for the
    /// specialized variants when one operand is not a native dense store.
    pub fn multiply(&self, right: &DenseStore<T>) -> Result<DenseStore<T>> {
        kernels::multiply_neither(self, right, THRESHOLD)
    }

    /// [`DenseStore::multiply`] with an explicit split threshold
    ///
    /// Results are identical regardless of the threshold: each output column
    /// is accumulated by exactly one task in a fixed inner order.
    pub fn multiply_with_threshold(
        &self,
        right: &DenseStore<T>,
        threshold: usize,
    ) -> Result<DenseStore<T>> {
        kernels::multiply_neither(self, right, threshold)
    }
}

impl<T> Structure for DenseStore<T> {
    #[inline]
    fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn cols(&self) -> usize {
        self.cols
    }
}

impl<T: Scalar> Access<T> for DenseStore<T> {
    #[inline]
    fn get(&self, row: usize, col: usize) -> T {
        self.data[self.index(row, col)]
    }

    fn nonzeros(&self) -> Nonzeros<'_, T> {
        let rows = self.rows;
        Box::new(self.data.iter().enumerate().filter_map(move |(idx, &v)| {
            if v != T::ZERO {
                Some((idx % rows, idx / rows, v))
            } else {
                None
            }
        }))
    }
}

impl<T: Scalar> Mutate<T> for DenseStore<T> {
    #[inline]
    fn set(&mut self, row: usize, col: usize, value: T) {
        let idx = self.index(row, col);
        self.data[idx] = value;
    }

    #[inline]
    fn add(&mut self, row: usize, col: usize, value: T) {
        let idx = self.index(row, col);
        self.data[idx] += value;
    }

    fn reset(&mut self) {
        self.data.fill(T::ZERO);
    }

    fn fill_all(&mut self, value: T) {
        self.data.fill(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_3x2() -> DenseStore<f64> {
        // [1 4]
        // [2 5]
        // [3 6]
        DenseStore::from_column_major(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap()
    }

    #[test]
    fn test_column_major_layout() {
        let a = store_3x2();
        assert_eq!(a.get(0, 0), 1.0);
        assert_eq!(a.get(2, 0), 3.0);
        assert_eq!(a.get(0, 1), 4.0);
        assert_eq!(a.column(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_from_rows_matches_from_columns() {
        let by_rows =
            DenseStore::from_rows(&[vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]).unwrap();
        assert_eq!(by_rows, store_3x2());

        let by_cols =
            DenseStore::from_columns(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(by_cols, store_3x2());
    }

    #[test]
    fn test_set_get_duality() {
        let mut a = DenseStore::<f64>::zeros(4, 4).unwrap();
        a.set(2, 3, -7.5);
        assert_eq!(a.get(2, 3), -7.5);
        a.add(2, 3, 2.5);
        assert_eq!(a.get(2, 3), -5.0);
    }

    #[test]
    fn test_fill_family() {
        let mut a = DenseStore::<f64>::zeros(3, 3).unwrap();
        a.fill_column(1, 2.0);
        a.fill_row(0, 5.0);
        assert_eq!(a.get(0, 1), 5.0); // row fill came last
        assert_eq!(a.get(2, 1), 2.0);
        assert_eq!(a.get(0, 2), 5.0);

        a.reset();
        a.fill_diagonal(1.0);
        assert_eq!(a, DenseStore::identity(3).unwrap());

        a.fill_range(0, 3, 9.0); // first column
        assert_eq!(a.column(0), &[9.0, 9.0, 9.0]);
    }

    #[test]
    fn test_modify_all() {
        let mut a = store_3x2();
        a.modify_all(|v| v * 2.0).unwrap();
        assert_eq!(a.get(2, 1), 12.0);
        assert_eq!(a.get(0, 0), 2.0);
    }

    #[test]
    fn test_modify_row_and_diagonal() {
        let mut a = store_3x2();
        a.modify_column(1, |v| v + 1.0);
        assert_eq!(a.column(1), &[5.0, 6.0, 7.0]);
        a.modify_column(1, |v| v - 1.0);

        a.modify_row(1, |v| -v);
        assert_eq!(a.get(1, 0), -2.0);
        assert_eq!(a.get(1, 1), -5.0);

        a.modify_diagonal(|v| v + 100.0);
        assert_eq!(a.get(0, 0), 101.0);
        assert_eq!(a.get(1, 1), 95.0);
    }

    #[test]
    fn test_exchange_rows_and_columns() {
        let mut a = store_3x2();
        a.exchange_rows(0, 2);
        assert_eq!(a.column(0), &[3.0, 2.0, 1.0]);

        let mut b = store_3x2();
        b.exchange_columns(0, 1);
        assert_eq!(b.column(0), &[4.0, 5.0, 6.0]);
        assert_eq!(b.column(1), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_transpose_into() {
        let a = store_3x2();
        let mut t = DenseStore::<f64>::zeros(2, 3).unwrap();
        a.transpose_into(&mut t).unwrap();
        assert_eq!(t.get(0, 2), 3.0);
        assert_eq!(t.get(1, 0), 4.0);
    }

    #[test]
    fn test_nonzeros_column_major_order() {
        let mut a = DenseStore::<f64>::zeros(2, 2).unwrap();
        a.set(1, 0, 1.0);
        a.set(0, 1, 2.0);
        let entries: Vec<_> = a.nonzeros().collect();
        assert_eq!(entries, vec![(1, 0, 1.0), (0, 1, 2.0)]);
    }

    #[test]
    fn test_zeros_overflow_is_an_error() {
        let result = DenseStore::<f64>::zeros(usize::MAX, 2);
        assert!(matches!(result, Err(Error::DimensionTooLarge { .. })));
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_get_panics() {
        let a = store_3x2();
        let _ = a.get(3, 0);
    }
}

//! The factory contract: the single construction surface
//!
//! A [`Factory`] builds stores of one physical layout for one scalar domain.
//! Collaborators that need to produce matrices hold a factory plus the read
//! and mutate contracts, never a concrete store type, so the physical layout
//! stays a deployment decision.

use crate::dense::DenseStore;
use crate::error::Result;
use crate::scalar::Scalar;
use crate::sparse::{CscStore, CsrStore, LinkedColumnStore, LinkedRowStore};
use crate::store::{Access, Mutate, Structure};

/// Builds stores of one physical layout
pub trait Factory<T: Scalar> {
    /// The store type this factory produces
    type Store: Structure + Access<T> + Mutate<T>;

    /// A `rows` x `cols` store with every element zero
    fn make(&self, rows: usize, cols: usize) -> Result<Self::Store>;

    /// A square store with ones on the diagonal and zeros elsewhere
    fn identity(&self, size: usize) -> Result<Self::Store> {
        let mut store = self.make(size, size)?;
        for i in 0..size {
            store.set(i, i, T::ONE);
        }
        Ok(store)
    }

    /// Copy every element of `source` into a fresh store of this layout
    fn copy<A: Access<T>>(&self, source: &A) -> Result<Self::Store> {
        let mut store = self.make(source.rows(), source.cols())?;
        source.supply_to(&mut store);
        Ok(store)
    }

    /// Build from row data; every inner slice is one row
    fn from_rows(&self, rows: &[Vec<T>]) -> Result<Self::Store> {
        let n = rows.first().map_or(0, Vec::len);
        let mut store = self.make(rows.len(), n)?;
        for (r, row) in rows.iter().enumerate() {
            shape_check(row.len(), n, rows.len())?;
            for (c, &v) in row.iter().enumerate() {
                if v != T::ZERO {
                    store.set(r, c, v);
                }
            }
        }
        Ok(store)
    }

    /// Build from column data; every inner slice is one column
    fn from_columns(&self, columns: &[Vec<T>]) -> Result<Self::Store> {
        let m = columns.first().map_or(0, Vec::len);
        let mut store = self.make(m, columns.len())?;
        for (c, column) in columns.iter().enumerate() {
            shape_check(column.len(), m, columns.len())?;
            for (r, &v) in column.iter().enumerate() {
                if v != T::ZERO {
                    store.set(r, c, v);
                }
            }
        }
        Ok(store)
    }
}

fn shape_check(got: usize, expected: usize, outer: usize) -> Result<()> {
    if got == expected {
        Ok(())
    } else {
        Err(crate::error::Error::ShapeMismatch {
            expected: vec![outer, expected],
            got: vec![outer, got],
        })
    }
}

/// Factory for column-major [`DenseStore`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct DenseFactory;

impl<T: Scalar> Factory<T> for DenseFactory {
    type Store = DenseStore<T>;

    fn make(&self, rows: usize, cols: usize) -> Result<Self::Store> {
        DenseStore::zeros(rows, cols)
    }
}

/// Factory for compressed row stores
#[derive(Debug, Clone, Copy, Default)]
pub struct CsrFactory;

impl<T: Scalar> Factory<T> for CsrFactory {
    type Store = CsrStore<T>;

    fn make(&self, rows: usize, cols: usize) -> Result<Self::Store> {
        Ok(CsrStore::empty(rows, cols))
    }
}

/// Factory for compressed column stores
#[derive(Debug, Clone, Copy, Default)]
pub struct CscFactory;

impl<T: Scalar> Factory<T> for CscFactory {
    type Store = CscStore<T>;

    fn make(&self, rows: usize, cols: usize) -> Result<Self::Store> {
        Ok(CscStore::empty(rows, cols))
    }
}

/// Factory for row-major linked sparse stores
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedRowFactory;

impl<T: Scalar> Factory<T> for LinkedRowFactory {
    type Store = LinkedRowStore<T>;

    fn make(&self, rows: usize, cols: usize) -> Result<Self::Store> {
        Ok(LinkedRowStore::new(rows, cols))
    }
}

/// Factory for column-major linked sparse stores
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedColumnFactory;

impl<T: Scalar> Factory<T> for LinkedColumnFactory {
    type Store = LinkedColumnStore<T>;

    fn make(&self, rows: usize, cols: usize) -> Result<Self::Store> {
        Ok(LinkedColumnStore::new(rows, cols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::SparseStructure;

    #[test]
    fn test_identity() {
        let eye: DenseStore<f64> = DenseFactory.identity(3).unwrap();
        assert_eq!(eye.get(0, 0), 1.0);
        assert_eq!(eye.get(2, 2), 1.0);
        assert_eq!(eye.get(0, 1), 0.0);
    }

    #[test]
    fn test_copy_across_layouts() {
        let dense = DenseStore::from_rows(&[vec![1.0, 0.0, 3.0], vec![0.0, 5.0, 0.0]]).unwrap();
        let csr = CsrFactory.copy(&dense).unwrap();
        assert_eq!(csr.nnz(), 3);
        assert_eq!(csr.get(0, 2), 3.0);
        assert_eq!(csr.get(1, 1), 5.0);

        let back = DenseFactory.copy(&csr).unwrap();
        for r in 0..2 {
            for c in 0..3 {
                assert_eq!(back.get(r, c), dense.get(r, c));
            }
        }
    }

    #[test]
    fn test_from_rows_sparse_layout() {
        let linked = LinkedColumnFactory
            .from_rows(&[vec![0.0, 2.0], vec![7.0, 0.0]])
            .unwrap();
        assert_eq!(linked.rows(), 2);
        assert_eq!(linked.cols(), 2);
        assert_eq!(linked.get(0, 1), 2.0);
        assert_eq!(linked.get(1, 0), 7.0);
        assert_eq!(linked.get(0, 0), 0.0);
    }

    #[test]
    fn test_from_columns_matches_from_rows() {
        let by_rows = LinkedRowFactory
            .from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]])
            .unwrap();
        let by_cols = LinkedRowFactory
            .from_columns(&[vec![1.0, 3.0], vec![2.0, 4.0]])
            .unwrap();
        for r in 0..2 {
            for c in 0..2 {
                assert_eq!(by_rows.get(r, c), by_cols.get(r, c));
            }
        }
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let out = CscFactory.from_rows(&[vec![1.0, 2.0], vec![3.0]]);
        assert!(out.is_err());
    }
}

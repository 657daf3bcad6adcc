//! Row and column selection views
//!
//! An explicit index array maps view index to base index. A negative base
//! index is not an error: it denotes an explicit all-zero row or column.

use crate::error::{Error, Result};
use crate::scalar::Scalar;
use crate::store::{Access, Structure};

fn validate(indices: &[i64], size: usize) -> Result<()> {
    for &i in indices {
        if i >= 0 && i as usize >= size {
            return Err(Error::IndexOutOfBounds {
                index: i as usize,
                size,
            });
        }
    }
    Ok(())
}

/// Row selection and permutation
pub struct SelectedRows<'a, A> {
    base: &'a A,
    indices: Vec<i64>,
}

impl<'a, A: Structure> SelectedRows<'a, A> {
    /// Select base rows by index; a negative index yields an all-zero row
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] when a non-negative index is not
    /// a valid base row.
    pub fn new(base: &'a A, indices: Vec<i64>) -> Result<Self> {
        validate(&indices, base.rows())?;
        Ok(Self { base, indices })
    }
}

impl<A: Structure> Structure for SelectedRows<'_, A> {
    fn rows(&self) -> usize {
        self.indices.len()
    }

    fn cols(&self) -> usize {
        self.base.cols()
    }
}

impl<T: Scalar, A: Access<T>> Access<T> for SelectedRows<'_, A> {
    fn get(&self, row: usize, col: usize) -> T {
        match self.indices[row] {
            i if i < 0 => T::ZERO,
            i => self.base.get(i as usize, col),
        }
    }
}

/// Column selection and permutation
pub struct SelectedColumns<'a, A> {
    base: &'a A,
    indices: Vec<i64>,
}

impl<'a, A: Structure> SelectedColumns<'a, A> {
    /// Select base columns by index; a negative index yields an all-zero
    /// column
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] when a non-negative index is not
    /// a valid base column.
    pub fn new(base: &'a A, indices: Vec<i64>) -> Result<Self> {
        validate(&indices, base.cols())?;
        Ok(Self { base, indices })
    }
}

impl<A: Structure> Structure for SelectedColumns<'_, A> {
    fn rows(&self) -> usize {
        self.base.rows()
    }

    fn cols(&self) -> usize {
        self.indices.len()
    }
}

impl<T: Scalar, A: Access<T>> Access<T> for SelectedColumns<'_, A> {
    fn get(&self, row: usize, col: usize) -> T {
        match self.indices[col] {
            i if i < 0 => T::ZERO,
            i => self.base.get(row, i as usize),
        }
    }
}

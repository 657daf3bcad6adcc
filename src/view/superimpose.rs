//! Superposition: a base store with a patch added inside a rectangle

use crate::error::{Error, Result};
use crate::scalar::Scalar;
use crate::store::{Access, Structure};

/// Base store plus a second store's values inside a covered rectangle
///
/// A read outside the rectangle delegates to the base; inside it, the patch
/// value at the locally translated coordinate is *added* to the base value.
pub struct Superimposed<'a, A, P> {
    base: &'a A,
    patch: &'a P,
    row_offset: usize,
    col_offset: usize,
}

impl<'a, A: Structure, P: Structure> Superimposed<'a, A, P> {
    /// Patch `base` with `patch` anchored at `(row_offset, col_offset)`
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] when the patch rectangle does not
    /// fit inside the base.
    pub fn new(base: &'a A, patch: &'a P, row_offset: usize, col_offset: usize) -> Result<Self> {
        let row_end = row_offset + patch.rows();
        let col_end = col_offset + patch.cols();
        if row_end > base.rows() || col_end > base.cols() {
            return Err(Error::ShapeMismatch {
                expected: vec![base.rows(), base.cols()],
                got: vec![row_end, col_end],
            });
        }
        Ok(Self {
            base,
            patch,
            row_offset,
            col_offset,
        })
    }
}

impl<A: Structure, P: Structure> Structure for Superimposed<'_, A, P> {
    fn rows(&self) -> usize {
        self.base.rows()
    }

    fn cols(&self) -> usize {
        self.base.cols()
    }
}

impl<T: Scalar, A: Access<T>, P: Access<T>> Access<T> for Superimposed<'_, A, P> {
    fn get(&self, row: usize, col: usize) -> T {
        let mut value = self.base.get(row, col);
        if row >= self.row_offset
            && row < self.row_offset + self.patch.rows()
            && col >= self.col_offset
            && col < self.col_offset + self.patch.cols()
        {
            value += self.patch.get(row - self.row_offset, col - self.col_offset);
        }
        value
    }
}

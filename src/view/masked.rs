//! Triangular, diagonal, symmetric and Hermitian masking views
//!
//! Masking zeroes out the excluded side of the diagonal on read; the mirror
//! views read the stored triangle for both sides instead of storing the
//! reflection.

use crate::error::{Error, Result};
use crate::scalar::Scalar;
use crate::store::{Access, Structure};

fn require_square<A: Structure>(base: &A) -> Result<()> {
    if base.rows() != base.cols() {
        return Err(Error::ShapeMismatch {
            expected: vec![base.rows(), base.rows()],
            got: vec![base.rows(), base.cols()],
        });
    }
    Ok(())
}

/// Triangular mask: zero on the excluded side, optional unit diagonal
pub struct Triangular<'a, A> {
    base: &'a A,
    upper: bool,
    unit_diagonal: bool,
}

impl<'a, A: Structure> Triangular<'a, A> {
    /// Keep the upper triangle of `base`
    pub fn upper(base: &'a A, unit_diagonal: bool) -> Self {
        Self {
            base,
            upper: true,
            unit_diagonal,
        }
    }

    /// Keep the lower triangle of `base`
    pub fn lower(base: &'a A, unit_diagonal: bool) -> Self {
        Self {
            base,
            upper: false,
            unit_diagonal,
        }
    }
}

impl<A: Structure> Structure for Triangular<'_, A> {
    fn rows(&self) -> usize {
        self.base.rows()
    }

    fn cols(&self) -> usize {
        self.base.cols()
    }
}

impl<T: Scalar, A: Access<T>> Access<T> for Triangular<'_, A> {
    fn get(&self, row: usize, col: usize) -> T {
        if row == col {
            if self.unit_diagonal {
                T::ONE
            } else {
                self.base.get(row, col)
            }
        } else if (self.upper && row < col) || (!self.upper && row > col) {
            self.base.get(row, col)
        } else {
            T::ZERO
        }
    }
}

/// Diagonal mask: everything off the main diagonal reads as zero
pub struct DiagonalMask<'a, A> {
    base: &'a A,
}

impl<'a, A: Structure> DiagonalMask<'a, A> {
    /// Keep only the main diagonal of `base`
    pub fn new(base: &'a A) -> Self {
        Self { base }
    }
}

impl<A: Structure> Structure for DiagonalMask<'_, A> {
    fn rows(&self) -> usize {
        self.base.rows()
    }

    fn cols(&self) -> usize {
        self.base.cols()
    }
}

impl<T: Scalar, A: Access<T>> Access<T> for DiagonalMask<'_, A> {
    fn get(&self, row: usize, col: usize) -> T {
        if row == col {
            self.base.get(row, col)
        } else {
            T::ZERO
        }
    }
}

/// Symmetric view: reads above the diagonal mirror the stored lower triangle
pub struct Symmetric<'a, A> {
    base: &'a A,
}

impl<'a, A: Structure> Symmetric<'a, A> {
    /// Mirror the lower triangle of a square `base`
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] when `base` is not square.
    pub fn new(base: &'a A) -> Result<Self> {
        require_square(base)?;
        Ok(Self { base })
    }
}

impl<A: Structure> Structure for Symmetric<'_, A> {
    fn rows(&self) -> usize {
        self.base.rows()
    }

    fn cols(&self) -> usize {
        self.base.cols()
    }
}

impl<T: Scalar, A: Access<T>> Access<T> for Symmetric<'_, A> {
    fn get(&self, row: usize, col: usize) -> T {
        if row >= col {
            self.base.get(row, col)
        } else {
            self.base.get(col, row)
        }
    }
}

/// Hermitian view: the mirrored triangle is conjugated on read
pub struct Hermitian<'a, A> {
    base: &'a A,
}

impl<'a, A: Structure> Hermitian<'a, A> {
    /// Mirror and conjugate the lower triangle of a square `base`
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] when `base` is not square.
    pub fn new(base: &'a A) -> Result<Self> {
        require_square(base)?;
        Ok(Self { base })
    }
}

impl<A: Structure> Structure for Hermitian<'_, A> {
    fn rows(&self) -> usize {
        self.base.rows()
    }

    fn cols(&self) -> usize {
        self.base.cols()
    }
}

impl<T: Scalar, A: Access<T>> Access<T> for Hermitian<'_, A> {
    fn get(&self, row: usize, col: usize) -> T {
        if row >= col {
            self.base.get(row, col)
        } else {
            self.base.get(col, row).conjugate()
        }
    }
}

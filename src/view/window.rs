//! Offset and limit windows

use crate::error::{Error, Result};
use crate::scalar::Scalar;
use crate::store::{Access, Structure};

/// Window shifted by a constant (row, col) offset
///
/// Covers everything from the offset to the base store's far corner; a read
/// adds the offset before delegating.
pub struct Offset<'a, A> {
    base: &'a A,
    row_offset: usize,
    col_offset: usize,
}

impl<'a, A: Structure> Offset<'a, A> {
    /// Shift `base` by `(row_offset, col_offset)`
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] when an offset exceeds the
    /// corresponding dimension.
    pub fn new(base: &'a A, row_offset: usize, col_offset: usize) -> Result<Self> {
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

impl<A: Structure> Structure for Offset<'_, A> {
    fn rows(&self) -> usize {
        self.base.rows() - self.row_offset
    }

    fn cols(&self) -> usize {
        self.base.cols() - self.col_offset
    }
}

impl<T: Scalar, A: Access<T>> Access<T> for Offset<'_, A> {
    fn get(&self, row: usize, col: usize) -> T {
        self.base.get(row + self.row_offset, col + self.col_offset)
    }
}

/// Window clamped to the top-left `rows` x `cols` rectangle
pub struct Limit<'a, A> {
    base: &'a A,
    rows: usize,
    cols: usize,
}

impl<'a, A: Structure> Limit<'a, A> {
    /// Clamp `base` to `rows` x `cols`
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] when a limit exceeds the
    /// corresponding dimension.
    pub fn new(base: &'a A, rows: usize, cols: usize) -> Result<Self> {
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

impl<A: Structure> Structure for Limit<'_, A> {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }
}

impl<T: Scalar, A: Access<T>> Access<T> for Limit<'_, A> {
    fn get(&self, row: usize, col: usize) -> T {
        debug_assert!(row < self.rows && col < self.cols);
        self.base.get(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::DenseStore;

    fn base_4x4() -> DenseStore<f64> {
        let data: Vec<f64> = (0..16).map(f64::from).collect();
        DenseStore::from_column_major(4, 4, data).unwrap()
    }

    #[test]
    fn test_offset_window() {
        let base = base_4x4();
        let view = Offset::new(&base, 1, 2).unwrap();
        assert_eq!(view.rows(), 3);
        assert_eq!(view.cols(), 2);
        assert_eq!(view.get(0, 0), base.get(1, 2));
        assert_eq!(view.get(2, 1), base.get(3, 3));
    }

    #[test]
    fn test_limit_window() {
        let base = base_4x4();
        let view = Limit::new(&base, 2, 3).unwrap();
        assert_eq!(view.rows(), 2);
        assert_eq!(view.cols(), 3);
        assert_eq!(view.get(1, 2), base.get(1, 2));
    }

    #[test]
    fn test_windows_compose() {
        let base = base_4x4();
        let offset = Offset::new(&base, 1, 1).unwrap();
        let window = Limit::new(&offset, 2, 2).unwrap();
        assert_eq!(window.rows(), 2);
        assert_eq!(window.get(0, 0), base.get(1, 1));
        assert_eq!(window.get(1, 1), base.get(2, 2));
    }

    #[test]
    fn test_out_of_range_construction() {
        let base = base_4x4();
        assert!(Offset::new(&base, 5, 0).is_err());
        assert!(Limit::new(&base, 4, 5).is_err());
    }
}

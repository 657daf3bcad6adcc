//! Repetition: tile a base store by row and column repetition

use crate::error::{Error, Result};
use crate::scalar::Scalar;
use crate::store::{Access, Structure};

/// The base store tiled `row_repetitions` times down and
/// `col_repetitions` times across
pub struct Repeated<'a, A> {
    base: &'a A,
    row_repetitions: usize,
    col_repetitions: usize,
}

impl<'a, A: Structure> Repeated<'a, A> {
    /// Tile `base`
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionTooLarge`] when either repetition count is
    /// zero or the tiled shape overflows.
    pub fn new(base: &'a A, row_repetitions: usize, col_repetitions: usize) -> Result<Self> {
        let rows = base.rows().checked_mul(row_repetitions);
        let cols = base.cols().checked_mul(col_repetitions);
        if row_repetitions == 0 || col_repetitions == 0 || rows.is_none() || cols.is_none() {
            return Err(Error::DimensionTooLarge {
                rows: base.rows(),
                cols: base.cols(),
            });
        }
        Ok(Self {
            base,
            row_repetitions,
            col_repetitions,
        })
    }
}

impl<A: Structure> Structure for Repeated<'_, A> {
    fn rows(&self) -> usize {
        self.base.rows() * self.row_repetitions
    }

    fn cols(&self) -> usize {
        self.base.cols() * self.col_repetitions
    }
}

impl<T: Scalar, A: Access<T>> Access<T> for Repeated<'_, A> {
    fn get(&self, row: usize, col: usize) -> T {
        self.base.get(row % self.base.rows(), col % self.base.cols())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::DenseStore;

    #[test]
    fn test_tiling() {
        let base = DenseStore::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let tiled = Repeated::new(&base, 2, 3).unwrap();
        assert_eq!(tiled.rows(), 4);
        assert_eq!(tiled.cols(), 6);
        assert_eq!(tiled.get(0, 0), 1.0);
        assert_eq!(tiled.get(2, 4), 1.0);
        assert_eq!(tiled.get(3, 5), 4.0);
        assert_eq!(tiled.get(1, 2), 3.0);
    }

    #[test]
    fn test_zero_repetitions_rejected() {
        let base = DenseStore::<f64>::zeros(2, 2).unwrap();
        assert!(Repeated::new(&base, 0, 1).is_err());
        assert!(Repeated::new(&base, 1, 0).is_err());
    }
}

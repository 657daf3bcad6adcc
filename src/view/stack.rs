//! Stacking views: two base stores composed vertically or horizontally

use crate::dense::{multiply_both, multiply_left, DenseStore};
use crate::dispatch::{self, THRESHOLD};
use crate::error::{Error, Result};
use crate::region::{LimitRegion, OffsetRegion};
use crate::scalar::Scalar;
use crate::store::{Access, Mutate, Nonzeros, Structure};
use crate::view::window::{Limit, Offset};

/// Vertical stack: `upper` on top of `lower`
///
/// The split row index is `upper.rows()`; reads below it are offset and
/// delegated to `lower`.
pub struct AboveBelow<'a, A, B> {
    upper: &'a A,
    lower: &'a B,
    split: usize,
}

impl<'a, A: Structure, B: Structure> AboveBelow<'a, A, B> {
    /// Stack `upper` above `lower`
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] unless both operands have the same
    /// column count.
    pub fn new(upper: &'a A, lower: &'a B) -> Result<Self> {
        if upper.cols() != lower.cols() {
            return Err(Error::ShapeMismatch {
                expected: vec![upper.cols()],
                got: vec![lower.cols()],
            });
        }
        Ok(Self {
            upper,
            lower,
            split: upper.rows(),
        })
    }
}

impl<A: Structure, B: Structure> Structure for AboveBelow<'_, A, B> {
    fn rows(&self) -> usize {
        self.upper.rows() + self.lower.rows()
    }

    fn cols(&self) -> usize {
        self.upper.cols()
    }
}

impl<T: Scalar, A: Access<T>, B: Access<T>> Access<T> for AboveBelow<'_, A, B> {
    fn get(&self, row: usize, col: usize) -> T {
        if row < self.split {
            self.upper.get(row, col)
        } else {
            self.lower.get(row - self.split, col)
        }
    }

    fn nonzeros(&self) -> Nonzeros<'_, T> {
        let split = self.split;
        Box::new(
            self.upper.nonzeros().chain(
                self.lower
                    .nonzeros()
                    .map(move |(r, c, v)| (r + split, c, v)),
            ),
        )
    }
}

impl<A: Structure, B: Structure> AboveBelow<'_, A, B> {
    /// `self * right`, split between the two operands
    ///
    /// The upper product runs as a background task while the lower runs
    /// inline; the caller blocks on the join before the halves are deposited
    /// into the target through regions, so neither operand is ever
    /// materialized.
    pub fn multiply<T: Scalar>(&self, right: &DenseStore<T>) -> Result<DenseStore<T>>
    where
        A: Access<T> + Sync,
        B: Access<T> + Sync,
    {
        if self.cols() != right.rows() {
            return Err(Error::ShapeMismatch {
                expected: vec![self.cols(), right.cols()],
                got: vec![right.rows(), right.cols()],
            });
        }
        let (top, bottom) = dispatch::join(
            || multiply_left(self.upper, right, THRESHOLD),
            || multiply_left(self.lower, right, THRESHOLD),
        )?;

        let mut target = DenseStore::zeros(self.rows(), right.cols())?;
        {
            let mut region = LimitRegion::new(&mut target, self.split, right.cols())?;
            top.supply_to(&mut region);
        }
        {
            let mut region = OffsetRegion::new(&mut target, self.split, 0)?;
            bottom.supply_to(&mut region);
        }
        Ok(target)
    }
}

/// Horizontal stack: `left` beside `right`
///
/// The split column index is `left.cols()`; reads beyond it are offset and
/// delegated to `right`.
pub struct LeftRight<'a, A, B> {
    left: &'a A,
    right: &'a B,
    split: usize,
}

impl<'a, A: Structure, B: Structure> LeftRight<'a, A, B> {
    /// Stack `left` beside `right`
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] unless both operands have the same
    /// row count.
    pub fn new(left: &'a A, right: &'a B) -> Result<Self> {
        if left.rows() != right.rows() {
            return Err(Error::ShapeMismatch {
                expected: vec![left.rows()],
                got: vec![right.rows()],
            });
        }
        Ok(Self {
            left,
            right,
            split: left.cols(),
        })
    }
}

impl<A: Structure, B: Structure> Structure for LeftRight<'_, A, B> {
    fn rows(&self) -> usize {
        self.left.rows()
    }

    fn cols(&self) -> usize {
        self.left.cols() + self.right.cols()
    }
}

impl<T: Scalar, A: Access<T>, B: Access<T>> Access<T> for LeftRight<'_, A, B> {
    fn get(&self, row: usize, col: usize) -> T {
        if col < self.split {
            self.left.get(row, col)
        } else {
            self.right.get(row, col - self.split)
        }
    }

    fn nonzeros(&self) -> Nonzeros<'_, T> {
        let split = self.split;
        Box::new(
            self.left.nonzeros().chain(
                self.right
                    .nonzeros()
                    .map(move |(r, c, v)| (r, c + split, v)),
            ),
        )
    }
}

impl<A: Structure, B: Structure> LeftRight<'_, A, B> {
    /// `self * rhs`, split between the two operands
    ///
    /// `(L | R) * X` equals `L * X_top + R * X_bottom`, so the two
    /// sub-multiplies run as independent tasks against row windows of `rhs`
    /// and their results are summed into one target.
    pub fn multiply<T: Scalar>(&self, rhs: &DenseStore<T>) -> Result<DenseStore<T>>
    where
        A: Access<T> + Sync,
        B: Access<T> + Sync,
    {
        if self.cols() != rhs.rows() {
            return Err(Error::ShapeMismatch {
                expected: vec![self.cols(), rhs.cols()],
                got: vec![rhs.rows(), rhs.cols()],
            });
        }
        let top = Limit::new(rhs, self.split, rhs.cols())?;
        let bottom = Offset::new(rhs, self.split, 0)?;

        let (mut acc, partial) = dispatch::join(
            || multiply_both(self.left, &top, THRESHOLD),
            || multiply_both(self.right, &bottom, THRESHOLD),
        )?;
        for (r, c, v) in partial.nonzeros() {
            acc.add(r, c, v);
        }
        Ok(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Mutate;

    fn dense_3x2() -> DenseStore<f64> {
        DenseStore::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap()
    }

    #[test]
    fn test_above_shape_law() {
        let a = dense_3x2();
        let b = DenseStore::<f64>::zeros(2, 2).unwrap();
        let stacked = AboveBelow::new(&a, &b).unwrap();
        assert_eq!(stacked.rows(), 5);
        assert_eq!(stacked.cols(), 2);

        let mismatched = DenseStore::<f64>::zeros(2, 3).unwrap();
        assert!(AboveBelow::new(&a, &mismatched).is_err());
    }

    #[test]
    fn test_stack_dense_above_zero() {
        // Scenario: a 3x2 dense store above a 2x2 zero store
        let a = dense_3x2();
        let b = DenseStore::<f64>::zeros(2, 2).unwrap();
        let stacked = AboveBelow::new(&a, &b).unwrap();

        assert_eq!(stacked.value_f64(4, 1), 0.0);
        for r in 0..3 {
            for c in 0..2 {
                assert_eq!(stacked.get(r, c), a.get(r, c));
            }
        }
    }

    #[test]
    fn test_left_right_translation() {
        let a = dense_3x2();
        let mut b = DenseStore::<f64>::zeros(3, 1).unwrap();
        b.set(2, 0, 9.0);
        let stacked = LeftRight::new(&a, &b).unwrap();

        assert_eq!(stacked.rows(), 3);
        assert_eq!(stacked.cols(), 3);
        assert_eq!(stacked.get(1, 1), 4.0);
        assert_eq!(stacked.get(2, 2), 9.0);
        assert_eq!(stacked.get(0, 2), 0.0);
    }

    #[test]
    fn test_stacked_nonzeros_translate() {
        let a = DenseStore::from_rows(&[vec![1.0]]).unwrap();
        let mut b = DenseStore::<f64>::zeros(1, 1).unwrap();
        b.set(0, 0, 2.0);
        let stacked = AboveBelow::new(&a, &b).unwrap();
        let entries: Vec<_> = stacked.nonzeros().collect();
        assert_eq!(entries, vec![(0, 0, 1.0), (1, 0, 2.0)]);
    }

    #[test]
    fn test_above_below_multiply_matches_flat() {
        let a = dense_3x2();
        let b = DenseStore::from_rows(&[vec![7.0, 8.0], vec![9.0, 10.0]]).unwrap();
        let stacked = AboveBelow::new(&a, &b).unwrap();

        let rhs = DenseStore::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let product = stacked.multiply(&rhs).unwrap();

        // The same store flattened
        let flat = DenseStore::from_rows(&[
            vec![1.0, 2.0],
            vec![3.0, 4.0],
            vec![5.0, 6.0],
            vec![7.0, 8.0],
            vec![9.0, 10.0],
        ])
        .unwrap();
        assert_eq!(product, flat.multiply(&rhs).unwrap());
    }

    #[test]
    fn test_left_right_multiply_matches_flat() {
        let a = dense_3x2();
        let b = DenseStore::from_rows(&[vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        let stacked = LeftRight::new(&a, &b).unwrap();

        let rhs =
            DenseStore::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]]).unwrap();
        let product = stacked.multiply(&rhs).unwrap();

        let flat = DenseStore::from_rows(&[
            vec![1.0, 2.0, 1.0],
            vec![3.0, 4.0, 2.0],
            vec![5.0, 6.0, 3.0],
        ])
        .unwrap();
        assert_eq!(product, flat.multiply(&rhs).unwrap());
    }

    #[test]
    fn test_multiply_with_mixed_operand_layouts() {
        use crate::sparse::CsrStore;

        let a = dense_3x2();
        let b = CsrStore::<f64>::empty(2, 2);
        let stacked = AboveBelow::new(&a, &b).unwrap();

        let rhs = DenseStore::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let product = stacked.multiply(&rhs).unwrap();

        assert_eq!(product.rows(), 5);
        for r in 0..3 {
            for c in 0..2 {
                assert_eq!(product.get(r, c), a.multiply(&rhs).unwrap().get(r, c));
            }
        }
        assert_eq!(product.get(3, 0), 0.0);
        assert_eq!(product.get(4, 1), 0.0);
    }

    #[test]
    fn test_stacked_multiply_shape_mismatch() {
        let a = dense_3x2();
        let b = DenseStore::<f64>::zeros(2, 2).unwrap();
        let stacked = AboveBelow::new(&a, &b).unwrap();
        let bad = DenseStore::<f64>::zeros(3, 3).unwrap();
        assert!(matches!(
            stacked.multiply(&bad),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}

//! Transpose and conjugate-transpose views

use crate::scalar::Scalar;
use crate::store::{Access, Nonzeros, Structure};

/// Transpose: a read at `(r, c)` delegates to `(c, r)`
pub struct Transposed<'a, A> {
    base: &'a A,
}

impl<'a, A: Structure> Transposed<'a, A> {
    /// View `base` transposed
    pub fn new(base: &'a A) -> Self {
        Self { base }
    }
}

impl<A: Structure> Structure for Transposed<'_, A> {
    fn rows(&self) -> usize {
        self.base.cols()
    }

    fn cols(&self) -> usize {
        self.base.rows()
    }
}

impl<T: Scalar, A: Access<T>> Access<T> for Transposed<'_, A> {
    fn get(&self, row: usize, col: usize) -> T {
        self.base.get(col, row)
    }

    fn nonzeros(&self) -> Nonzeros<'_, T> {
        Box::new(self.base.nonzeros().map(|(r, c, v)| (c, r, v)))
    }
}

/// Conjugate transpose: swap coordinates and conjugate the value on read
pub struct ConjugateTransposed<'a, A> {
    base: &'a A,
}

impl<'a, A: Structure> ConjugateTransposed<'a, A> {
    /// View `base` conjugate-transposed
    pub fn new(base: &'a A) -> Self {
        Self { base }
    }
}

impl<A: Structure> Structure for ConjugateTransposed<'_, A> {
    fn rows(&self) -> usize {
        self.base.cols()
    }

    fn cols(&self) -> usize {
        self.base.rows()
    }
}

impl<T: Scalar, A: Access<T>> Access<T> for ConjugateTransposed<'_, A> {
    fn get(&self, row: usize, col: usize) -> T {
        self.base.get(col, row).conjugate()
    }

    fn nonzeros(&self) -> Nonzeros<'_, T> {
        Box::new(
            self.base
                .nonzeros()
                .map(|(r, c, v)| (c, r, v.conjugate())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::DenseStore;
    use crate::store::Mutate;
    use num_complex::Complex64;

    #[test]
    fn test_transpose_translation() {
        let base =
            DenseStore::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let t = Transposed::new(&base);
        assert_eq!(t.rows(), 3);
        assert_eq!(t.cols(), 2);
        for r in 0..2 {
            for c in 0..3 {
                assert_eq!(t.get(c, r), base.get(r, c));
            }
        }
    }

    #[test]
    fn test_transpose_of_transpose_is_identity() {
        let base = DenseStore::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let t = Transposed::new(&base);
        let tt = Transposed::new(&t);
        for r in 0..2 {
            for c in 0..2 {
                assert_eq!(tt.get(r, c), base.get(r, c));
            }
        }
    }

    #[test]
    fn test_conjugate_transpose() {
        let mut base = DenseStore::<Complex64>::zeros(2, 2).unwrap();
        base.set(0, 1, Complex64::new(1.0, 2.0));
        let h = ConjugateTransposed::new(&base);
        assert_eq!(h.get(1, 0), Complex64::new(1.0, -2.0));
        assert_eq!(h.get(0, 1), Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_transpose_nonzeros_swap_coordinates() {
        let mut base = DenseStore::<f64>::zeros(2, 3).unwrap();
        base.set(1, 2, 7.0);
        let t = Transposed::new(&base);
        let entries: Vec<_> = t.nonzeros().collect();
        assert_eq!(entries, vec![(2, 1, 7.0)]);
    }
}

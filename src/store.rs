//! The store contract: minimal capability traits
//!
//! Instead of one fat interface, the contract is split into small traits
//! composed through bounds: [`Structure`] for the shape, [`Access`] for the
//! read side and [`Mutate`] for the write side. Physical stores implement
//! all three; logical views implement only `Structure + Access`; transformable
//! regions implement `Structure + Mutate`.
//!
//! Reading is defined for every in-range coordinate. Out-of-range access is a
//! programming error and fails fast (panics), like slice indexing.

use crate::scalar::Scalar;

/// Lazy, finite, restartable sequence of `(row, col, value)` triples
///
/// Yields only stored (non-zero) entries, ordered by the store's natural
/// layout. Calling [`Access::nonzeros`] again restarts the traversal.
pub type Nonzeros<'a, T> = Box<dyn Iterator<Item = (usize, usize, T)> + 'a>;

/// Shape of a two-dimensional store
pub trait Structure {
    /// Number of rows
    fn rows(&self) -> usize;

    /// Number of columns
    fn cols(&self) -> usize;

    /// Total element count, `rows * cols`
    #[inline]
    fn count(&self) -> usize {
        self.rows() * self.cols()
    }

    /// True when the store has as many rows as columns
    #[inline]
    fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    /// True when either dimension is 1
    #[inline]
    fn is_vector(&self) -> bool {
        self.rows() == 1 || self.cols() == 1
    }
}

/// Read access to the elements of a store
///
/// The two read paths must agree: `value_f64(r, c) == get(r, c).to_f64()`
/// for every in-range coordinate and every scalar domain.
pub trait Access<T: Scalar>: Structure {
    /// Element at `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows()` or `col >= cols()`.
    fn get(&self, row: usize, col: usize) -> T;

    /// Primitive fast path, equal to `get(row, col).to_f64()`
    #[inline]
    fn value_f64(&self, row: usize, col: usize) -> f64 {
        self.get(row, col).to_f64()
    }

    /// Iterate the stored nonzero entries in natural layout order
    ///
    /// The default scans all coordinates column by column and filters out
    /// zeros; physical stores override this with their native traversal.
    fn nonzeros(&self) -> Nonzeros<'_, T>
    where
        Self: Sized,
    {
        let rows = self.rows();
        Box::new(
            (0..self.cols())
                .flat_map(move |c| (0..rows).map(move |r| (r, c, self.get(r, c))))
                .filter(|&(_, _, v)| v != T::ZERO),
        )
    }

    /// Bulk-copy this store's elements into a target region
    ///
    /// The target is reset to all zeros first, then every stored nonzero is
    /// written through the target's own coordinate translation. The target
    /// must have the same shape as this store.
    fn supply_to<R: Mutate<T>>(&self, target: &mut R)
    where
        Self: Sized,
    {
        debug_assert_eq!(self.rows(), target.rows());
        debug_assert_eq!(self.cols(), target.cols());
        target.reset();
        for (r, c, v) in self.nonzeros() {
            target.set(r, c, v);
        }
    }
}

/// Write access to the elements of a store or region
///
/// Writes are visible immediately in the backing storage; there is no
/// buffering. Sparse implementations apply the shared zero-eviction rule:
/// a write that leaves an entry within tolerance of zero removes it.
pub trait Mutate<T: Scalar>: Structure {
    /// Overwrite the element at `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of range.
    fn set(&mut self, row: usize, col: usize, value: T);

    /// Accumulate `value` onto the element at `(row, col)`
    fn add(&mut self, row: usize, col: usize, value: T);

    /// Set every element to zero
    fn reset(&mut self);

    /// Broadcast `value` to every element
    fn fill_all(&mut self, value: T) {
        for c in 0..self.cols() {
            for r in 0..self.rows() {
                self.set(r, c, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::DenseStore;

    #[test]
    fn test_structure_predicates() {
        let a = DenseStore::<f64>::zeros(3, 3).unwrap();
        assert!(a.is_square());
        assert!(!a.is_vector());
        assert_eq!(a.count(), 9);

        let v = DenseStore::<f64>::zeros(3, 1).unwrap();
        assert!(v.is_vector());
        assert!(!v.is_square());
    }

    #[test]
    fn test_value_f64_agrees_with_get() {
        let mut a = DenseStore::<f32>::zeros(2, 2).unwrap();
        a.set(1, 0, 2.5);
        assert_eq!(a.value_f64(1, 0), a.get(1, 0).to_f64());
        assert_eq!(a.value_f64(1, 0), 2.5);
    }

    #[test]
    fn test_supply_to_resets_target() {
        let mut src = DenseStore::<f64>::zeros(2, 2).unwrap();
        src.set(0, 1, 3.0);

        let mut dst = DenseStore::<f64>::zeros(2, 2).unwrap();
        dst.fill_all(9.0);
        src.supply_to(&mut dst);

        assert_eq!(dst.get(0, 1), 3.0);
        assert_eq!(dst.get(0, 0), 0.0);
        assert_eq!(dst.get(1, 1), 0.0);
    }
}

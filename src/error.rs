//! Error types for matr

use thiserror::Error;

/// Result type alias using matr's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in matr operations
///
/// Shape and domain mismatches signal caller misuse and are never retried.
/// Out-of-range *element access* is not represented here: reading or writing
/// a coordinate outside a store's shape is a programming error and fails
/// fast by panicking, like slice indexing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Shape mismatch in a multiply, fill or stacking operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// An index supplied at construction time is outside the addressable range
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The offending index
        index: usize,
        /// The dimension size it must be below
        size: usize,
    },

    /// Requested shape exceeds the representable linear index range
    #[error("Shape {rows}x{cols} exceeds the representable element count")]
    DimensionTooLarge {
        /// Requested row count
        rows: usize,
        /// Requested column count
        cols: usize,
    },

    /// Internal invariant breakage, including failures surfaced from
    /// background tasks
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ShapeMismatch {
            expected: vec![3, 2],
            got: vec![2, 3],
        };
        assert_eq!(
            err.to_string(),
            "Shape mismatch: expected [3, 2], got [2, 3]"
        );

        let err = Error::IndexOutOfBounds { index: 7, size: 5 };
        assert_eq!(
            err.to_string(),
            "Index 7 out of bounds for dimension of size 5"
        );
    }
}

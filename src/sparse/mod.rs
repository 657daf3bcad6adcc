//! Sparse storage engines
//!
//! Three structurally distinct families:
//!
//! - [`CsrStore`] / [`CscStore`] - compressed array triples (values,
//!   secondary indices, primary pointers) with cache-friendly contiguous
//!   blocks and lossless CSR-CSC conversion;
//! - [`LinkedRowStore`] / [`LinkedColumnStore`] - doubly-linked per-row or
//!   per-column node lists in an arena, trading locality for O(1) structural
//!   mutation.
//!
//! All sparse stores share one rule: absence means zero, and a stored entry
//! whose value collapses within [`ZERO_TOLERANCE`](crate::scalar::ZERO_TOLERANCE)
//! of zero is evicted, never retained.

pub mod csc;
pub mod csr;
pub mod linked;

pub use csc::CscStore;
pub use csr::CsrStore;
pub use linked::{LinkedColumnStore, LinkedRowStore};

use crate::store::Structure;

/// Extra structure exposed by every sparse store
pub trait SparseStructure: Structure {
    /// Number of stored entries
    fn nnz(&self) -> usize;

    /// Stored entries as a fraction of the full element count
    fn density(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.nnz() as f64 / count as f64
        }
    }

    /// Approximate heap footprint in bytes
    fn memory_usage(&self) -> usize;
}

//! # matr
//!
//! **Matrix storage engine: dense, sparse, and composable logical views.**
//!
//! matr separates how a matrix is stored from how it is used. Code is written
//! against small capability traits - [`store::Structure`] for shape,
//! [`store::Access`] for reads, [`store::Mutate`] for writes - and the
//! physical layout behind them is chosen through a [`factory::Factory`].
//!
//! ## Why matr?
//!
//! - **Capability traits**: Readers, writers, and shapes are separate contracts
//! - **Dense and sparse**: Column-major dense, CSR/CSC compressed, linked-list
//!   sparse for heavy mutation
//! - **Zero-copy views**: Transpose, windows, stacking, selection, masking -
//!   all as coordinate translations over a borrowed base
//! - **Parallel multiply**: Threshold-gated divide-and-conquer over disjoint
//!   column blocks, deterministic at every threshold
//! - **Generic scalars**: `f32`, `f64`, and `Complex64` through one trait
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use matr::prelude::*;
//!
//! let a = DenseStore::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]])?;
//! let b = DenseFactory.identity(2)?;
//!
//! let c = a.multiply(&b)?;
//! assert_eq!(c.get(1, 0), 3.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): Multi-threaded multiply and element-wise updates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dense;
pub mod dispatch;
pub mod error;
pub mod factory;
pub mod region;
pub mod scalar;
pub mod sparse;
pub mod store;
pub mod view;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dense::DenseStore;
    pub use crate::error::{Error, Result};
    pub use crate::factory::{
        CscFactory, CsrFactory, DenseFactory, Factory, LinkedColumnFactory, LinkedRowFactory,
    };
    pub use crate::scalar::Scalar;
    pub use crate::sparse::{
        CscStore, CsrStore, LinkedColumnStore, LinkedRowStore, SparseStructure,
    };
    pub use crate::store::{Access, Mutate, Structure};
}

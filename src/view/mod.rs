//! Logical views: read-only composable transformations
//!
//! A view implements `Structure + Access` as a pure coordinate translation
//! over one or two base stores. It holds only its translation parameters and
//! `&`-references to the bases - no independent mutable state, no copies -
//! so construction is cheap and a view must not outlive its base.
//!
//! Views compose freely: a [`Transposed`] over a [`Limit`] over a
//! [`Superimposed`] is just three translations applied in sequence before
//! the base read.

mod masked;
mod repeat;
mod select;
mod stack;
mod superimpose;
mod transpose;
mod window;

pub use masked::{DiagonalMask, Hermitian, Symmetric, Triangular};
pub use repeat::Repeated;
pub use select::{SelectedColumns, SelectedRows};
pub use stack::{AboveBelow, LeftRight};
pub use superimpose::Superimposed;
pub use transpose::{ConjugateTransposed, Transposed};
pub use window::{Limit, Offset};

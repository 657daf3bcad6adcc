//! Threshold-gated divide-and-conquer dispatch
//!
//! Bulk operations over a column-major dense store parallelize by splitting
//! the *column* range: concurrent tasks then write disjoint memory and need
//! no locking. A range wider than the threshold is halved via `rayon::join`;
//! recursion continues until a sub-range falls at or below the threshold, at
//! which point the iterative kernel runs directly. Below the threshold the
//! whole operation is synchronous and single-threaded.
//!
//! Errors from background tasks are carried through the join and surfaced to
//! the caller; nothing is swallowed or merely logged.
//!
//! With the `rayon` feature disabled every entry point degrades to the
//! sequential kernel.

use crate::dense::DenseStore;
use crate::error::Result;
use crate::scalar::Scalar;
use crate::store::{Access, Structure};

/// Column count above which a bulk operation is split for parallel execution
pub const THRESHOLD: usize = 128;

/// Run two closures as independent tasks and join their results
///
/// One half may be stolen by a pool worker while the other runs inline on the
/// calling thread; the caller blocks until both are done. The first error
/// wins.
#[cfg(feature = "rayon")]
pub fn join<RA, RB, FA, FB>(a: FA, b: FB) -> Result<(RA, RB)>
where
    RA: Send,
    RB: Send,
    FA: FnOnce() -> Result<RA> + Send,
    FB: FnOnce() -> Result<RB> + Send,
{
    let (ra, rb) = rayon::join(a, b);
    Ok((ra?, rb?))
}

/// Sequential fallback: runs `a` then `b` on the calling thread
#[cfg(not(feature = "rayon"))]
pub fn join<RA, RB, FA, FB>(a: FA, b: FB) -> Result<(RA, RB)>
where
    RA: Send,
    RB: Send,
    FA: FnOnce() -> Result<RA> + Send,
    FB: FnOnce() -> Result<RB> + Send,
{
    Ok((a()?, b()?))
}

/// Apply `kernel` over the columns of a contiguous column-major slice,
/// splitting the column range while it exceeds `threshold`
///
/// `data` holds whole columns (`data.len()` is a multiple of `rows`) and
/// `first` is the absolute index of its first column, passed through so the
/// kernel can translate back to global coordinates.
#[cfg(feature = "rayon")]
pub fn divide_columns<T, F>(
    data: &mut [T],
    rows: usize,
    first: usize,
    threshold: usize,
    kernel: &F,
) -> Result<()>
where
    T: Send,
    F: Fn(usize, &mut [T]) -> Result<()> + Sync,
{
    let cols = if rows == 0 { 0 } else { data.len() / rows };
    if cols > threshold.max(1) {
        let split = cols / 2;
        let (lo, hi) = data.split_at_mut(split * rows);
        let (_, _) = join(
            || divide_columns(lo, rows, first, threshold, kernel),
            || divide_columns(hi, rows, first + split, threshold, kernel),
        )?;
        Ok(())
    } else {
        kernel(first, data)
    }
}

/// Sequential fallback: the kernel runs once over the whole range
#[cfg(not(feature = "rayon"))]
pub fn divide_columns<T, F>(
    data: &mut [T],
    rows: usize,
    first: usize,
    _threshold: usize,
    kernel: &F,
) -> Result<()>
where
    T: Send,
    F: Fn(usize, &mut [T]) -> Result<()> + Sync,
{
    let _ = rows;
    kernel(first, data)
}

/// In-place forward substitution `L * X = B`, overwriting `rhs` with `X`
///
/// `body` is read as a lower-triangular store; entries above the diagonal are
/// never touched. With `unit_diagonal` the diagonal is taken as one and not
/// read. Right-hand-side columns are independent, so the dispatch splits over
/// them.
pub fn substitute_forward<T, B>(body: &B, rhs: &mut DenseStore<T>, unit_diagonal: bool) -> Result<()>
where
    T: Scalar,
    B: Access<T> + Sync,
{
    let n = rhs.rows();
    shape_check(body, n)?;

    let rows = n;
    divide_columns(rhs.data_mut(), rows, 0, THRESHOLD, &|_, block: &mut [T]| {
        for col in block.chunks_exact_mut(rows) {
            for i in 0..n {
                let mut sum = col[i];
                for (k, &ck) in col.iter().enumerate().take(i) {
                    sum -= body.get(i, k) * ck;
                }
                col[i] = if unit_diagonal {
                    sum
                } else {
                    sum / body.get(i, i)
                };
            }
        }
        Ok(())
    })
}

/// In-place backward substitution `U * X = B`, overwriting `rhs` with `X`
///
/// `body` is read as an upper-triangular store. Mirror image of
/// [`substitute_forward`].
pub fn substitute_backward<T, B>(
    body: &B,
    rhs: &mut DenseStore<T>,
    unit_diagonal: bool,
) -> Result<()>
where
    T: Scalar,
    B: Access<T> + Sync,
{
    let n = rhs.rows();
    shape_check(body, n)?;

    let rows = n;
    divide_columns(rhs.data_mut(), rows, 0, THRESHOLD, &|_, block: &mut [T]| {
        for col in block.chunks_exact_mut(rows) {
            for i in (0..n).rev() {
                let mut sum = col[i];
                for k in (i + 1)..n {
                    sum -= body.get(i, k) * col[k];
                }
                col[i] = if unit_diagonal {
                    sum
                } else {
                    sum / body.get(i, i)
                };
            }
        }
        Ok(())
    })
}

/// Cholesky/LDL elimination step for column `pivot`
///
/// Subtracts the scaled outer product of the pivot column tail from the
/// trailing submatrix: `A[i][j] -= A[i][pivot] * conj(A[j][pivot])` for
/// `i, j > pivot`. The pivot column is snapshotted first so the trailing
/// columns can be updated in parallel.
pub fn eliminate_symmetric<T: Scalar>(target: &mut DenseStore<T>, pivot: usize) -> Result<()> {
    let rows = target.rows();
    shape_check(&*target, rows)?;
    pivot_check(pivot, rows)?;
    let multipliers: Vec<T> = target.column(pivot).to_vec();

    let first = pivot + 1;
    let tail = &mut target.data_mut()[first * rows..];
    divide_columns(tail, rows, first, THRESHOLD, &|first_col, block: &mut [T]| {
        for (jj, col) in block.chunks_exact_mut(rows).enumerate() {
            let j = first_col + jj;
            let factor = multipliers[j].conjugate();
            if factor != T::ZERO {
                for i in (pivot + 1)..rows {
                    col[i] -= multipliers[i] * factor;
                }
            }
        }
        Ok(())
    })
}

/// LU elimination step for column `pivot`
///
/// Assumes the multipliers are already stored below the pivot in column
/// `pivot`; subtracts `A[i][pivot] * A[pivot][j]` from every trailing
/// element, one task per column block.
pub fn eliminate_lu<T: Scalar>(target: &mut DenseStore<T>, pivot: usize) -> Result<()> {
    let rows = target.rows();
    shape_check(&*target, rows)?;
    pivot_check(pivot, rows)?;
    let multipliers: Vec<T> = target.column(pivot).to_vec();

    let first = pivot + 1;
    let tail = &mut target.data_mut()[first * rows..];
    divide_columns(tail, rows, first, THRESHOLD, &|_, block: &mut [T]| {
        for col in block.chunks_exact_mut(rows) {
            let factor = col[pivot];
            if factor != T::ZERO {
                for i in (pivot + 1)..rows {
                    col[i] -= multipliers[i] * factor;
                }
            }
        }
        Ok(())
    })
}

fn pivot_check(pivot: usize, n: usize) -> Result<()> {
    if pivot >= n {
        return Err(crate::error::Error::IndexOutOfBounds {
            index: pivot,
            size: n,
        });
    }
    Ok(())
}

fn shape_check<T: Scalar, B: Access<T>>(body: &B, n: usize) -> Result<()> {
    if body.rows() != n || body.cols() != n {
        return Err(crate::error::Error::ShapeMismatch {
            expected: vec![n, n],
            got: vec![body.rows(), body.cols()],
        });
    }
    Ok(())
}

//! Multiply kernels
//!
//! Four variants, named by which operands are native dense stores and which
//! are read through the generic [`Access`] contract ("boxed"):
//!
//! - [`multiply_neither`] - neither operand boxed, both native dense
//! - [`multiply_left`] - the left operand is boxed, the right is native
//! - [`multiply_right`] - the right operand is boxed, the left is native
//! - [`multiply_both`] - both operands boxed
//!
//! All four share the same AXPY-shaped loop: for every target column `j` and
//! every inner index `k` with a nonzero `right[k][j]`, scale the left
//! operand's column `k` into the target column. Each output column is
//! accumulated by exactly one task in a fixed inner order, so results are
//! bit-identical regardless of the split threshold.

use super::DenseStore;
use crate::dispatch;
use crate::error::{Error, Result};
use crate::scalar::Scalar;
use crate::store::{Access, Structure};

fn check<L: Structure, R: Structure>(left: &L, right: &R) -> Result<()> {
    if left.cols() != right.rows() {
        return Err(Error::ShapeMismatch {
            expected: vec![left.cols(), right.cols()],
            got: vec![right.rows(), right.cols()],
        });
    }
    Ok(())
}

/// `left * right` where both operands are native dense stores
pub fn multiply_neither<T: Scalar>(
    left: &DenseStore<T>,
    right: &DenseStore<T>,
    threshold: usize,
) -> Result<DenseStore<T>> {
    check(left, right)?;
    let (m, k, n) = (left.rows(), left.cols(), right.cols());
    let mut target = DenseStore::zeros(m, n)?;
    if m == 0 || n == 0 {
        return Ok(target);
    }

    let ldata = left.data();
    let rdata = right.data();
    dispatch::divide_columns(
        target.data_mut(),
        m,
        0,
        threshold,
        &|first, block: &mut [T]| {
            for (jj, tcol) in block.chunks_exact_mut(m).enumerate() {
                let rcol = &rdata[(first + jj) * k..(first + jj + 1) * k];
                for (kk, &factor) in rcol.iter().enumerate() {
                    if factor != T::ZERO {
                        let lcol = &ldata[kk * m..(kk + 1) * m];
                        for (t, &l) in tcol.iter_mut().zip(lcol) {
                            *t += l * factor;
                        }
                    }
                }
            }
            Ok(())
        },
    )?;
    Ok(target)
}

/// `left * right` where only the right operand is a native dense store
pub fn multiply_left<T, L>(left: &L, right: &DenseStore<T>, threshold: usize) -> Result<DenseStore<T>>
where
    T: Scalar,
    L: Access<T> + Sync,
{
    check(left, right)?;
    let (m, k, n) = (left.rows(), left.cols(), right.cols());
    let mut target = DenseStore::zeros(m, n)?;
    if m == 0 || n == 0 {
        return Ok(target);
    }

    let rdata = right.data();
    dispatch::divide_columns(
        target.data_mut(),
        m,
        0,
        threshold,
        &|first, block: &mut [T]| {
            for (jj, tcol) in block.chunks_exact_mut(m).enumerate() {
                let rcol = &rdata[(first + jj) * k..(first + jj + 1) * k];
                for (kk, &factor) in rcol.iter().enumerate() {
                    if factor != T::ZERO {
                        for (i, t) in tcol.iter_mut().enumerate() {
                            *t += left.get(i, kk) * factor;
                        }
                    }
                }
            }
            Ok(())
        },
    )?;
    Ok(target)
}

/// `left * right` where only the left operand is a native dense store
pub fn multiply_right<T, R>(
    left: &DenseStore<T>,
    right: &R,
    threshold: usize,
) -> Result<DenseStore<T>>
where
    T: Scalar,
    R: Access<T> + Sync,
{
    check(left, right)?;
    let (m, k, n) = (left.rows(), left.cols(), right.cols());
    let mut target = DenseStore::zeros(m, n)?;
    if m == 0 || n == 0 {
        return Ok(target);
    }

    let ldata = left.data();
    dispatch::divide_columns(
        target.data_mut(),
        m,
        0,
        threshold,
        &|first, block: &mut [T]| {
            for (jj, tcol) in block.chunks_exact_mut(m).enumerate() {
                let j = first + jj;
                for kk in 0..k {
                    let factor = right.get(kk, j);
                    if factor != T::ZERO {
                        let lcol = &ldata[kk * m..(kk + 1) * m];
                        for (t, &l) in tcol.iter_mut().zip(lcol) {
                            *t += l * factor;
                        }
                    }
                }
            }
            Ok(())
        },
    )?;
    Ok(target)
}

/// `left * right` where both operands are read through the generic contract
pub fn multiply_both<T, L, R>(left: &L, right: &R, threshold: usize) -> Result<DenseStore<T>>
where
    T: Scalar,
    L: Access<T> + Sync,
    R: Access<T> + Sync,
{
    check(left, right)?;
    let (m, k, n) = (left.rows(), left.cols(), right.cols());
    let mut target = DenseStore::zeros(m, n)?;
    if m == 0 || n == 0 {
        return Ok(target);
    }

    dispatch::divide_columns(
        target.data_mut(),
        m,
        0,
        threshold,
        &|first, block: &mut [T]| {
            for (jj, tcol) in block.chunks_exact_mut(m).enumerate() {
                let j = first + jj;
                for kk in 0..k {
                    let factor = right.get(kk, j);
                    if factor != T::ZERO {
                        for (i, t) in tcol.iter_mut().enumerate() {
                            *t += left.get(i, kk) * factor;
                        }
                    }
                }
            }
            Ok(())
        },
    )?;
    Ok(target)
}

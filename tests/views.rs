//! Integration tests for logical views and transformable regions
//!
//! A view must be transparent: reading through it gives exactly the
//! coordinate-translated base values, across every layout it wraps.

use matr::prelude::*;
use matr::region::{LimitRegion, OffsetRegion, PermutedRegion, TransposedRegion};
use matr::view::{
    AboveBelow, ConjugateTransposed, Limit, Offset, Repeated, SelectedColumns, SelectedRows,
    Superimposed, Transposed, Triangular,
};
use num_complex::Complex64;

#[test]
fn stacking_dense_above_empty_sparse() {
    // A 3x2 dense block stacked above a 2x2 all-zero sparse block
    let upper = DenseStore::from_rows(&[
        vec![1.0, 2.0],
        vec![3.0, 4.0],
        vec![5.0, 6.0],
    ])
    .unwrap();
    let lower = CsrStore::<f64>::empty(2, 2);

    let stacked = AboveBelow::new(&upper, &lower).unwrap();
    assert_eq!(stacked.rows(), 5);
    assert_eq!(stacked.cols(), 2);

    assert_eq!(stacked.get(2, 1), 6.0);
    assert_eq!(stacked.value_f64(4, 1), 0.0);
    assert_eq!(stacked.value_f64(3, 0), 0.0);

    // Only the upper block contributes stored entries
    assert_eq!(stacked.nonzeros().count(), 6);
}

#[test]
fn column_selection_with_negative_padding() {
    let base = DenseStore::from_rows(&[
        vec![1.0, 2.0, 3.0],
        vec![4.0, 5.0, 6.0],
        vec![7.0, 8.0, 9.0],
    ])
    .unwrap();

    // Third column, a zero column, then the first column
    let selected = SelectedColumns::new(&base, vec![2, -1, 0]).unwrap();
    assert_eq!(selected.cols(), 3);
    assert_eq!(selected.get(0, 0), 3.0);
    assert_eq!(selected.get(2, 0), 9.0);
    assert_eq!(selected.get(0, 1), 0.0);
    assert_eq!(selected.get(1, 1), 0.0);
    assert_eq!(selected.get(0, 2), 1.0);

    assert!(SelectedColumns::new(&base, vec![3]).is_err());
}

#[test]
fn row_selection_reorders_and_duplicates() {
    let base = DenseStore::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    let selected = SelectedRows::new(&base, vec![1, 1, 0]).unwrap();
    assert_eq!(selected.rows(), 3);
    assert_eq!(selected.get(0, 0), 3.0);
    assert_eq!(selected.get(1, 0), 3.0);
    assert_eq!(selected.get(2, 1), 2.0);
}

#[test]
fn views_compose_over_any_layout() {
    let base = CscStore::from_columns(&[
        vec![1.0, 0.0, 2.0],
        vec![0.0, 5.0, 0.0],
        vec![3.0, 0.0, 7.0],
    ])
    .unwrap();

    // Transpose, then drop the first row of the transpose
    let transposed = Transposed::new(&base);
    assert_eq!(transposed.get(2, 0), base.get(0, 2));

    let window = Offset::new(&transposed, 1, 0).unwrap();
    assert_eq!(window.rows(), 2);
    assert_eq!(window.get(0, 1), base.get(1, 1));

    let limited = Limit::new(&window, 1, 2).unwrap();
    assert_eq!(limited.rows(), 1);
    assert_eq!(limited.cols(), 2);
    assert_eq!(limited.get(0, 0), base.get(0, 1));
}

#[test]
fn conjugate_transpose_conjugates() {
    let mut base = DenseStore::<Complex64>::zeros(2, 2).unwrap();
    base.set(0, 1, Complex64::new(1.0, -2.0));

    let adjoint = ConjugateTransposed::new(&base);
    assert_eq!(adjoint.get(1, 0), Complex64::new(1.0, 2.0));
    assert_eq!(adjoint.get(0, 1), Complex64::new(0.0, 0.0));
}

#[test]
fn triangular_mask_and_unit_diagonal() {
    let base = DenseStore::from_rows(&[vec![2.0, 9.0], vec![4.0, 3.0]]).unwrap();

    let lower = Triangular::lower(&base, false);
    assert_eq!(lower.get(0, 1), 0.0);
    assert_eq!(lower.get(1, 0), 4.0);
    assert_eq!(lower.get(0, 0), 2.0);

    let unit = Triangular::lower(&base, true);
    assert_eq!(unit.get(0, 0), 1.0);
    assert_eq!(unit.get(1, 1), 1.0);
    assert_eq!(unit.get(1, 0), 4.0);
}

#[test]
fn superimpose_adds_patch_in_place() {
    let base = DenseStore::from_rows(&[vec![1.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]]).unwrap();
    let patch = DenseStore::from_rows(&[vec![10.0]]).unwrap();

    let view = Superimposed::new(&base, &patch, 1, 2).unwrap();
    assert_eq!(view.get(1, 2), 11.0);
    assert_eq!(view.get(0, 0), 1.0);

    assert!(Superimposed::new(&base, &patch, 2, 0).is_err());
}

#[test]
fn repeated_tiles_the_base() {
    let base = DenseStore::from_rows(&[vec![1.0, 2.0]]).unwrap();
    let tiled = Repeated::new(&base, 3, 2).unwrap();
    assert_eq!(tiled.rows(), 3);
    assert_eq!(tiled.cols(), 4);
    assert_eq!(tiled.get(2, 3), 2.0);
    assert_eq!(tiled.get(1, 2), 1.0);
}

#[test]
fn regions_translate_writes() {
    let mut store = DenseStore::<f64>::zeros(4, 4).unwrap();

    {
        let mut region = OffsetRegion::new(&mut store, 2, 2).unwrap();
        region.set(0, 0, 5.0);
        region.set(1, 1, 6.0);
    }
    assert_eq!(store.get(2, 2), 5.0);
    assert_eq!(store.get(3, 3), 6.0);

    {
        let mut region = LimitRegion::new(&mut store, 2, 2).unwrap();
        region.fill_all(1.0);
    }
    assert_eq!(store.get(0, 0), 1.0);
    assert_eq!(store.get(1, 1), 1.0);
    // Outside the limit window is untouched
    assert_eq!(store.get(2, 2), 5.0);

    {
        let mut region = TransposedRegion::new(&mut store);
        region.set(0, 3, 8.0);
    }
    assert_eq!(store.get(3, 0), 8.0);
}

#[test]
fn permuted_region_routes_rows() {
    let mut store = DenseStore::<f64>::zeros(3, 2).unwrap();
    {
        let mut region = PermutedRegion::new(&mut store, vec![2, 0, 1]).unwrap();
        region.set(0, 0, 1.0);
        region.set(1, 0, 2.0);
        region.set(2, 0, 3.0);
    }
    assert_eq!(store.get(2, 0), 1.0);
    assert_eq!(store.get(0, 0), 2.0);
    assert_eq!(store.get(1, 0), 3.0);
}

#[test]
fn region_reset_is_local() {
    let mut store = DenseStore::<f64>::zeros(3, 3).unwrap();
    store.fill_all(7.0);
    {
        let mut region = OffsetRegion::new(&mut store, 1, 1).unwrap();
        region.reset();
    }
    assert_eq!(store.get(0, 0), 7.0);
    assert_eq!(store.get(0, 2), 7.0);
    assert_eq!(store.get(1, 1), 0.0);
    assert_eq!(store.get(2, 2), 0.0);
}

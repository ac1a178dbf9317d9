/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Elementwise maps, materialized through a builder.

use itertools::iproduct;

use crate::builder::MatrixBuilder;
use crate::element::Element;
use crate::matrix::{Matrix, SharedMatrix};
use crate::utils;

/// `f` applied to every element, into `builder`.
pub fn map_into<T, U, B, F>(matrix: &dyn Matrix<T>, builder: &mut B, mut f: F) -> SharedMatrix<U>
where
    T: Element,
    U: Element,
    B: ?Sized + MatrixBuilder<U>,
    F: FnMut(T) -> U,
{
    let (rows, columns) = matrix.dims();
    builder.set_shape(rows, columns);
    for (r, c) in iproduct!(0..rows, 0..columns) {
        builder.set(r, c, f(matrix.get(r, c)));
    }
    builder.build()
}

/// `f` applied to every element, into the default builder of `U`.
pub fn map<T, U, F>(matrix: &dyn Matrix<T>, f: F) -> SharedMatrix<U>
where T: Element, U: Element, F: FnMut(T) -> U,
{
    map_into(matrix, &mut *U::default_builder(), f)
}

/// `f` applied to corresponding elements of two matrices, into `builder`.
///
/// # Panics
///
/// Panics unless both matrices have the same shape.
pub fn zip_with_into<T, B, F>(a: &dyn Matrix<T>, b: &dyn Matrix<T>, builder: &mut B, mut f: F) -> SharedMatrix<T>
where
    T: Element,
    B: ?Sized + MatrixBuilder<T>,
    F: FnMut(T, T) -> T,
{
    utils::assert_same_shape("combine", a, b);
    let (rows, columns) = a.dims();
    builder.set_shape(rows, columns);
    for (r, c) in iproduct!(0..rows, 0..columns) {
        builder.set(r, c, f(a.get(r, c), b.get(r, c)));
    }
    builder.build()
}

/// Like [`zip_with_into`], using the result builder of `a`.
pub fn zip_with<T, F>(a: &dyn Matrix<T>, b: &dyn Matrix<T>, f: F) -> SharedMatrix<T>
where T: Element, F: FnMut(T, T) -> T,
{
    zip_with_into(a, b, &mut *a.result_builder(), f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxed::BoxedMatrix;
    use crate::dense::{DenseBuilder, DenseMatrix};

    #[test]
    fn unary() {
        let m = DenseMatrix::from(vec![[1.0, -2.0], [3.0, -4.0]]);
        let abs = map(&m, f64::abs);
        assert_eq!(utils::to_row_major_vec(&*abs), vec![1.0, 2.0, 3.0, 4.0]);

        let signs = map(&m, |x: f64| x > 0.0);
        assert_eq!(utils::to_nested_vec(&*signs), vec![vec![true, false], vec![true, false]]);

        let lengths = BoxedMatrix::new(vec![vec!["ab".to_string(), "c".to_string()]]);
        let lengths = map_into(&lengths, &mut DenseBuilder::new(), |s: String| s.len() as f64);
        assert_eq!(utils::to_row_major_vec(&*lengths), vec![2.0, 1.0]);
    }

    #[test]
    fn binary() {
        let a = DenseMatrix::from(vec![[1.0, 2.0]]);
        let b = DenseMatrix::from(vec![[3.0, 5.0]]);
        assert_eq!(utils::to_row_major_vec(&*zip_with(&a, &b, f64::max)), vec![3.0, 5.0]);
    }

    #[test]
    #[should_panic(expected = "cannot combine a 1x2 matrix and a 2x1 matrix")]
    fn binary_shape_mismatch() {
        let a = DenseMatrix::row_vector(&[1.0, 2.0]);
        let b = DenseMatrix::column_vector(&[1.0, 2.0]);
        zip_with(&a, &b, |x: f64, y: f64| x + y);
    }
}

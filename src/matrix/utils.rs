/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Shape predicates and small whole-matrix helpers.

use itertools::iproduct;

use blockmat_assert_close::machine_epsilon;

use crate::builder::MatrixBuilder;
use crate::element::Element;
use crate::matrix::{Matrix, SharedMatrix};
use crate::rectangle::Rectangle;

pub fn is_scalar<T: Element>(m: &dyn Matrix<T>) -> bool { m.dims() == (1, 1) }

pub fn is_row_vector<T: Element>(m: &dyn Matrix<T>) -> bool { m.row_count() == 1 }

pub fn is_column_vector<T: Element>(m: &dyn Matrix<T>) -> bool { m.column_count() == 1 }

pub fn is_square<T: Element>(m: &dyn Matrix<T>) -> bool { m.row_count() == m.column_count() }

pub fn are_same_shape<A: Element, B: Element>(a: &dyn Matrix<A>, b: &dyn Matrix<B>) -> bool {
    a.dims() == b.dims()
}

/// Whether `a * b` is defined.
pub fn are_compatible<A: Element, B: Element>(a: &dyn Matrix<A>, b: &dyn Matrix<B>) -> bool {
    a.column_count() == b.row_count()
}

pub fn is_valid_index<T: Element>(m: &dyn Matrix<T>, row: usize, column: usize) -> bool {
    row < m.row_count() && column < m.column_count()
}

pub fn is_valid_rectangle<T: Element>(m: &dyn Matrix<T>, rect: &Rectangle) -> bool {
    rect.bottom_row() <= m.row_count() && rect.right_column() <= m.column_count()
}

/// Symmetry up to machine epsilon.
///
/// True without looking at any element for storage that is symmetric by
/// construction, and false for non-square matrices.
pub fn is_symmetric(m: &dyn Matrix<f64>) -> bool {
    if m.is_symmetric_by_construction() {
        return true;
    }
    is_symmetric_within(m, machine_epsilon())
}

/// Symmetry up to `tolerance`, relative to the largest absolute element.
pub fn is_symmetric_within(m: &dyn Matrix<f64>, tolerance: f64) -> bool {
    if !is_square(m) {
        return false;
    }
    let max = match max_abs(m) {
        x if x == 0.0 => 1.0,
        x => x,
    };

    let n = m.row_count();
    iproduct!(0..n, 0..n)
        .filter(|&(i, j)| i < j)
        .all(|(i, j)| {
            let diff = (m.get(i, j) / max - m.get(j, i) / max).abs();
            diff <= tolerance // NaN fails
        })
}

pub fn replace_nans(m: &dyn Matrix<f64>, value: f64) -> SharedMatrix<f64> {
    let mut builder = m.result_builder();
    builder.set_shape_of(m);
    for (r, c) in iproduct!(0..m.row_count(), 0..m.column_count()) {
        let x = m.get(r, c);
        builder.set(r, c, if x.is_nan() { value } else { x });
    }
    builder.build()
}

/// Largest absolute element, or zero for an empty matrix.
pub fn max_abs(m: &dyn Matrix<f64>) -> f64 {
    abs_elements(m).fold(0.0, f64::max)
}

/// Smallest absolute element, or `f64::MAX` for an empty matrix.
pub fn min_abs(m: &dyn Matrix<f64>) -> f64 {
    abs_elements(m).fold(f64::MAX, f64::min)
}

fn abs_elements<'a>(m: &'a dyn Matrix<f64>) -> impl Iterator<Item = f64> + 'a {
    iproduct!(0..m.row_count(), 0..m.column_count()).map(move |(r, c)| m.get(r, c).abs())
}

/// The main diagonal as a column vector.
pub fn diagonal<T: Element>(m: &dyn Matrix<T>) -> SharedMatrix<T> {
    diagonal_into(m, &mut *m.result_builder())
}

pub fn diagonal_into<T, B>(m: &dyn Matrix<T>, builder: &mut B) -> SharedMatrix<T>
where T: Element, B: ?Sized + MatrixBuilder<T>,
{
    let d = usize::min(m.row_count(), m.column_count());
    builder.set_shape(d, 1);
    for i in 0..d {
        builder.set(i, 0, m.get(i, i));
    }
    builder.build()
}

/// A copy of `m` whose leading diagonal elements come from the column vector `diag`.
///
/// Diagonal elements past the end of `diag` are kept.
pub fn replace_diagonal<T: Element>(m: &dyn Matrix<T>, diag: &dyn Matrix<T>) -> SharedMatrix<T> {
    replace_diagonal_into(m, diag, &mut *m.result_builder())
}

pub fn replace_diagonal_into<T, B>(m: &dyn Matrix<T>, diag: &dyn Matrix<T>, builder: &mut B) -> SharedMatrix<T>
where T: Element, B: ?Sized + MatrixBuilder<T>,
{
    let (rows, columns) = m.dims();
    let d = usize::min(diag.row_count(), usize::min(rows, columns));
    builder.set_shape(rows, columns);
    for (r, c) in iproduct!(0..rows, 0..columns) {
        match r == c && r < d {
            true => builder.set(r, c, diag.get(r, 0)),
            false => builder.set(r, c, m.get(r, c)),
        }
    }
    builder.build()
}

/// All elements, row after row.
pub fn to_row_major_vec<T: Element>(m: &dyn Matrix<T>) -> Vec<T> {
    match m.as_array() {
        Some(arr) => arr.iter().cloned().collect(),
        None => iproduct!(0..m.row_count(), 0..m.column_count()).map(|(r, c)| m.get(r, c)).collect(),
    }
}

pub fn to_nested_vec<T: Element>(m: &dyn Matrix<T>) -> Vec<Vec<T>> {
    (0..m.row_count())
        .map(|r| (0..m.column_count()).map(|c| m.get(r, c)).collect())
        .collect()
}

pub(crate) fn assert_same_shape<T: Element>(operation: &str, a: &dyn Matrix<T>, b: &dyn Matrix<T>) {
    assert!(
        are_same_shape(a, b),
        "cannot {} a {}x{} matrix and a {}x{} matrix",
        operation, a.row_count(), a.column_count(), b.row_count(), b.column_count(),
    );
}

pub(crate) fn assert_same_row_count<T: Element>(operation: &str, a: &dyn Matrix<T>, b: &dyn Matrix<T>) {
    assert!(
        a.row_count() == b.row_count(),
        "cannot {} with a {}x{} matrix and a {}x{} right-hand side",
        operation, a.row_count(), a.column_count(), b.row_count(), b.column_count(),
    );
}

pub(crate) fn assert_multipliable<T: Element>(a: &dyn Matrix<T>, b: &dyn Matrix<T>) {
    assert!(
        are_compatible(a, b),
        "Incompatible matrix dimensions for multiplication (lhs: {} x {}, rhs: {} x {})",
        a.row_count(), a.column_count(), b.row_count(), b.column_count(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxed::BoxedMatrix;
    use crate::dense::DenseMatrix;
    use crate::symmetric::SymmetricMatrix;

    #[test]
    fn shape_predicates() {
        let row = DenseMatrix::row_vector(&[1.0, 2.0]);
        let column = DenseMatrix::column_vector(&[1.0, 2.0]);
        assert!(is_row_vector(&row) && !is_column_vector(&row));
        assert!(is_column_vector(&column) && !is_square(&column));
        assert!(is_scalar(&DenseMatrix::scalar(3.0)));
        assert!(are_compatible(&row, &column) && are_compatible(&column, &row));
        assert!(!are_same_shape(&row, &column));
        assert!(are_same_shape(&row, &BoxedMatrix::new(vec![vec![true, false]])));
        assert!(is_valid_index(&row, 0, 1) && !is_valid_index(&row, 1, 0));
        assert!(is_valid_rectangle(&column, &Rectangle::new(1, 0, 1, 1)));
        assert!(!is_valid_rectangle(&column, &Rectangle::new(1, 0, 2, 1)));
    }

    #[test]
    fn symmetry() {
        assert!(is_symmetric(&DenseMatrix::from(vec![[1.0, 2.0], [2.0, 1.0]])));
        assert!(!is_symmetric(&DenseMatrix::from(vec![[1.0, 2.0], [2.5, 1.0]])));
        assert!(!is_symmetric(&DenseMatrix::zeros(2, 3)));
        assert!(is_symmetric(&DenseMatrix::zeros(3, 3)));
        assert!(is_symmetric(&SymmetricMatrix::nan(2)));
        assert!(!is_symmetric(&DenseMatrix::nan(2, 2)));

        // relative to the largest element
        let big = DenseMatrix::from(vec![[1e6, 1.0], [1.0 + 1e-4, 1e6]]);
        assert!(!is_symmetric_within(&big, 1e-12));
        assert!(is_symmetric_within(&big, 1e-9));
    }

    #[test]
    fn abs_extremes() {
        let m = DenseMatrix::from(vec![[-3.0, 0.5], [2.0, -1.0]]);
        assert_eq!(max_abs(&m), 3.0);
        assert_eq!(min_abs(&m), 0.5);
        assert_eq!(max_abs(&DenseMatrix::zeros(0, 0)), 0.0);
    }

    #[test]
    fn nans_replaced() {
        let m = DenseMatrix::from(vec![[f64::NAN, 1.0]]);
        assert_eq!(to_row_major_vec(&*replace_nans(&m, -1.0)), vec![-1.0, 1.0]);
    }

    #[test]
    fn diagonals() {
        let m = DenseMatrix::from(vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(to_row_major_vec(&*diagonal(&m)), vec![1.0, 5.0]);

        let replaced = replace_diagonal(&m, &DenseMatrix::column_vector(&[-1.0]));
        assert_eq!(to_nested_vec(&*replaced), vec![vec![-1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);

        let letters = BoxedMatrix::new(vec![vec!['a', 'b'], vec!['c', 'd']]);
        assert_eq!(to_row_major_vec(&*diagonal(&letters)), vec!['a', 'd']);
    }
}

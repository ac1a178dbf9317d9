/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt;
use std::sync::Arc;

use ndarray::ArrayView2;

use crate::element::Element;
use crate::matrix::{check_index, BuilderFactory, Matrix, Memo, SharedMatrix};
use crate::rectangle::Rectangle;
use crate::utils;

/// Another matrix, read with rows and columns swapped.
pub struct TransposeView<T: Element> {
    matrix: SharedMatrix<T>,
    factory: BuilderFactory<T>,
    memo: Memo<T>,
}

impl<T: Element> TransposeView<T> {
    pub fn new(matrix: SharedMatrix<T>) -> Self {
        let factory = matrix.builder_factory();
        Self::with_builder(matrix, factory)
    }

    pub fn with_builder(matrix: SharedMatrix<T>, factory: BuilderFactory<T>) -> Self {
        TransposeView { matrix, factory, memo: Memo::new() }
    }

    pub fn source(&self) -> &SharedMatrix<T> { &self.matrix }
}

impl<T: Element> fmt::Debug for TransposeView<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TransposeView").field("matrix", &self.matrix).finish()
    }
}

impl<T: Element> Matrix<T> for TransposeView<T> {
    fn get(&self, row: usize, column: usize) -> T {
        check_index(self.dims(), row, column);
        self.matrix.get(column, row)
    }

    fn row_count(&self) -> usize { self.matrix.column_count() }

    fn column_count(&self) -> usize { self.matrix.row_count() }

    fn builder_factory(&self) -> BuilderFactory<T> { self.factory }

    fn memo(&self) -> Option<&Memo<T>> { Some(&self.memo) }

    fn is_symmetric_by_construction(&self) -> bool { self.matrix.is_symmetric_by_construction() }

    fn as_array(&self) -> Option<ArrayView2<'_, T>> {
        self.matrix.as_array().map(|arr| arr.reversed_axes())
    }

    /// The original matrix.
    fn transpose(self: Arc<Self>) -> SharedMatrix<T> { self.matrix.clone() }

    fn sub_matrix(self: Arc<Self>, rect: Rectangle) -> SharedMatrix<T> {
        assert!(
            utils::is_valid_rectangle(&*self, &rect),
            "rectangle {} does not fit in a {}x{} matrix", rect, self.row_count(), self.column_count(),
        );
        let inner = self.matrix.clone().sub_matrix(rect.transposed());
        Arc::new(TransposeView::with_builder(inner, self.factory))
    }

    fn determinant(&self) -> T { self.matrix.determinant() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::DenseMatrix;
    use pretty_assertions::assert_eq;
    use ::blockmat_assert_close::assert_close;

    fn wide() -> SharedMatrix<f64> {
        Arc::new(DenseMatrix::from(vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]))
    }

    #[test]
    fn swaps_indices() {
        let t = wide().transpose();
        assert_eq!(t.dims(), (3, 2));
        assert_eq!(utils::to_row_major_vec(&*t), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(t.as_array().map(|arr| arr[[2, 0]]), Some(3.0));
    }

    #[test]
    fn involution() {
        let m = wide();
        assert!(Arc::ptr_eq(&m.clone().transpose().transpose(), &m));
    }

    #[test]
    fn sub_view_of_transpose() {
        let t = wide().transpose();
        let corner = t.sub_matrix(Rectangle::new(1, 0, 2, 2));
        assert_eq!(utils::to_row_major_vec(&*corner), vec![2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn determinant_of_the_source() {
        let m: SharedMatrix<f64> = Arc::new(DenseMatrix::from(vec![[3.0, 1.0], [2.0, 2.0]]));
        assert_eq!(m.transpose().determinant(), 4.0);
    }

    #[test]
    fn inverse_is_memoized() {
        let t = Arc::new(DenseMatrix::from(vec![[2.0, 1.0], [0.0, 4.0]])).transpose();
        let inverse = t.invert();
        assert!(Arc::ptr_eq(&inverse, &t.invert()));
        assert_close!(abs=1e-12, utils::to_row_major_vec(&*inverse), vec![0.5, 0.0, -0.125, 0.25]);
    }

    #[test]
    fn view_is_reused_while_alive() {
        let m = wide();
        let t = m.clone().transpose();
        assert!(Arc::ptr_eq(&t, &m.clone().transpose()));

        drop(t);
        let again = m.clone().transpose();
        assert_eq!(again.dims(), (3, 2));
        drop(again);
        assert_eq!(Arc::strong_count(&m), 1);
    }
}

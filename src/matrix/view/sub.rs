/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt;
use std::sync::Arc;

use ndarray::{s, ArrayView2};

use crate::element::Element;
use crate::matrix::{check_index, BuilderFactory, Matrix, Memo, SharedMatrix};
use crate::rectangle::Rectangle;
use crate::utils;

/// A rectangular region of another matrix.
///
/// Taking a sub-matrix of one of these (through [`Matrix::sub_matrix`])
/// produces a view directly over the original matrix.
pub struct SubMatrixView<T: Element> {
    matrix: SharedMatrix<T>,
    rect: Rectangle,
    factory: BuilderFactory<T>,
    memo: Memo<T>,
}

impl<T: Element> SubMatrixView<T> {
    /// # Panics
    ///
    /// Panics if `rect` does not fit in `matrix`.
    pub fn new(matrix: SharedMatrix<T>, rect: Rectangle) -> Self {
        let factory = matrix.builder_factory();
        Self::with_builder(matrix, rect, factory)
    }

    /// Like `new`, with results of operations materialized through `factory`.
    pub fn with_builder(matrix: SharedMatrix<T>, rect: Rectangle, factory: BuilderFactory<T>) -> Self {
        assert!(
            utils::is_valid_rectangle(&*matrix, &rect),
            "rectangle {} does not fit in a {}x{} matrix", rect, matrix.row_count(), matrix.column_count(),
        );
        SubMatrixView { matrix, rect, factory, memo: Memo::new() }
    }

    pub fn rectangle(&self) -> Rectangle { self.rect }

    pub fn source(&self) -> &SharedMatrix<T> { &self.matrix }
}

impl<T: Element> fmt::Debug for SubMatrixView<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SubMatrixView")
            .field("rect", &self.rect)
            .field("matrix", &self.matrix)
            .finish()
    }
}

impl<T: Element> Matrix<T> for SubMatrixView<T> {
    fn get(&self, row: usize, column: usize) -> T {
        check_index(self.dims(), row, column);
        self.matrix.get(self.rect.top_row() + row, self.rect.left_column() + column)
    }

    fn row_count(&self) -> usize { self.rect.row_count() }

    fn column_count(&self) -> usize { self.rect.column_count() }

    fn builder_factory(&self) -> BuilderFactory<T> { self.factory }

    fn memo(&self) -> Option<&Memo<T>> { Some(&self.memo) }

    fn is_symmetric_by_construction(&self) -> bool {
        self.rect.top_row() == self.rect.left_column()
            && self.rect.row_count() == self.rect.column_count()
            && self.matrix.is_symmetric_by_construction()
    }

    fn as_array(&self) -> Option<ArrayView2<'_, T>> {
        let rect = self.rect;
        self.matrix.as_array().map(|arr| arr.slice_move(s![rect.row_range(), rect.column_range()]))
    }

    fn sub_matrix(self: Arc<Self>, rect: Rectangle) -> SharedMatrix<T> {
        assert!(
            utils::is_valid_rectangle(&*self, &rect),
            "rectangle {} does not fit in a {}x{} matrix", rect, self.row_count(), self.column_count(),
        );
        let outer = rect.translated(self.rect.top_row(), self.rect.left_column());
        Arc::new(SubMatrixView::with_builder(self.matrix.clone(), outer, self.factory))
    }

    fn determinant(&self) -> T {
        self.memo.determinant_with(|| self.materialize().determinant())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::DenseMatrix;
    use pretty_assertions::assert_eq;
    use ::blockmat_assert_close::assert_close;

    fn grid() -> SharedMatrix<f64> {
        Arc::new(DenseMatrix::from(vec![
            [0.0, 1.0, 2.0, 3.0],
            [10.0, 11.0, 12.0, 13.0],
            [20.0, 21.0, 22.0, 23.0],
        ]))
    }

    #[test]
    fn reads_through() {
        let view = grid().sub_matrix(Rectangle::new(1, 1, 2, 3));
        assert_eq!(view.dims(), (2, 3));
        assert_eq!(view.get(0, 0), 11.0);
        assert_eq!(view.get(1, 2), 23.0);
        assert_eq!(utils::to_row_major_vec(&*view), vec![11.0, 12.0, 13.0, 21.0, 22.0, 23.0]);
        assert_eq!(view.as_array().map(|arr| arr[[1, 0]]), Some(21.0));
    }

    #[test]
    fn nested_views_collapse() {
        let source = grid();
        let outer = Arc::new(SubMatrixView::new(source.clone(), Rectangle::new(1, 1, 2, 3)));
        let inner = outer.sub_matrix(Rectangle::new(1, 1, 1, 2));
        assert_eq!(utils::to_row_major_vec(&*inner), vec![22.0, 23.0]);

        // same values as a single view over the source
        let direct = SubMatrixView::new(source, Rectangle::new(2, 2, 1, 2));
        assert_eq!(utils::to_row_major_vec(&*inner), utils::to_row_major_vec(&direct));
    }

    #[test]
    #[should_panic(expected = "does not fit in a 3x4 matrix")]
    fn oversized() {
        grid().sub_matrix(Rectangle::new(2, 0, 2, 1));
    }

    #[test]
    #[should_panic(expected = "index (2, 0) out of bounds for 2x3 matrix")]
    fn view_bounds_are_its_own() {
        grid().sub_matrix(Rectangle::new(0, 0, 2, 3)).get(2, 0);
    }

    #[test]
    fn arithmetic_materializes() {
        let view = grid().sub_matrix(Rectangle::new(0, 0, 2, 2));
        let doubled = view.scale(2.0);
        assert_eq!(utils::to_row_major_vec(&*doubled), vec![0.0, 2.0, 20.0, 22.0]);
        assert_eq!(view.determinant(), -10.0);
    }

    #[test]
    fn inverse_is_memoized() {
        let view = grid().sub_matrix(Rectangle::new(0, 1, 2, 2));
        let inverse = view.invert();
        assert!(Arc::ptr_eq(&inverse, &view.invert()));
        assert_close!(abs=1e-12, utils::to_row_major_vec(&*view.mult(&*inverse)), vec![1.0, 0.0, 0.0, 1.0]);
    }
}

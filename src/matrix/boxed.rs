/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::sync::Arc;

use crate::builder::{self, MatrixBuilder};
use crate::element::Element;
use crate::errors::RaggedRowsError;
use crate::matrix::{check_index, BuilderFactory, Matrix, Memo, SharedMatrix};
use crate::rectangle::Rectangle;

/// Row storage of arbitrary elements.
///
/// Only the shape-and-assignment half of the builder protocol is available
/// for these, so arithmetic on e.g. a `BoxedMatrix<String>` does not compile.
#[derive(Debug, Clone)]
pub struct BoxedMatrix<T: Element> {
    rows: Vec<Vec<T>>,
    column_count: usize,
    memo: Memo<T>,
}

impl<T: Element + PartialEq> PartialEq for BoxedMatrix<T> {
    fn eq(&self, other: &Self) -> bool { self.rows == other.rows && self.column_count == other.column_count }
}

impl<T: Element> BoxedMatrix<T> {
    /// # Panics
    ///
    /// Panics if the rows have different lengths.
    pub fn new(rows: Vec<Vec<T>>) -> Self {
        match Self::try_new(rows) {
            Ok(matrix) => matrix,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_new(rows: Vec<Vec<T>>) -> Result<Self, RaggedRowsError> {
        let expected = rows.first().map_or(0, |row| row.len());
        let ragged = rows.iter().map(|row| row.len()).enumerate().find(|&(_, len)| len != expected);
        if let Some((row, actual)) = ragged {
            return Err(RaggedRowsError { row, expected, actual });
        }
        Ok(BoxedMatrix { rows, column_count: expected, memo: Memo::new() })
    }

    /// Skips validation. The caller promises that every row has the same length.
    pub fn new_unvalidated(rows: Vec<Vec<T>>) -> Self {
        let column_count = rows.first().map_or(0, |row| row.len());
        debug_assert!(rows.iter().all(|row| row.len() == column_count));
        BoxedMatrix { rows, column_count, memo: Memo::new() }
    }

    pub fn rows(&self) -> &[Vec<T>] { &self.rows }

    pub fn into_rows(self) -> Vec<Vec<T>> { self.rows }
}

impl<T: Element> Matrix<T> for BoxedMatrix<T> {
    fn get(&self, row: usize, column: usize) -> T {
        check_index(self.dims(), row, column);
        self.rows[row][column].clone()
    }

    fn row_count(&self) -> usize { self.rows.len() }

    fn column_count(&self) -> usize { self.column_count }

    fn builder_factory(&self) -> BuilderFactory<T> { T::default_builder }

    fn memo(&self) -> Option<&Memo<T>> { Some(&self.memo) }
}

/// Builder for [`BoxedMatrix`].
///
/// Cells start out unassigned; reading one, or building while one remains,
/// panics.
#[derive(Debug, Clone)]
pub struct BoxedBuilder<T: Element> {
    cells: Vec<Vec<Option<T>>>,
    column_count: usize,
    changed: bool,
    cached: Option<Arc<BoxedMatrix<T>>>,
}

impl<T: Element> Default for BoxedBuilder<T> {
    fn default() -> Self { BoxedBuilder::new() }
}

impl<T: Element> BoxedBuilder<T> {
    pub fn new() -> Self {
        BoxedBuilder { cells: vec![], column_count: 0, changed: true, cached: None }
    }

    pub fn with_shape(rows: usize, columns: usize) -> Self {
        let mut builder = Self::new();
        builder.set_shape(rows, columns);
        builder
    }

    pub fn build_boxed(&mut self) -> Arc<BoxedMatrix<T>> {
        if let (false, Some(cached)) = (self.changed, &self.cached) {
            return cached.clone();
        }

        trace!("snapshot of {}x{} boxed builder", self.cells.len(), self.column_count);
        let rows = self.cells.iter().enumerate()
            .map(|(r, row)| {
                row.iter().enumerate()
                    .map(|(c, cell)| assigned(cell, r, c).clone())
                    .collect()
            })
            .collect();
        let built = Arc::new(BoxedMatrix { rows, column_count: self.column_count, memo: Memo::new() });
        self.cached = Some(built.clone());
        self.changed = false;
        built
    }
}

fn assigned<T>(cell: &Option<T>, row: usize, column: usize) -> &T {
    match cell {
        Some(value) => value,
        None => panic!("element ({}, {}) was never assigned", row, column),
    }
}

impl<T: Element> MatrixBuilder<T> for BoxedBuilder<T> {
    fn dims(&self) -> (usize, usize) { (self.cells.len(), self.column_count) }

    fn get(&self, row: usize, column: usize) -> T {
        check_index(self.dims(), row, column);
        assigned(&self.cells[row][column], row, column).clone()
    }

    fn set_shape(&mut self, row_count: usize, column_count: usize) {
        if self.dims() != (row_count, column_count) {
            self.cells = vec![vec![None; column_count]; row_count];
            self.column_count = column_count;
            self.changed = true;
        }
    }

    fn set(&mut self, row: usize, column: usize, value: T) {
        check_index(self.dims(), row, column);
        self.cells[row][column] = Some(value);
        self.changed = true;
    }

    fn set_all_in(&mut self, rect: Rectangle, value: T) {
        builder::assert_rect_fits(self.dims(), &rect);
        for row in &mut self.cells[rect.row_range()] {
            for cell in &mut row[rect.column_range()] {
                *cell = Some(value.clone());
            }
        }
        self.changed = true;
    }

    fn build(&mut self) -> SharedMatrix<T> { self.build_boxed() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{BlockMatrix, SubMatrixView};

    fn words() -> BoxedMatrix<String> {
        BoxedMatrix::new(vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["d".to_string(), "e".to_string(), "f".to_string()],
        ])
    }

    #[test]
    fn ragged() {
        let err = BoxedMatrix::try_new(vec![vec![1, 2], vec![3, 4], vec![5]]).unwrap_err();
        assert_eq!(err, RaggedRowsError { row: 2, expected: 2, actual: 1 });
    }

    #[test]
    fn assignment() {
        let mut builder = BoxedBuilder::with_shape(2, 2);
        builder.set_all('.');
        builder.set_all_in(Rectangle::new(1, 0, 1, 2), '#');
        builder.set(0, 1, '@');
        let built = builder.build();
        assert_eq!(built.get(0, 0), '.');
        assert_eq!(built.get(0, 1), '@');
        assert_eq!(built.get(1, 1), '#');
    }

    #[test]
    #[should_panic(expected = "element (1, 0) was never assigned")]
    fn unassigned_cell() {
        let mut builder = BoxedBuilder::<bool>::with_shape(2, 1);
        builder.set(0, 0, true);
        builder.build();
    }

    #[test]
    fn views_of_boxed() {
        let m = Arc::new(words());
        let row = SubMatrixView::new(m.clone(), Rectangle::new(1, 0, 1, 3));
        assert_eq!(row.get(0, 2), "f");

        let stacked = BlockMatrix::column(vec![
            m.clone().sub_matrix(Rectangle::new(0, 1, 2, 1)),
            m.clone().sub_matrix(Rectangle::new(0, 0, 1, 3)).transpose(),
        ]);
        assert_eq!(stacked.dims(), (5, 1));
        assert_eq!(stacked.get(1, 0), "e");
        assert_eq!(stacked.materialize().get(4, 0), "c");
    }

    #[test]
    fn snapshots_are_frozen() {
        let mut builder = BoxedBuilder::with_shape(1, 2);
        builder.set_all('o');
        let first = builder.build_boxed();
        assert!(Arc::ptr_eq(&first, &builder.build_boxed()));

        builder.set(0, 1, 'n');
        let second = builder.build_boxed();
        assert_eq!(first.rows(), &[vec!['o', 'o']][..]);
        assert_eq!(second.rows(), &[vec!['o', 'n']][..]);
        assert!(Arc::ptr_eq(&second, &builder.build_boxed()));
    }

    #[test]
    fn inverse_is_memoized() {
        let m = BoxedMatrix::new(vec![vec![2.0, 0.0], vec![0.0, 4.0]]);
        let inverse = m.invert();
        assert!(Arc::ptr_eq(&inverse, &m.invert()));
        assert_eq!(inverse.get(1, 1), 0.25);
    }
}

/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! The builder protocol.
//!
//! A builder is a mutable accumulator with its own shape. Every operation
//! that produces a new matrix loads a builder, mutates it, and calls
//! [`build`](MatrixBuilder::build).
//!
//! # Snapshot contract
//!
//! `build()` returns a frozen snapshot of the builder's state at the time of
//! the call; nothing done to the builder afterwards is visible through a
//! previously built matrix. Implementations keep a dirty flag alongside the
//! last snapshot, so that calling `build()` again without any intervening
//! mutation is cheap and returns the very same `Arc`.
//!
//! # Shape contract
//!
//! `set_shape` only reallocates (and resets contents) when the requested
//! shape differs from the current one.

use itertools::iproduct;

use crate::element::Element;
use crate::errors::SingularMatrixError;
use crate::matrix::{Matrix, SharedMatrix};
use crate::rectangle::Rectangle;

pub trait MatrixBuilder<T: Element> {
    fn dims(&self) -> (usize, usize);

    fn row_count(&self) -> usize { self.dims().0 }

    fn column_count(&self) -> usize { self.dims().1 }

    /// # Panics
    ///
    /// Panics on an out-of-bounds index.
    fn get(&self, row: usize, column: usize) -> T;

    fn set_shape(&mut self, row_count: usize, column_count: usize);

    fn set_shape_of(&mut self, matrix: &dyn Matrix<T>) {
        self.set_shape(matrix.row_count(), matrix.column_count());
    }

    /// # Panics
    ///
    /// Panics on an out-of-bounds index.
    fn set(&mut self, row: usize, column: usize, value: T);

    /// Copy `matrix` into the region whose top left corner is at
    /// `(top_row, left_column)`.
    fn set_block(&mut self, top_row: usize, left_column: usize, matrix: &dyn Matrix<T>) {
        assert_block_fits(self.dims(), top_row, left_column, matrix);
        for (r, c) in iproduct!(0..matrix.row_count(), 0..matrix.column_count()) {
            self.set(top_row + r, left_column + c, matrix.get(r, c));
        }
    }

    /// Take the shape and contents of `matrix`.
    fn set_from(&mut self, matrix: &dyn Matrix<T>) {
        self.set_shape_of(matrix);
        self.set_block(0, 0, matrix);
    }

    fn set_all(&mut self, value: T) {
        let (rows, columns) = self.dims();
        for (r, c) in iproduct!(0..rows, 0..columns) {
            self.set(r, c, value.clone());
        }
    }

    fn set_all_in(&mut self, rect: Rectangle, value: T) {
        assert_rect_fits(self.dims(), &rect);
        for (r, c) in iproduct!(rect.row_range(), rect.column_range()) {
            self.set(r, c, value.clone());
        }
    }

    fn build(&mut self) -> SharedMatrix<T>;
}

/// The arithmetic half of the builder protocol.
///
/// Operands are never modified. Unless stated otherwise, operands must have
/// the builder's shape.
pub trait NumericBuilder<T: Element>: MatrixBuilder<T> {
    /// Ones on the main diagonal, zeros elsewhere. Keeps the current shape.
    fn set_to_identity(&mut self);

    fn scale_at(&mut self, row: usize, column: usize, scalar: T);

    fn scale(&mut self, scalar: T);

    fn add_at(&mut self, row: usize, column: usize, value: T);

    fn add(&mut self, matrix: &dyn Matrix<T>);

    /// Add the elements of a column vector to the main diagonal.
    ///
    /// Only the leading `min(vector rows, rows, columns)` diagonal
    /// elements are touched.
    fn add_to_diagonal(&mut self, vector: &dyn Matrix<T>);

    fn subtract(&mut self, matrix: &dyn Matrix<T>);

    /// Replace the contents with `left * right`, reshaping as needed.
    ///
    /// # Panics
    ///
    /// Panics if the operands cannot be multiplied.
    fn mult(&mut self, left: &dyn Matrix<T>, right: &dyn Matrix<T>);

    /// Scale column `j` by `diag[j]`, where `diag` is a column vector.
    fn mult_by_diag(&mut self, diag: &dyn Matrix<T>);

    fn mult_elementwise(&mut self, matrix: &dyn Matrix<T>);

    fn try_invert(&mut self) -> Result<(), SingularMatrixError>;

    /// # Panics
    ///
    /// Panics if the contents are singular.
    fn invert(&mut self) {
        let (rows, columns) = self.dims();
        if let Err(e) = self.try_invert() {
            panic!("cannot invert {}x{} matrix: {}", rows, columns, e);
        }
    }
}

pub(crate) fn assert_block_fits<T: Element>(
    (rows, columns): (usize, usize),
    top_row: usize,
    left_column: usize,
    matrix: &dyn Matrix<T>,
) {
    assert!(
        top_row + matrix.row_count() <= rows && left_column + matrix.column_count() <= columns,
        "a {}x{} block at ({}, {}) does not fit in a {}x{} builder",
        matrix.row_count(), matrix.column_count(), top_row, left_column, rows, columns,
    );
}

pub(crate) fn assert_rect_fits((rows, columns): (usize, usize), rect: &Rectangle) {
    assert!(
        rect.bottom_row() <= rows && rect.right_column() <= columns,
        "rectangle {} does not fit in a {}x{} builder", rect, rows, columns,
    );
}

pub(crate) fn assert_operand_shape<T: Element>(
    operation: &str,
    (rows, columns): (usize, usize),
    matrix: &dyn Matrix<T>,
) {
    assert!(
        matrix.row_count() == rows && matrix.column_count() == columns,
        "{} operand is {}x{}, but the builder is {}x{}",
        operation, matrix.row_count(), matrix.column_count(), rows, columns,
    );
}

pub(crate) fn assert_diagonal_fits<T: Element>((_, columns): (usize, usize), diag: &dyn Matrix<T>) {
    assert!(
        diag.column_count() == 1 && diag.row_count() == columns,
        "expected a diagonal column vector of length {} (got {}x{})",
        columns, diag.row_count(), diag.column_count(),
    );
}

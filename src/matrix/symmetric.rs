/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Packed storage of symmetric matrices.
//!
//! Only the lower triangle is stored, row after row, so that `(r, c)` with
//! `c <= r` lives at offset `r (r + 1) / 2 + c`.  Reads and writes of `(r, c)`
//! and `(c, r)` resolve to the same slot, which makes symmetry a property of
//! the storage rather than something that needs checking.

use std::sync::Arc;

use crate::builder::{self, MatrixBuilder, NumericBuilder};
use crate::dense::DenseBuilder;
use crate::element::Element;
use crate::errors::SingularMatrixError;
use crate::matrix::{check_index, BuilderFactory, Matrix, Memo, SharedMatrix};
use crate::rectangle::Rectangle;
use crate::utils;

/// Number of stored elements for an `n x n` matrix.
#[inline]
pub fn packed_len(n: usize) -> usize { n * (n + 1) / 2 }

/// Offset of `(row, column)` in the packed buffer.
#[inline]
pub fn packed_index(row: usize, column: usize) -> usize {
    let (m, k) = match row >= column {
        true => (row, column),
        false => (column, row),
    };
    (m * m + m) / 2 + k
}

/// A symmetric matrix of `f64` in packed storage, with a lazy scale factor.
#[derive(Debug, Clone)]
pub struct SymmetricMatrix {
    dim: usize,
    data: Arc<[f64]>,
    scale: f64,
    memo: Memo<f64>,
}

impl PartialEq for SymmetricMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.dim == other.dim && utils::to_row_major_vec(self) == utils::to_row_major_vec(other)
    }
}

impl SymmetricMatrix {
    /// # Panics
    ///
    /// Panics unless `data.len() == dim * (dim + 1) / 2`.
    pub fn from_packed(dim: usize, data: Vec<f64>) -> Self {
        assert_eq!(
            data.len(), packed_len(dim),
            "packed data of length {} cannot form a {}x{} symmetric matrix", data.len(), dim, dim,
        );
        SymmetricMatrix { dim, data: data.into(), scale: 1.0, memo: Memo::new() }
    }

    /// Symmetric matrix whose lower triangle (diagonal included) is that of `matrix`.
    ///
    /// # Panics
    ///
    /// Panics if `matrix` is not square.
    pub fn from_lower(matrix: &dyn Matrix<f64>) -> Self {
        let dim = square_dim(matrix);
        let data = (0..dim).flat_map(|r| (0..=r).map(move |c| (r, c)))
            .map(|(r, c)| matrix.get(r, c))
            .collect();
        Self::from_packed(dim, data)
    }

    /// Symmetric matrix whose upper triangle (diagonal included) is that of `matrix`.
    ///
    /// # Panics
    ///
    /// Panics if `matrix` is not square.
    pub fn from_upper(matrix: &dyn Matrix<f64>) -> Self {
        let dim = square_dim(matrix);
        let data = (0..dim).flat_map(|r| (0..=r).map(move |c| (r, c)))
            .map(|(r, c)| matrix.get(c, r))
            .collect();
        Self::from_packed(dim, data)
    }

    pub fn filled(dim: usize, value: f64) -> Self {
        Self::from_packed(dim, vec![value; packed_len(dim)])
    }

    pub fn identity(dim: usize) -> Self {
        let mut builder = SymmetricBuilder::new(dim);
        builder.set_to_identity();
        builder.build_symmetric().as_ref().clone()
    }

    pub fn zero(dim: usize) -> Self { Self::filled(dim, 0.0) }

    pub fn nan(dim: usize) -> Self { Self::filled(dim, f64::NAN) }

    pub fn builder(dim: usize) -> SymmetricBuilder { SymmetricBuilder::new(dim) }

    pub fn dim(&self) -> usize { self.dim }

    /// The factor applied on every read.
    pub fn scale_factor(&self) -> f64 { self.scale }

    /// `(1 / scale_factor)` times the value of every element, in packed order.
    pub fn packed_data(&self) -> &[f64] { &self.data }

    fn symmetric_operation(&self, other: &dyn Matrix<f64>, subtract: bool) -> SharedMatrix<f64> {
        let operation = if subtract { "subtract" } else { "add" };
        utils::assert_same_shape(operation, self, other);
        match utils::is_symmetric(other) {
            true => {
                let mut builder = SymmetricBuilder::from_copy(self);
                match subtract {
                    true => builder.subtract(other),
                    false => builder.add(other),
                }
                builder.build()
            },
            false => {
                debug!("{} of a non-symmetric {}x{} matrix; falling back to dense", operation, other.row_count(), other.column_count());
                let mut builder = DenseBuilder::from_copy(self);
                match subtract {
                    true => builder.subtract(other),
                    false => builder.add(other),
                }
                builder.build()
            },
        }
    }
}

fn square_dim(matrix: &dyn Matrix<f64>) -> usize {
    assert!(
        utils::is_square(matrix),
        "symmetric storage requires a square shape (got {}x{})", matrix.row_count(), matrix.column_count(),
    );
    matrix.row_count()
}

impl Matrix<f64> for SymmetricMatrix {
    fn get(&self, row: usize, column: usize) -> f64 {
        check_index((self.dim, self.dim), row, column);
        self.scale * self.data[packed_index(row, column)]
    }

    fn row_count(&self) -> usize { self.dim }

    fn column_count(&self) -> usize { self.dim }

    fn builder_factory(&self) -> BuilderFactory<f64> { <f64 as Element>::default_builder }

    fn is_symmetric_by_construction(&self) -> bool { true }

    fn memo(&self) -> Option<&Memo<f64>> { Some(&self.memo) }

    fn transpose(self: Arc<Self>) -> SharedMatrix<f64> { self }

    fn scale(&self, scalar: f64) -> SharedMatrix<f64> {
        Arc::new(SymmetricMatrix {
            dim: self.dim,
            data: self.data.clone(),
            scale: self.scale * scalar,
            memo: Memo::new(),
        })
    }

    fn add(&self, other: &dyn Matrix<f64>) -> SharedMatrix<f64> {
        self.symmetric_operation(other, false)
    }

    fn subtract(&self, other: &dyn Matrix<f64>) -> SharedMatrix<f64> {
        self.symmetric_operation(other, true)
    }

    fn try_invert(&self) -> Result<SharedMatrix<f64>, SingularMatrixError> {
        if let Some(inverse) = self.memo.inverse() {
            return Ok(inverse.clone());
        }

        let mut builder = SymmetricBuilder::from_copy(self);
        builder.try_invert()?;
        Ok(self.memo.inverse.get_or_init(|| builder.build()).clone())
    }

    fn determinant(&self) -> f64 {
        self.memo.determinant_with(|| self.materialize().determinant())
    }
}

//--------------------------------------------------------

/// Builder for [`SymmetricMatrix`].
///
/// Every write to `(r, c)` is also a write to `(c, r)`.
#[derive(Debug, Clone)]
pub struct SymmetricBuilder {
    dim: usize,
    data: Vec<f64>,
    changed: bool,
    cached: Option<Arc<SymmetricMatrix>>,
}

impl SymmetricBuilder {
    pub fn new(dim: usize) -> Self {
        SymmetricBuilder { dim, data: vec![0.0; packed_len(dim)], changed: true, cached: None }
    }

    pub fn from_copy(matrix: &dyn Matrix<f64>) -> Self {
        let mut builder = SymmetricBuilder::new(0);
        builder.set_from(matrix);
        builder
    }

    /// Load the upper triangle of `matrix` (which must fit the builder).
    pub fn set_from_upper(&mut self, matrix: &dyn Matrix<f64>) {
        builder::assert_operand_shape("load", self.dims(), matrix);
        for r in 0..self.dim {
            for c in 0..=r {
                self.data[packed_index(r, c)] = matrix.get(c, r);
            }
        }
        self.changed = true;
    }

    pub fn set_all_to_nan(&mut self) { self.set_all(f64::NAN) }

    pub fn build_symmetric(&mut self) -> Arc<SymmetricMatrix> {
        if let (false, Some(cached)) = (self.changed, &self.cached) {
            return cached.clone();
        }

        trace!("snapshot of {}x{} symmetric builder", self.dim, self.dim);
        let built = Arc::new(SymmetricMatrix::from_packed(self.dim, self.data.clone()));
        self.cached = Some(built.clone());
        self.changed = false;
        built
    }

    // Pairs (packed offset, row, column) over the lower triangle.
    fn lower_triangle(&self) -> impl Iterator<Item = (usize, usize, usize)> {
        let dim = self.dim;
        (0..dim)
            .flat_map(|r| (0..=r).map(move |c| (r, c)))
            .enumerate()
            .map(|(i, (r, c))| (i, r, c))
    }

    fn zip_lower<F>(&mut self, matrix: &dyn Matrix<f64>, f: F)
    where F: Fn(f64, f64) -> f64,
    {
        for (i, r, c) in self.lower_triangle() {
            self.data[i] = f(self.data[i], matrix.get(r, c));
        }
        self.changed = true;
    }
}

impl MatrixBuilder<f64> for SymmetricBuilder {
    fn dims(&self) -> (usize, usize) { (self.dim, self.dim) }

    fn get(&self, row: usize, column: usize) -> f64 {
        check_index(self.dims(), row, column);
        self.data[packed_index(row, column)]
    }

    /// # Panics
    ///
    /// Panics unless the shape is square.
    fn set_shape(&mut self, row_count: usize, column_count: usize) {
        assert_eq!(
            row_count, column_count,
            "symmetric storage requires a square shape (got {}x{})", row_count, column_count,
        );
        if row_count != self.dim {
            self.dim = row_count;
            self.data = vec![0.0; packed_len(row_count)];
            self.changed = true;
        }
    }

    fn set(&mut self, row: usize, column: usize, value: f64) {
        check_index(self.dims(), row, column);
        self.data[packed_index(row, column)] = value;
        self.changed = true;
    }

    /// Only target elements on or below the diagonal are read from `matrix`.
    fn set_block(&mut self, top_row: usize, left_column: usize, matrix: &dyn Matrix<f64>) {
        builder::assert_block_fits(self.dims(), top_row, left_column, matrix);
        for r in 0..matrix.row_count() {
            for c in 0..matrix.column_count() {
                let (row, column) = (top_row + r, left_column + c);
                if column <= row {
                    self.data[packed_index(row, column)] = matrix.get(r, c);
                }
            }
        }
        self.changed = true;
    }

    fn set_all(&mut self, value: f64) {
        self.data.iter_mut().for_each(|x| *x = value);
        self.changed = true;
    }

    fn set_all_in(&mut self, rect: Rectangle, value: f64) {
        builder::assert_rect_fits(self.dims(), &rect);
        for r in rect.row_range() {
            for c in rect.column_range() {
                self.data[packed_index(r, c)] = value;
            }
        }
        self.changed = true;
    }

    fn build(&mut self) -> SharedMatrix<f64> { self.build_symmetric() }
}

impl NumericBuilder<f64> for SymmetricBuilder {
    fn set_to_identity(&mut self) {
        for (i, r, c) in self.lower_triangle() {
            self.data[i] = if r == c { 1.0 } else { 0.0 };
        }
        self.changed = true;
    }

    fn scale_at(&mut self, row: usize, column: usize, scalar: f64) {
        check_index(self.dims(), row, column);
        self.data[packed_index(row, column)] *= scalar;
        self.changed = true;
    }

    fn scale(&mut self, scalar: f64) {
        self.data.iter_mut().for_each(|x| *x *= scalar);
        self.changed = true;
    }

    fn add_at(&mut self, row: usize, column: usize, value: f64) {
        check_index(self.dims(), row, column);
        self.data[packed_index(row, column)] += value;
        self.changed = true;
    }

    fn add(&mut self, matrix: &dyn Matrix<f64>) {
        builder::assert_operand_shape("add", self.dims(), matrix);
        self.zip_lower(matrix, |x, y| x + y);
    }

    fn add_to_diagonal(&mut self, vector: &dyn Matrix<f64>) {
        assert_eq!(vector.column_count(), 1, "expected a column vector (got {}x{})", vector.row_count(), vector.column_count());
        for i in 0..usize::min(vector.row_count(), self.dim) {
            self.data[packed_index(i, i)] += vector.get(i, 0);
        }
        self.changed = true;
    }

    fn subtract(&mut self, matrix: &dyn Matrix<f64>) {
        builder::assert_operand_shape("subtract", self.dims(), matrix);
        self.zip_lower(matrix, |x, y| x - y);
    }

    /// # Panics
    ///
    /// Always; the product of two symmetric matrices is not symmetric in general.
    fn mult(&mut self, _: &dyn Matrix<f64>, _: &dyn Matrix<f64>) {
        panic!("the symmetric matrix builder does not support matrix multiplication");
    }

    /// Scales by `diag` from the right, in the lower triangle only.
    fn mult_by_diag(&mut self, diag: &dyn Matrix<f64>) {
        builder::assert_diagonal_fits(self.dims(), diag);
        for (i, _, c) in self.lower_triangle() {
            self.data[i] *= diag.get(c, 0);
        }
        self.changed = true;
    }

    /// # Panics
    ///
    /// Panics unless `matrix` is symmetric.
    fn mult_elementwise(&mut self, matrix: &dyn Matrix<f64>) {
        builder::assert_operand_shape("multiply", self.dims(), matrix);
        assert!(
            utils::is_symmetric(matrix),
            "the symmetric matrix builder does not support elementwise multiplication by a non-symmetric matrix",
        );
        self.zip_lower(matrix, |x, y| x * y);
    }

    fn try_invert(&mut self) -> Result<(), SingularMatrixError> {
        trace!("inverting {}x{} symmetric matrix through dense storage", self.dim, self.dim);
        let mut dense = DenseBuilder::new();
        dense.set_from(&*self.build());
        dense.try_invert()?;
        self.set_from(&*dense.build());
        Ok(())
    }
}

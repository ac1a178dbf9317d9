/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::sync::Arc;

use ndarray::{s, Array2, ArrayView2};
use slice_of_array::IsSliceomorphic;

use blockmat_linalg::{self as linalg, CMatrix};

use crate::builder::{self, MatrixBuilder, NumericBuilder};
use crate::element::Element;
use crate::errors::{RaggedRowsError, SingularMatrixError};
use crate::matrix::{check_index, BuilderFactory, Matrix, Memo, SharedMatrix};
use crate::rectangle::Rectangle;
use crate::utils;

/// Row-major dense storage of `f64`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DenseMatrix {
    data: Array2<f64>,
    #[cfg_attr(feature = "serde", serde(skip))]
    memo: Memo<f64>,
}

impl PartialEq for DenseMatrix {
    fn eq(&self, other: &Self) -> bool { self.data == other.data }
}

impl DenseMatrix {
    pub fn from_array(data: Array2<f64>) -> Self {
        DenseMatrix { data, memo: Memo::new() }
    }

    /// # Panics
    ///
    /// Panics if `data.len() != rows * columns`.
    pub fn from_row_major_data((rows, columns): (usize, usize), data: Vec<f64>) -> Self {
        CMatrix::from_row_major(rows, columns, data).into_inner().into()
    }

    /// Nested rows. No rows at all produces a 0x0 matrix.
    pub fn try_from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, RaggedRowsError> {
        let expected = rows.first().map_or(0, |row| row.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * expected);
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != expected {
                return Err(RaggedRowsError { row: index, expected, actual: row.len() });
            }
            data.extend_from_slice(row);
        }
        Ok(DenseMatrix::from_row_major_data((rows.len(), expected), data))
    }

    /// # Panics
    ///
    /// Panics if the rows have different lengths.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Self {
        match Self::try_from_rows(rows) {
            Ok(matrix) => matrix,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn scalar(value: f64) -> Self { Self::from_elem((1, 1), value) }

    pub fn row_vector(values: &[f64]) -> Self {
        Self::from_row_major_data((1, values.len()), values.to_vec())
    }

    pub fn column_vector(values: &[f64]) -> Self {
        Self::from_row_major_data((values.len(), 1), values.to_vec())
    }

    pub fn identity(n: usize) -> Self { Array2::<f64>::eye(n).into() }

    pub fn zeros(rows: usize, columns: usize) -> Self { Self::from_elem((rows, columns), 0.0) }

    pub fn nan(rows: usize, columns: usize) -> Self { Self::from_elem((rows, columns), f64::NAN) }

    /// Row vector of length `n` with a one at `index`.
    pub fn standard_basis_row_vector(n: usize, index: usize) -> Self {
        assert!(index < n, "basis index {} out of range for length {}", index, n);
        let mut data = Array2::<f64>::zeros((1, n));
        data[[0, index]] = 1.0;
        data.into()
    }

    /// Column vector of length `n` with a one at `index`.
    pub fn standard_basis_column_vector(n: usize, index: usize) -> Self {
        assert!(index < n, "basis index {} out of range for length {}", index, n);
        let mut data = Array2::<f64>::zeros((n, 1));
        data[[index, 0]] = 1.0;
        data.into()
    }

    pub fn copy_of(matrix: &dyn Matrix<f64>) -> Self {
        match matrix.as_array() {
            Some(arr) => arr.to_owned().into(),
            None => Array2::from_shape_fn(matrix.dims(), |(r, c)| matrix.get(r, c)).into(),
        }
    }

    pub fn builder() -> DenseBuilder { DenseBuilder::new() }

    pub fn array(&self) -> &Array2<f64> { &self.data }

    pub fn into_array(self) -> Array2<f64> { self.data }

    fn from_elem(dim: (usize, usize), value: f64) -> Self {
        Array2::from_elem(dim, value).into()
    }
}

impl From<Array2<f64>> for DenseMatrix {
    fn from(data: Array2<f64>) -> Self { DenseMatrix::from_array(data) }
}

impl<'a, V> From<&'a [V]> for DenseMatrix
where V: IsSliceomorphic<Element = f64>,
{
    fn from(rows: &'a [V]) -> Self { CMatrix::<f64>::from(rows).into_inner().into() }
}

impl<V> From<Vec<V>> for DenseMatrix
where V: IsSliceomorphic<Element = f64>,
{
    fn from(rows: Vec<V>) -> Self { (&rows[..]).into() }
}

impl Matrix<f64> for DenseMatrix {
    fn get(&self, row: usize, column: usize) -> f64 {
        check_index(self.data.dim(), row, column);
        self.data[[row, column]]
    }

    fn row_count(&self) -> usize { self.data.nrows() }

    fn column_count(&self) -> usize { self.data.ncols() }

    fn builder_factory(&self) -> BuilderFactory<f64> { <f64 as Element>::default_builder }

    fn memo(&self) -> Option<&Memo<f64>> { Some(&self.memo) }

    fn as_array(&self) -> Option<ArrayView2<'_, f64>> { Some(self.data.view()) }

    fn determinant(&self) -> f64 {
        self.memo.determinant_with(|| linalg::determinant(&CMatrix::from(&self.data)))
    }
}

//--------------------------------------------------------

/// Builder for [`DenseMatrix`]; the default target of numeric operations.
#[derive(Debug, Clone)]
pub struct DenseBuilder {
    data: Array2<f64>,
    changed: bool,
    cached: Option<Arc<DenseMatrix>>,
}

impl Default for DenseBuilder {
    fn default() -> Self { DenseBuilder::new() }
}

impl DenseBuilder {
    pub fn new() -> Self { Self::with_shape(0, 0) }

    pub fn with_shape(rows: usize, columns: usize) -> Self {
        DenseBuilder { data: Array2::zeros((rows, columns)), changed: true, cached: None }
    }

    pub fn from_copy(matrix: &dyn Matrix<f64>) -> Self {
        let mut builder = DenseBuilder::new();
        builder.set_from(matrix);
        builder
    }

    pub fn set_all_to_nan(&mut self) { self.set_all(f64::NAN) }

    /// Like `build`, without erasing the type.
    pub fn build_dense(&mut self) -> Arc<DenseMatrix> {
        if let (false, Some(cached)) = (self.changed, &self.cached) {
            return cached.clone();
        }

        trace!("snapshot of {}x{} dense builder", self.data.nrows(), self.data.ncols());
        let built = Arc::new(DenseMatrix::from_array(self.data.clone()));
        self.cached = Some(built.clone());
        self.changed = false;
        built
    }

    fn touch(&mut self) -> &mut Array2<f64> {
        self.changed = true;
        &mut self.data
    }
}

impl MatrixBuilder<f64> for DenseBuilder {
    fn dims(&self) -> (usize, usize) { self.data.dim() }

    fn get(&self, row: usize, column: usize) -> f64 {
        check_index(self.data.dim(), row, column);
        self.data[[row, column]]
    }

    fn set_shape(&mut self, row_count: usize, column_count: usize) {
        if self.data.dim() != (row_count, column_count) {
            *self.touch() = Array2::zeros((row_count, column_count));
        }
    }

    fn set(&mut self, row: usize, column: usize, value: f64) {
        check_index(self.data.dim(), row, column);
        self.touch()[[row, column]] = value;
    }

    fn set_block(&mut self, top_row: usize, left_column: usize, matrix: &dyn Matrix<f64>) {
        builder::assert_block_fits(self.dims(), top_row, left_column, matrix);
        let (rows, columns) = matrix.dims();
        let region = s![top_row..top_row + rows, left_column..left_column + columns];
        match matrix.as_array() {
            Some(arr) => self.touch().slice_mut(region).assign(&arr),
            None => {
                let data = self.touch();
                for ((r, c), x) in data.slice_mut(region).indexed_iter_mut() {
                    *x = matrix.get(r, c);
                }
            },
        }
    }

    fn set_all(&mut self, value: f64) { self.touch().fill(value) }

    fn set_all_in(&mut self, rect: Rectangle, value: f64) {
        builder::assert_rect_fits(self.dims(), &rect);
        self.touch().slice_mut(s![rect.row_range(), rect.column_range()]).fill(value);
    }

    fn build(&mut self) -> SharedMatrix<f64> { self.build_dense() }
}

impl NumericBuilder<f64> for DenseBuilder {
    fn set_to_identity(&mut self) {
        let data = self.touch();
        data.fill(0.0);
        data.diag_mut().fill(1.0);
    }

    fn scale_at(&mut self, row: usize, column: usize, scalar: f64) {
        check_index(self.data.dim(), row, column);
        self.touch()[[row, column]] *= scalar;
    }

    fn scale(&mut self, scalar: f64) { self.touch().mapv_inplace(|x| x * scalar) }

    fn add_at(&mut self, row: usize, column: usize, value: f64) {
        check_index(self.data.dim(), row, column);
        self.touch()[[row, column]] += value;
    }

    fn add(&mut self, matrix: &dyn Matrix<f64>) {
        builder::assert_operand_shape("add", self.dims(), matrix);
        match matrix.as_array() {
            Some(arr) => *self.touch() += &arr,
            None => self.zip_in_place(matrix, |x, y| x + y),
        }
    }

    fn add_to_diagonal(&mut self, vector: &dyn Matrix<f64>) {
        assert_eq!(vector.column_count(), 1, "expected a column vector (got {}x{})", vector.row_count(), vector.column_count());
        let data = self.touch();
        for (i, x) in data.diag_mut().iter_mut().take(vector.row_count()).enumerate() {
            *x += vector.get(i, 0);
        }
    }

    fn subtract(&mut self, matrix: &dyn Matrix<f64>) {
        builder::assert_operand_shape("subtract", self.dims(), matrix);
        match matrix.as_array() {
            Some(arr) => *self.touch() -= &arr,
            None => self.zip_in_place(matrix, |x, y| x - y),
        }
    }

    fn mult(&mut self, left: &dyn Matrix<f64>, right: &dyn Matrix<f64>) {
        utils::assert_multipliable(left, right);
        let product = match (left.as_array(), right.as_array()) {
            (Some(a), Some(b)) => linalg::dot(&a, &b),
            _ => {
                let inner = left.column_count();
                Array2::from_shape_fn((left.row_count(), right.column_count()), |(r, c)| {
                    (0..inner).map(|k| left.get(r, k) * right.get(k, c)).sum::<f64>()
                })
            },
        };
        *self.touch() = product;
    }

    fn mult_by_diag(&mut self, diag: &dyn Matrix<f64>) {
        builder::assert_diagonal_fits(self.dims(), diag);
        let data = self.touch();
        for (j, mut column) in data.columns_mut().into_iter().enumerate() {
            let d = diag.get(j, 0);
            column.mapv_inplace(|x| x * d);
        }
    }

    fn mult_elementwise(&mut self, matrix: &dyn Matrix<f64>) {
        builder::assert_operand_shape("multiply", self.dims(), matrix);
        match matrix.as_array() {
            Some(arr) => *self.touch() *= &arr,
            None => self.zip_in_place(matrix, |x, y| x * y),
        }
    }

    fn try_invert(&mut self) -> Result<(), SingularMatrixError> {
        let inverse = linalg::invert(CMatrix::from(&self.data))?;
        *self.touch() = inverse.into_inner();
        Ok(())
    }
}

impl DenseBuilder {
    fn zip_in_place<F>(&mut self, matrix: &dyn Matrix<f64>, f: F)
    where F: Fn(f64, f64) -> f64,
    {
        for ((r, c), x) in self.touch().indexed_iter_mut() {
            *x = f(*x, matrix.get(r, c));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::blockmat_assert_close::assert_close;

    fn two_by_two() -> DenseMatrix { DenseMatrix::from(vec![[1.0, 2.0], [3.0, 4.0]]) }

    #[test]
    fn constructors() {
        let m = two_by_two();
        assert_eq!(m.dims(), (2, 2));
        assert_eq!(m.get(1, 0), 3.0);
        assert_eq!(m, DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]));
        assert_eq!(m, DenseMatrix::from_row_major_data((2, 2), vec![1.0, 2.0, 3.0, 4.0]));

        assert_eq!(DenseMatrix::scalar(7.0).dims(), (1, 1));
        assert_eq!(DenseMatrix::row_vector(&[1.0, 2.0, 3.0]).dims(), (1, 3));
        assert_eq!(DenseMatrix::column_vector(&[1.0, 2.0, 3.0]).dims(), (3, 1));
        assert_eq!(DenseMatrix::identity(2), DenseMatrix::from(vec![[1.0, 0.0], [0.0, 1.0]]));
        assert_eq!(DenseMatrix::standard_basis_column_vector(3, 1), DenseMatrix::column_vector(&[0.0, 1.0, 0.0]));
        assert_eq!(DenseMatrix::standard_basis_row_vector(2, 0), DenseMatrix::row_vector(&[1.0, 0.0]));
        assert!(DenseMatrix::nan(2, 3).get(1, 2).is_nan());
        assert_eq!(DenseMatrix::try_from_rows::<Vec<f64>>(&[]).map(|m| m.dims()), Ok((0, 0)));
    }

    #[test]
    fn ragged_rows() {
        let err = DenseMatrix::try_from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(err, RaggedRowsError { row: 1, expected: 2, actual: 1 });
        assert_eq!(
            err.to_string(),
            "unexpected number of values in row at index 1: expected 2, got 1",
        );
    }

    #[test]
    #[should_panic(expected = "index (2, 0) out of bounds for 2x2 matrix")]
    fn out_of_bounds() {
        two_by_two().get(2, 0);
    }

    #[test]
    fn snapshots_are_frozen() {
        let mut builder = DenseBuilder::with_shape(2, 2);
        builder.set(0, 0, 1.0);
        let first = builder.build();
        assert!(Arc::ptr_eq(&first, &builder.build()));

        builder.set(0, 0, 5.0);
        let second = builder.build();
        assert_eq!(first.get(0, 0), 1.0);
        assert_eq!(second.get(0, 0), 5.0);
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn set_shape_keeps_contents_when_unchanged() {
        let mut builder = DenseBuilder::from_copy(&two_by_two());
        builder.set_shape(2, 2);
        assert_eq!(builder.get(1, 1), 4.0);
        builder.set_shape(3, 1);
        assert_eq!(builder.get(2, 0), 0.0);
    }

    #[test]
    fn block_assignment() {
        let mut builder = DenseBuilder::with_shape(3, 3);
        builder.set_block(1, 1, &two_by_two());
        builder.set_all_in(Rectangle::new(0, 0, 1, 3), 9.0);
        let built = builder.build();
        assert_eq!(utils::to_row_major_vec(&*built), vec![
            9.0, 9.0, 9.0,
            0.0, 1.0, 2.0,
            0.0, 3.0, 4.0,
        ]);
    }

    #[test]
    fn arithmetic() {
        let m = two_by_two();
        assert_eq!(utils::to_row_major_vec(&*m.scale(2.0)), vec![2.0, 4.0, 6.0, 8.0]);
        assert_eq!(utils::to_row_major_vec(&*m.add(&m)), vec![2.0, 4.0, 6.0, 8.0]);
        assert_eq!(utils::to_row_major_vec(&*m.subtract(&m)), vec![0.0; 4]);
        assert_eq!(utils::to_row_major_vec(&*m.mult(&m)), vec![7.0, 10.0, 15.0, 22.0]);

        let diag = DenseMatrix::column_vector(&[10.0, 100.0]);
        assert_eq!(utils::to_row_major_vec(&*m.mult_by_diag(&diag)), vec![10.0, 200.0, 30.0, 400.0]);

        let mut builder = DenseBuilder::from_copy(&m);
        builder.add_to_diagonal(&DenseMatrix::column_vector(&[1.0]));
        builder.mult_elementwise(&m);
        assert_eq!(utils::to_row_major_vec(&*builder.build()), vec![2.0, 4.0, 9.0, 16.0]);
    }

    #[test]
    #[should_panic(expected = "Incompatible matrix dimensions for multiplication (lhs: 2 x 2, rhs: 3 x 1)")]
    fn mult_mismatch() {
        two_by_two().mult(&DenseMatrix::column_vector(&[1.0, 2.0, 3.0]));
    }

    #[test]
    #[should_panic(expected = "cannot add a 2x2 matrix and a 1x1 matrix")]
    fn add_mismatch() {
        two_by_two().add(&DenseMatrix::scalar(1.0));
    }

    #[test]
    fn inverse_is_memoized() {
        let m = two_by_two();
        let inverse = m.invert();
        assert!(Arc::ptr_eq(&inverse, &m.invert()));
        assert_close!(abs=1e-12, utils::to_row_major_vec(&*inverse), vec![-2.0, 1.0, 1.5, -0.5]);
        assert_close!(abs=1e-12, m.determinant(), -2.0);
    }

    #[test]
    fn singular_inverse() {
        let m = DenseMatrix::from(vec![[1.0, 2.0], [2.0, 4.0]]);
        assert_eq!(m.try_invert().err(), Some(SingularMatrixError));
    }

    #[test]
    #[should_panic(expected = "cannot invert 2x2 matrix: singular matrix")]
    fn singular_invert_panics() {
        DenseMatrix::zeros(2, 2).invert();
    }

    #[test]
    fn copies_start_without_memo() {
        let m = two_by_two();
        let _ = m.invert();
        assert!(m.memo.inverse().is_some());
        assert!(m.clone().memo.inverse().is_none());
    }
}

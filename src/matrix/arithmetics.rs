/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Sums and means along rows and columns.
//!
//! Means are accumulated incrementally (`mean += (x - mean) / (k + 1)`), so
//! a mean of identical values is exact.

use crate::builder::{MatrixBuilder, NumericBuilder};
use crate::dense::DenseBuilder;
use crate::matrix::{Matrix, SharedMatrix};

/// Row vector holding the sum of each column.
pub fn sum_of_rows(m: &dyn Matrix<f64>) -> SharedMatrix<f64> {
    let (rows, columns) = m.dims();
    let mut result = DenseBuilder::with_shape(1, columns);
    for r in 0..rows {
        for c in 0..columns {
            result.add_at(0, c, m.get(r, c));
        }
    }
    result.build()
}

/// Column vector holding the sum of each row.
pub fn sum_of_columns(m: &dyn Matrix<f64>) -> SharedMatrix<f64> {
    let (rows, columns) = m.dims();
    let mut result = DenseBuilder::with_shape(rows, 1);
    for r in 0..rows {
        for c in 0..columns {
            result.add_at(r, 0, m.get(r, c));
        }
    }
    result.build()
}

/// Row vector holding the mean of each column.
pub fn mean_row(m: &dyn Matrix<f64>) -> SharedMatrix<f64> {
    let (rows, columns) = m.dims();
    let mut result = DenseBuilder::with_shape(1, columns);
    for r in 0..rows {
        for c in 0..columns {
            let mean = result.get(0, c);
            result.add_at(0, c, (m.get(r, c) - mean) / (r + 1) as f64);
        }
    }
    result.build()
}

/// Column vector holding the mean of each row.
pub fn mean_column(m: &dyn Matrix<f64>) -> SharedMatrix<f64> {
    let (rows, columns) = m.dims();
    let mut result = DenseBuilder::with_shape(rows, 1);
    for r in 0..rows {
        for c in 0..columns {
            let mean = result.get(r, 0);
            result.add_at(r, 0, (m.get(r, c) - mean) / (c + 1) as f64);
        }
    }
    result.build()
}

/// Mean of all elements, in row-major order; zero for an empty matrix.
pub fn mean_element(m: &dyn Matrix<f64>) -> f64 {
    let (rows, columns) = m.dims();
    let mut mean = 0.0;
    for (index, (r, c)) in itertools::iproduct!(0..rows, 0..columns).enumerate() {
        mean += (m.get(r, c) - mean) / (index + 1) as f64;
    }
    mean
}

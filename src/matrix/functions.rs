/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Matrix-to-matrix functions as closures, for use with iterator adapters.

use blockmat_linalg::DecompositionError;

use crate::decomposition;
use crate::matrix::{Matrix, SharedMatrix};

/// The Cholesky factor of each input.
pub fn cholesky_function() -> impl Fn(&dyn Matrix<f64>) -> Result<SharedMatrix<f64>, DecompositionError> {
    |m| decomposition::cholesky(m).map(|chol| chol.l)
}

/// `multiplier * m` for each input `m`.
pub fn multiply_on_left(multiplier: SharedMatrix<f64>) -> impl Fn(&dyn Matrix<f64>) -> SharedMatrix<f64> {
    move |m| multiplier.mult(m)
}

/// `m * multiplier` for each input `m`.
pub fn multiply_on_right(multiplier: SharedMatrix<f64>) -> impl Fn(&dyn Matrix<f64>) -> SharedMatrix<f64> {
    move |m| m.mult(&*multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::DenseMatrix;
    use crate::utils::to_row_major_vec;

    #[test]
    fn multipliers() {
        let swap = DenseMatrix::from(vec![[0.0, 1.0], [1.0, 0.0]]).shared();
        let m = DenseMatrix::from(vec![[1.0, 2.0], [3.0, 4.0]]);

        let left = multiply_on_left(swap.clone());
        let right = multiply_on_right(swap);
        assert_eq!(to_row_major_vec(&*left(&m)), vec![3.0, 4.0, 1.0, 2.0]);
        assert_eq!(to_row_major_vec(&*right(&m)), vec![2.0, 1.0, 4.0, 3.0]);
    }

    #[test]
    fn cholesky_over_many() {
        let inputs = vec![DenseMatrix::scalar(4.0), DenseMatrix::scalar(9.0)];
        let factors: Result<Vec<_>, _> = inputs.iter().map(|m| cholesky_function()(m)).collect();
        let factors: Vec<f64> = factors.unwrap().iter().map(|l| l.get(0, 0)).collect();
        assert_eq!(factors, vec![2.0, 3.0]);
    }
}

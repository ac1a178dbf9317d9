/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Factorizations of `f64` matrices.
//!
//! Every function here copies its input into a row-major buffer, hands it to
//! `blockmat_linalg`, and wraps the resulting factors as dense matrices.

use blockmat_linalg::{self as linalg, CMatrix, DecompositionError};

use crate::dense::DenseMatrix;
use crate::matrix::{Matrix, SharedMatrix};
use crate::utils;

pub(crate) fn to_c_matrix(m: &dyn Matrix<f64>) -> CMatrix {
    match m.as_array() {
        Some(arr) => CMatrix::from(arr),
        None => CMatrix::from_row_major(m.row_count(), m.column_count(), utils::to_row_major_vec(m)),
    }
}

pub(crate) fn from_c_matrix(m: CMatrix) -> SharedMatrix<f64> {
    DenseMatrix::from_array(m.into_inner()).shared()
}

/// `a = l * l^T`.
#[derive(Debug, Clone)]
pub struct Cholesky {
    pub l: SharedMatrix<f64>,
}

/// `a = q * r`.
#[derive(Debug, Clone)]
pub struct Qr {
    pub q: SharedMatrix<f64>,
    pub r: SharedMatrix<f64>,
}

/// `a = u * d * v^T`.
#[derive(Debug, Clone)]
pub struct Svd {
    pub u: SharedMatrix<f64>,
    pub d: SharedMatrix<f64>,
    pub v: SharedMatrix<f64>,
}

/// `a = q * lambda * q^T`.
#[derive(Debug, Clone)]
pub struct Eigen {
    pub q: SharedMatrix<f64>,
    pub lambda: SharedMatrix<f64>,
}

/// Only the lower triangle of `a` is read.
pub fn cholesky(a: &dyn Matrix<f64>) -> Result<Cholesky, DecompositionError> {
    let l = linalg::cholesky(to_c_matrix(a))?;
    Ok(Cholesky { l: from_c_matrix(l) })
}

pub fn qr(a: &dyn Matrix<f64>) -> Result<Qr, DecompositionError> {
    let linalg::Qr { q, r } = linalg::qr(to_c_matrix(a));
    Ok(Qr { q: from_c_matrix(q), r: from_c_matrix(r) })
}

pub fn svd(a: &dyn Matrix<f64>) -> Result<Svd, DecompositionError> {
    let linalg::Svd { u, d, v } = linalg::svd(to_c_matrix(a))?;
    Ok(Svd { u: from_c_matrix(u), d: from_c_matrix(d), v: from_c_matrix(v) })
}

/// Eigendecomposition of a symmetric matrix; only its lower triangle is read.
pub fn eigen(a: &dyn Matrix<f64>) -> Result<Eigen, DecompositionError> {
    let linalg::SymmetricEigen { q, lambda } = linalg::symmetric_eigen(to_c_matrix(a))?;
    Ok(Eigen { q: from_c_matrix(q), lambda: from_c_matrix(lambda) })
}

/// `x` with `a * x = b`; in the least squares sense when `a` is not square.
pub fn solve(a: &dyn Matrix<f64>, b: &dyn Matrix<f64>) -> Result<SharedMatrix<f64>, DecompositionError> {
    utils::assert_same_row_count("solve", a, b);
    let x = linalg::solve(to_c_matrix(a), to_c_matrix(b))?;
    Ok(from_c_matrix(x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symmetric::SymmetricMatrix;
    use crate::view::TransposeView;
    use ::blockmat_assert_close::assert_close;

    fn spd() -> DenseMatrix {
        DenseMatrix::from(vec![[4.0, 2.0, 0.4], [2.0, 5.0, 1.0], [0.4, 1.0, 3.0]])
    }

    fn flat(m: &SharedMatrix<f64>) -> Vec<f64> { utils::to_row_major_vec(&**m) }

    #[test]
    fn cholesky_reconstructs() {
        let a = spd();
        let Cholesky { l } = cholesky(&a).unwrap();
        let lt = TransposeView::new(l.clone());
        assert_close!(abs=1e-12, flat(&l.mult(&lt)), utils::to_row_major_vec(&a));
        assert_eq!(l.get(0, 1), 0.0);

        let packed = SymmetricMatrix::from_lower(&a);
        assert_close!(abs=1e-12, flat(&cholesky(&packed).unwrap().l), flat(&l));
    }

    #[test]
    fn cholesky_rejects_indefinite() {
        let a = DenseMatrix::from(vec![[1.0, 2.0], [2.0, 1.0]]);
        assert_eq!(cholesky(&a).err(), Some(DecompositionError::NotPositiveDefinite));
    }

    #[test]
    fn factorizations_reconstruct() {
        let a = DenseMatrix::from(vec![[1.0, 2.0], [3.0, 4.0], [5.0, 7.0]]);
        let Qr { q, r } = qr(&a).unwrap();
        assert_close!(abs=1e-12, flat(&q.mult(&*r)), utils::to_row_major_vec(&a));

        let Svd { u, d, v } = svd(&a).unwrap();
        let vt = TransposeView::new(v);
        assert_close!(abs=1e-12, flat(&u.mult(&*d).mult(&vt)), utils::to_row_major_vec(&a));

        let Eigen { q, lambda } = eigen(&spd()).unwrap();
        let qt = TransposeView::new(q.clone());
        assert_close!(abs=1e-12, flat(&q.mult(&*lambda).mult(&qt)), utils::to_row_major_vec(&spd()));
    }

    #[test]
    fn solves() {
        let a = DenseMatrix::from(vec![[2.0, 1.0], [1.0, 3.0]]);
        let b = DenseMatrix::column_vector(&[3.0, 5.0]);
        assert_close!(abs=1e-12, flat(&solve(&a, &b).unwrap()), vec![0.8, 1.4]);

        // overdetermined, consistent
        let tall = DenseMatrix::from(vec![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);
        let rhs = DenseMatrix::column_vector(&[1.0, 2.0, 3.0]);
        assert_close!(abs=1e-12, flat(&solve(&tall, &rhs).unwrap()), vec![1.0, 2.0]);
    }
}

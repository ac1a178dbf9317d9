/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! The numeric backend.
//!
//! Everything here speaks [`CMatrix`] (owned row-major `f64` data) and
//! returns either new buffers or a failure. The factorizations themselves
//! are nalgebra's; this crate only fixes the contract around them.

#[macro_use]
extern crate log;

use ::nalgebra::DMatrix;
use ::thiserror::Error;

pub use self::c_matrix::CMatrix;
mod c_matrix;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("matrix was perfectly degenerate")]
pub struct DegenerateMatrixError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecompositionError {
    #[error("unable to calculate Cholesky decomposition: matrix is not positive definite")]
    NotPositiveDefinite,

    #[error("{operation} requires a square matrix (got {rows}x{cols})")]
    NonSquare { operation: &'static str, rows: usize, cols: usize },

    #[error("{operation} failed to converge")]
    NoConvergence { operation: &'static str },

    #[error(transparent)]
    Degenerate(#[from] DegenerateMatrixError),

    #[error("{operation} failed: {message}")]
    Failed { operation: &'static str, message: &'static str },
}

// number of sweeps before giving up on an iterative decomposition
const MAX_ITERATIONS: usize = 10_000;

pub fn dot<A, B>(a: &A, b: &B) -> <A as ::ndarray::linalg::Dot<B>>::Output
where A: ::ndarray::linalg::Dot<B>,
{ a.dot(b) }

fn require_square(operation: &'static str, mat: &CMatrix) -> Result<(), DecompositionError> {
    match mat.is_square() {
        true => Ok(()),
        false => Err(DecompositionError::NonSquare { operation, rows: mat.nrows(), cols: mat.ncols() }),
    }
}

// tolerance under which a singular value counts as zero
fn singular_value_cutoff(mat: &DMatrix<f64>, singular_values: &::nalgebra::DVector<f64>) -> f64 {
    let largest = singular_values.iter().cloned().fold(0.0, f64::max);
    f64::EPSILON * usize::max(mat.nrows(), mat.ncols()) as f64 * largest
}

/// Lower-triangular `L` with `mat = L L^T`.
///
/// Only the lower triangle of `mat` is read.
pub fn cholesky(mat: CMatrix) -> Result<CMatrix, DecompositionError> {
    require_square("cholesky", &mat)?;
    match mat.to_nalgebra().cholesky() {
        Some(chol) => Ok(CMatrix::from_nalgebra(&chol.l())),
        None => {
            debug!("cholesky failed on a {}x{} matrix", mat.nrows(), mat.ncols());
            Err(DecompositionError::NotPositiveDefinite)
        },
    }
}

/// `mat = Q R`, with `Q` orthonormal columns and `R` upper triangular.
#[derive(Debug, Clone)]
pub struct Qr {
    pub q: CMatrix,
    pub r: CMatrix,
}

/// Thin QR decomposition; for an `m x n` input, `Q` is `m x min(m, n)`.
pub fn qr(mat: CMatrix) -> Qr {
    let qr = mat.to_nalgebra().qr();
    Qr {
        q: CMatrix::from_nalgebra(&qr.q()),
        r: CMatrix::from_nalgebra(&qr.r()),
    }
}

/// `mat = U D V^T`, with `D` diagonal.
#[derive(Debug, Clone)]
pub struct Svd {
    pub u: CMatrix,
    pub d: CMatrix,
    pub v: CMatrix,
}

/// Thin singular value decomposition.
pub fn svd(mat: CMatrix) -> Result<Svd, DecompositionError> {
    const OPERATION: &str = "svd";
    let svd = mat.to_nalgebra()
        .try_svd(true, true, f64::EPSILON, MAX_ITERATIONS)
        .ok_or(DecompositionError::NoConvergence { operation: OPERATION })?;

    let d = DMatrix::from_diagonal(&svd.singular_values);
    match (&svd.u, &svd.v_t) {
        (Some(u), Some(v_t)) => Ok(Svd {
            u: CMatrix::from_nalgebra(u),
            d: CMatrix::from_nalgebra(&d),
            v: CMatrix::from_nalgebra(&v_t.transpose()),
        }),
        _ => Err(DecompositionError::Failed { operation: OPERATION, message: "singular vectors unavailable" }),
    }
}

/// `mat = Q Λ Q^T` for a symmetric `mat`, with `Λ` diagonal.
#[derive(Debug, Clone)]
pub struct SymmetricEigen {
    pub q: CMatrix,
    pub lambda: CMatrix,
}

/// Eigendecomposition of a symmetric matrix.
///
/// Only the lower triangle of `mat` is read.
pub fn symmetric_eigen(mat: CMatrix) -> Result<SymmetricEigen, DecompositionError> {
    const OPERATION: &str = "symmetric eigendecomposition";
    require_square(OPERATION, &mat)?;
    let eigen = mat.to_nalgebra()
        .try_symmetric_eigen(f64::EPSILON, MAX_ITERATIONS)
        .ok_or(DecompositionError::NoConvergence { operation: OPERATION })?;

    Ok(SymmetricEigen {
        q: CMatrix::from_nalgebra(&eigen.eigenvectors),
        lambda: CMatrix::from_nalgebra(&DMatrix::from_diagonal(&eigen.eigenvalues)),
    })
}

/// # Panics
///
/// Panics if `mat` is not square.
pub fn invert(mat: CMatrix) -> Result<CMatrix, DegenerateMatrixError> {
    assert!(mat.is_square(), "cannot invert a {}x{} matrix", mat.nrows(), mat.ncols());
    if mat.is_empty() {
        return Ok(mat); // trivial inverse
    }

    match mat.to_nalgebra().try_inverse() {
        Some(inv) if inv.iter().all(|x| x.is_finite()) => Ok(CMatrix::from_nalgebra(&inv)),
        _ => {
            debug!("inversion failed on a {}x{} matrix", mat.nrows(), mat.ncols());
            Err(DegenerateMatrixError)
        },
    }
}

/// # Panics
///
/// Panics if `mat` is not square.
pub fn determinant(mat: &CMatrix) -> f64 {
    assert!(mat.is_square(), "cannot calculate determinant of a {}x{} matrix", mat.nrows(), mat.ncols());
    match mat.is_empty() {
        true => 1.0,
        false => mat.to_nalgebra().determinant(),
    }
}

/// Solves `square * output = rhs` by LU decomposition.
pub fn linear_solve(square: CMatrix, rhs: CMatrix) -> Result<CMatrix, DegenerateMatrixError> {
    assert!(square.is_square());
    assert_eq!(square.ncols(), rhs.nrows());

    if square.is_empty() || rhs.is_empty() {
        return Ok(rhs); // trivial solution
    }

    match square.to_nalgebra().lu().solve(&rhs.to_nalgebra()) {
        Some(out) => Ok(CMatrix::from_nalgebra(&out)),
        None => Err(DegenerateMatrixError),
    }
}

/// Minimizes the 2-norm of `matrix * output - rhs` using an SVD.
pub fn least_squares_svd(matrix: CMatrix, rhs: CMatrix) -> Result<CMatrix, DecompositionError> {
    const OPERATION: &str = "least squares";
    assert_eq!(matrix.nrows(), rhs.nrows());

    let matrix = matrix.to_nalgebra();
    let svd = matrix.clone()
        .try_svd(true, true, f64::EPSILON, MAX_ITERATIONS)
        .ok_or(DecompositionError::NoConvergence { operation: OPERATION })?;
    let eps = singular_value_cutoff(&matrix, &svd.singular_values);
    svd.solve(&rhs.to_nalgebra(), eps)
        .map(|out| CMatrix::from_nalgebra(&out))
        .map_err(|message| DecompositionError::Failed { operation: OPERATION, message })
}

/// Solves `a * output = b`, exactly when `a` is square and in the least
/// squares sense otherwise.
pub fn solve(a: CMatrix, b: CMatrix) -> Result<CMatrix, DecompositionError> {
    match a.is_square() {
        true => Ok(linear_solve(a, b)?),
        false => least_squares_svd(a, b),
    }
}

/// `P` such that `P * mat` is the identity, for `mat` of full column rank.
pub fn left_pseudoinverse(mat: CMatrix) -> Result<CMatrix, DecompositionError> {
    const OPERATION: &str = "pseudoinverse";
    let mat = mat.to_nalgebra();
    let svd = mat.clone()
        .try_svd(true, true, f64::EPSILON, MAX_ITERATIONS)
        .ok_or(DecompositionError::NoConvergence { operation: OPERATION })?;
    let eps = singular_value_cutoff(&mat, &svd.singular_values);
    svd.pseudo_inverse(eps)
        .map(|inv| CMatrix::from_nalgebra(&inv))
        .map_err(|message| DecompositionError::Failed { operation: OPERATION, message })
}

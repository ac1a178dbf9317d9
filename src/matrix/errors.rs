/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use thiserror::Error;

pub use blockmat_linalg::{DecompositionError, DegenerateMatrixError};

/// The matrix has no (finite) inverse.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("singular matrix")]
pub struct SingularMatrixError;

impl From<DegenerateMatrixError> for SingularMatrixError {
    fn from(_: DegenerateMatrixError) -> Self { SingularMatrixError }
}

/// Nested rows that do not form a rectangle.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("unexpected number of values in row at index {row}: expected {expected}, got {actual}")]
pub struct RaggedRowsError {
    pub row: usize,
    pub expected: usize,
    pub actual: usize,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("rectangle must have a nonzero number of rows and columns (got {row_count}x{column_count})")]
pub struct InvalidRectangle {
    pub row_count: usize,
    pub column_count: usize,
}

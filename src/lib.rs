/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Facade over the blockmat crates.
//!
//! Most users want [`matrix`]; [`text`] reads and writes the bracketed text
//! forms, and [`linalg`] is the numeric backend the decompositions run on.

pub use blockmat_matrix as matrix;
pub use blockmat_linalg as linalg;
pub use blockmat_text as text;
pub use blockmat_assert_close as assert_close;

pub use blockmat_matrix::{
    Element, Scalar,
    Matrix, SharedMatrix, AsDynMatrix,
    MatrixBuilder, NumericBuilder,
    DenseMatrix, SymmetricMatrix, BoxedMatrix,
    SubMatrixView, TransposeView, BlockDiagonalView, BlockMatrix, BlockMatrixOfRectangles,
    Rectangle, MatrixClosenessCheck, Closeness,
};

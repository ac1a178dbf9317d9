/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Matrices that own no elements, only indexing metadata over other matrices.
//!
//! Anything a view computes that needs new storage goes through the builder
//! factory it was constructed with.

mod bands;
mod block;
mod block_diagonal;
mod sub;
mod transpose;

pub use self::block::{BlockMatrix, BlockMatrixOfRectangles};
pub use self::block_diagonal::BlockDiagonalView;
pub use self::sub::SubMatrixView;
pub use self::transpose::TransposeView;

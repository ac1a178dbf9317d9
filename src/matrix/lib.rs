/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Logical matrices.
//!
//! A [`Matrix`] is anything that can answer `get(row, column)` for a fixed
//! shape. Storage ([`DenseMatrix`], [`SymmetricMatrix`], [`BoxedMatrix`]) and
//! views ([`SubMatrixView`], [`TransposeView`], [`BlockDiagonalView`],
//! [`BlockMatrix`], [`BlockMatrixOfRectangles`]) share that one interface,
//! and every operation that produces a new matrix does so through a
//! [`MatrixBuilder`] chosen by the receiver.
//!
//! Matrices are immutable once built and are shared as [`SharedMatrix`].

#[macro_use] extern crate log;
#[cfg(feature = "serde")]
#[macro_use] extern crate serde;

mod element;
mod builder;
mod matrix;
mod rectangle;
mod errors;
mod dense;
mod symmetric;
mod boxed;
mod view;
mod display;

pub mod utils;
pub mod elementwise;
pub mod arithmetics;
pub mod closeness;
pub mod decomposition;
pub mod functions;

//---------------------------
// public reexports; API

pub use crate::element::{Element, Scalar};
pub use crate::builder::{MatrixBuilder, NumericBuilder};
pub use crate::matrix::{Matrix, SharedMatrix, BuilderFactory, AsDynMatrix, Memo};
pub use crate::rectangle::Rectangle;
pub use crate::errors::{SingularMatrixError, RaggedRowsError, InvalidRectangle};
pub use crate::errors::{DecompositionError, DegenerateMatrixError};

pub use crate::dense::{DenseMatrix, DenseBuilder};
pub use crate::symmetric::{SymmetricMatrix, SymmetricBuilder};
pub use crate::boxed::{BoxedMatrix, BoxedBuilder};
pub use crate::view::{BlockMatrix, BlockMatrixOfRectangles, BlockDiagonalView, SubMatrixView, TransposeView};

pub use crate::closeness::{MatrixClosenessCheck, Closeness};
pub use crate::display::matrix_to_string;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn shared_across_threads() {
        let m: SharedMatrix<f64> = DenseMatrix::from(vec![[4.0, 1.0], [1.0, 3.0]]).shared();
        let packed: SharedMatrix<f64> = SymmetricMatrix::from_packed(2, vec![4.0, 1.0, 3.0]).shared();

        let handles: Vec<_> = (0..8).map(|i| {
            let m = m.clone();
            let packed = packed.clone();
            thread::spawn(move || {
                let inverse = match i % 2 {
                    0 => m.invert(),
                    _ => packed.invert(),
                };
                (inverse, m.determinant(), packed.determinant())
            })
        }).collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let dense_inverse = m.invert();
        let packed_inverse = packed.invert();
        for (i, (inverse, det, packed_det)) in results.into_iter().enumerate() {
            // every thread sees the one cached inverse
            match i % 2 {
                0 => assert!(Arc::ptr_eq(&inverse, &dense_inverse)),
                _ => assert!(Arc::ptr_eq(&inverse, &packed_inverse)),
            }
            assert!((det - 11.0).abs() < 1e-12);
            assert!((packed_det - 11.0).abs() < 1e-12);
        }
    }
}

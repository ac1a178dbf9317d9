/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt;

use crate::boxed::BoxedMatrix;
use crate::dense::DenseMatrix;
use crate::element::Element;
use crate::matrix::Matrix;
use crate::symmetric::SymmetricMatrix;
use crate::view::{BlockDiagonalView, BlockMatrix, BlockMatrixOfRectangles, SubMatrixView, TransposeView};

/// `RxC [[a, b], [c, d]]`.
pub fn matrix_to_string<T: Element + fmt::Display>(m: &dyn Matrix<T>) -> String {
    DisplayMatrix(m).to_string()
}

struct DisplayMatrix<'a, T: Element>(&'a dyn Matrix<T>);

impl<'a, T: Element + fmt::Display> fmt::Display for DisplayMatrix<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let m = self.0;
        write!(f, "{}x{} [", m.row_count(), m.column_count())?;
        for r in 0..m.row_count() {
            if r > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for c in 0..m.column_count() {
                if c > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", m.get(r, c))?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

impl<T: Element + fmt::Display> fmt::Display for dyn Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&DisplayMatrix(self), f)
    }
}

macro_rules! impl_display {
    (generic: $($ty:ident),*) => {$(
        impl<T: Element + fmt::Display> fmt::Display for $ty<T> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                fmt::Display::fmt(&DisplayMatrix(self), f)
            }
        }
    )*};
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                fmt::Display::fmt(&DisplayMatrix(self), f)
            }
        }
    )*};
}

impl_display!(DenseMatrix, SymmetricMatrix);
impl_display!(generic: BoxedMatrix, SubMatrixView, TransposeView, BlockDiagonalView, BlockMatrix, BlockMatrixOfRectangles);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::SharedMatrix;

    #[test]
    fn format() {
        let m = DenseMatrix::from(vec![[1.0, 2.0], [3.0, 4.5]]);
        assert_eq!(m.to_string(), "2x2 [[1, 2], [3, 4.5]]");

        let shared: SharedMatrix<f64> = m.shared();
        assert_eq!(shared.to_string(), "2x2 [[1, 2], [3, 4.5]]");
        assert_eq!(shared.transpose().to_string(), "2x2 [[1, 3], [2, 4.5]]");

        assert_eq!(DenseMatrix::zeros(0, 0).to_string(), "0x0 []");
        assert_eq!(BoxedMatrix::new(vec![vec!['a', 'b']]).to_string(), "1x2 [[a, b]]");
    }
}

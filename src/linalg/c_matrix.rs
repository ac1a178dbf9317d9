/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use ::ndarray::{Array, Array2, ArrayBase, ArrayView2, Ix2};
use ::nalgebra::DMatrix;
use ::slice_of_array::prelude::*;
use ::slice_of_array::IsSliceomorphic;

/// Owned, contiguous, C-order matrix data.
///
/// This is the one buffer type that crosses the backend boundary. The
/// element order is always row-major; conversion to and from the column-major
/// storage of the factorization routines happens inside this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct CMatrix<A = f64>(
    // invariant: .strides[1] == 1
    // invariant: .strides[0] == .ncols()
    // invariant: .len() == product of dims
    Array2<A>
);

fn standard_array<A>(dim: (usize, usize), data: Vec<A>) -> Array2<A> {
    match Array::from_shape_vec(dim, data) {
        Ok(arr) => arr,
        Err(e) => unreachable!("(BUG) data does not fit {:?}: {}", dim, e),
    }
}

impl<A> CMatrix<A> {
    /// Wrap row-major data.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != rows * cols`.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<A>) -> Self {
        assert_eq!(
            data.len(), rows * cols,
            "row-major data of length {} cannot form a {}x{} matrix", data.len(), rows, cols,
        );
        CMatrix(standard_array((rows, cols), data))
    }

    pub fn into_inner(self) -> Array2<A> { self.0 }

    pub fn c_order_data(&self) -> &[A] {
        match self.0.as_slice() {
            Some(data) => data,
            None => unreachable!("(BUG) not c-order!!"),
        }
    }

    pub fn c_order_data_mut(&mut self) -> &mut [A] {
        match self.0.as_slice_mut() {
            Some(data) => data,
            None => unreachable!("(BUG) not c-order!!"),
        }
    }

    pub fn stride(&self) -> usize { self.ncols() }
}

impl CMatrix<f64> {
    pub fn zeros(rows: usize, cols: usize) -> Self { CMatrix(Array2::zeros((rows, cols))) }

    pub fn eye(n: usize) -> Self { CMatrix(Array2::eye(n)) }

    pub(crate) fn to_nalgebra(&self) -> DMatrix<f64> {
        DMatrix::from_row_slice(self.nrows(), self.ncols(), self.c_order_data())
    }

    pub(crate) fn from_nalgebra(mat: &DMatrix<f64>) -> Self {
        CMatrix(Array2::from_shape_fn(mat.shape(), |(r, c)| mat[(r, c)]))
    }
}

impl<A> ::std::ops::Deref for CMatrix<A> {
    type Target = Array2<A>;

    fn deref(&self) -> &Self::Target { &self.0 }
}

impl<'a, A, V> From<&'a [V]> for CMatrix<A>
where
    A: Clone,
    V: IsSliceomorphic<Element = A>,
{
    fn from(rows: &'a [V]) -> Self {
        CMatrix(standard_array((rows.len(), V::LEN), rows.flat().to_vec()))
    }
}

impl<A, V> From<Vec<V>> for CMatrix<A>
where
    A: Clone,
    V: IsSliceomorphic<Element = A>,
{
    fn from(rows: Vec<V>) -> Self { (&rows[..]).into() }
}

impl<A: Clone> From<Array2<A>> for CMatrix<A> {
    fn from(arr: Array2<A>) -> Self {
        if arr.is_standard_layout() {
            CMatrix(arr)
        } else {
            arr.view().into()
        }
    }
}

impl<'a, A: Clone> From<ArrayView2<'a, A>> for CMatrix<A> {
    fn from(arr: ArrayView2<'a, A>) -> Self {
        let dim = arr.dim();
        match arr.as_slice() {
            Some(data) => CMatrix(standard_array(dim, data.to_vec())),
            // logical (row-major) iteration order, whatever the memory order
            None => CMatrix(standard_array(dim, arr.iter().cloned().collect())),
        }
    }
}

impl<'a, A: Clone, S> From<&'a ArrayBase<S, Ix2>> for CMatrix<A>
where S: ::ndarray::Data<Elem = A>,
{
    fn from(arr: &'a ArrayBase<S, Ix2>) -> Self { arr.view().into() }
}

impl<A> From<CMatrix<A>> for Array2<A> {
    fn from(mat: CMatrix<A>) -> Array2<A> { mat.0 }
}

impl<A: Clone> CMatrix<A> {
    /// Rows as fixed-size arrays.
    ///
    /// # Panics
    ///
    /// Panics if the column count is not `V::LEN`.
    pub fn to_rows<V>(&self) -> Vec<V>
    where V: Clone + IsSliceomorphic<Element = A>,
    {
        assert_eq!(self.ncols(), V::LEN);
        self.c_order_data().nest().to_vec()
    }
}

/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, Weak};

use itertools::iproduct;
use ndarray::ArrayView2;

use crate::builder::{self, MatrixBuilder, NumericBuilder};
use crate::element::{Element, Scalar};
use crate::errors::SingularMatrixError;
use crate::rectangle::Rectangle;
use crate::utils;
use crate::view::{SubMatrixView, TransposeView};

/// A built (or viewed) matrix, shared.
pub type SharedMatrix<T> = Arc<dyn Matrix<T>>;

/// Produces fresh builders of the kind a matrix materializes its results into.
pub type BuilderFactory<T> = fn() -> Box<<T as Element>::Builder>;

/// Upcasting support for [`Matrix`]; implemented for every sized matrix.
pub trait AsDynMatrix<T: Element> {
    fn as_dyn(&self) -> &dyn Matrix<T>;

    fn into_shared(self: Arc<Self>) -> SharedMatrix<T>;
}

impl<T: Element, M: Matrix<T>> AsDynMatrix<T> for M {
    fn as_dyn(&self) -> &dyn Matrix<T> { self }

    fn into_shared(self: Arc<Self>) -> SharedMatrix<T> { self }
}

/// A logical, read-only grid of elements.
///
/// Implementors provide [`get`](Matrix::get), the two counts, and the
/// builder factory that derived results are materialized into; every other
/// operation has a default written in terms of those.
///
/// Arithmetic is only available when the element type is a [`Scalar`].
/// Operations that produce views (`sub_matrix`, `transpose`) take
/// `self: Arc<Self>` because the view keeps the source alive.
pub trait Matrix<T: Element>: AsDynMatrix<T> + Send + Sync + 'static {
    /// # Panics
    ///
    /// Panics on an out-of-bounds index.
    fn get(&self, row: usize, column: usize) -> T;

    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    fn builder_factory(&self) -> BuilderFactory<T>;

    fn result_builder(&self) -> Box<T::Builder> { (self.builder_factory())() }

    fn dims(&self) -> (usize, usize) { (self.row_count(), self.column_count()) }

    /// Whether the storage itself guarantees `get(i, j) == get(j, i)`.
    fn is_symmetric_by_construction(&self) -> bool { false }

    /// Compute-once cells for derived values, when the matrix keeps them.
    fn memo(&self) -> Option<&Memo<T>> { None }

    /// Contiguous element access, for storages that have it.
    fn as_array(&self) -> Option<ArrayView2<'_, T>> { None }

    fn shared(self) -> SharedMatrix<T>
    where Self: Sized,
    { Arc::new(self) }

    /// A view of the region `rect`.
    ///
    /// # Panics
    ///
    /// Panics if `rect` does not fit in the matrix.
    fn sub_matrix(self: Arc<Self>, rect: Rectangle) -> SharedMatrix<T> {
        let factory = self.builder_factory();
        Arc::new(SubMatrixView::with_builder(self.into_shared(), rect, factory))
    }

    /// A transpose view. While a previously returned view is still alive,
    /// memoizing matrices hand back that same view.
    fn transpose(self: Arc<Self>) -> SharedMatrix<T> {
        let factory = self.builder_factory();
        let source = self.clone().into_shared();
        let make = || -> SharedMatrix<T> { Arc::new(TransposeView::with_builder(source, factory)) };
        match self.memo() {
            Some(memo) => memo.transpose_with(make),
            None => make(),
        }
    }

    /// Copy into a fresh result builder.
    fn materialize(&self) -> SharedMatrix<T> {
        let mut builder = self.result_builder();
        builder.set_from(self.as_dyn());
        builder.build()
    }

    /// Stack the columns into a single column.
    fn vec(&self) -> SharedMatrix<T> {
        let (rows, columns) = self.dims();
        let mut builder = self.result_builder();
        builder.set_shape(rows * columns, 1);
        for (c, r) in iproduct!(0..columns, 0..rows) {
            builder.set(c * rows + r, 0, self.get(r, c));
        }
        builder.build()
    }

    /// Inverse of [`vec`](Matrix::vec).
    ///
    /// # Panics
    ///
    /// Panics unless `self` is a column vector whose length is a multiple of `row_count`.
    fn unvec(&self, row_count: usize) -> SharedMatrix<T> {
        let (len, columns) = self.dims();
        assert_eq!(columns, 1, "unvec requires a column vector (got {}x{})", len, columns);
        assert!(
            row_count > 0 && len % row_count == 0,
            "cannot unvec a vector of length {} into {} rows", len, row_count,
        );

        let column_count = len / row_count;
        let mut builder = self.result_builder();
        builder.set_shape(row_count, column_count);
        for (c, r) in iproduct!(0..column_count, 0..row_count) {
            builder.set(r, c, self.get(c * row_count + r, 0));
        }
        builder.build()
    }

    /// # Panics
    ///
    /// Panics unless the storage provides a determinant.
    fn determinant(&self) -> T {
        panic!("cannot calculate determinant for matrix of type {}", std::any::type_name::<Self>())
    }

    fn scale(&self, scalar: T) -> SharedMatrix<T>
    where T: Scalar,
    {
        let mut builder = self.result_builder();
        builder.set_from(self.as_dyn());
        builder.scale(scalar);
        builder.build()
    }

    /// # Panics
    ///
    /// Panics unless both matrices have the same shape.
    fn add(&self, other: &dyn Matrix<T>) -> SharedMatrix<T>
    where T: Scalar,
    {
        utils::assert_same_shape("add", self.as_dyn(), other);
        let mut builder = self.result_builder();
        builder.set_from(self.as_dyn());
        builder.add(other);
        builder.build()
    }

    /// # Panics
    ///
    /// Panics unless both matrices have the same shape.
    fn subtract(&self, other: &dyn Matrix<T>) -> SharedMatrix<T>
    where T: Scalar,
    {
        utils::assert_same_shape("subtract", self.as_dyn(), other);
        let mut builder = self.result_builder();
        builder.set_from(self.as_dyn());
        builder.subtract(other);
        builder.build()
    }

    /// # Panics
    ///
    /// Panics if the column count of `self` differs from the row count of `other`.
    fn mult(&self, other: &dyn Matrix<T>) -> SharedMatrix<T>
    where T: Scalar,
    {
        utils::assert_multipliable(self.as_dyn(), other);
        let mut builder = self.result_builder();
        builder.set_shape(self.row_count(), other.column_count());
        builder.mult(self.as_dyn(), other);
        builder.build()
    }

    /// `self * D`, where `D` is the diagonal matrix whose diagonal is the
    /// column vector `diag`.
    fn mult_by_diag(&self, diag: &dyn Matrix<T>) -> SharedMatrix<T>
    where T: Scalar,
    {
        builder::assert_diagonal_fits(self.dims(), diag);
        let mut builder = self.result_builder();
        builder.set_from(self.as_dyn());
        builder.mult_by_diag(diag);
        builder.build()
    }

    fn kronecker_product(&self, other: &dyn Matrix<T>) -> SharedMatrix<T>
    where T: Scalar,
    {
        let (r1, c1) = self.dims();
        let (r2, c2) = other.dims();
        let mut builder = self.result_builder();
        builder.set_shape(r1 * r2, c1 * c2);
        for (i, j) in iproduct!(0..r1, 0..c1) {
            let a = self.get(i, j);
            for (k, l) in iproduct!(0..r2, 0..c2) {
                builder.set(i * r2 + k, j * c2 + l, a * other.get(k, l));
            }
        }
        builder.build()
    }

    /// `self ⊗ I + I ⊗ other`.
    ///
    /// # Panics
    ///
    /// Panics unless both matrices are square.
    fn kronecker_sum(&self, other: &dyn Matrix<T>) -> SharedMatrix<T>
    where T: Scalar,
    {
        assert!(
            utils::is_square(self.as_dyn()) && utils::is_square(other),
            "kronecker sum requires square operands (got {}x{} and {}x{})",
            self.row_count(), self.column_count(), other.row_count(), other.column_count(),
        );
        let identity = |n| {
            let mut builder = self.result_builder();
            builder.set_shape(n, n);
            builder.set_to_identity();
            builder.build()
        };
        let eye_self = identity(self.row_count());
        let eye_other = identity(other.row_count());

        let left = self.kronecker_product(&*eye_other);
        let right = eye_self.kronecker_product(other);
        left.add(&*right)
    }

    /// The inverse, computed once per matrix when the storage keeps a [`Memo`].
    fn try_invert(&self) -> Result<SharedMatrix<T>, SingularMatrixError>
    where T: Scalar,
    {
        if let Some(inverse) = self.memo().and_then(|memo| memo.inverse.get()) {
            return Ok(inverse.clone());
        }

        let mut builder = self.result_builder();
        builder.set_from(self.as_dyn());
        builder.try_invert()?;
        let inverse = builder.build();
        match self.memo() {
            // a raced computation publishes whichever value landed first
            Some(memo) => Ok(memo.inverse.get_or_init(|| inverse).clone()),
            None => Ok(inverse),
        }
    }

    /// # Panics
    ///
    /// Panics if the matrix is singular.
    fn invert(&self) -> SharedMatrix<T>
    where T: Scalar,
    {
        match self.try_invert() {
            Ok(inverse) => inverse,
            Err(e) => panic!("cannot invert {}x{} matrix: {}", self.row_count(), self.column_count(), e),
        }
    }
}

/// Compute-once cells for the inverse and the determinant, plus a weak
/// handle on the last transpose view.
///
/// The inverse and determinant are initialized at most once; readers never
/// observe a partially written value. The transpose view holds its source
/// strongly, so the source only keeps a `Weak` back to it.
pub struct Memo<T: Element> {
    pub(crate) inverse: OnceLock<SharedMatrix<T>>,
    determinant: OnceLock<T>,
    transpose: Mutex<Option<Weak<dyn Matrix<T>>>>,
}

impl<T: Element> Memo<T> {
    pub fn new() -> Self {
        Memo { inverse: OnceLock::new(), determinant: OnceLock::new(), transpose: Mutex::new(None) }
    }

    /// The live transpose view, or a new one from `make`.
    pub fn transpose_with<F>(&self, make: F) -> SharedMatrix<T>
    where F: FnOnce() -> SharedMatrix<T>,
    {
        let mut slot = self.transpose.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(view) = slot.as_ref().and_then(Weak::upgrade) {
            return view;
        }
        let view = make();
        *slot = Some(Arc::downgrade(&view));
        view
    }

    pub fn inverse(&self) -> Option<&SharedMatrix<T>> { self.inverse.get() }

    pub fn determinant_with<F>(&self, compute: F) -> T
    where F: FnOnce() -> T,
    { self.determinant.get_or_init(compute).clone() }
}

impl<T: Element> Default for Memo<T> {
    fn default() -> Self { Memo::new() }
}

// A copy of a matrix starts with nothing computed.
impl<T: Element> Clone for Memo<T> {
    fn clone(&self) -> Self { Memo::new() }
}

impl<T: Element> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Memo")
            .field("inverse", &self.inverse.get().is_some())
            .field("determinant", &self.determinant.get())
            .finish()
    }
}

impl<T: Element> fmt::Debug for dyn Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{} ", self.row_count(), self.column_count())?;
        f.debug_list().entries(utils::to_nested_vec(self)).finish()
    }
}

#[inline]
pub(crate) fn check_index((rows, columns): (usize, usize), row: usize, column: usize) {
    assert!(
        row < rows && column < columns,
        "index ({}, {}) out of bounds for {}x{} matrix", row, column, rows, columns,
    );
}

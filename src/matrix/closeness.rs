/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Approximate equality of whole matrices, with a diagnosis of the first
//! difference found.

use std::fmt;

use itertools::iproduct;

pub use blockmat_assert_close::{AbsoluteCloseness, ElementCloseness, ExactEquality};

use crate::element::Element;
use crate::matrix::Matrix;

/// Compares matrices by shape, then element by element in row-major order.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatrixClosenessCheck<C> {
    element: C,
}

impl<C> MatrixClosenessCheck<C> {
    pub fn new(element: C) -> Self { MatrixClosenessCheck { element } }

    pub fn element_check(&self) -> &C { &self.element }
}

impl MatrixClosenessCheck<AbsoluteCloseness> {
    /// # Panics
    ///
    /// Panics on a negative tolerance.
    pub fn absolute(tolerance: f64) -> Self { Self::new(AbsoluteCloseness::new(tolerance)) }
}

/// The outcome of [`MatrixClosenessCheck::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Closeness<T> {
    Close,
    RowCountMismatch { lhs: usize, rhs: usize },
    ColumnCountMismatch { lhs: usize, rhs: usize },
    ValuesDistant { row: usize, column: usize, lhs: T, rhs: T },
}

impl<T> Closeness<T> {
    pub fn is_close(&self) -> bool {
        match self {
            Closeness::Close => true,
            _ => false,
        }
    }
}

impl<T: fmt::Debug> fmt::Display for Closeness<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Closeness::Close => write!(f, "Closeness check passed"),
            Closeness::RowCountMismatch { lhs, rhs } => {
                write!(f, "Row count mismatch; lhs row count = {}, rhs row count = {}", lhs, rhs)
            },
            Closeness::ColumnCountMismatch { lhs, rhs } => {
                write!(f, "Column count mismatch; lhs column count = {}, rhs column count = {}", lhs, rhs)
            },
            Closeness::ValuesDistant { row, column, lhs, rhs } => write!(
                f, "Matrix values distant; lhs element value = {:?}, rhs element value = {:?}, row index = {}, column index = {}",
                lhs, rhs, row, column,
            ),
        }
    }
}

impl<C> MatrixClosenessCheck<C> {
    pub fn apply<T>(&self, lhs: &dyn Matrix<T>, rhs: &dyn Matrix<T>) -> Closeness<T>
    where T: Element, C: ElementCloseness<T>,
    {
        if lhs.row_count() != rhs.row_count() {
            return Closeness::RowCountMismatch { lhs: lhs.row_count(), rhs: rhs.row_count() };
        }
        if lhs.column_count() != rhs.column_count() {
            return Closeness::ColumnCountMismatch { lhs: lhs.column_count(), rhs: rhs.column_count() };
        }

        for (row, column) in iproduct!(0..lhs.row_count(), 0..lhs.column_count()) {
            let (a, b) = (lhs.get(row, column), rhs.get(row, column));
            if !self.element.is_close(&a, &b) {
                return Closeness::ValuesDistant { row, column, lhs: a, rhs: b };
            }
        }
        Closeness::Close
    }

    pub fn is_satisfied<T>(&self, lhs: &dyn Matrix<T>, rhs: &dyn Matrix<T>) -> bool
    where T: Element, C: ElementCloseness<T>,
    { self.apply(lhs, rhs).is_close() }

    /// # Panics
    ///
    /// Panics with the diagnosis unless the matrices are close.
    pub fn assert_satisfied<T>(&self, lhs: &dyn Matrix<T>, rhs: &dyn Matrix<T>)
    where T: Element, C: ElementCloseness<T>,
    {
        let result = self.apply(lhs, rhs);
        if !result.is_close() {
            panic!("{}; element check = {:?}", result, self.element);
        }
    }

    /// # Panics
    ///
    /// Panics unless the two values are close.
    pub fn assert_scalars_satisfied<T>(&self, lhs: &T, rhs: &T)
    where T: fmt::Debug, C: ElementCloseness<T>,
    {
        if !self.element.is_close(lhs, rhs) {
            panic!("Scalar values distant: lhs = {:?}, rhs = {:?}, check = {:?}", lhs, rhs, self.element);
        }
    }
}

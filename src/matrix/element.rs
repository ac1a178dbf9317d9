/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt;

use num_traits::Float;

use crate::boxed::BoxedBuilder;
use crate::builder::{MatrixBuilder, NumericBuilder};
use crate::dense::DenseBuilder;

/// A type that can be stored in a matrix.
///
/// The associated `Builder` names the builder contract available for the
/// type. For most types this is the plain [`MatrixBuilder`], which can only
/// shape and assign; numeric types pin it to [`NumericBuilder`] (see
/// [`Scalar`]), which is what unlocks the arithmetic methods of
/// [`Matrix`](crate::Matrix).
///
/// Implementing this for your own type takes two lines:
///
/// ```
/// use blockmat_matrix::{BoxedBuilder, Element, MatrixBuilder};
///
/// #[derive(Debug, Clone, PartialEq)]
/// enum Cell { Empty, Wall }
///
/// impl Element for Cell {
///     type Builder = dyn MatrixBuilder<Cell>;
///     fn default_builder() -> Box<Self::Builder> { Box::new(BoxedBuilder::<Cell>::new()) }
/// }
/// ```
pub trait Element: Clone + fmt::Debug + Send + Sync + 'static {
    type Builder: ?Sized + MatrixBuilder<Self>;

    /// Builder used by matrices that were not handed one explicitly.
    fn default_builder() -> Box<Self::Builder>;
}

/// Element types with arithmetic.
pub trait Scalar: Element<Builder = dyn NumericBuilder<Self>> + Float + fmt::Display {}

impl Element for f64 {
    type Builder = dyn NumericBuilder<f64>;

    fn default_builder() -> Box<Self::Builder> { Box::new(DenseBuilder::new()) }
}

impl Scalar for f64 {}

macro_rules! impl_boxed_element {
    ($($t:ty),* $(,)*) => {$(
        impl Element for $t {
            type Builder = dyn MatrixBuilder<$t>;

            fn default_builder() -> Box<Self::Builder> { Box::new(BoxedBuilder::<$t>::new()) }
        }
    )*};
}

impl_boxed_element! {
    bool, char, String, f32,
    i8, i16, i32, i64, isize,
    u8, u16, u32, u64, usize,
}

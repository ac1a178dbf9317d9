/* ************************************************************************ **
** This file is part of blockmat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Approximate equality of floating point scalars.
//!
//! Provides the machine epsilon of `f32`/`f64` (computed once, by halving),
//! the epsilon-aware scalar predicates used throughout blockmat, the
//! [`ElementCloseness`] predicates consumed by matrix comparisons, and the
//! `assert_close!` macro used by the test suites.

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

use std::fmt;

use lazy_static::lazy_static;
use num_traits::Float;

pub const DEFAULT_NONZERO_TOL: f64 = 1e-9;

lazy_static! {
    static ref MACHINE_EPSILON_F32: f32 = compute_machine_epsilon();
    static ref MACHINE_EPSILON_F64: f64 = compute_machine_epsilon();
}

// Halve until adding half of the candidate to one is lost to rounding.
fn compute_machine_epsilon<F: Float>() -> F {
    let two = F::one() + F::one();
    let mut eps = F::one();
    loop {
        eps = eps / two;
        if F::one() + eps / two == F::one() {
            return eps;
        }
    }
}

/// The smallest `eps` such that `1.0 + eps != 1.0`, for `f64`.
pub fn machine_epsilon() -> f64 { *MACHINE_EPSILON_F64 }

/// The smallest `eps` such that `1.0 + eps != 1.0`, for `f32`.
pub fn machine_epsilon_f32() -> f32 { *MACHINE_EPSILON_F32 }

/// Relative equality with a tolerance of one machine epsilon.
pub fn is_equal(a: f64, b: f64) -> bool { is_equal_within(a, b, machine_epsilon()) }

/// Relative equality: `|a - b| <= epsilon * |a|`.
///
/// Identical values (including two NaNs) are always equal.
pub fn is_equal_within(a: f64, b: f64, epsilon: f64) -> bool {
    if a == b || (a.is_nan() && b.is_nan()) {
        return true;
    }
    (a - b).abs() <= epsilon * a.abs()
}

/// `a` exceeds `b` by more than one machine epsilon.
pub fn is_greater_than(a: f64, b: f64) -> bool { is_greater_than_within(a, b, machine_epsilon()) }

pub fn is_greater_than_within(a: f64, b: f64, epsilon: f64) -> bool { a - b > epsilon }

//--------------------------------------------------------

/// A predicate deciding whether two elements are "close enough".
pub trait ElementCloseness<T: ?Sized>: fmt::Debug {
    fn is_close(&self, a: &T, b: &T) -> bool;
}

/// Exact equality. Useful for non-numeric element types.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ExactEquality;

impl<T: PartialEq + ?Sized> ElementCloseness<T> for ExactEquality {
    fn is_close(&self, a: &T, b: &T) -> bool { a == b }
}

/// Absolute tolerance; `|a - b| <= tolerance`.
///
/// Identical values (infinities and NaNs included) always compare close.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AbsoluteCloseness {
    pub tolerance: f64,
}

impl AbsoluteCloseness {
    pub fn new(tolerance: f64) -> Self {
        assert!(tolerance >= 0.0, "negative tolerance: {}", tolerance);
        AbsoluteCloseness { tolerance }
    }
}

impl Default for AbsoluteCloseness {
    fn default() -> Self { AbsoluteCloseness { tolerance: machine_epsilon() } }
}

impl ElementCloseness<f64> for AbsoluteCloseness {
    fn is_close(&self, a: &f64, b: &f64) -> bool {
        *a == *b || (a.is_nan() && b.is_nan()) || (*a - *b).abs() <= self.tolerance
    }
}

impl fmt::Display for AbsoluteCloseness {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "absolute closeness check; tolerance = {}", self.tolerance)
    }
}

impl ElementCloseness<f64> for Tolerances {
    fn is_close(&self, a: &f64, b: &f64) -> bool { __is_close(*a, *b, *self) }
}

//--------------------------------------------------------

#[macro_export]
macro_rules! assert_close {
    ($($t:tt)*) => {
        $crate::__assert_close_impl!{@parsing [$($t)*] [[@rel $crate::DEFAULT_NONZERO_TOL] [@abs 0.0]]}
    };
}

#[macro_export]
macro_rules! debug_assert_close {
    ($($t:tt)*) => {{
        #[cfg(debug_assertions)] {
            $crate::assert_close!{$($t)*}
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __assert_close_impl {
    (@parsing [rel=$tol:expr, $($rest:tt)*] [$($assignment:tt)*]) => {
        $crate::__assert_close_impl!(@parsing [$($rest)*] [$($assignment)* [@rel $tol]]);
    };
    (@parsing [abs=$tol:expr, $($rest:tt)*] [$($assignment:tt)*]) => {
        $crate::__assert_close_impl!(@parsing [$($rest)*] [$($assignment)* [@abs $tol]]);
    };
    (@parsing [$a:expr, $b:expr $(,)*] $assignments:tt) => {
        $crate::__assert_close_impl!(@expand $assignments [@comp $a, $b] [@fmt "values not close!"])
    };
    (@parsing [$a:expr, $b:expr, $($fmt:tt)+] $assignments:tt) => {
        $crate::__assert_close_impl!(@expand $assignments [@comp $a, $b] [@fmt $($fmt)+])
    };
    (@expand [$($assignment:tt)*] [@comp $a:expr, $b:expr] [@fmt $($fmt:tt)+] ) => {
        #[allow(unused_mut)]
        #[allow(unused_assignments)]
        {
            let a = $a;
            let b = $b;

            let mut abs;
            let mut rel;
            $(
                $crate::__assert_close_impl!{@assign [abs, rel] $assignment}
            )*

            if let Err(e) = $crate::CheckClose::check_close(&a, &b, $crate::Tolerances { abs, rel }) {
                panic!(
                    "{} (tolerances: rel={}, abs={})\n left: {:?}\nright: {:?}\n{}",
                    format!($($fmt)+), rel, abs, a, b, e,
                );
            }
        }
    };
    (@assign [$abs:ident, $rel:ident] [@abs $tol:expr]) => { $abs = $tol; };
    (@assign [$abs:ident, $rel:ident] [@rel $tol:expr]) => { $rel = $tol; };
}

/// Python's `math.isclose`, with infinities only close to themselves.
#[doc(hidden)]
#[inline]
pub fn __is_close(a: f64, b: f64, tol: Tolerances) -> bool {
    let Tolerances { abs, rel } = tol;
    assert!(rel >= 0.0);
    assert!(abs >= 0.0);

    if a == b { return true; }
    if a.is_infinite() || b.is_infinite() { return false; }

    // NaN falls through to false here
    (a - b).abs() < abs.max(rel * a.abs()).max(rel * b.abs())
}

#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

impl Default for Tolerances {
    fn default() -> Self { Tolerances { abs: 0.0, rel: DEFAULT_NONZERO_TOL } }
}

#[derive(Debug, thiserror::Error)]
#[error("failed at:\n  left: {:?}\n right: {:?}\n   tol: {:?}", .left, .right, .tol)]
pub struct CheckCloseError {
    pub left: f64,
    pub right: f64,
    pub tol: Tolerances,
}

pub trait CheckClose<Rhs: ?Sized = Self> {
    /// Test that all values of self and other are close.
    fn check_close(&self, other: &Rhs, tol: Tolerances) -> Result<(), CheckCloseError>;
}

impl CheckClose for f64 {
    #[inline]
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError> {
        match __is_close(*self, *other, tol) {
            true => Ok(()),
            false => Err(CheckCloseError { left: *self, right: *other, tol }),
        }
    }
}

impl CheckClose for f32 {
    #[inline]
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError> {
        f64::from(*self).check_close(&f64::from(*other), tol)
    }
}

impl<'a, T: ?Sized + CheckClose> CheckClose for &'a T {
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError> {
        CheckClose::check_close(*self, *other, tol)
    }
}

impl<T: CheckClose> CheckClose for [T] {
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError> {
        assert_eq!(self.len(), other.len(), "length mismatch");
        self.iter().zip(other).map(|(a, b)| a.check_close(b, tol)).collect()
    }
}

impl<T: CheckClose> CheckClose for Vec<T> {
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError> {
        self[..].check_close(&other[..], tol)
    }
}

impl<T: CheckClose> CheckClose<[T]> for Vec<T> {
    fn check_close(&self, other: &[T], tol: Tolerances) -> Result<(), CheckCloseError> {
        self[..].check_close(other, tol)
    }
}

impl<T: CheckClose, const N: usize> CheckClose for [T; N] {
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError> {
        self[..].check_close(&other[..], tol)
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn machine_epsilon_matches_the_float_constants() {
        assert_eq!(machine_epsilon(), f64::EPSILON);
        assert_eq!(machine_epsilon_f32(), f32::EPSILON);
        assert_ne!(1.0 + machine_epsilon(), 1.0);
        assert_eq!(1.0 + machine_epsilon() / 2.0, 1.0);
    }

    #[test]
    fn relative_equality() {
        assert!(is_equal(1.0, 1.0));
        assert!(is_equal(f64::NAN, f64::NAN));
        assert!(is_equal(1.0, 1.0 + f64::EPSILON));
        assert!(!is_equal(1.0, 1.0 + 4.0 * f64::EPSILON));
        assert!(is_equal_within(100.0, 101.0, 0.01));
        assert!(!is_equal_within(100.0, 102.0, 0.01));
    }

    #[test]
    fn greater_than() {
        assert!(is_greater_than(1.0, 0.5));
        assert!(!is_greater_than(1.0 + f64::EPSILON / 2.0, 1.0));
        assert!(!is_greater_than_within(1.05, 1.0, 0.1));
    }

    #[test]
    fn absolute_closeness() {
        let close = AbsoluteCloseness::default();
        assert_eq!(close.tolerance, machine_epsilon());
        assert!(close.is_close(&1.0, &1.0));
        assert!(close.is_close(&f64::INFINITY, &f64::INFINITY));
        assert!(close.is_close(&f64::NAN, &f64::NAN));
        assert!(!close.is_close(&f64::NAN, &1.0));
        assert!(!close.is_close(&4.0, &5.0));
        assert!(AbsoluteCloseness::new(1.5).is_close(&4.0, &5.0));
        assert!(ExactEquality.is_close("a", "a"));
    }

    #[test]
    #[should_panic(expected = "negative tolerance")]
    fn negative_tolerance() {
        AbsoluteCloseness::new(-1.0);
    }

    #[test]
    fn macro_output_can_compile() {
        assert_close!(1.0, 1.0);
        assert_close!(abs=1e-8, 1.0, 1.0);
        assert_close!(rel=1e-8, abs=1e-8, 1.0, 1.0);
        assert_close!(1.0, 1.0,);
        assert_close!(abs=1e-8, 1.0, 1.0,);
        assert_close!(rel=1e-8, abs=1e-8, 1.0, 1.0,);
        assert_close!(abs=1e-8, [1.0, 2.0], [1.0, 2.0 + 1e-10]);
        assert_close!(abs=1e-8, vec![1.0f32], vec![1.0f32], "{}", "message");
    }

    #[test]
    #[should_panic(expected = "values not close!")]
    fn not_close() {
        assert_close!(abs=0.0, rel=0.0, 1.0, 1.1);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic)]
    fn debug_not_close() {
        debug_assert_close!(abs=0.0, rel=0.0, 1.0, 1.1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn closeness_config() {
        let close: AbsoluteCloseness = serde_json::from_str("{}").unwrap();
        assert_eq!(close, AbsoluteCloseness::default());
        let close: AbsoluteCloseness = serde_json::from_str(r#"{"tolerance": 0.5}"#).unwrap();
        assert_eq!(close.tolerance, 0.5);
    }
}

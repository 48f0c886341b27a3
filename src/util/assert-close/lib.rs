/* ************************************************************************ **
** This file is part of relax, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Approximate equality assertions for floats and vectors of floats.
//!
//! ```
//! # #[macro_use] extern crate relax_assert_close;
//! # fn main() {
//! assert_close!(1.0, 1.0 + 1e-12);
//! assert_close!(abs=1e-6, vec![0.0, 1.0], vec![1e-7, 1.0]);
//! assert_close!(rel=1e-3, abs=0.0, 1000.0, 1000.5, "at step {}", 3);
//! # }
//! ```

use std::fmt;

use relax_slice_math::Coords;

/// Relative tolerance used when none is given.
pub const DEFAULT_NONZERO_TOL: f64 = 1e-9;

/// Panic unless two values are close.
///
/// Accepts optional leading `rel=` and `abs=` tolerances (in either order),
/// two operands, and an optional trailing format string.  An element passes
/// if it is within *either* tolerance.  The defaults are
/// `rel=DEFAULT_NONZERO_TOL` and `abs=0.0`.
#[macro_export]
macro_rules! assert_close {
    (rel=$rel:expr, abs=$abs:expr, $($rest:tt)*) => {
        $crate::__assert_close_with!([$abs, $rel] $($rest)*)
    };
    (abs=$abs:expr, rel=$rel:expr, $($rest:tt)*) => {
        $crate::__assert_close_with!([$abs, $rel] $($rest)*)
    };
    (rel=$rel:expr, $($rest:tt)*) => {
        $crate::__assert_close_with!([0.0, $rel] $($rest)*)
    };
    (abs=$abs:expr, $($rest:tt)*) => {
        $crate::__assert_close_with!([$abs, $crate::DEFAULT_NONZERO_TOL] $($rest)*)
    };
    ($($rest:tt)*) => {
        $crate::__assert_close_with!([0.0, $crate::DEFAULT_NONZERO_TOL] $($rest)*)
    };
}

/// `assert_close!` that is only checked with `debug_assertions`.
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
macro_rules! __assert_close_with {
    ([$abs:expr, $rel:expr] $a:expr, $b:expr $(,)?) => {
        $crate::__assert_close_with!([$abs, $rel] $a, $b, "not nearly equal!")
    };
    ([$abs:expr, $rel:expr] $a:expr, $b:expr, $($fmt:tt)+) => {{
        let tol = $crate::Tolerances { abs: $abs, rel: $rel };
        match $crate::CheckClose::check_close(&$a, &$b, tol) {
            Ok(()) => {},
            Err(e) => panic!(
                "{} (tolerances: rel={}, abs={})\n{}",
                format!($($fmt)+), tol.rel, tol.abs, e,
            ),
        }
    }};
}

#[doc(hidden)]
#[inline]
pub fn __is_close(a: f64, b: f64, Tolerances { abs, rel }: Tolerances) -> bool {
    // Same semantics as Python's math.isclose.
    assert!(rel >= 0.0);
    assert!(abs >= 0.0);

    // also catches infinities of the same sign
    if a == b { return true; }

    // infinities of opposite sign would otherwise get infinite relative tolerance
    if a.is_infinite() || b.is_infinite() { return false; }

    // NaN falls through to false here
    (a - b).abs() <= abs.max(rel * a.abs()).max(rel * b.abs())
}

#[derive(Debug, Copy, Clone)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum CheckCloseError {
    #[error("failed at index {index}:\n  left: {left:?}\n right: {right:?}")]
    Element { index: usize, left: f64, right: f64 },

    #[error("failed:\n  left: {left:?}\n right: {right:?}")]
    Scalar { left: f64, right: f64 },

    #[error("length mismatch: {left} vs {right}")]
    Length { left: usize, right: usize },
}

pub trait CheckClose<Rhs: ?Sized = Self> {
    /// Test that all values of self and other are close.
    fn check_close(&self, other: &Rhs, tol: Tolerances) -> Result<(), CheckCloseError>;
}

impl CheckClose for f64 {
    fn check_close(&self, other: &f64, tol: Tolerances) -> Result<(), CheckCloseError> {
        match __is_close(*self, *other, tol) {
            true => Ok(()),
            false => Err(CheckCloseError::Scalar { left: *self, right: *other }),
        }
    }
}

impl<'a, A: ?Sized + CheckClose<B>, B: ?Sized> CheckClose<&'a B> for &'a A {
    fn check_close(&self, other: &&'a B, tol: Tolerances) -> Result<(), CheckCloseError> {
        (**self).check_close(&**other, tol)
    }
}

fn check_slices(a: &[f64], b: &[f64], tol: Tolerances) -> Result<(), CheckCloseError> {
    if a.len() != b.len() {
        return Err(CheckCloseError::Length { left: a.len(), right: b.len() });
    }
    for (index, (&left, &right)) in a.iter().zip(b).enumerate() {
        if !__is_close(left, right, tol) {
            return Err(CheckCloseError::Element { index, left, right });
        }
    }
    Ok(())
}

// every pairing of the slice-like types
macro_rules! impl_slice_like {
    ($($A:ty => [$($B:ty),*];)*) => {$($(
        impl CheckClose<$B> for $A {
            fn check_close(&self, other: &$B, tol: Tolerances) -> Result<(), CheckCloseError> {
                check_slices(&self[..], &other[..], tol)
            }
        }
    )*)*};
}

impl_slice_like! {
    [f64] => [[f64], Vec<f64>, Coords];
    Vec<f64> => [[f64], Vec<f64>, Coords];
    Coords => [[f64], Vec<f64>, Coords];
}

impl fmt::Display for Tolerances {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rel={}, abs={}", self.rel, self.abs)
    }
}

/* ************************************************************************ **
** This file is part of relax, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Math utils for variable length contiguous vectors.
//!
//! Everything here is restricted to `f64`. The owned vector type handed
//! around by the potentials and the optimizer is [`Coords`]; the [`V`]
//! wrapper gives elementwise arithmetic on owned or borrowed data.

mod coords;
pub use crate::coords::Coords;

use std::ops::{Add, Sub, Mul, Div, Neg, Deref, DerefMut};

/// The norm of a vector that could not be normalized (zero, infinite or NaN).
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct BadNorm(pub f64);

/// Implements element-wise operations.
///
/// Use the lowercase [`v`] to construct.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct V<T: AllowedV>(pub T);
pub type VOwn = V<Vec<f64>>;
pub type VRef<'a> = V<&'a [f64]>;
pub type VMut<'a> = V<&'a mut [f64]>;

/// This exists to give you better errors when you accidentally construct a `V<&Vec<f64>>`.
///
/// Hint: use `v(value)` instead of `V(value)` to construct V.
pub trait AllowedV {}
impl AllowedV for Vec<f64> {}
impl<'a> AllowedV for &'a [f64] {}
impl<'a> AllowedV for &'a mut [f64] {}

//------------------------
// Math ops

fn map_each(xs: &[f64], f: impl Fn(f64) -> f64) -> VOwn {
    V(xs.iter().map(|&x| f(x)).collect())
}

fn zip_each(xs: &[f64], ys: &[f64], f: impl Fn(f64, f64) -> f64) -> VOwn {
    assert_eq!(xs.len(), ys.len(), "length mismatch in elementwise op");
    V(xs.iter().zip(ys).map(|(&x, &y)| f(x, y)).collect())
}

// Every combination of {owned, borrowed} x {owned, borrowed, scalar} funnels
// into `map_each` and `zip_each`; owned left operands reuse their buffer.
macro_rules! impl_binary {
    ($Op:ident::$op:ident) => {
        impl $Op<VOwn> for f64 {
            type Output = VOwn;
            fn $op(self, mut u: VOwn) -> VOwn {
                u.0.iter_mut().for_each(|x| *x = $Op::$op(self, *x));
                u
            }
        }

        impl<'a> $Op<VRef<'a>> for f64 {
            type Output = VOwn;
            fn $op(self, u: VRef<'a>) -> VOwn { map_each(u.0, |x| $Op::$op(self, x)) }
        }

        impl $Op<f64> for VOwn {
            type Output = VOwn;
            fn $op(mut self, s: f64) -> VOwn {
                self.0.iter_mut().for_each(|x| *x = $Op::$op(*x, s));
                self
            }
        }

        impl<'a> $Op<f64> for VRef<'a> {
            type Output = VOwn;
            fn $op(self, s: f64) -> VOwn { map_each(self.0, |x| $Op::$op(x, s)) }
        }

        impl $Op<VOwn> for VOwn {
            type Output = VOwn;
            fn $op(self, u: VOwn) -> VOwn { zip_each(&self.0, &u.0, |a, b| $Op::$op(a, b)) }
        }

        impl<'b> $Op<VRef<'b>> for VOwn {
            type Output = VOwn;
            fn $op(self, u: VRef<'b>) -> VOwn { zip_each(&self.0, u.0, |a, b| $Op::$op(a, b)) }
        }

        impl<'a> $Op<VOwn> for VRef<'a> {
            type Output = VOwn;
            fn $op(self, u: VOwn) -> VOwn { zip_each(self.0, &u.0, |a, b| $Op::$op(a, b)) }
        }

        impl<'a, 'b> $Op<VRef<'b>> for VRef<'a> {
            type Output = VOwn;
            fn $op(self, u: VRef<'b>) -> VOwn { zip_each(self.0, u.0, |a, b| $Op::$op(a, b)) }
        }
    };
}

impl_binary!(Add::add);
impl_binary!(Sub::sub);
impl_binary!(Mul::mul);
impl_binary!(Div::div);

impl Neg for VOwn {
    type Output = VOwn;
    fn neg(self) -> VOwn { -1.0 * self }
}

impl<'a> Neg for VRef<'a> {
    type Output = VOwn;
    fn neg(self) -> VOwn { -1.0 * self }
}

//------------------------
// Let &V coerce to &[f64] for the sake of `vdot` and `vnorm` below

impl Deref for VOwn {
    type Target = [f64];
    fn deref(&self) -> &[f64] { &self.0 }
}

impl<'a> Deref for VRef<'a> {
    type Target = [f64];
    fn deref(&self) -> &[f64] { self.0 }
}

impl<'a> Deref for VMut<'a> {
    type Target = [f64];
    fn deref(&self) -> &[f64] { &*self.0 }
}

impl<'a> DerefMut for VMut<'a> {
    fn deref_mut(&mut self) -> &mut [f64] { &mut *self.0 }
}

impl<'a> VMut<'a> {
    /// `self += scale * other`, in place.
    pub fn add_scaled(&mut self, scale: f64, other: &[f64]) {
        assert_eq!(self.0.len(), other.len(), "length mismatch in add_scaled");
        for (x, &y) in self.0.iter_mut().zip(other) {
            *x += scale * y;
        }
    }

    /// `self *= scale`, in place.
    pub fn scale(&mut self, scale: f64) {
        self.0.iter_mut().for_each(|x| *x *= scale);
    }

    pub fn fill(&mut self, value: f64) {
        self.0.iter_mut().for_each(|x| *x = value);
    }
}

impl IntoIterator for VOwn {
    type IntoIter = std::vec::IntoIter<f64>;
    type Item = f64;
    fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

impl From<VOwn> for Coords {
    fn from(V(vec): VOwn) -> Coords { Coords::new(vec) }
}

//------------------------
// Construction.
//
// `V(&vec)` would make a `V<&Vec<f64>>`, because the type parameter of `V`
// blocks deref coercion; `v(&vec)` picks the right wrapper instead.

/// Wrap owned, borrowed or mutably borrowed data for elementwise math.
pub fn v<W: MakeV>(w: W) -> W::Output { w.make_v() }

/// Implementation detail of [`v`].
pub trait MakeV {
    type Output;
    fn make_v(self) -> Self::Output;
}

macro_rules! impl_make_v {
    ($([$($lt:lifetime)?] $Src:ty => $Out:ty, |$x:ident| $conv:expr;)*) => {$(
        impl<$($lt)?> MakeV for $Src {
            type Output = $Out;
            fn make_v(self) -> $Out { let $x = self; V($conv) }
        }
    )*};
}

impl_make_v! {
    [] Vec<f64> => VOwn, |x| x;
    [] Coords => VOwn, |x| x.into_vec();
    ['a] &'a [f64] => VRef<'a>, |x| x;
    ['a] &'a Vec<f64> => VRef<'a>, |x| &x[..];
    ['a] &'a Coords => VRef<'a>, |x| x.as_slice();
    ['a] &'a mut [f64] => VMut<'a>, |x| x;
    ['a] &'a mut Vec<f64> => VMut<'a>, |x| &mut x[..];
    ['a] &'a mut Coords => VMut<'a>, |x| x.as_mut_slice();
}

//------------------------
// Math

pub fn vdot(u: &[f64], w: &[f64]) -> f64 {
    assert_eq!(u.len(), w.len(), "length mismatch in vdot");
    u.iter().zip(w).fold(0.0, |acc, (a, b)| acc + a * b)
}

pub fn vsqnorm(u: &[f64]) -> f64 { vdot(u, u) }
pub fn vnorm(u: &[f64]) -> f64 { vsqnorm(u).sqrt() }

/// Largest absolute value of any element (zero for an empty slice).
///
/// NaN anywhere makes the result NaN.
pub fn vmax_abs(u: &[f64]) -> f64 {
    u.iter().map(|x| x.abs()).fold(0.0, |m, x| if x.is_nan() || x > m { x } else { m })
}

/// Root-mean-square of the elements. (`vnorm` rescaled as an intensive property)
pub fn vrms(u: &[f64]) -> f64 {
    match u.len() {
        0 => 0.0,
        n => vnorm(u) / (n as f64).sqrt(),
    }
}

pub fn vnormalize(u: &[f64]) -> Result<VOwn, BadNorm> {
    let norm = vnorm(u);
    let recip = norm.recip();
    if !recip.is_normal() {
        return Err(BadNorm(norm));
    }
    Ok(recip * v(u))
}

//---------------------------

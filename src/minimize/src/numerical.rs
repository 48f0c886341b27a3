/* ************************************************************************ **
** This file is part of relax, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Finite-difference derivatives.
//!
//! These are public because anything that implements
//! [`Potential`](crate::Potential) will want them to check its gradient.

use std::convert::Infallible;

/// A central-difference stencil.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stencil {
    Three,
    Five,
    Seven,
    Nine,
}

impl Default for Stencil {
    fn default() -> Stencil { Stencil::Five }
}

impl Stencil {
    pub fn num_points(self) -> u32 {
        match self {
            Stencil::Three => 3,
            Stencil::Five => 5,
            Stencil::Seven => 7,
            Stencil::Nine => 9,
        }
    }

    // (offset, weight) pairs, and the denominator of the weights.
    //
    // http://www.holoborodko.com/pavel/numerical-methods/numerical-derivative/central-differences/
    fn terms(self) -> (&'static [(f64, f64)], f64) {
        match self {
            Stencil::Three => (STENCIL_3, 2.0),
            Stencil::Five => (STENCIL_5, 12.0),
            Stencil::Seven => (STENCIL_7, 60.0),
            Stencil::Nine => (STENCIL_9, 840.0),
        }
    }
}

const STENCIL_3: &[(f64, f64)] = &[(-1.0, -1.0), (1.0, 1.0)];
const STENCIL_5: &[(f64, f64)] = &[(-2.0, 1.0), (-1.0, -8.0), (1.0, 8.0), (2.0, -1.0)];
const STENCIL_7: &[(f64, f64)] = &[
    (-3.0, -1.0), (-2.0, 9.0), (-1.0, -45.0),
    (1.0, 45.0), (2.0, -9.0), (3.0, 1.0),
];
const STENCIL_9: &[(f64, f64)] = &[
    (-4.0, 3.0), (-3.0, -32.0), (-2.0, 168.0), (-1.0, -672.0),
    (1.0, 672.0), (2.0, -168.0), (3.0, 32.0), (4.0, -3.0),
];

/// Derivative of a 1D function at `x`, with sample points spaced `step` apart.
pub fn slope(step: f64, stencil: Stencil, x: f64, mut f: impl FnMut(f64) -> f64) -> f64 {
    match try_slope(step, stencil, x, |x| Ok::<_, Infallible>(f(x))) {
        Ok(slope) => slope,
        Err(never) => match never {},
    }
}

/// [`slope`] for a function that can fail.  The first error is returned.
pub fn try_slope<E>(
    step: f64,
    stencil: Stencil,
    x: f64,
    mut f: impl FnMut(f64) -> Result<f64, E>,
) -> Result<f64, E> {
    let (terms, denom) = stencil.terms();
    let mut numer = 0.0;
    for &(offset, weight) in terms {
        numer += weight * f(x + offset * step)?;
    }
    Ok(numer / (denom * step))
}

/// Gradient by taking a [`slope`] along each axis in turn.
///
/// This costs `num_points - 1` calls per axis, so it is only for checking things.
pub fn gradient(step: f64, stencil: Stencil, point: &[f64], mut f: impl FnMut(&[f64]) -> f64) -> Vec<f64> {
    match try_gradient(step, stencil, point, |x| Ok::<_, Infallible>(f(x))) {
        Ok(grad) => grad,
        Err(never) => match never {},
    }
}

/// [`gradient`] for a function that can fail.
pub fn try_gradient<E>(
    step: f64,
    stencil: Stencil,
    point: &[f64],
    mut f: impl FnMut(&[f64]) -> Result<f64, E>,
) -> Result<Vec<f64>, E> {
    // one coordinate at a time is displaced in here
    let mut scratch = point.to_vec();
    let mut grad = Vec::with_capacity(point.len());
    for (axis, &center) in point.iter().enumerate() {
        let result = try_slope(step, stencil, center, |x| {
            scratch[axis] = x;
            f(&scratch[..])
        });
        scratch[axis] = center;
        grad.push(result?);
    }
    Ok(grad)
}

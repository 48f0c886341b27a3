/* ************************************************************************ **
** This file is part of relax, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! The interface between potentials and the optimizer.

use std::rc::Rc;
use std::sync::Arc;

use relax_slice_math::Coords;

use crate::numerical;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PotentialError {
    /// A vector does not have one element per degree of freedom.
    #[error("dimension mismatch: {what} has length {actual}, but there are {expected} degrees of freedom")]
    DimensionMismatch { what: &'static str, expected: usize, actual: usize },

    /// The degrees of freedom cannot be partitioned into blocks of the requested size.
    #[error("dimension mismatch: {ndof} degrees of freedom cannot be split into blocks of {ndim}")]
    BlockMismatch { ndof: usize, ndim: usize },

    #[error("bad parameter {what}[{index}] = {value}: {reason}")]
    BadParameter { what: &'static str, index: usize, value: f64, reason: &'static str },
}

impl PotentialError {
    /// True for both kinds of dimension mismatch.
    pub fn is_dimension_mismatch(&self) -> bool {
        match self {
            PotentialError::DimensionMismatch { .. } => true,
            PotentialError::BlockMismatch { .. } => true,
            PotentialError::BadParameter { .. } => false,
        }
    }
}

/// A differentiable energy surface over a fixed number of degrees of freedom.
///
/// Implementations are immutable once constructed; evaluation never modifies
/// the potential, so one instance can back any number of optimizers (by
/// reference, or through `Rc`/`Arc`).
///
/// Both methods must fail with [`PotentialError::DimensionMismatch`] *before*
/// doing any work if a slice has the wrong length.
pub trait Potential {
    /// Number of degrees of freedom, i.e. the length of every coordinate vector.
    fn ndof(&self) -> usize;

    fn energy(&self, x: &[f64]) -> Result<f64, PotentialError>;

    /// Compute the energy and write the gradient into `grad_out`.
    fn energy_and_gradient(&self, x: &[f64], grad_out: &mut [f64]) -> Result<f64, PotentialError>;

    /// Fail unless `len` matches `self.ndof()`.
    fn check_ndof(&self, what: &'static str, len: usize) -> Result<(), PotentialError> {
        match len == self.ndof() {
            true => Ok(()),
            false => Err(PotentialError::DimensionMismatch { what, expected: self.ndof(), actual: len }),
        }
    }

    /// Allocating form of [`Potential::energy_and_gradient`].
    fn diff(&self, x: &[f64]) -> Result<(f64, Coords), PotentialError> {
        let mut grad = Coords::zeros(self.ndof());
        let value = self.energy_and_gradient(x, &mut grad)?;
        Ok((value, grad))
    }

    /// Gradient by finite differences of [`Potential::energy`].
    ///
    /// This costs a handful of energy evaluations per degree of freedom; it exists
    /// for checking analytic gradients.
    fn numerical_gradient(&self, x: &[f64], interval_width: f64) -> Result<Coords, PotentialError> {
        self.check_ndof("position", x.len())?;
        numerical::try_gradient(interval_width, numerical::Stencil::default(), x, |p| self.energy(p)).map(Coords::from)
    }
}

macro_rules! forward_potential {
    ($($Ptr:ident)*) => {$(
        impl<P: Potential + ?Sized> Potential for $Ptr<P> {
            fn ndof(&self) -> usize { (**self).ndof() }

            fn energy(&self, x: &[f64]) -> Result<f64, PotentialError> { (**self).energy(x) }

            fn energy_and_gradient(&self, x: &[f64], grad_out: &mut [f64]) -> Result<f64, PotentialError>
            { (**self).energy_and_gradient(x, grad_out) }
        }
    )*};
}

forward_potential!{ Box Rc Arc }

impl<'a, P: Potential + ?Sized> Potential for &'a P {
    fn ndof(&self) -> usize { (**self).ndof() }

    fn energy(&self, x: &[f64]) -> Result<f64, PotentialError> { (**self).energy(x) }

    fn energy_and_gradient(&self, x: &[f64], grad_out: &mut [f64]) -> Result<f64, PotentialError>
    { (**self).energy_and_gradient(x, grad_out) }
}

/* ************************************************************************ **
** This file is part of relax, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Gaussian wells.
//!
//! A well with mean `m` and diagonal covariance `c` has the energy
//!
//! ```text
//! E(x) = -exp(-1/2 sum_i (x_i - m_i)^2 / c_i)
//! ```
//!
//! so that its minimum is `-1` at `x = m`.

use rayon::prelude::*;

use relax_minimize::{Potential, PotentialError};
use relax_slice_math::Coords;

/// A single anisotropic Gaussian well.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianPot {
    mean: Coords,
    cov: Coords,
}

/// Independent Gaussian wells, one per consecutive block of `ndim` coordinates.
///
/// The energy is the sum of the energies of the wells.
#[derive(Debug, Clone, PartialEq)]
pub struct SumGaussianPot {
    ndim: usize,
    mean: Coords,
    cov: Coords,
    parallel: bool,
}

// Energy of one well; the gradient is written to `grad_out` when present.
//
// All slices have equal length.
fn well(x: &[f64], mean: &[f64], cov: &[f64], grad_out: Option<&mut [f64]>) -> f64 {
    let exponent: f64 = izip!(x, mean, cov).map(|(&x, &m, &c)| (x - m) * (x - m) / c).sum();
    let energy = -f64::exp(-0.5 * exponent);
    if let Some(grad_out) = grad_out {
        for (g, &x, &m, &c) in izip!(grad_out, x, mean, cov) {
            *g = -energy * (x - m) / c;
        }
    }
    energy
}

fn validate_wells(mean: &[f64], cov: &[f64]) -> Result<(), PotentialError> {
    if mean.len() != cov.len() {
        return Err(PotentialError::DimensionMismatch {
            what: "covariance", expected: mean.len(), actual: cov.len(),
        });
    }
    if let Some((index, &value)) = mean.iter().enumerate().find(|&(_, &x)| !x.is_finite()) {
        return Err(PotentialError::BadParameter { what: "mean", index, value, reason: "must be finite" });
    }
    // (NaN fails here too)
    if let Some((index, &value)) = cov.iter().enumerate().find(|&(_, &c)| !(c > 0.0 && c.is_finite())) {
        return Err(PotentialError::BadParameter { what: "cov", index, value, reason: "must be positive and finite" });
    }
    Ok(())
}

impl GaussianPot {
    /// `cov` is the diagonal of the covariance matrix.
    pub fn new(mean: impl Into<Coords>, cov: impl Into<Coords>) -> Result<Self, PotentialError> {
        let (mean, cov) = (mean.into(), cov.into());
        validate_wells(&mean, &cov)?;
        Ok(GaussianPot { mean, cov })
    }

    pub fn mean(&self) -> &[f64] { &self.mean }
    pub fn cov(&self) -> &[f64] { &self.cov }
}

impl Potential for GaussianPot {
    fn ndof(&self) -> usize { self.mean.len() }

    fn energy(&self, x: &[f64]) -> Result<f64, PotentialError> {
        self.check_ndof("position", x.len())?;
        Ok(well(x, &self.mean, &self.cov, None))
    }

    fn energy_and_gradient(&self, x: &[f64], grad_out: &mut [f64]) -> Result<f64, PotentialError> {
        self.check_ndof("position", x.len())?;
        self.check_ndof("gradient", grad_out.len())?;
        Ok(well(x, &self.mean, &self.cov, Some(grad_out)))
    }
}

impl SumGaussianPot {
    /// `mean` and `cov` are the concatenated parameters of `mean.len() / ndim` wells.
    pub fn new(
        ndim: usize,
        mean: impl Into<Coords>,
        cov: impl Into<Coords>,
    ) -> Result<Self, PotentialError> {
        let (mean, cov) = (mean.into(), cov.into());
        if ndim == 0 {
            return Err(PotentialError::BadParameter {
                what: "ndim", index: 0, value: 0.0, reason: "block dimension must be positive",
            });
        }
        validate_wells(&mean, &cov)?;
        if mean.len() % ndim != 0 {
            return Err(PotentialError::BlockMismatch { ndof: mean.len(), ndim });
        }
        Ok(SumGaussianPot { ndim, mean, cov, parallel: false })
    }

    /// Evaluate the wells on the rayon thread pool.
    ///
    /// Results are identical to the serial evaluation.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool { self.parallel }
    /// Number of coordinates per well.
    pub fn ndim(&self) -> usize { self.ndim }
    /// Number of wells.
    pub fn npot(&self) -> usize { self.mean.len() / self.ndim }
    pub fn mean(&self) -> &[f64] { &self.mean }
    pub fn cov(&self) -> &[f64] { &self.cov }

    /// A copy of the `g`th well.
    pub fn block(&self, g: usize) -> Option<GaussianPot> {
        if g >= self.npot() {
            return None;
        }
        let range = g * self.ndim..(g + 1) * self.ndim;
        Some(GaussianPot {
            mean: self.mean.copy_range(range.clone()),
            cov: self.cov.copy_range(range),
        })
    }
}

impl Potential for SumGaussianPot {
    fn ndof(&self) -> usize { self.mean.len() }

    fn energy(&self, x: &[f64]) -> Result<f64, PotentialError> {
        self.check_ndof("position", x.len())?;

        let n = self.ndim;
        let energies: Vec<f64> = match self.parallel {
            false => {
                izip!(x.chunks(n), self.mean.blocks(n), self.cov.blocks(n))
                    .map(|(x, m, c)| well(x, m, c, None))
                    .collect()
            },
            true => {
                x.par_chunks(n)
                    .zip(self.mean.par_chunks(n))
                    .zip(self.cov.par_chunks(n))
                    .map(|((x, m), c)| well(x, m, c, None))
                    .collect()
            },
        };
        Ok(energies.iter().sum())
    }

    fn energy_and_gradient(&self, x: &[f64], grad_out: &mut [f64]) -> Result<f64, PotentialError> {
        self.check_ndof("position", x.len())?;
        self.check_ndof("gradient", grad_out.len())?;

        let n = self.ndim;
        let energies: Vec<f64> = match self.parallel {
            false => {
                izip!(grad_out.chunks_mut(n), x.chunks(n), self.mean.blocks(n), self.cov.blocks(n))
                    .map(|(g, x, m, c)| well(x, m, c, Some(g)))
                    .collect()
            },
            true => {
                grad_out.par_chunks_mut(n)
                    .zip(x.par_chunks(n))
                    .zip(self.mean.par_chunks(n))
                    .zip(self.cov.par_chunks(n))
                    .map(|(((g, x), m), c)| well(x, m, c, Some(g)))
                    .collect()
            },
        };
        // summed in a fixed order so that both paths agree exactly
        Ok(energies.iter().sum())
    }
}

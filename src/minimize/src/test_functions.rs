/* ************************************************************************ **
** This file is part of relax, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Simple potentials with known minima, for testing the optimizer.

use relax_slice_math::{v, V, vdot, vsqnorm};

use crate::{Potential, PotentialError};

/// `V(X) = (X - P).(X - P)` for some target point `P`.
#[derive(Debug, Clone)]
pub struct Quadratic {
    target: Vec<f64>,
}

impl Quadratic {
    pub fn new(target: Vec<f64>) -> Self { Quadratic { target } }

    pub fn target(&self) -> &[f64] { &self.target }
}

impl Potential for Quadratic {
    fn ndof(&self) -> usize { self.target.len() }

    fn energy(&self, x: &[f64]) -> Result<f64, PotentialError> {
        self.check_ndof("position", x.len())?;
        Ok(vsqnorm(&(v(x) - v(&self.target))))
    }

    fn energy_and_gradient(&self, x: &[f64], grad_out: &mut [f64]) -> Result<f64, PotentialError> {
        self.check_ndof("position", x.len())?;
        self.check_ndof("gradient", grad_out.len())?;

        let V(d) = v(x) - v(&self.target);
        for (g, &d) in grad_out.iter_mut().zip(&d) {
            *g = 2.0 * d;
        }
        Ok(vsqnorm(&d))
    }
}

/// The Trid function, a convex quadratic with couplings between neighbors.
///
/// `V(X) = sum_i (1 - x_i)^2 - sum_i x_i x_{i-1}`
#[derive(Debug, Clone, Copy)]
pub struct Trid(pub usize);

impl Trid {
    pub fn min_position(&self) -> Vec<f64> {
        let d = self.0 as f64;
        (0..self.0)
            .map(|i| i as f64)
            .map(|i| (i + 1.0) * (d - i))
            .collect()
    }

    pub fn min_value(&self) -> f64 {
        let d = self.0 as f64;
        -d * (d + 4.0) * (d - 1.0) / 6.0
    }
}

impl Potential for Trid {
    fn ndof(&self) -> usize { self.0 }

    fn energy(&self, pos: &[f64]) -> Result<f64, PotentialError> {
        self.check_ndof("position", pos.len())?;

        let t1 = vsqnorm(&(1.0 - v(pos)));
        let t2 = vdot(&pos[1..], &pos[..pos.len() - 1]);
        Ok(t1 - t2)
    }

    // (1 - xi)^2
    // 1 - 2xi + xi^2
    // deriv: -2 + 2xi
    fn energy_and_gradient(&self, pos: &[f64], grad_out: &mut [f64]) -> Result<f64, PotentialError> {
        self.check_ndof("gradient", grad_out.len())?;
        let value = self.energy(pos)?;

        let V(t1) = -2.0 + 2.0 * v(pos);

        // the position vector rotated once left and right.
        let t2a = { let mut x = pos.to_vec(); x.pop(); x.insert(0, 0.0); x };
        let t2b = { let mut x = pos.to_vec(); x.remove(0); x.push(0.0); x };
        let V(out) = v(t1) - v(t2a) - v(t2b);
        grad_out.copy_from_slice(&out);
        Ok(value)
    }
}

/// A flat potential.  Zero force is an edge case for normalization.
#[derive(Debug, Clone, Copy)]
pub struct Constant(pub usize);

impl Potential for Constant {
    fn ndof(&self) -> usize { self.0 }

    fn energy(&self, x: &[f64]) -> Result<f64, PotentialError> {
        self.check_ndof("position", x.len())?;
        Ok(0.0)
    }

    fn energy_and_gradient(&self, x: &[f64], grad_out: &mut [f64]) -> Result<f64, PotentialError> {
        self.check_ndof("position", x.len())?;
        self.check_ndof("gradient", grad_out.len())?;
        grad_out.iter_mut().for_each(|g| *g = 0.0);
        Ok(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trid_min() {
        let trid = Trid(10);
        let point = trid.min_position();
        let (value, grad) = trid.diff(&point).unwrap();
        assert_close!(trid.min_value(), value);
        for x in grad {
            assert_close!(abs=1e-8, x, 0.0);
        }
    }

    #[test]
    fn analytic_gradients_match_numerical() {
        let point = [0.5, -1.25, 3.0, 2.0];

        let trid = Trid(4);
        assert_close!(
            abs=1e-7,
            trid.numerical_gradient(&point, 1e-3).unwrap(),
            trid.diff(&point).unwrap().1,
        );

        let quad = Quadratic::new(vec![1.0, 2.0, -3.0, 0.25]);
        assert_close!(
            abs=1e-7,
            quad.numerical_gradient(&point, 1e-3).unwrap(),
            quad.diff(&point).unwrap().1,
        );
    }
}

/* ************************************************************************ **
** This file is part of relax, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Local minimization of potential energy surfaces with the Fast Inertial
//! Relaxation Engine.
//!
//! ```
//! use relax::{FireOptimizer, GaussianPot, Params};
//!
//! let pot = GaussianPot::new(vec![0.0; 4], vec![1.0; 4]).unwrap();
//! let mut fire = FireOptimizer::new(&pot, &[1.0; 4], 0.1, &Params::new(1.0)).unwrap();
//! let output = fire.run(1000).unwrap();
//! assert!(output.converged);
//! assert!(fire.position().iter().all(|x| x.abs() < 1e-3));
//! ```

pub use relax_minimize as minimize;
pub use relax_potentials as potentials;
pub use relax_slice_math as slice_math;

pub use relax_minimize::{FireError, FireOptimizer, Output, Params, Potential, PotentialError, StopCondition};
pub use relax_potentials::{GaussianPot, SumGaussianPot};
pub use relax_slice_math::Coords;

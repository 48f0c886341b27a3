/* ************************************************************************ **
** This file is part of relax, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Analytic potentials implementing [`relax_minimize::Potential`].

#[macro_use] extern crate itertools;
#[cfg(test)] #[macro_use] extern crate relax_assert_close;

pub mod gaussian;

pub use crate::gaussian::{GaussianPot, SumGaussianPot};

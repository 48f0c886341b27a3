/* ************************************************************************ **
** This file is part of relax, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Local minimization of differentiable potentials by FIRE.

#[macro_use] extern crate log;
#[macro_use] extern crate serde_derive;

#[cfg(test)] #[macro_use] extern crate relax_assert_close;
#[cfg(test)] #[macro_use] extern crate relax_util_macros;

#[cfg(test)] pub(crate) mod test_functions;
pub mod potential;
pub mod stop_condition;
pub mod fire;
pub mod numerical;

pub use crate::potential::{Potential, PotentialError};
pub use crate::stop_condition::StopCondition;
pub use crate::fire::{FireError, FireOptimizer, Output, Params};

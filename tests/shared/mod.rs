/* ************************************************************************ **
** This file is part of relax, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

// Helpers shared by the integration tests.
#![allow(dead_code)]

use relax::Params;

pub fn init_logger() {
    let _ = env_logger::try_init();
}

/// Initial timestep of the Gaussian scenarios.
pub const DT0: f64 = 0.1;

/// Settings of the Gaussian scenarios (notably `alpha0 = 1`), with the given criterion.
pub fn gaussian_params(stop_condition: serde_json::Value) -> Params {
    let mut params: Params = from_json!({
        "timestep-max": 1.0,
        "max-step": 1.0,
        "damping-init": 1.0,
    });
    params.stop_condition = serde_json::from_value(stop_condition).unwrap();
    params
}

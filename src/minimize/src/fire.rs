/* ************************************************************************ **
** This file is part of relax, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

#![allow(non_snake_case)]

//! The Fast Inertial Relaxation Engine.
//!
//! Damped molecular dynamics at unit mass, with an adaptive timestep and a
//! velocity that is steered toward the force.  Every step that moves uphill
//! kills the velocity and halves (by default) the timestep.

use relax_slice_math::{v, V, vdot, vnorm, vnormalize, Coords};

use crate::potential::{Potential, PotentialError};
use crate::stop_condition::{Objectives, ShouldStop, StopCondition};

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Params {
    /// Force damping coefficient (alpha in the FIRE paper).
    #[serde(default = "params__damping_init")] pub damping_init: f64,
    /// Value less than 1 used to decrease alpha.
    #[serde(default = "params__damping_reduction")] pub damping_reduction: f64,
    /// Number of consecutive downhill steps that must elapse before the timestep may grow.
    #[serde(default = "params__speedup_latency")] pub speedup_latency: u64,
    /// Value greater than 1 used when timestep is increased.
    #[serde(default = "params__speedup_factor")] pub speedup_factor: f64,
    /// Value less than 1 used when timestep is reduced.
    #[serde(default = "params__slowdown_factor")] pub slowdown_factor: f64,
    pub timestep_max: f64,
    /// Upper bound on the norm of the displacement in a single step. `null` disables it.
    #[serde(default = "params__max_step")] pub max_step: Option<f64>,
    /// Discard the displacement of a step that turned out to move uphill.
    #[serde(default)] pub stepback: bool,
    #[serde(default = "params__stop_condition")] pub stop_condition: StopCondition,
    /// Write a line to the `info!` log every this many iterations.
    #[serde(default)] pub log_every: Option<u64>,
}

fn params__damping_init() -> f64 { 0.1 }
fn params__damping_reduction() -> f64 { 0.99 }
fn params__speedup_latency() -> u64 { 5 }
fn params__speedup_factor() -> f64 { 1.1 }
fn params__slowdown_factor() -> f64 { 0.5 }
fn params__max_step() -> Option<f64> { Some(0.5) }
fn params__stop_condition() -> StopCondition { StopCondition::grad_rms(1e-4) }

impl Params {
    pub fn new(timestep_max: f64) -> Params {
        Params {
            damping_init: params__damping_init(),
            damping_reduction: params__damping_reduction(),
            speedup_latency: params__speedup_latency(),
            speedup_factor: params__speedup_factor(),
            slowdown_factor: params__slowdown_factor(),
            timestep_max,
            max_step: params__max_step(),
            stepback: false,
            stop_condition: params__stop_condition(),
            log_every: None,
        }
    }

    /// Check the parameters for use with the initial timestep `dt0`.
    pub fn validate(&self, dt0: f64) -> Result<(), FireError> {
        fn require(ok: bool, param: &'static str, value: f64, reason: &'static str) -> Result<(), FireError> {
            match ok {
                true => Ok(()),
                false => Err(FireError::Configuration { param, value, reason }),
            }
        }

        // (written so that NaN fails every check)
        require(dt0 > 0.0 && dt0.is_finite(), "initial timestep", dt0, "must be positive and finite")?;
        require(self.timestep_max >= dt0, "timestep-max", self.timestep_max, "must be at least the initial timestep")?;
        require(0.0 <= self.damping_init && self.damping_init <= 1.0, "damping-init", self.damping_init, "must lie in [0, 1]")?;
        require(0.0 < self.damping_reduction && self.damping_reduction <= 1.0, "damping-reduction", self.damping_reduction, "must lie in (0, 1]")?;
        require(self.speedup_factor > 1.0, "speedup-factor", self.speedup_factor, "must be greater than 1")?;
        require(0.0 < self.slowdown_factor && self.slowdown_factor < 1.0, "slowdown-factor", self.slowdown_factor, "must lie in (0, 1)")?;
        if let Some(max_step) = self.max_step {
            require(max_step > 0.0, "max-step", max_step, "must be positive")?;
        }
        if let Some(tol) = self.stop_condition.invalid_tolerance() {
            require(false, "stop-condition", tol, "tolerances must be non-negative")?;
        }
        if let Some(period) = self.log_every {
            require(period > 0, "log-every", period as f64, "must be positive")?;
        }
        Ok(())
    }
}

//==================================================================================================
// Errors

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FireError {
    #[error("invalid FIRE parameter {param} = {value}: {reason}")]
    Configuration { param: &'static str, value: f64, reason: &'static str },

    #[error("error from potential: {0}")]
    Potential(#[from] PotentialError),
}

//==================================================================================================
// Primary public API

/// Summary of a call to [`FireOptimizer::run`].
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    /// Iterations performed by this call.
    pub iterations: u64,
    /// Iterations performed since construction (or the last `reset`).
    pub total_iterations: u64,
    pub converged: bool,
    pub value: f64,
    pub grad_norm: f64,
    pub grad_rms: f64,
    pub grad_max: f64,
}

/// A FIRE minimization in progress.
///
/// The potential is held by value; pass `&pot` or an `Arc` to share one potential
/// between several optimizers.  All other state is owned exclusively.
#[derive(Debug, Clone)]
pub struct FireOptimizer<P> {
    potential: P,
    params: Params,
    fsm: FireFsm,
    position: Coords,
    velocity: Coords,
    // energy and gradient at `position`
    value: f64,
    gradient: Coords,
    iterations: u64,
    num_evaluations: u64,
    converged: bool,
}

impl<P: Potential> FireOptimizer<P> {
    /// Validates the parameters, copies `initial_position`, and evaluates the potential there.
    pub fn new(
        potential: P,
        initial_position: &[f64],
        dt0: f64,
        params: &Params,
    ) -> Result<Self, FireError> {
        params.validate(dt0)?;
        let (value, gradient) = evaluate(&potential, "initial position", initial_position)?;
        Ok(FireOptimizer {
            fsm: FireFsm::new(params, dt0),
            params: params.clone(),
            position: Coords::from(initial_position),
            velocity: Coords::zeros(initial_position.len()),
            value,
            gradient,
            iterations: 0,
            num_evaluations: 1,
            converged: false,
            potential,
        })
    }

    /// Perform up to `max_iterations` iterations, stopping early on convergence.
    ///
    /// The convergence criterion is tested before each iteration, so an optimizer that
    /// starts at a minimum performs none.  Calling this again picks up where the last
    /// call left off; running out of iterations is not an error.
    pub fn run(&mut self, max_iterations: u64) -> Result<Output, FireError> {
        let mut iterations = 0;
        while !self.converged {
            if self.params.stop_condition.should_stop(&self.objectives()) {
                self.converged = true;
                self.log_finished();
                break;
            }
            if iterations == max_iterations {
                debug!(
                    "FIRE stopped after {} iterations without converging (grad rms {:e})",
                    iterations, self.grad_rms(),
                );
                break;
            }
            self.step()?;
            iterations += 1;
        }
        Ok(self.output(iterations))
    }

    /// Restart from a new position, with fresh dynamics state.
    ///
    /// The parameters are kept.  The iteration counter restarts at zero, while
    /// [`FireOptimizer::num_evaluations`] keeps counting.  On error, nothing changes.
    pub fn reset(&mut self, initial_position: &[f64], dt0: f64) -> Result<(), FireError> {
        self.params.validate(dt0)?;
        let (value, gradient) = evaluate(&self.potential, "initial position", initial_position)?;
        self.num_evaluations += 1;

        self.fsm = FireFsm::new(&self.params, dt0);
        self.position = Coords::from(initial_position);
        self.velocity = Coords::zeros(initial_position.len());
        self.value = value;
        self.gradient = gradient;
        self.iterations = 0;
        self.converged = false;
        Ok(())
    }

    /// The current position (a copy).
    pub fn position(&self) -> Coords { self.position.clone() }

    /// Evaluate the potential at an arbitrary point.  The optimizer is not affected.
    pub fn energy(&self, x: &[f64]) -> Result<f64, PotentialError> { self.potential.energy(x) }

    /// Energy at the current position.
    pub fn value(&self) -> f64 { self.value }
    /// Gradient at the current position.
    pub fn gradient(&self) -> &[f64] { &self.gradient }
    pub fn velocity(&self) -> &[f64] { &self.velocity }
    pub fn timestep(&self) -> f64 { self.fsm.timestep }
    /// The current mixing factor (alpha).
    pub fn damping(&self) -> f64 { self.fsm.damping_coeff }
    pub fn iterations(&self) -> u64 { self.iterations }
    /// Number of gradient evaluations so far, including the one at construction.
    pub fn num_evaluations(&self) -> u64 { self.num_evaluations }
    pub fn is_converged(&self) -> bool { self.converged }
    pub fn grad_rms(&self) -> f64 { self.objectives().grad_rms }
    pub fn potential(&self) -> &P { &self.potential }
    pub fn params(&self) -> &Params { &self.params }

    pub fn into_potential(self) -> P { self.potential }
}

fn evaluate<P: Potential>(
    potential: &P,
    what: &'static str,
    position: &[f64],
) -> Result<(f64, Coords), PotentialError> {
    potential.check_ndof(what, position.len())?;
    potential.diff(position)
}

//==================================================================================================

use fsm::FireFsm;
mod fsm {
    use super::Params;

    /// The adaptive part of the dynamics.
    #[derive(Debug, Clone, PartialEq)]
    pub struct FireFsm {
        pub damping_coeff: f64,
        pub timestep: f64,
        pub num_good_steps: u64,
    }

    impl FireFsm {
        pub fn new(params: &Params, dt0: f64) -> Self {
            FireFsm {
                damping_coeff: params.damping_init,
                timestep: dt0,
                num_good_steps: 0,
            }
        }

        /// Update according to the power `P = F.v` of the step just taken.
        ///
        /// Zero (and NaN) power counts as uphill.
        pub fn check_power(mut self, params: &Params, power: f64) -> FireFsm {
            if power > 0.0 {
                self.num_good_steps += 1;
                if self.num_good_steps > params.speedup_latency {
                    self.timestep = f64::min(self.timestep * params.speedup_factor, params.timestep_max);
                    self.damping_coeff *= params.damping_reduction;
                }
            } else {
                self.num_good_steps = 0;
                self.timestep *= params.slowdown_factor;
                self.damping_coeff = params.damping_init;
            }
            self
        }

        /// Valid after `check_power`.
        pub fn went_uphill(&self) -> bool { self.num_good_steps == 0 }
    }
}

impl<P: Potential> FireOptimizer<P> {
    fn objectives(&self) -> Objectives { Objectives::from_gradient(&self.gradient) }

    fn output(&self, iterations: u64) -> Output {
        let Objectives { grad_norm, grad_rms, grad_max } = self.objectives();
        Output {
            iterations,
            total_iterations: self.iterations,
            converged: self.converged,
            value: self.value,
            grad_norm,
            grad_rms,
            grad_max,
        }
    }

    #[inline(never)]
    fn step(&mut self) -> Result<(), FireError> {
        let params = &self.params;
        let timestep = self.fsm.timestep;

        // Semi-implicit Euler: kick, then drift with the new velocity.
        let mut velocity = self.velocity.clone().into_vec();
        v(&mut velocity).add_scaled(-timestep, &self.gradient);
        let V(mut displacement) = timestep * v(&velocity);
        if let Some(max_step) = params.max_step {
            let norm = vnorm(&displacement);
            if norm > max_step {
                v(&mut displacement).scale(max_step / norm);
            }
        }

        // Power, from the force at the start of the step.
        let power = -vdot(&self.gradient, &velocity);
        let fsm = self.fsm.clone().check_power(params, power);
        let uphill = fsm.went_uphill();
        if uphill {
            trace!(
                "FIRE: uphill at iteration {} (P = {:e}); timestep -> {:e}",
                self.iterations, power, fsm.timestep,
            );
            v(&mut velocity).fill(0.0);
        }

        // Steer toward steepest descent.
        if let Ok(V(grad_unit)) = vnormalize(&self.gradient) {
            let speed = vnorm(&velocity);
            velocity = {
                (1.0 - fsm.damping_coeff) * v(velocity)
                - (fsm.damping_coeff * speed) * v(&grad_unit)
            }.0;
        }

        let prev_value = self.value;
        if !(uphill && params.stepback) {
            let V(position) = v(&self.position) + v(&displacement);
            let (value, gradient) = evaluate(&self.potential, "position", &position)?;
            self.num_evaluations += 1;
            self.position = position.into();
            self.value = value;
            self.gradient = gradient;
        }
        self.velocity = velocity.into();
        self.fsm = fsm;
        self.iterations += 1;

        if let Some(period) = self.params.log_every {
            if self.iterations % period == 0 {
                info!(
                    " i: {i:>6}  v: {v:18.14} dv: {dv:+8.2e}  g: {g:>12.7e}  dt: {dt:>9.3e}  a: {a:>9.3e}",
                    i = self.iterations,
                    v = self.value,
                    dv = self.value - prev_value,
                    g = vnorm(&self.gradient),
                    dt = self.fsm.timestep,
                    a = self.fsm.damping_coeff,
                );
            }
        }
        Ok(())
    }

    fn log_finished(&self) {
        let Objectives { grad_norm, grad_max, .. } = self.objectives();
        info!("FIRE Finished.");
        info!("Iterations: {}", self.iterations);
        info!("     Value: {}", self.value);
        info!(" Grad Norm: {:e}", grad_norm);
        info!("  Grad Max: {:e}", grad_max);
    }
}

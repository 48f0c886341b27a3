/* ************************************************************************ **
** This file is part of relax, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

#[macro_use] extern crate relax_assert_close;
#[macro_use] extern crate relax_util_macros;

use std::sync::Arc;
use std::thread;

use serde_json::json;

use relax::{Coords, FireOptimizer, GaussianPot, Potential, SumGaussianPot};

mod shared;
use self::shared::{gaussian_params, init_logger, DT0};

#[test]
fn isotropic_gaussian() {
    init_logger();
    let pot = GaussianPot::new(vec![0.0; 4], vec![1.0; 4]).unwrap();
    let params = gaussian_params(json!({"grad-rms": 1e-6}));
    let mut fire = FireOptimizer::new(&pot, &[1.0; 4], DT0, &params).unwrap();

    let output = fire.run(1000).unwrap();
    assert!(output.converged);
    assert_close!(abs=1e-4, fire.position(), vec![0.0; 4]);
    assert_close!(abs=1e-6, fire.energy(&fire.position()).unwrap(), -1.0);
    assert_close!(abs=1e-6, output.value, -1.0);
}

#[test]
fn shifted_gaussian() {
    init_logger();
    let pot = GaussianPot::new(vec![10.0; 4], vec![1.0; 4]).unwrap();
    let params = gaussian_params(json!({"grad-rms": 1e-6}));
    let mut fire = FireOptimizer::new(&pot, &[9.0; 4], DT0, &params).unwrap();

    let output = fire.run(1000).unwrap();
    assert!(output.converged);
    assert_close!(abs=1e-4, fire.position(), vec![10.0; 4]);
    assert_close!(abs=1e-6, output.value, -1.0);
}

// Both blocks sit in their own well, so the full minimum is found.
#[test]
fn shifted_sum_of_gaussians() {
    init_logger();
    let pot = SumGaussianPot::new(2, vec![10.0; 4], vec![1.0; 4]).unwrap();
    let params = gaussian_params(json!({"grad-rms": 1e-6}));
    let mut fire = FireOptimizer::new(&pot, &[9.0; 4], DT0, &params).unwrap();

    let output = fire.run(1000).unwrap();
    assert!(output.converged);
    assert_close!(abs=1e-4, fire.position(), vec![10.0; 4]);
    assert_close!(abs=1e-6, fire.energy(&fire.position()).unwrap(), -2.0);
    assert_close!(abs=1e-6, pot.energy(pot.mean()).unwrap(), -2.0);

    let mut grad = vec![42.0; 4];
    pot.energy_and_gradient(pot.mean(), &mut grad).unwrap();
    assert_eq!(grad, vec![0.0; 4]);
}

// The first well is so far away that its force vanishes; only the second is found.
#[test]
fn anisotropic_sum_of_gaussians() {
    init_logger();
    let pot = SumGaussianPot::new(2, vec![0.0, 0.0, 10.0, 10.0], vec![2.0, 2.0, 1.0, 1.0]).unwrap();
    let params = gaussian_params(json!({"grad-norm": 1e-10}));
    let mut fire = FireOptimizer::new(&pot, &[9.0; 4], DT0, &params).unwrap();

    let output = fire.run(1000).unwrap();
    assert!(output.converged);
    assert!(output.grad_norm <= 1e-10);

    let position = fire.position();
    assert_close!(abs=1e-3, position.copy_range(2..4), vec![10.0, 10.0]);
    assert_close!(abs=1e-3, position.copy_range(0..2), vec![9.0, 9.0]);
    assert_close!(abs=1e-3, output.value, -1.0);
}

#[test]
fn anisotropic_sum_of_gaussians_from_inside_both_wells() {
    init_logger();
    let pot = SumGaussianPot::new(2, vec![0.0, 0.0, 10.0, 10.0], vec![2.0, 2.0, 1.0, 1.0]).unwrap();
    let params = gaussian_params(json!({"grad-norm": 1e-10}));
    let mut fire = FireOptimizer::new(&pot, &[1.0, 1.0, 9.0, 9.0], DT0, &params).unwrap();

    let output = fire.run(10_000).unwrap();
    assert!(output.converged);
    assert_close!(abs=1e-3, fire.position(), vec![0.0, 0.0, 10.0, 10.0]);
    assert_close!(abs=1e-3, output.value, -2.0);
}

// A large ratio of covariances slows convergence along the shallow axis.
#[test]
fn strongly_anisotropic_gaussian() {
    init_logger();
    let pot = GaussianPot::new(vec![0.0, 0.0], vec![10.0, 0.1]).unwrap();
    let params = relax::Params {
        stop_condition: from_json!({"grad-rms": 1e-8}),
        log_every: Some(100),
        ..relax::Params::new(1.0)
    };
    let mut fire = FireOptimizer::new(&pot, &[1.0, 0.3], DT0, &params).unwrap();
    let initial_value = fire.value();

    let output = fire.run(5000).unwrap();
    assert!(output.converged);
    assert!(output.value < initial_value);
    assert_close!(abs=1e-6, fire.position(), vec![0.0, 0.0]);
}

#[test]
fn idempotent_queries() {
    let pot = GaussianPot::new(vec![0.0; 4], vec![1.0; 4]).unwrap();
    let params = gaussian_params(json!({"grad-rms": 1e-6}));
    let mut fire = FireOptimizer::new(&pot, &[0.5, -0.3, 0.2, 0.4], DT0, &params).unwrap();
    let output = fire.run(7).unwrap();
    assert!(!output.converged);
    assert_eq!(output.iterations, 7);

    let first = fire.position();
    let velocity = fire.velocity().to_vec();
    assert_eq!(first, fire.position());

    let output = fire.run(0).unwrap();
    assert_eq!(output.iterations, 0);
    assert_eq!(output.total_iterations, 7);
    assert_eq!(fire.position(), first);
    assert_eq!(fire.velocity(), &velocity[..]);
    assert_eq!(fire.iterations(), 7);

    // the returned position is a copy
    let mut copy = fire.position();
    copy[0] = 100.0;
    assert_eq!(fire.position(), first);
}

#[test]
fn deterministic_trajectories() {
    let pot = SumGaussianPot::new(2, vec![0.0, 0.0, 10.0, 10.0], vec![2.0, 2.0, 1.0, 1.0]).unwrap();
    let params = gaussian_params(json!({"grad-norm": 1e-10}));
    let start = [0.5, -1.0, 9.0, 9.5];

    let mut a = FireOptimizer::new(&pot, &start, DT0, &params).unwrap();
    let mut b = FireOptimizer::new(pot.clone().parallel(true), &start, DT0, &params).unwrap();
    for _ in 0..200 {
        a.run(1).unwrap();
        b.run(1).unwrap();
        assert_eq!(a.position(), b.position());
        assert_eq!(a.velocity(), b.velocity());
        assert_eq!(a.timestep(), b.timestep());
        assert_eq!(a.damping(), b.damping());
        assert_eq!(a.is_converged(), b.is_converged());
    }
}

// One potential, many optimizers.
#[test]
fn shared_potential() {
    let pot = Arc::new(SumGaussianPot::new(2, vec![1.0, -1.0, 3.0, 2.0], vec![1.0; 4]).unwrap());
    let params = gaussian_params(json!({"grad-rms": 1e-6}));

    let handles: Vec<_> = (0..4).map(|i| {
        let pot = Arc::clone(&pot);
        let params = params.clone();
        thread::spawn(move || {
            let offset = 0.25 * (i + 1) as f64;
            let start: Coords = pot.mean().iter().map(|&m| m + offset).collect();
            let mut fire = FireOptimizer::new(pot, &start, DT0, &params).unwrap();
            assert!(fire.run(1000).unwrap().converged);
            fire.position()
        })
    }).collect();

    for handle in handles {
        let position = handle.join().unwrap();
        assert_close!(abs=1e-4, position, pot.mean().to_vec());
    }
    assert_eq!(Arc::strong_count(&pot), 1);
    assert_close!(abs=1e-12, pot.energy(pot.mean()).unwrap(), -2.0);
}

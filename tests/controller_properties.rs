//! Behavioural properties of the iteration controller.
//!
//! Covers terminal-status latching, cancellation priority, reset semantics, the residual and
//! iteration-budget boundaries, verdict priority resolution and precondition handling.

use kstop::{
    CalculationStatus, DivergenceCriterion, IterationController, IterationCountCriterion,
    IteratorOptions, NumericFailureCriterion, ResidualNormCriterion, StopCriterion,
};
use num_complex::Complex64;
use rand::Rng;
use std::thread;
use std::time::Duration;

fn controller(rel: f64, max_iterations: usize) -> IterationController<Vec<f64>> {
    let options = IteratorOptions::default()
        .with_relative_tolerance(rel)
        .with_absolute_tolerance(0.0)
        .with_max_iterations(max_iterations);
    IterationController::from_options(&options).unwrap()
}

/// Feed `norms` as one-entry residuals against a unit right-hand side.
fn run(ctl: &mut IterationController<Vec<f64>>, norms: &[f64]) -> Vec<CalculationStatus> {
    let x = vec![0.0];
    let b = vec![1.0];
    norms
        .iter()
        .enumerate()
        .map(|(i, &n)| ctl.evaluate(i, &x, &b, &vec![n]))
        .collect()
}

#[test]
fn residual_sequence_converges_on_third_step() {
    let mut ctl = controller(1e-6, 100);
    assert_eq!(
        run(&mut ctl, &[1.0, 0.1, 1e-7]),
        vec![CalculationStatus::Running, CalculationStatus::Running, CalculationStatus::Converged]
    );
    assert_eq!(ctl.status(), CalculationStatus::Converged);
}

#[test]
fn iteration_budget_boundary() {
    let mut ctl = controller(1e-12, 50);
    let x = vec![0.0];
    let b = vec![1.0];
    let r = vec![0.5];
    assert_eq!(ctl.evaluate(49, &x, &b, &r), CalculationStatus::Running);
    assert_eq!(ctl.evaluate(50, &x, &b, &r), CalculationStatus::Diverged);
}

#[test]
fn terminal_status_is_latched() {
    let mut ctl = controller(1e-6, 100);
    run(&mut ctl, &[1.0, 1e-9]);
    assert_eq!(ctl.status(), CalculationStatus::Converged);

    // NaN, growth, exhausted budget and mismatched dimensions cannot overwrite it
    let x = vec![0.0];
    let b = vec![1.0];
    assert_eq!(ctl.evaluate(2, &x, &b, &vec![f64::NAN]), CalculationStatus::Converged);
    assert_eq!(ctl.evaluate(3, &x, &b, &vec![1e12]), CalculationStatus::Converged);
    assert_eq!(ctl.evaluate(500, &x, &b, &vec![1.0]), CalculationStatus::Converged);
    assert_eq!(ctl.evaluate(4, &x, &vec![1.0, 2.0], &vec![1.0]), CalculationStatus::Converged);
}

#[test]
fn cancellation_overrides_any_verdict() {
    let mut rng = rand::thread_rng();
    for _ in 0..20 {
        let mut ctl = controller(1e-6, 100);
        let steps = rng.gen_range(0..10);
        let norms: Vec<f64> = (0..steps).map(|_| rng.gen_range(1e-9..10.0)).collect();
        run(&mut ctl, &norms);
        ctl.iteration_cancelled();
        assert_eq!(ctl.status(), CalculationStatus::Cancelled);
        // a residual that would converge does not undo the cancellation
        assert_eq!(run(&mut ctl, &[0.0]), vec![CalculationStatus::Cancelled]);
        assert_eq!(ctl.status(), CalculationStatus::Cancelled);
    }
}

#[test]
fn reset_reproduces_fresh_outcome() {
    let norms = [2.0, 1.0, 0.5, 1e-3, 1e-8, 1e-10];
    let mut fresh = controller(1e-7, 100);
    let expected = run(&mut fresh, &norms);

    let mut reused = controller(1e-7, 100);
    // a different right-hand side would leave a different r0 behind if reset kept it
    let x = vec![0.0];
    reused.evaluate(0, &x, &vec![1e6], &vec![1.0]);
    reused.iteration_cancelled();
    reused.reset_to_precalculation_state();
    assert_eq!(reused.status(), CalculationStatus::Running);
    assert_eq!(run(&mut reused, &norms), expected);
}

#[test]
fn reset_keeps_configuration() {
    let mut ctl = controller(1e-6, 7);
    run(&mut ctl, &[1.0, 0.5]);
    ctl.reset_to_precalculation_state();
    for c in ctl.criteria() {
        match c {
            StopCriterion::IterationCount(c) => assert_eq!(c.max_iterations(), 7),
            StopCriterion::ResidualNorm(c) => {
                assert_eq!(c.relative_tolerance(), 1e-6);
                assert!(c.baseline().is_none());
            }
            StopCriterion::Divergence(c) => assert_eq!(c.history().count(), 0),
            _ => {}
        }
        assert_eq!(c.status(), CalculationStatus::Running);
    }
}

#[test]
fn failure_outranks_convergence() {
    // residual is tiny (residual-norm says Converged) but the solution holds a NaN
    let mut ctl: IterationController<Vec<f64>> = IterationController::new(vec![
        ResidualNormCriterion::new(1e-6, 0.0).unwrap().into(),
        NumericFailureCriterion::new().into(),
    ]);
    let x = vec![f64::NAN, 1.0];
    let b = vec![1.0, 1.0];
    let r = vec![0.0, 0.0];
    assert_eq!(ctl.evaluate(1, &x, &b, &r), CalculationStatus::Failure);
}

#[test]
fn dimension_mismatch_fails_without_touching_criteria() {
    let mut ctl = controller(1e-6, 100);
    let x = vec![0.0, 0.0];
    let b = vec![1.0, 1.0];
    let r = vec![1.0];
    assert_eq!(ctl.evaluate(0, &x, &b, &r), CalculationStatus::Failure);
    for c in ctl.criteria() {
        assert_eq!(c.status(), CalculationStatus::Running);
        match c {
            StopCriterion::ResidualNorm(c) => assert!(c.baseline().is_none()),
            StopCriterion::Divergence(c) => assert_eq!(c.history().count(), 0),
            _ => {}
        }
    }

    let empty: Vec<f64> = Vec::new();
    let mut ctl = controller(1e-6, 100);
    assert_eq!(ctl.evaluate(0, &empty, &empty, &empty), CalculationStatus::Failure);
}

#[test]
fn empty_criterion_set_is_indeterminate() {
    let mut ctl: IterationController<Vec<f64>> = IterationController::new(Vec::new());
    assert_eq!(ctl.status(), CalculationStatus::Running);
    assert_eq!(run(&mut ctl, &[1.0]), vec![CalculationStatus::Indeterminate]);
}

#[test]
fn sustained_growth_diverges() {
    let mut ctl: IterationController<Vec<f64>> = IterationController::new(vec![
        DivergenceCriterion::new(10.0, 5, 2).unwrap().into(),
        IterationCountCriterion::new(100).unwrap().into(),
    ]);
    assert_eq!(
        run(&mut ctl, &[1.0, 50.0, 0.9, 80.0, 900.0]),
        vec![
            CalculationStatus::Running,
            CalculationStatus::Running,
            CalculationStatus::Running,
            CalculationStatus::Running,
            CalculationStatus::Diverged,
        ]
    );
}

#[test]
fn overflowing_residual_norm_diverges_instead_of_failing() {
    let mut ctl: IterationController<Vec<f64>> = IterationController::new(vec![
        DivergenceCriterion::new(10.0, 4, 2).unwrap().into(),
        NumericFailureCriterion::new().into(),
    ]);
    let x = vec![0.0, 0.0];
    let b = vec![1.0, 1.0];
    let statuses: Vec<_> = [1.0, 1e100, 1e200]
        .iter()
        .enumerate()
        .map(|(i, &n)| ctl.evaluate(i, &x, &b, &vec![n, n]))
        .collect();
    assert_eq!(
        statuses,
        vec![CalculationStatus::Running, CalculationStatus::Running, CalculationStatus::Diverged]
    );
    assert!(ctl.last_stats().final_residual.is_finite());
}

#[test]
fn infinite_source_is_failure() {
    let mut ctl = controller(1e-6, 100);
    let x = vec![0.0];
    let b = vec![f64::INFINITY];
    assert_eq!(ctl.evaluate(0, &x, &b, &vec![1.0]), CalculationStatus::Failure);
}

#[test]
fn complex_residuals_converge() {
    let options = IteratorOptions::default().with_relative_tolerance(1e-3);
    let mut ctl = IterationController::<Vec<Complex64>>::from_options(&options).unwrap();
    let x = vec![Complex64::new(0.0, 0.0); 2];
    let b = vec![Complex64::new(0.0, 3.0), Complex64::new(4.0, 0.0)];
    let big = vec![Complex64::new(1.0, 1.0), Complex64::new(0.0, 0.0)];
    let small = vec![Complex64::new(1e-3, -1e-3), Complex64::new(0.0, 1e-3)];
    assert_eq!(ctl.evaluate(0, &x, &b, &big), CalculationStatus::Running);
    assert_eq!(ctl.evaluate(1, &x, &b, &small), CalculationStatus::Converged);
}

#[test]
fn timeout_is_a_criterion() {
    let options = IteratorOptions::default().with_timeout(Duration::from_millis(10));
    let mut ctl = IterationController::<Vec<f64>>::from_options(&options).unwrap();
    assert_eq!(ctl.criteria().len(), 5);
    assert_eq!(run(&mut ctl, &[1.0]), vec![CalculationStatus::Running]);
    thread::sleep(Duration::from_millis(30));
    let x = vec![0.0];
    let b = vec![1.0];
    assert_eq!(ctl.evaluate(1, &x, &b, &vec![1.0]), CalculationStatus::Diverged);
}

#[test]
fn cancellation_from_another_thread_is_never_lost() {
    let mut ctl = controller(1e-12, usize::MAX);
    let handle = ctl.cancel_handle();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(5));
        handle.cancel();
    });
    let x = vec![0.0; 256];
    let b = vec![1.0; 256];
    let r = vec![0.5; 256];
    let mut i = 0;
    while !ctl.evaluate(i, &x, &b, &r).is_terminal() {
        i += 1;
    }
    canceller.join().unwrap();
    assert_eq!(ctl.status(), CalculationStatus::Cancelled);
    assert!(ctl.criteria().iter().all(|c| c.status() == CalculationStatus::Cancelled));
}

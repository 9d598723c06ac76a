//! Long-run behaviour of the two-state chain.

use crate::model::{CompartmentOrder, ModelParameters, TransitionMatrix, TransitionModel};
use crate::solvers::DiscreteMap;
use crate::traits::Steppable;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Steady-state and convergence figures for one parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSummary {
    pub steady_infected: f64,
    pub steady_healthy: f64,
    /// The non-trivial eigenvalue `1 - p - r`; the other one is always 1.
    pub second_eigenvalue: f64,
    /// `None` when the chain never settles (|λ₂| = 1 away from the fixed point).
    pub days_to_steady_state: Option<u32>,
}

/// Stationary distribution `(r, p) / (p + r)` in slot order.
///
/// Returns `None` when `p + r == 0`: the identity matrix leaves every distribution fixed.
pub fn stationary_distribution(p: f64, r: f64) -> Option<[f64; 2]> {
    let rate = p + r;
    if rate == 0.0 {
        return None;
    }
    Some([r / rate, p / rate])
}

pub fn eigenvalues(p: f64, r: f64) -> [f64; 2] {
    [1.0, 1.0 - p - r]
}

/// Slot populations the chain converges to from `initial`.
pub fn steady_state(p: f64, r: f64, initial: [f64; 2]) -> [f64; 2] {
    let total = initial[0] + initial[1];
    match stationary_distribution(p, r) {
        Some([a, b]) => [total * a, total * b],
        None => initial,
    }
}

/// Smallest day on which both slots are within `epsilon` of the steady state.
///
/// The slot-A error shrinks as `|λ₂|^d * |a0 - a*|`, and conservation makes the slot-B
/// error identical.
pub fn days_to_within(p: f64, r: f64, initial: [f64; 2], epsilon: f64) -> Result<Option<u32>> {
    if !epsilon.is_finite() || epsilon <= 0.0 {
        bail!("epsilon must be positive and finite.");
    }

    let target = steady_state(p, r, initial);
    let error0 = (initial[0] - target[0]).abs();
    if error0 <= epsilon {
        return Ok(Some(0));
    }

    let lambda = eigenvalues(p, r)[1].abs();
    if lambda >= 1.0 {
        return Ok(None);
    }
    if lambda == 0.0 {
        return Ok(Some(1));
    }

    let estimate = ((epsilon / error0).ln() / lambda.ln()).ceil().max(1.0);
    if estimate >= f64::from(u32::MAX) {
        return Ok(None);
    }
    let mut day = estimate as u32;
    // Nudge past rounding in the logarithms.
    while day > 1 && error0 * lambda.powf(f64::from(day - 1)) <= epsilon {
        day -= 1;
    }
    while error0 * lambda.powf(f64::from(day)) > epsilon {
        day = match day.checked_add(1) {
            Some(next) => next,
            None => return Ok(None),
        };
    }
    Ok(Some(day))
}

pub fn summarize(
    model: &TransitionModel,
    params: &ModelParameters,
    epsilon: f64,
) -> Result<ChainSummary> {
    let p = params.infection_probability;
    let r = params.recovery_probability;
    let initial = model.order.to_slots(
        f64::from(params.initial_infected),
        f64::from(params.initial_healthy),
    );
    let (steady_infected, steady_healthy) = model.order.from_slots(steady_state(p, r, initial));
    Ok(ChainSummary {
        steady_infected,
        steady_healthy,
        second_eigenvalue: eigenvalues(p, r)[1],
        days_to_steady_state: days_to_within(p, r, initial, epsilon)?,
    })
}

/// Iterates the state vector one day at a time, returning slot vectors for days `0..=days`.
///
/// This accumulates floating-point error day by day; it exists to measure drift against
/// the closed-form `TransitionModel`.
pub fn stepwise_trajectory(order: CompartmentOrder, params: &ModelParameters) -> Vec<[f64; 2]> {
    let transition = TransitionMatrix::from_parameters(params);
    let mut stepper = DiscreteMap::new(2);
    let initial = order.to_slots(
        f64::from(params.initial_infected),
        f64::from(params.initial_healthy),
    );
    let mut state = initial;
    let mut day = 0u32;
    let mut trajectory = Vec::with_capacity((params.days as usize).saturating_add(1));
    trajectory.push(state);
    while day < params.days {
        stepper.step(&transition, &mut day, &mut state);
        trajectory.push(state);
    }
    trajectory
}

/// Largest absolute gap between the closed form and day-by-day iteration.
pub fn stepwise_drift(model: &TransitionModel, params: &ModelParameters) -> Result<f64> {
    let closed = model.states(params)?;
    let stepped = stepwise_trajectory(model.order, params);
    let mut drift = 0.0f64;
    for (state, slots) in closed.iter().zip(stepped) {
        let (infected, recovered) = model.order.from_slots(slots);
        drift = drift
            .max((state.infected - infected).abs())
            .max((state.recovered - recovered).abs());
    }
    Ok(drift)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_err_contains<T: std::fmt::Debug>(result: anyhow::Result<T>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    #[test]
    fn stationary_distribution_balances_flows() {
        let [a, b] = stationary_distribution(0.03, 0.05).expect("distribution");
        assert!((a - 0.625).abs() < 1e-12);
        assert!((b - 0.375).abs() < 1e-12);
        // Flow out of A equals flow into A.
        assert!((a * 0.03 - b * 0.05).abs() < 1e-12);
        assert!(stationary_distribution(0.0, 0.0).is_none());
    }

    #[test]
    fn steady_state_is_fixed_point_of_transition() {
        let target = steady_state(0.2, 0.3, [10.0, 90.0]);
        let next = TransitionMatrix::from_probabilities(0.2, 0.3)
            .matrix()
            .left_apply(target);
        assert!((next[0] - target[0]).abs() < 1e-9);
        assert!((next[1] - target[1]).abs() < 1e-9);
    }

    #[test]
    fn days_to_within_matches_closed_form_states() {
        let model = TransitionModel::default();
        let params = ModelParameters {
            infection_probability: 0.1,
            recovery_probability: 0.2,
            initial_infected: 100,
            initial_healthy: 0,
            days: 64,
        };
        let initial = [100.0, 0.0];
        let target = steady_state(0.1, 0.2, initial);
        let day = days_to_within(0.1, 0.2, initial, 0.5)
            .expect("valid epsilon")
            .expect("converges");
        let states = model.states(&params).expect("states");
        assert!((states[day as usize].infected - target[0]).abs() <= 0.5 + 1e-9);
        assert!((states[day as usize - 1].infected - target[0]).abs() > 0.5);
    }

    #[test]
    fn days_to_within_edge_cases() {
        assert_eq!(days_to_within(0.0, 0.0, [3.0, 7.0], 0.1).unwrap(), Some(0));
        assert_eq!(days_to_within(0.5, 0.5, [0.0, 10.0], 0.1).unwrap(), Some(1));
        assert_eq!(days_to_within(1.0, 1.0, [0.0, 10.0], 0.1).unwrap(), None);
        assert_eq!(days_to_within(1.0, 1.0, [5.0, 5.0], 0.1).unwrap(), Some(0));
        assert_err_contains(days_to_within(0.1, 0.1, [1.0, 1.0], 0.0), "epsilon");
    }

    #[test]
    fn summarize_labels_follow_compartment_order() {
        let params = ModelParameters {
            infection_probability: 0.03,
            recovery_probability: 0.05,
            initial_infected: 1,
            initial_healthy: 100,
            days: 32,
        };
        let infected_first = summarize(&TransitionModel::default(), &params, 0.1).expect("summary");
        assert!((infected_first.steady_infected - 101.0 * 0.625).abs() < 1e-9);
        assert!((infected_first.second_eigenvalue - 0.92).abs() < 1e-12);

        let healthy_first = summarize(
            &TransitionModel::new(CompartmentOrder::HealthyFirst, 0.1),
            &params,
            0.1,
        )
        .expect("summary");
        assert!((healthy_first.steady_healthy - 101.0 * 0.625).abs() < 1e-9);
        assert!((healthy_first.steady_infected - 101.0 * 0.375).abs() < 1e-9);
    }

    #[test]
    fn stepwise_iteration_agrees_with_matrix_power() {
        let params = ModelParameters {
            infection_probability: 0.37,
            recovery_probability: 0.11,
            initial_infected: 42,
            initial_healthy: 58,
            days: 32,
        };
        let model = TransitionModel::default();
        assert_eq!(stepwise_trajectory(model.order, &params).len(), 33);
        let drift = stepwise_drift(&model, &params).expect("drift");
        assert!(drift < 1e-9, "drift = {drift}");
    }
}

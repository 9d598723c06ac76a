//! Stateless access to the transition model.

use anyhow::{bail, Result};
use epichain_core::analysis::summarize;
use epichain_core::config::MAX_DAYS;
use epichain_core::model::{ModelParameters, TransitionModel};
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

fn parameters(
    infection_probability: f64,
    recovery_probability: f64,
    initial_infected: u32,
    initial_healthy: u32,
    days: u32,
) -> ModelParameters {
    ModelParameters {
        infection_probability,
        recovery_probability,
        initial_infected,
        initial_healthy,
        days,
    }
}

fn check_days(days: u32) -> Result<()> {
    if days > MAX_DAYS {
        bail!("days ({}) exceeds the maximum of {}.", days, MAX_DAYS);
    }
    Ok(())
}

/// Expected `{ day, infected, recovered }` on `day`.
#[wasm_bindgen]
pub fn state_at_day(
    infection_probability: f64,
    recovery_probability: f64,
    initial_infected: u32,
    initial_healthy: u32,
    day: u32,
) -> Result<JsValue, JsValue> {
    let params = parameters(
        infection_probability,
        recovery_probability,
        initial_infected,
        initial_healthy,
        day,
    );
    let state = TransitionModel::default()
        .state_at_day(&params, day)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_value(&state).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Array of day states for days `0..=days`; `days` may not exceed `MAX_DAYS`.
#[wasm_bindgen]
pub fn day_sequence(
    infection_probability: f64,
    recovery_probability: f64,
    initial_infected: u32,
    initial_healthy: u32,
    days: u32,
) -> Result<JsValue, JsValue> {
    check_days(days).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let params = parameters(
        infection_probability,
        recovery_probability,
        initial_infected,
        initial_healthy,
        days,
    );
    let states = TransitionModel::default()
        .states(&params)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_value(&states).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Steady state, second eigenvalue and days until within `epsilon` of the steady state.
#[wasm_bindgen]
pub fn chain_summary(
    infection_probability: f64,
    recovery_probability: f64,
    initial_infected: u32,
    initial_healthy: u32,
    epsilon: f64,
) -> Result<JsValue, JsValue> {
    let params = parameters(
        infection_probability,
        recovery_probability,
        initial_infected,
        initial_healthy,
        0,
    );
    let summary = summarize(&TransitionModel::default(), &params, epsilon)
        .map_err(|e| JsValue::from_str(&format!("Chain summary failed: {}", e)))?;
    to_value(&summary).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_keeps_argument_order() {
        let params = parameters(0.1, 0.2, 3, 4, 5);
        assert_eq!(params.infection_probability, 0.1);
        assert_eq!(params.recovery_probability, 0.2);
        assert_eq!(params.initial_infected, 3);
        assert_eq!(params.initial_healthy, 4);
        assert_eq!(params.days, 5);
    }

    #[test]
    fn check_days_caps_sequence_length() {
        assert!(check_days(0).is_ok());
        assert!(check_days(MAX_DAYS).is_ok());
        let err = check_days(MAX_DAYS + 1).expect_err("expected error");
        assert!(err.to_string().contains("exceeds"), "{err}");
        assert!(check_days(u32::MAX).is_err());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::{chain_summary, day_sequence, state_at_day};
    use epichain_core::config::MAX_DAYS;
    use epichain_core::DayState;
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn state_at_day_serializes_first_day() {
        let value = state_at_day(0.03, 0.05, 1, 100, 1).expect("state");
        let state: DayState = from_value(value).expect("deserialize");
        assert_eq!(state.day, 1);
        assert!((state.infected - 5.97).abs() < 1e-9);
        assert!((state.recovered - 95.03).abs() < 1e-9);
    }

    #[wasm_bindgen_test]
    fn day_sequence_has_one_entry_per_day() {
        let value = day_sequence(0.5, 0.5, 0, 100, 4).expect("sequence");
        let states: Vec<DayState> = from_value(value).expect("deserialize");
        assert_eq!(states.len(), 5);
        assert!((states[4].infected - 50.0).abs() < 1e-9);
    }

    #[wasm_bindgen_test]
    fn day_sequence_rejects_days_past_maximum() {
        assert!(day_sequence(0.1, 0.1, 1, 1, MAX_DAYS).is_ok());
        assert!(day_sequence(0.1, 0.1, 1, 1, MAX_DAYS + 1).is_err());
        assert!(day_sequence(0.1, 0.1, 1, 1, u32::MAX).is_err());
    }

    #[wasm_bindgen_test]
    fn chain_summary_rejects_bad_epsilon() {
        assert!(chain_summary(0.1, 0.1, 1, 1, 0.5).is_ok());
        assert!(chain_summary(0.1, 0.1, 1, 1, -1.0).is_err());
    }
}

use crate::model::{
    CompartmentOrder, ModelParameters, TransitionModel, DEFAULT_CONSERVATION_TOLERANCE,
};
use crate::widget::Control;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const MAX_DAYS: u32 = 32;
pub const MAX_POPULATION: u32 = 100;

/// Range of a single slider: `min..=max` in increments of `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ControlBounds {
    /// Snaps `value` to the nearest step and clamps it into range, like a browser range input.
    pub fn snap(&self, value: f64) -> f64 {
        let steps = ((value - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub max_days: u32,
    pub max_population: u32,
    pub probability_step: f64,
    pub tolerance: f64,
    pub order: CompartmentOrder,
    /// Distance from the steady state that counts as "settled" in chain summaries.
    pub steady_state_epsilon: f64,
    pub initial: ModelParameters,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            max_days: MAX_DAYS,
            max_population: MAX_POPULATION,
            probability_step: 0.01,
            tolerance: DEFAULT_CONSERVATION_TOLERANCE,
            order: CompartmentOrder::default(),
            steady_state_epsilon: 0.5,
            initial: ModelParameters::default(),
        }
    }
}

impl WidgetConfig {
    /// Parses a (possibly partial) JSON config; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: WidgetConfig =
            serde_json::from_str(text).context("Failed to parse widget config JSON.")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            bail!("tolerance must be positive and finite.");
        }
        if !(self.probability_step > 0.0 && self.probability_step <= 1.0) {
            bail!("probability_step must lie in (0, 1].");
        }
        if !self.steady_state_epsilon.is_finite() || self.steady_state_epsilon <= 0.0 {
            bail!("steady_state_epsilon must be positive and finite.");
        }

        let initial = &self.initial;
        for (name, value) in [
            ("infection_probability", initial.infection_probability),
            ("recovery_probability", initial.recovery_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("Initial {} ({}) must lie in [0, 1].", name, value);
            }
        }
        if initial.initial_infected > self.max_population {
            bail!(
                "Initial infected count ({}) exceeds max_population ({}).",
                initial.initial_infected,
                self.max_population
            );
        }
        if initial.initial_healthy > self.max_population {
            bail!(
                "Initial healthy count ({}) exceeds max_population ({}).",
                initial.initial_healthy,
                self.max_population
            );
        }
        if initial.days > self.max_days {
            bail!(
                "Initial days ({}) exceeds max_days ({}).",
                initial.days,
                self.max_days
            );
        }
        Ok(())
    }

    pub fn bounds(&self, control: Control) -> ControlBounds {
        match control {
            Control::InfectionProbability | Control::RecoveryProbability => ControlBounds {
                min: 0.0,
                max: 1.0,
                step: self.probability_step,
            },
            Control::InitialInfected | Control::InitialHealthy => ControlBounds {
                min: 0.0,
                max: f64::from(self.max_population),
                step: 1.0,
            },
            Control::Days => ControlBounds {
                min: 0.0,
                max: f64::from(self.max_days),
                step: 1.0,
            },
        }
    }

    pub fn model(&self) -> TransitionModel {
        TransitionModel::new(self.order, self.tolerance)
    }
}

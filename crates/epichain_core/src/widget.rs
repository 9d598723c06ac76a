//! Presentation state for the widget.
//!
//! `Widget` owns the slider values. Every input event updates exactly one field and then
//! calls `refresh`, which recomputes the whole day sequence and pushes it to the registered
//! chart and formula renderers. Renderers never read back into the widget.

use crate::analysis::{summarize, ChainSummary};
use crate::config::WidgetConfig;
use crate::error::ModelError;
use crate::formula::transition_formula;
use crate::model::{DayState, ModelParameters, TransitionModel};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

/// The five sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    InfectionProbability,
    RecoveryProbability,
    InitialInfected,
    InitialHealthy,
    Days,
}

impl Control {
    pub const ALL: [Control; 5] = [
        Control::InfectionProbability,
        Control::RecoveryProbability,
        Control::InitialInfected,
        Control::InitialHealthy,
        Control::Days,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Control::InfectionProbability => "infection_probability",
            Control::RecoveryProbability => "recovery_probability",
            Control::InitialInfected => "initial_infected",
            Control::InitialHealthy => "initial_healthy",
            Control::Days => "days",
        }
    }

    pub fn from_name(name: &str) -> Option<Control> {
        Control::ALL.into_iter().find(|control| control.name() == name)
    }
}

/// Three parallel series handed to the chart: day labels on the x-axis and one line per compartment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<u32>,
    pub infected: Vec<f64>,
    pub recovered: Vec<f64>,
}

impl ChartSeries {
    pub fn from_states(states: &[DayState]) -> Self {
        let mut series = ChartSeries {
            labels: Vec::with_capacity(states.len()),
            infected: Vec::with_capacity(states.len()),
            recovered: Vec::with_capacity(states.len()),
        };
        for state in states {
            series.labels.push(state.day);
            series.infected.push(state.infected);
            series.recovered.push(state.recovered);
        }
        series
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

pub trait ChartRenderer {
    fn render_chart(&mut self, series: &ChartSeries);
}

pub trait FormulaRenderer {
    fn render_formula(&mut self, markup: &str);
}

impl<F: FnMut(&ChartSeries)> ChartRenderer for F {
    fn render_chart(&mut self, series: &ChartSeries) {
        self(series)
    }
}

impl<F: FnMut(&str)> FormulaRenderer for F {
    fn render_formula(&mut self, markup: &str) {
        self(markup)
    }
}

pub struct Widget {
    config: WidgetConfig,
    model: TransitionModel,
    params: ModelParameters,
    chart_renderers: Vec<Box<dyn ChartRenderer>>,
    formula_renderers: Vec<Box<dyn FormulaRenderer>>,
}

impl Widget {
    pub fn new(config: WidgetConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            model: config.model(),
            params: config.initial,
            config,
            chart_renderers: Vec::new(),
            formula_renderers: Vec::new(),
        })
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn parameters(&self) -> &ModelParameters {
        &self.params
    }

    pub fn add_chart_renderer(&mut self, renderer: impl ChartRenderer + 'static) {
        self.chart_renderers.push(Box::new(renderer));
    }

    pub fn add_formula_renderer(&mut self, renderer: impl FormulaRenderer + 'static) {
        self.formula_renderers.push(Box::new(renderer));
    }

    pub fn value(&self, control: Control) -> f64 {
        control_value(&self.params, control)
    }

    /// Applies one slider change and re-renders.
    ///
    /// Returns `Ok(false)` without touching anything when `value` is not finite. The new
    /// value is only kept when the recomputation succeeds.
    pub fn handle_input(&mut self, control: Control, value: f64) -> Result<bool, ModelError> {
        if !value.is_finite() {
            warn!("Ignoring non-finite value {} for {}.", value, control.name());
            return Ok(false);
        }
        let snapped = self.config.bounds(control).snap(value);
        trace!("{} <- {} (requested {})", control.name(), snapped, value);
        let mut params = self.params;
        set_field(&mut params, control, snapped);
        self.commit(params)?;
        Ok(true)
    }

    /// Replaces all parameters at once and re-renders.
    ///
    /// Every field is snapped into its control's bounds first; on failure the previous
    /// parameters stay in place.
    pub fn set_parameters(&mut self, params: ModelParameters) -> Result<(), ModelError> {
        let mut bounded = params;
        for control in Control::ALL {
            let value = control_value(&params, control);
            set_field(&mut bounded, control, self.config.bounds(control).snap(value));
        }
        if bounded != params {
            warn!("Parameters {:?} snapped to {:?}.", params, bounded);
        }
        self.commit(bounded)
    }

    pub fn series(&self) -> Result<ChartSeries, ModelError> {
        self.series_for(&self.params)
    }

    pub fn formula(&self) -> String {
        transition_formula(&self.params, self.model.order)
    }

    pub fn summary(&self) -> anyhow::Result<ChainSummary> {
        summarize(&self.model, &self.params, self.config.steady_state_epsilon)
    }

    /// Recomputes the sequence and pushes it to every renderer.
    ///
    /// The full series is built before any renderer runs, so a failure pushes nothing.
    pub fn refresh(&mut self) -> Result<(), ModelError> {
        self.commit(self.params)
    }

    fn series_for(&self, params: &ModelParameters) -> Result<ChartSeries, ModelError> {
        let states = self.model.states(params)?;
        Ok(ChartSeries::from_states(&states))
    }

    fn commit(&mut self, params: ModelParameters) -> Result<(), ModelError> {
        let series = self.series_for(&params)?;
        self.params = params;
        let markup = self.formula();
        debug!(
            "Refreshing {} chart and {} formula renderers with {} days.",
            self.chart_renderers.len(),
            self.formula_renderers.len(),
            series.len()
        );
        for renderer in &mut self.chart_renderers {
            renderer.render_chart(&series);
        }
        for renderer in &mut self.formula_renderers {
            renderer.render_formula(&markup);
        }
        Ok(())
    }
}

fn control_value(params: &ModelParameters, control: Control) -> f64 {
    match control {
        Control::InfectionProbability => params.infection_probability,
        Control::RecoveryProbability => params.recovery_probability,
        Control::InitialInfected => f64::from(params.initial_infected),
        Control::InitialHealthy => f64::from(params.initial_healthy),
        Control::Days => f64::from(params.days),
    }
}

/// Writes an already-snapped value into its field.
fn set_field(params: &mut ModelParameters, control: Control, snapped: f64) {
    match control {
        Control::InfectionProbability => params.infection_probability = snapped,
        Control::RecoveryProbability => params.recovery_probability = snapped,
        // Snapped to whole steps within [0, max], so the casts are exact.
        Control::InitialInfected => params.initial_infected = snapped as u32,
        Control::InitialHealthy => params.initial_healthy = snapped as u32,
        Control::Days => params.days = snapped as u32,
    }
}

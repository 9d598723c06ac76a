use crate::error::ModelError;
use crate::matrix::Matrix2;
use crate::traits::DynamicalSystem;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Largest deviation of the total population accepted before a day's state is rejected.
pub const DEFAULT_CONSERVATION_TOLERANCE: f64 = 0.1;

/// Which compartment occupies the first slot of the state row vector.
///
/// The matrix layout is fixed: the slot-A row is `[1 - p, p]` and the slot-B row is
/// `[r, 1 - r]`. The order only decides which label each slot carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompartmentOrder {
    #[default]
    InfectedFirst,
    HealthyFirst,
}

impl CompartmentOrder {
    pub fn to_slots(self, infected: f64, healthy: f64) -> [f64; 2] {
        match self {
            CompartmentOrder::InfectedFirst => [infected, healthy],
            CompartmentOrder::HealthyFirst => [healthy, infected],
        }
    }

    /// Returns `(infected, healthy)` for a slot vector.
    pub fn from_slots(self, slots: [f64; 2]) -> (f64, f64) {
        match self {
            CompartmentOrder::InfectedFirst => (slots[0], slots[1]),
            CompartmentOrder::HealthyFirst => (slots[1], slots[0]),
        }
    }
}

/// Everything the user controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub infection_probability: f64,
    pub recovery_probability: f64,
    pub initial_infected: u32,
    pub initial_healthy: u32,
    pub days: u32,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            infection_probability: 0.03,
            recovery_probability: 0.05,
            initial_infected: 1,
            initial_healthy: 100,
            days: 32,
        }
    }
}

impl ModelParameters {
    pub fn total_population(&self) -> f64 {
        f64::from(self.initial_infected) + f64::from(self.initial_healthy)
    }
}

/// The per-day transition matrix `[[1 - p, p], [r, 1 - r]]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionMatrix {
    matrix: Matrix2<f64>,
}

impl TransitionMatrix {
    pub fn from_probabilities(p: f64, r: f64) -> Self {
        Self {
            matrix: Matrix2::new(1.0 - p, p, r, 1.0 - r),
        }
    }

    pub fn from_parameters(params: &ModelParameters) -> Self {
        Self::from_probabilities(params.infection_probability, params.recovery_probability)
    }

    pub fn matrix(&self) -> &Matrix2<f64> {
        &self.matrix
    }

    pub fn power(&self, day: u32) -> Matrix2<f64> {
        self.matrix.pow(day)
    }
}

impl DynamicalSystem<f64> for TransitionMatrix {
    fn dimension(&self) -> usize {
        2
    }

    fn apply(&self, x: &[f64], out: &mut [f64]) {
        let next = self.matrix.left_apply([x[0], x[1]]);
        out[0] = next[0];
        out[1] = next[1];
    }
}

/// Expected compartment populations on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayState {
    pub day: u32,
    pub infected: f64,
    pub recovered: f64,
}

impl DayState {
    pub fn total(&self) -> f64 {
        self.infected + self.recovered
    }
}

/// Closed-form evaluator for the two-state chain.
///
/// Each day is computed independently as `x0 * M^day`; nothing is carried between calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionModel {
    pub order: CompartmentOrder,
    pub tolerance: f64,
}

impl Default for TransitionModel {
    fn default() -> Self {
        Self {
            order: CompartmentOrder::default(),
            tolerance: DEFAULT_CONSERVATION_TOLERANCE,
        }
    }
}

impl TransitionModel {
    pub fn new(order: CompartmentOrder, tolerance: f64) -> Self {
        Self { order, tolerance }
    }

    /// Evolves a slot vector `[a, b]` by `day` applications of the transition matrix.
    pub fn evolve(
        &self,
        p: f64,
        r: f64,
        initial: [f64; 2],
        day: u32,
    ) -> Result<[f64; 2], ModelError> {
        let transition = TransitionMatrix::from_probabilities(p, r);
        let result = transition.power(day).left_apply(initial);
        self.check_conservation(day, initial[0] + initial[1], result[0] + result[1])?;
        Ok(result)
    }

    pub fn state_at_day(
        &self,
        params: &ModelParameters,
        day: u32,
    ) -> Result<DayState, ModelError> {
        let initial = self.order.to_slots(
            f64::from(params.initial_infected),
            f64::from(params.initial_healthy),
        );
        let slots = self.evolve(
            params.infection_probability,
            params.recovery_probability,
            initial,
            day,
        )?;
        let (infected, recovered) = self.order.from_slots(slots);
        Ok(DayState {
            day,
            infected,
            recovered,
        })
    }

    /// Lazily yields the states for days `0..=params.days`.
    pub fn sequence(&self, params: &ModelParameters) -> DaySequence {
        DaySequence {
            model: *self,
            params: *params,
            next_day: 0,
            remaining: u64::from(params.days) + 1,
        }
    }

    /// Materializes the whole sequence, stopping at the first failing day.
    pub fn states(&self, params: &ModelParameters) -> Result<Vec<DayState>, ModelError> {
        let states = self.sequence(params).collect::<Result<Vec<_>, _>>()?;
        debug!(
            "Computed {} day states (p = {}, r = {}, total = {}).",
            states.len(),
            params.infection_probability,
            params.recovery_probability,
            params.total_population()
        );
        Ok(states)
    }

    fn check_conservation(&self, day: u32, expected: f64, actual: f64) -> Result<(), ModelError> {
        let deviation = (actual - expected).abs();
        // NaN deviations must fail too, hence the negated comparison.
        if !(deviation <= self.tolerance) {
            warn!(
                "Conservation violated on day {}: expected {}, got {}.",
                day, expected, actual
            );
            return Err(ModelError::ConservationViolation {
                day,
                expected,
                actual,
                tolerance: self.tolerance,
            });
        }
        Ok(())
    }
}

/// Iterator over `DayState`s in ascending day order.
#[derive(Debug, Clone)]
pub struct DaySequence {
    model: TransitionModel,
    params: ModelParameters,
    next_day: u32,
    // u64 so that `days = u32::MAX` still counts correctly where usize is 32 bits.
    remaining: u64,
}

impl Iterator for DaySequence {
    type Item = Result<DayState, ModelError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let day = self.next_day;
        self.remaining -= 1;
        self.next_day = self.next_day.saturating_add(1);
        Some(self.model.state_at_day(&self.params, day))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}

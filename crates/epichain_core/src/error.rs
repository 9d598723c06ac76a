use thiserror::Error;

/// Failures raised by the transition model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// The total population drifted away from its starting value by more than the tolerance.
    #[error(
        "Population not conserved on day {day}: expected total {expected}, got {actual} (tolerance {tolerance})."
    )]
    ConservationViolation {
        day: u32,
        expected: f64,
        actual: f64,
        tolerance: f64,
    },
}

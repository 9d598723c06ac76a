pub mod analysis;
pub mod config;
pub mod error;
pub mod formula;
pub mod matrix;
pub mod model;
pub mod solvers;
/// The `epichain_core` crate provides the computational engine behind the Epichain widget.
/// It models a population split between two compartments (infected and healthy/recovered)
/// evolving under a time-homogeneous two-state Markov chain.
///
/// Key components:
/// - **Traits**: `Scalar` (numeric type abstraction), `DynamicalSystem` (maps), `Steppable` (steppers).
/// - **Matrix**: A fixed-size `Matrix2` with multiplication and exponentiation by squaring.
/// - **Model**: `TransitionModel` computing the state on any day as `x0 * M^d`, with a conservation check.
/// - **Widget**: The presentation state object and the renderer traits it pushes chart and formula data to.
pub mod traits;
pub mod widget;

pub use error::ModelError;
pub use model::{CompartmentOrder, DayState, ModelParameters, TransitionModel};

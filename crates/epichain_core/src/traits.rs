use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars in the transition model.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// Represents a discrete-time dynamical system (a map).
pub trait DynamicalSystem<T: Scalar> {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the map function.
    /// x: current state
    /// out: buffer to write x_{n+1}
    fn apply(&self, x: &[T], out: &mut [T]);
}

/// A trait for steppers that can advance a system forward.
pub trait Steppable<T: Scalar> {
    /// Performs one step.
    /// n: current iteration count (updated after step)
    /// state: current state (updated after step)
    fn step(&mut self, system: &impl DynamicalSystem<T>, n: &mut u32, state: &mut [T]);
}

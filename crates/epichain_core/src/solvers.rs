use crate::traits::{DynamicalSystem, Scalar, Steppable};

/// Discrete Map Stepper
/// Just evaluates x_{n+1} = f(x_n) and bumps the iteration count.
pub struct DiscreteMap<T: Scalar> {
    tmp: Vec<T>,
}

impl<T: Scalar> DiscreteMap<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            tmp: vec![T::zero(); dim],
        }
    }
}

impl<T: Scalar> Steppable<T> for DiscreteMap<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, n: &mut u32, state: &mut [T]) {
        system.apply(state, &mut self.tmp);
        state.copy_from_slice(&self.tmp);
        *n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doubler;

    impl DynamicalSystem<f64> for Doubler {
        fn dimension(&self) -> usize {
            2
        }

        fn apply(&self, x: &[f64], out: &mut [f64]) {
            out[0] = 2.0 * x[0];
            out[1] = x[0] + x[1];
        }
    }

    #[test]
    fn discrete_map_applies_map_once_per_step() {
        let mut stepper = DiscreteMap::new(Doubler.dimension());
        let mut n = 0;
        let mut state = [1.0, 0.0];

        stepper.step(&Doubler, &mut n, &mut state);
        assert_eq!(n, 1);
        assert_eq!(state, [2.0, 1.0]);

        stepper.step(&Doubler, &mut n, &mut state);
        assert_eq!(n, 2);
        assert_eq!(state, [4.0, 3.0]);
    }
}

//! Running-sum accumulator.

use crate::operation::{Inputs, Operation, Outputs};

/// Discrete integrator: `state += input; output = state`.
///
/// One accumulation per evaluation, so the result depends only on the input
/// sequence and the number of updates since the last [`reset`](Operation::reset).
#[derive(Debug, Clone, Default)]
pub struct Integral {
    state: f32,
}

impl Integral {
    /// Creates an integrator starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current accumulated value.
    pub fn state(&self) -> f32 {
        self.state
    }
}

impl Operation for Integral {
    fn name(&self) -> &str {
        "Integral"
    }

    fn num_inputs(&self) -> usize {
        1
    }

    fn num_outputs(&self) -> usize {
        1
    }

    fn process(&mut self, inputs: &Inputs<'_>, outputs: &mut Outputs<'_>) {
        self.state += inputs.get(0);
        outputs.set(0, self.state);
    }

    fn reset(&mut self) {
        self.state = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::testing::{constants, run_detached};

    #[test]
    fn test_accumulates() {
        let mut op = Integral::new();
        let input = constants(&[0.5]);
        run_detached(&mut op, &input);
        run_detached(&mut op, &input);
        let out = run_detached(&mut op, &input);
        assert_eq!(out, [1.5]);
        assert_eq!(op.state(), 1.5);
    }

    #[test]
    fn test_reset_zeroes_state() {
        let mut op = Integral::new();
        run_detached(&mut op, &constants(&[3.0]));
        op.reset();
        assert_eq!(op.state(), 0.0);
        assert_eq!(run_detached(&mut op, &constants(&[1.0])), [1.0]);
    }
}

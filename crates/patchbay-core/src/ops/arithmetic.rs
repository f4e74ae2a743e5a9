//! Arithmetic kernels: sum, product, difference, negation.

use crate::operation::{Inputs, Operation, Outputs};

use super::DEFAULT_FAN_IN;

macro_rules! variadic_arity {
    () => {
        fn num_inputs(&self) -> usize {
            self.inputs
        }

        fn num_outputs(&self) -> usize {
            1
        }

        fn set_num_inputs(&mut self, count: usize) {
            self.inputs = count.max(1);
        }
    };
}

/// Sum of every input.
#[derive(Debug, Clone)]
pub struct Add {
    inputs: usize,
}

impl Add {
    /// Creates a two-input adder.
    pub fn new() -> Self {
        Self {
            inputs: DEFAULT_FAN_IN,
        }
    }
}

impl Default for Add {
    fn default() -> Self {
        Self::new()
    }
}

impl Operation for Add {
    fn name(&self) -> &str {
        "Add"
    }

    variadic_arity!();

    fn process(&mut self, inputs: &Inputs<'_>, outputs: &mut Outputs<'_>) {
        outputs.set(0, inputs.iter().sum());
    }
}

/// Product of every input.
#[derive(Debug, Clone)]
pub struct Multiply {
    inputs: usize,
}

impl Multiply {
    /// Creates a two-input multiplier.
    pub fn new() -> Self {
        Self {
            inputs: DEFAULT_FAN_IN,
        }
    }
}

impl Default for Multiply {
    fn default() -> Self {
        Self::new()
    }
}

impl Operation for Multiply {
    fn name(&self) -> &str {
        "Multiply"
    }

    variadic_arity!();

    fn process(&mut self, inputs: &Inputs<'_>, outputs: &mut Outputs<'_>) {
        outputs.set(0, inputs.iter().product());
    }
}

/// First input minus every other input.
#[derive(Debug, Clone)]
pub struct Subtract {
    inputs: usize,
}

impl Subtract {
    /// Creates a two-input subtractor (`in0 - in1`).
    pub fn new() -> Self {
        Self {
            inputs: DEFAULT_FAN_IN,
        }
    }
}

impl Default for Subtract {
    fn default() -> Self {
        Self::new()
    }
}

impl Operation for Subtract {
    fn name(&self) -> &str {
        "Subtract"
    }

    variadic_arity!();

    fn process(&mut self, inputs: &Inputs<'_>, outputs: &mut Outputs<'_>) {
        let mut values = inputs.iter();
        let first = values.next().unwrap_or(0.0);
        outputs.set(0, values.fold(first, |acc, v| acc - v));
    }
}

/// Sign flip.
#[derive(Debug, Clone, Default)]
pub struct Negate;

impl Negate {
    /// Creates a negation kernel.
    pub fn new() -> Self {
        Self
    }
}

impl Operation for Negate {
    fn name(&self) -> &str {
        "Negate"
    }

    fn num_inputs(&self) -> usize {
        1
    }

    fn num_outputs(&self) -> usize {
        1
    }

    fn process(&mut self, inputs: &Inputs<'_>, outputs: &mut Outputs<'_>) {
        outputs.set(0, -inputs.get(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::testing::{constants, run_detached};

    #[test]
    fn test_add() {
        let out = run_detached(&mut Add::new(), &constants(&[1.8, 2.3]));
        assert!((out[0] - 4.1).abs() < 1e-4);
    }

    #[test]
    fn test_add_variadic() {
        let mut op = Add::new();
        op.set_num_inputs(4);
        let out = run_detached(&mut op, &constants(&[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(out, [10.0]);
    }

    #[test]
    fn test_multiply() {
        let out = run_detached(&mut Multiply::new(), &constants(&[4.1, 2.0]));
        assert!((out[0] - 8.2).abs() < 1e-4);

        let mut op = Multiply::new();
        op.set_num_inputs(3);
        assert_eq!(run_detached(&mut op, &constants(&[2.0, 3.0, -1.0])), [-6.0]);
    }

    #[test]
    fn test_subtract_is_left_fold() {
        let out = run_detached(&mut Subtract::new(), &constants(&[8.2, 1.3]));
        assert!((out[0] - 6.9).abs() < 1e-4);

        let mut op = Subtract::new();
        op.set_num_inputs(3);
        assert_eq!(run_detached(&mut op, &constants(&[10.0, 3.0, 2.0])), [5.0]);
    }

    #[test]
    fn test_variadic_keeps_one_input() {
        let mut op = Add::new();
        op.set_num_inputs(0);
        assert_eq!(op.num_inputs(), 1);
        assert_eq!(op.num_outputs(), 1);
        op.set_num_outputs(3);
        assert_eq!(op.num_outputs(), 1);
    }

    #[test]
    fn test_negate() {
        let out = run_detached(&mut Negate::new(), &constants(&[6.9]));
        assert_eq!(out, [-6.9]);
        let mut op = Negate::new();
        op.set_num_inputs(2);
        assert_eq!(op.num_inputs(), 1);
    }
}

//! Boolean kernels over float signals.
//!
//! Any nonzero input is true. Outputs are exactly `0.0` or `1.0`.

use crate::math::{bool_to_signal, is_truthy};
use crate::operation::{Inputs, Operation, Outputs};

use super::DEFAULT_FAN_IN;

macro_rules! logic_kernel {
    ($(#[$doc:meta])* $name:ident, $label:literal, |$values:ident| $body:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            inputs: usize,
        }

        impl $name {
            /// Creates a two-input gate.
            pub fn new() -> Self {
                Self {
                    inputs: DEFAULT_FAN_IN,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Operation for $name {
            fn name(&self) -> &str {
                $label
            }

            fn num_inputs(&self) -> usize {
                self.inputs
            }

            fn num_outputs(&self) -> usize {
                1
            }

            fn set_num_inputs(&mut self, count: usize) {
                self.inputs = count.max(1);
            }

            fn process(&mut self, inputs: &Inputs<'_>, outputs: &mut Outputs<'_>) {
                let $values = &mut inputs.iter().map(is_truthy);
                outputs.set(0, bool_to_signal($body));
            }
        }
    };
}

logic_kernel!(
    /// True when every input is nonzero.
    And,
    "And",
    |values| values.all(|b| b)
);

logic_kernel!(
    /// True when any input is nonzero.
    Or,
    "Or",
    |values| values.any(|b| b)
);

logic_kernel!(
    /// True when an odd number of inputs are nonzero.
    Xor,
    "Xor",
    |values| values.fold(false, |acc, b| acc ^ b)
);

//! Identity kernel. Group proxies run it.

use crate::operation::{Inputs, Operation, Outputs};

/// Copies every input channel to the output channel with the same index.
///
/// Input and output counts always match: resizing either side resizes both.
#[derive(Debug, Clone)]
pub struct Passthrough {
    channels: usize,
}

impl Passthrough {
    /// Creates a passthrough with `channels` inputs and outputs.
    pub fn new(channels: usize) -> Self {
        Self { channels }
    }
}

impl Default for Passthrough {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Operation for Passthrough {
    fn name(&self) -> &str {
        "Passthrough"
    }

    fn num_inputs(&self) -> usize {
        self.channels
    }

    fn num_outputs(&self) -> usize {
        self.channels
    }

    fn set_num_inputs(&mut self, count: usize) {
        self.channels = count;
    }

    fn set_num_outputs(&mut self, count: usize) {
        self.channels = count;
    }

    fn process(&mut self, inputs: &Inputs<'_>, outputs: &mut Outputs<'_>) {
        for (channel, value) in inputs.iter().enumerate() {
            outputs.set(channel, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::testing::{constants, run_detached};

    #[test]
    fn test_copies_each_channel() {
        let mut op = Passthrough::new(3);
        let out = run_detached(&mut op, &constants(&[1.0, -2.0, 0.5]));
        assert_eq!(out, [1.0, -2.0, 0.5]);
    }

    #[test]
    fn test_resize_keeps_sides_equal() {
        let mut op = Passthrough::default();
        op.set_num_outputs(4);
        assert_eq!(op.num_inputs(), 4);
        op.set_num_inputs(0);
        assert_eq!(op.num_outputs(), 0);
        assert!(run_detached(&mut op, &[]).is_empty());
    }
}

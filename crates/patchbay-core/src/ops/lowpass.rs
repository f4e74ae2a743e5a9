//! Resonant two-pole lowpass.
//!
//! Two cascaded one-pole stages with feedback from the difference between
//! them:
//!
//! ```text
//! fb  = res + res / (1 - cutoff)
//! s0 += cutoff * (x - s0 + fb * (s0 - s1))
//! s1 += cutoff * (s0 - s1)
//! y   = s1
//! ```
//!
//! `cutoff` is a normalized coefficient in `[0, 0.99]`, not a frequency.
//! `resonance` is clamped to `[0, 1]`.

use crate::math::flush_denormal;
use crate::operation::{Inputs, Operation, Outputs};

const MAX_CUTOFF: f32 = 0.99;
const INPUT_NAMES: [&str; 3] = ["cutoff", "resonance", "input"];

/// Stateful resonant lowpass filter (3 inputs, 1 output).
#[derive(Debug, Clone, Default)]
pub struct Lowpass {
    s0: f32,
    s1: f32,
}

impl Lowpass {
    /// Input channel of the cutoff coefficient.
    pub const CUTOFF: usize = 0;
    /// Input channel of the resonance amount.
    pub const RESONANCE: usize = 1;
    /// Input channel of the signal.
    pub const INPUT: usize = 2;

    /// Creates a filter with cleared state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter memories `(s0, s1)`.
    pub fn state(&self) -> (f32, f32) {
        (self.s0, self.s1)
    }

    /// Advances the filter by one sample.
    #[inline]
    pub fn tick(&mut self, cutoff: f32, resonance: f32, x: f32) -> f32 {
        let cutoff = cutoff.clamp(0.0, MAX_CUTOFF);
        let res = resonance.clamp(0.0, 1.0);
        let fb = res + res / (1.0 - cutoff);

        self.s0 += cutoff * (x - self.s0 + fb * (self.s0 - self.s1));
        self.s1 += cutoff * (self.s0 - self.s1);
        self.s0 = flush_denormal(self.s0);
        self.s1 = flush_denormal(self.s1);
        self.s1
    }
}

impl Operation for Lowpass {
    fn name(&self) -> &str {
        "Lowpass"
    }

    fn num_inputs(&self) -> usize {
        3
    }

    fn num_outputs(&self) -> usize {
        1
    }

    fn input_name(&self, channel: usize) -> Option<&str> {
        INPUT_NAMES.get(channel).copied()
    }

    fn output_name(&self, channel: usize) -> Option<&str> {
        (channel == 0).then_some("output")
    }

    fn process(&mut self, inputs: &Inputs<'_>, outputs: &mut Outputs<'_>) {
        let y = self.tick(
            inputs.get(Self::CUTOFF),
            inputs.get(Self::RESONANCE),
            inputs.get(Self::INPUT),
        );
        outputs.set(0, y);
    }

    fn reset(&mut self) {
        self.s0 = 0.0;
        self.s1 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::testing::{constants, run_detached};

    #[test]
    fn test_dc_converges_to_input() {
        let mut lp = Lowpass::new();
        let mut y = 0.0;
        for _ in 0..2000 {
            y = lp.tick(0.2, 0.0, 1.0);
        }
        assert!((y - 1.0).abs() < 1e-4, "got {y}");
    }

    #[test]
    fn test_zero_cutoff_holds_state() {
        let mut lp = Lowpass::new();
        for _ in 0..10 {
            assert_eq!(lp.tick(0.0, 0.5, 1.0), 0.0);
        }
        assert_eq!(lp.state(), (0.0, 0.0));
    }

    #[test]
    fn test_first_sample_matches_difference_equation() {
        let mut lp = Lowpass::new();
        // s0 = 0.5 * 1.0 = 0.5, s1 = 0.5 * 0.5 = 0.25
        assert_eq!(lp.tick(0.5, 0.0, 1.0), 0.25);
        assert_eq!(lp.state(), (0.5, 0.25));
    }

    #[test]
    fn test_parameters_are_clamped() {
        let mut a = Lowpass::new();
        let mut b = Lowpass::new();
        for i in 0..20 {
            let x = if i % 2 == 0 { 1.0 } else { -1.0 };
            assert_eq!(a.tick(5.0, -2.0, x), b.tick(0.99, 0.0, x));
        }

        let mut c = Lowpass::new();
        let mut d = Lowpass::new();
        for i in 0..20 {
            let x = if i % 3 == 0 { 0.5 } else { -0.25 };
            assert_eq!(c.tick(0.1, 4.0, x), d.tick(0.1, 1.0, x));
        }
    }

    #[test]
    fn test_reset_clears_state() {
        let mut lp = Lowpass::new();
        run_detached(&mut lp, &constants(&[0.3, 0.2, 1.0]));
        assert_ne!(lp.state(), (0.0, 0.0));
        lp.reset();
        assert_eq!(lp.state(), (0.0, 0.0));
    }

    #[test]
    fn test_port_names() {
        let lp = Lowpass::new();
        assert_eq!(lp.input_name(Lowpass::CUTOFF), Some("cutoff"));
        assert_eq!(lp.input_name(Lowpass::RESONANCE), Some("resonance"));
        assert_eq!(lp.input_name(Lowpass::INPUT), Some("input"));
        assert_eq!(lp.input_name(3), None);
        assert_eq!(lp.output_name(0), Some("output"));
    }
}

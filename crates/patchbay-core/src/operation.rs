//! Core Operation trait and the channel views it works through.
//!
//! The [`Operation`] trait is the pluggable compute kernel of the graph. A
//! [`Node`](crate::Node) owns exactly one operation for its lifetime and calls
//! [`Operation::process`] at most once per update cycle.
//!
//! ## Design Decisions
//!
//! - **Views, not slices**: `process` receives [`Inputs`], which resolves each
//!   channel's [`InputBinding`] on read. Kernels never see which variant a
//!   channel is bound to, so the same kernel works on graph edges, constants
//!   and external values alike.
//!
//! - **Object-safe**: nodes store `Box<dyn Operation>`, which is what lets a
//!   registry pick the kernel type from a runtime tag.
//!
//! - **No allocations**: `process` and `reset` are called on the real-time path
//!   and must not allocate.

use crate::graph::arena::Peers;
use crate::graph::binding::InputBinding;
use crate::graph::node::{Node, OutputSlot};

/// Core trait for all compute kernels.
///
/// Arity is fixed per instance but may be resized on request. A kernel whose
/// arity cannot change keeps the default `set_num_*` methods, which ignore the
/// request; the owning node always mirrors whatever counts the kernel reports.
///
/// # Example
///
/// ```rust
/// use patchbay_core::{Inputs, Operation, Outputs};
///
/// struct Double;
///
/// impl Operation for Double {
///     fn name(&self) -> &str {
///         "Double"
///     }
///     fn num_inputs(&self) -> usize {
///         1
///     }
///     fn num_outputs(&self) -> usize {
///         1
///     }
///     fn process(&mut self, inputs: &Inputs<'_>, outputs: &mut Outputs<'_>) {
///         outputs.set(0, inputs.get(0) * 2.0);
///     }
/// }
/// ```
pub trait Operation: Send {
    /// Display name of the kernel.
    fn name(&self) -> &str;

    /// Current number of input channels.
    fn num_inputs(&self) -> usize;

    /// Current number of output channels.
    fn num_outputs(&self) -> usize;

    /// Requests a new input count. Fixed-arity kernels ignore it.
    fn set_num_inputs(&mut self, _count: usize) {}

    /// Requests a new output count. Fixed-arity kernels ignore it.
    fn set_num_outputs(&mut self, _count: usize) {}

    /// Name of an input channel, if the kernel defines one.
    fn input_name(&self, _channel: usize) -> Option<&str> {
        None
    }

    /// Name of an output channel, if the kernel defines one.
    fn output_name(&self, _channel: usize) -> Option<&str> {
        None
    }

    /// Computes outputs from inputs.
    ///
    /// Must read inputs only through `inputs` and write every one of
    /// `outputs.len()` channels.
    fn process(&mut self, inputs: &Inputs<'_>, outputs: &mut Outputs<'_>);

    /// Clears private state (accumulators, filter memories). Parameters and
    /// arity are unchanged.
    fn reset(&mut self) {}
}

/// Read-only view over a node's input bindings during [`Operation::process`].
pub struct Inputs<'a> {
    bindings: &'a [InputBinding],
    peers: Peers<'a, Node>,
}

impl<'a> Inputs<'a> {
    pub(crate) fn new(bindings: &'a [InputBinding], peers: Peers<'a, Node>) -> Self {
        Self { bindings, peers }
    }

    /// Creates a view that is not attached to any graph.
    ///
    /// Node bindings read `0.0`; every other variant reads normally. Useful
    /// for driving a kernel directly in tests or offline tools.
    pub fn detached(bindings: &'a [InputBinding]) -> Self {
        Self {
            bindings,
            peers: Peers::empty(),
        }
    }

    /// Resolves the current value of input `channel`.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= self.len()`.
    #[inline]
    pub fn get(&self, channel: usize) -> f32 {
        assert!(
            channel < self.bindings.len(),
            "input channel {channel} out of range (node has {} inputs)",
            self.bindings.len()
        );
        self.bindings[channel].resolve(&self.peers)
    }

    /// Returns the binding of input `channel`.
    pub fn binding(&self, channel: usize) -> &InputBinding {
        &self.bindings[channel]
    }

    /// Number of input channels.
    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` when the node has no inputs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterates over the resolved values of every channel, in order.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.bindings.iter().map(|b| b.resolve(&self.peers))
    }
}

/// Write view over a node's output slots during [`Operation::process`].
pub struct Outputs<'a> {
    slots: &'a mut [OutputSlot],
}

impl<'a> Outputs<'a> {
    pub(crate) fn new(slots: &'a mut [OutputSlot]) -> Self {
        Self { slots }
    }

    /// Writes output `channel`.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= self.len()`.
    #[inline]
    pub fn set(&mut self, channel: usize, value: f32) {
        assert!(
            channel < self.slots.len(),
            "output channel {channel} out of range (node has {} outputs)",
            self.slots.len()
        );
        self.slots[channel].value = value;
    }

    /// Reads back output `channel` (the value written this cycle, or the
    /// previous cycle's value if not yet written).
    #[inline]
    pub fn get(&self, channel: usize) -> f32 {
        self.slots[channel].value
    }

    /// Writes the same value to every output channel.
    pub fn fill(&mut self, value: f32) {
        for slot in self.slots.iter_mut() {
            slot.value = value;
        }
    }

    /// Number of output channels.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` when the node has no outputs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Kernel test harness: runs an operation over standalone bindings.
#[cfg(test)]
pub(crate) mod testing {
    extern crate alloc;
    use alloc::vec::Vec;

    use super::{InputBinding, Inputs, Operation, OutputSlot, Outputs};

    /// Runs `op` once and returns its output values. Node bindings read `0.0`.
    pub(crate) fn run_detached(op: &mut dyn Operation, bindings: &[InputBinding]) -> Vec<f32> {
        let mut slots: Vec<OutputSlot> =
            (0..op.num_outputs()).map(|_| OutputSlot::default()).collect();
        let inputs = Inputs::detached(bindings);
        op.process(&inputs, &mut Outputs::new(&mut slots));
        slots.iter().map(|s| s.value).collect()
    }

    /// Binds every value as a constant.
    pub(crate) fn constants(values: &[f32]) -> Vec<InputBinding> {
        values.iter().map(|&v| InputBinding::Constant(v)).collect()
    }
}

//! Graph node: one operation, its input bindings, and its cached outputs.
//!
//! Each node in the graph has a [`NodeId`], owns exactly one
//! [`Operation`] for its lifetime, and keeps its channel counts in lock-step
//! with that operation: every resize request is delegated to the operation and
//! the node then mirrors whatever counts the operation reports.
//!
//! Node-local configuration (constants, external references, names, arity)
//! is done through `&mut Node`. Graph edges go through
//! [`Graph::set_input`](super::Graph::set_input) so the graph can reject cycles.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, string::String, vec::Vec};
use core::fmt;

use crate::external::ExternalRef;
use crate::operation::{Inputs, Operation, Outputs};

use super::arena::{Handle, Peers};
use super::binding::InputBinding;
use super::group::GroupId;

/// Unique identifier for a node in a [`Graph`](super::Graph).
///
/// A generational handle: once the node is removed, the id (and every copy of
/// it held in bindings elsewhere) stops resolving, even if the slot is reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) Handle);

impl NodeId {
    /// Returns the raw slot index. Small and dense, but reused after removal.
    #[inline]
    pub fn index(self) -> u32 {
        self.0.index()
    }

    /// Returns the slot generation the id was issued at.
    #[inline]
    pub fn generation(self) -> u32 {
        self.0.generation()
    }

    /// Returns a sentinel value that never resolves.
    #[inline]
    pub fn sentinel() -> Self {
        Self(Handle::sentinel())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.index(), self.generation())
    }
}

/// Per-cycle evaluation state of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EvalState {
    /// The operation has not run since the last reset pass.
    #[default]
    NotRun,
    /// The operation has run; its outputs are current for this cycle.
    Run,
}

/// One cached output value plus an optional display name.
#[derive(Clone, Debug, Default)]
pub struct OutputSlot {
    pub(crate) value: f32,
    pub(crate) name: Option<String>,
}

impl OutputSlot {
    /// Value produced by the last `process` call.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Name override for this channel, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// A computation unit in the graph.
pub struct Node {
    id: NodeId,
    owner: GroupId,
    name: Option<String>,
    operation: Box<dyn Operation>,
    inputs: Vec<InputBinding>,
    input_names: Vec<Option<String>>,
    outputs: Vec<OutputSlot>,
    state: EvalState,
    /// Last reset pass that visited this node.
    pub(crate) reset_pass: u32,
    proxy: bool,
}

impl Node {
    pub(crate) fn new(id: NodeId, owner: GroupId, operation: Box<dyn Operation>) -> Self {
        let mut node = Self {
            id,
            owner,
            name: None,
            operation,
            inputs: Vec::new(),
            input_names: Vec::new(),
            outputs: Vec::new(),
            state: EvalState::NotRun,
            reset_pass: 0,
            proxy: false,
        };
        node.sync_arity();
        node
    }

    pub(crate) fn new_proxy(id: NodeId, owner: GroupId, operation: Box<dyn Operation>) -> Self {
        let mut node = Self::new(id, owner, operation);
        node.proxy = true;
        node
    }

    // --- Identity ---

    /// This node's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Group that owns this node.
    pub fn owner(&self) -> GroupId {
        self.owner
    }

    /// Optional display name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Sets the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Returns `true` for a group boundary proxy.
    pub fn is_proxy(&self) -> bool {
        self.proxy
    }

    /// The operation this node runs.
    pub fn operation(&self) -> &dyn Operation {
        self.operation.as_ref()
    }

    // --- Arity ---

    /// Number of input channels.
    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Number of output channels.
    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Requests `count` input channels and returns the resulting count.
    ///
    /// Bindings below the new count are kept; new channels start `Empty`.
    /// Fixed-arity operations ignore the request.
    pub fn set_num_inputs(&mut self, count: usize) -> usize {
        self.operation.set_num_inputs(count);
        self.sync_arity();
        self.inputs.len()
    }

    /// Requests `count` output channels and returns the resulting count.
    ///
    /// Values below the new count are kept; new channels start at `0.0`.
    pub fn set_num_outputs(&mut self, count: usize) -> usize {
        self.operation.set_num_outputs(count);
        self.sync_arity();
        self.outputs.len()
    }

    /// Appends an input channel bound to `value`.
    ///
    /// Returns the new channel index, or `None` if the operation's input
    /// arity is fixed.
    pub fn push_constant(&mut self, value: f32) -> Option<usize> {
        let channel = self.inputs.len();
        if self.set_num_inputs(channel + 1) != channel + 1 {
            return None;
        }
        self.inputs[channel] = InputBinding::Constant(value);
        Some(channel)
    }

    // --- Inputs ---

    /// Binding of input `channel`.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is out of range.
    pub fn input(&self, channel: usize) -> &InputBinding {
        self.check_input(channel);
        &self.inputs[channel]
    }

    /// All input bindings, in channel order.
    pub fn inputs(&self) -> &[InputBinding] {
        &self.inputs
    }

    /// Binds input `channel` to a literal.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is out of range.
    pub fn set_constant(&mut self, channel: usize, value: f32) {
        self.bind(channel, InputBinding::Constant(value));
    }

    /// Binds input `channel` to collaborator-owned memory.
    ///
    /// The node holds a weak reference; when the owner drops the value the
    /// channel reads `0.0`.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is out of range.
    pub fn set_external(&mut self, channel: usize, value: impl Into<ExternalRef>) {
        self.bind(channel, InputBinding::External(value.into()));
    }

    /// Unbinds input `channel`.
    pub fn clear_input(&mut self, channel: usize) {
        self.bind(channel, InputBinding::Empty);
    }

    /// Name of input `channel`: the node override, else the operation's name.
    pub fn input_name(&self, channel: usize) -> Option<&str> {
        self.check_input(channel);
        self.input_names[channel]
            .as_deref()
            .or_else(|| self.operation.input_name(channel))
    }

    /// Overrides the name of input `channel`.
    pub fn set_input_name(&mut self, channel: usize, name: impl Into<String>) {
        self.check_input(channel);
        self.input_names[channel] = Some(name.into());
    }

    /// Finds an input channel by name (override or operation name).
    pub fn input_by_name(&self, name: &str) -> Option<usize> {
        (0..self.inputs.len()).find(|&ch| self.input_name(ch) == Some(name))
    }

    // --- Outputs ---

    /// Cached value of output `channel` from the most recent evaluation.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is out of range.
    pub fn output(&self, channel: usize) -> f32 {
        self.check_output(channel);
        self.outputs[channel].value
    }

    /// All output slots, in channel order.
    pub fn outputs(&self) -> &[OutputSlot] {
        &self.outputs
    }

    /// Name of output `channel`: the node override, else the operation's name.
    pub fn output_name(&self, channel: usize) -> Option<&str> {
        self.check_output(channel);
        self.outputs[channel]
            .name
            .as_deref()
            .or_else(|| self.operation.output_name(channel))
    }

    /// Overrides the name of output `channel`.
    pub fn set_output_name(&mut self, channel: usize, name: impl Into<String>) {
        self.check_output(channel);
        self.outputs[channel].name = Some(name.into());
    }

    /// Finds an output channel by name (override or operation name).
    pub fn output_by_name(&self, name: &str) -> Option<usize> {
        (0..self.outputs.len()).find(|&ch| self.output_name(ch) == Some(name))
    }

    // --- Evaluation state ---

    /// Evaluation state for the current cycle.
    pub fn state(&self) -> EvalState {
        self.state
    }

    /// Returns `true` once the operation has run this cycle.
    pub fn has_run(&self) -> bool {
        self.state == EvalState::Run
    }

    /// Clears the operation's private state. Bindings and outputs are kept.
    pub fn reset(&mut self) {
        self.operation.reset();
    }

    // --- Crate internals ---

    pub(crate) fn bind(&mut self, channel: usize, binding: InputBinding) {
        self.check_input(channel);
        self.inputs[channel] = binding;
    }

    pub(crate) fn output_slot(&self, channel: usize) -> Option<&OutputSlot> {
        self.outputs.get(channel)
    }

    pub(crate) fn mark_not_run(&mut self) {
        self.state = EvalState::NotRun;
    }

    pub(crate) fn mark_run(&mut self) {
        self.state = EvalState::Run;
    }

    /// Runs the operation once against the rest of the arena.
    pub(crate) fn evaluate(&mut self, peers: Peers<'_, Node>) {
        let inputs = Inputs::new(&self.inputs, peers);
        let mut outputs = Outputs::new(&mut self.outputs);
        self.operation.process(&inputs, &mut outputs);
    }

    fn sync_arity(&mut self) {
        let inputs = self.operation.num_inputs();
        let outputs = self.operation.num_outputs();
        self.inputs.truncate(inputs);
        self.inputs.resize_with(inputs, InputBinding::default);
        self.input_names.truncate(inputs);
        self.input_names.resize_with(inputs, || None);
        self.outputs.truncate(outputs);
        self.outputs.resize_with(outputs, OutputSlot::default);
    }

    fn check_input(&self, channel: usize) {
        assert!(
            channel < self.inputs.len(),
            "input channel {channel} out of range for {} ({} inputs)",
            self.id,
            self.inputs.len()
        );
    }

    fn check_output(&self, channel: usize) {
        assert!(
            channel < self.outputs.len(),
            "output channel {channel} out of range for {} ({} outputs)",
            self.id,
            self.outputs.len()
        );
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("operation", &self.operation.name())
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

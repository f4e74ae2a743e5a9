//! Graph arena: mutation API, wiring-time cycle rejection, and pull evaluation.
//!
//! [`Graph`] is the main entry point of the engine. It owns every node and
//! every group, hands out [`NodeId`] / [`GroupId`] handles, validates wiring,
//! and drives evaluation.
//!
//! # Evaluation
//!
//! [`update()`](Graph::update) is [`pre_update()`](Graph::pre_update)
//! followed by [`process_operation()`](Graph::process_operation):
//!
//! - `pre_update` clears the "has run" state of the node and of everything it
//!   reaches through graph-edge bindings. Each pass stamps the nodes it visits,
//!   so a node shared by many consumers is cleared once per pass.
//! - `process_operation` walks the same closure depth-first, post-order. A node
//!   that has already run this cycle returns immediately, which is what makes a
//!   shared upstream node run exactly once however many consumers it has.
//!
//! Evaluation never allocates: the running node is borrowed mutably while the
//! rest of the arena is borrowed shared through [`Peers`](super::arena::Peers).

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec};
use core::fmt;

use crate::operation::Operation;

use super::arena::Arena;
use super::binding::InputBinding;
use super::group::{GroupData, GroupId};
use super::node::{Node, NodeId};

/// Errors that can occur during graph operations.
///
/// Channel indices out of range are not errors; they are precondition
/// violations and panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// The node id is stale or was never issued by this graph.
    NodeNotFound(NodeId),
    /// The group id is stale or was never issued by this graph.
    GroupNotFound(GroupId),
    /// The node exists but is owned by a different group.
    NotInGroup {
        /// Node that was addressed.
        node: NodeId,
        /// Group the caller expected to own it.
        group: GroupId,
    },
    /// Group proxies live and die with their group.
    ProxyNode(NodeId),
    /// The root group cannot be removed.
    RootGroup,
    /// Binding `to` to an output of `from` would close a loop.
    CycleDetected {
        /// Upstream node of the rejected edge.
        from: NodeId,
        /// Node whose input was being bound.
        to: NodeId,
    },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "node {id} not found"),
            Self::GroupNotFound(id) => write!(f, "group {id} not found"),
            Self::NotInGroup { node, group } => write!(f, "node {node} is not owned by {group}"),
            Self::ProxyNode(id) => write!(f, "node {id} is a group proxy"),
            Self::RootGroup => write!(f, "the root group cannot be removed"),
            Self::CycleDetected { from, to } => {
                write!(f, "binding {to} to {from} would create a cycle")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GraphError {}

/// Mutable dependency graph of computation nodes.
///
/// The graph is the arena: it exclusively owns every [`Node`] and every group.
/// Callers hold [`NodeId`] / [`GroupId`] handles, which stop resolving once
/// the thing they name is removed.
///
/// # Usage
///
/// 1. Create a graph with [`new()`](Self::new); it starts with a root group
/// 2. Add nodes: [`add_node()`](Self::add_node), [`add_node_in()`](Self::add_node_in)
/// 3. Configure them through [`node_mut()`](Self::node_mut) (constants, externals, arity)
/// 4. Wire edges: [`connect()`](Self::connect) or [`set_input()`](Self::set_input)
/// 5. Once per cycle: [`update()`](Self::update) the node you want, then [`get()`](Self::get)
pub struct Graph {
    pub(crate) nodes: Arena<Node>,
    pub(crate) groups: Arena<GroupData>,
    pub(crate) root: GroupId,
    reset_pass: u32,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Creates an empty graph holding only the root group (0 inputs, 0 outputs).
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty graph with room for `nodes` nodes.
    pub fn with_capacity(nodes: usize) -> Self {
        let mut graph = Self {
            nodes: Arena::with_capacity(nodes + 2),
            groups: Arena::new(),
            root: GroupId::sentinel(),
            reset_pass: 0,
        };
        graph.root = graph.insert_group(None, 0, 0);
        graph
    }

    /// The root group. Always present.
    pub fn root(&self) -> GroupId {
        self.root
    }

    // --- Node mutations ---

    /// Adds a node to the root group and returns its id.
    pub fn add_node(&mut self, operation: impl Operation + 'static) -> NodeId {
        let root = self.root;
        self.insert_node(root, Box::new(operation))
    }

    /// Adds a node owned by `group`.
    pub fn add_node_in(
        &mut self,
        group: GroupId,
        operation: impl Operation + 'static,
    ) -> Result<NodeId, GraphError> {
        self.add_boxed_node_in(group, Box::new(operation))
    }

    /// Adds a node wrapping an already boxed operation.
    ///
    /// Used by factories that pick the operation type at runtime.
    pub fn add_boxed_node_in(
        &mut self,
        group: GroupId,
        operation: Box<dyn Operation>,
    ) -> Result<NodeId, GraphError> {
        if !self.groups.contains(group.0) {
            return Err(GraphError::GroupNotFound(group));
        }
        Ok(self.insert_node(group, operation))
    }

    /// Removes a node owned by `group`.
    ///
    /// Bindings elsewhere that still point at the node are left in place;
    /// their handle is stale from now on and they read `0.0`.
    pub fn remove_node(&mut self, group: GroupId, id: NodeId) -> Result<(), GraphError> {
        let node = self.nodes.get(id.0).ok_or(GraphError::NodeNotFound(id))?;
        if node.is_proxy() {
            return Err(GraphError::ProxyNode(id));
        }
        if node.owner() != group {
            return Err(GraphError::NotInGroup { node: id, group });
        }
        if let Some(data) = self.groups.get_mut(group.0) {
            data.members.retain(|&m| m != id);
        }
        self.nodes.remove(id.0);
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_remove: node {id} from {group}");
        Ok(())
    }

    /// Returns `true` if `id` names a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id.0)
    }

    /// Shared access to a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Mutable access to a node for local configuration.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Iterates over every live node, proxies included.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().map(|(_, node)| node)
    }

    /// Number of live nodes, proxies included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // --- Wiring ---

    /// Binds input `channel` of `node`.
    ///
    /// Accepts any [`InputBinding`], or anything convertible into one
    /// (`f32` for a constant, `&ExternalValue` for an external reference).
    ///
    /// # Errors
    ///
    /// - [`GraphError::NodeNotFound`] if `node`, or the upstream node of an
    ///   edge binding, does not exist
    /// - [`GraphError::CycleDetected`] if an edge binding would close a loop
    ///
    /// # Panics
    ///
    /// Panics if `channel` is out of range for `node`, or if an edge binding
    /// names an output channel the upstream node does not have.
    pub fn set_input(
        &mut self,
        node: NodeId,
        channel: usize,
        binding: impl Into<InputBinding>,
    ) -> Result<(), GraphError> {
        let binding = binding.into();
        if !self.nodes.contains(node.0) {
            return Err(GraphError::NodeNotFound(node));
        }
        if let InputBinding::Node {
            node: from,
            channel: from_channel,
        } = binding
        {
            let upstream = self.nodes.get(from.0).ok_or(GraphError::NodeNotFound(from))?;
            assert!(
                from_channel < upstream.num_outputs(),
                "output channel {from_channel} out of range for {from} ({} outputs)",
                upstream.num_outputs()
            );
            if from == node || self.depends_on(from, node) {
                #[cfg(feature = "tracing")]
                tracing::warn!("graph_wire: rejected {from} → {node}, would create a cycle");
                return Err(GraphError::CycleDetected { from, to: node });
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_wire: {node}[{channel}] ← {binding:?}");
        if let Some(target) = self.nodes.get_mut(node.0) {
            target.bind(channel, binding);
        }
        Ok(())
    }

    /// Connects output `from_channel` of `from` to input `to_channel` of `to`.
    pub fn connect(
        &mut self,
        from: NodeId,
        from_channel: usize,
        to: NodeId,
        to_channel: usize,
    ) -> Result<(), GraphError> {
        self.set_input(to, to_channel, InputBinding::node(from, from_channel))
    }

    /// Unbinds input `channel` of `node`.
    pub fn disconnect(&mut self, node: NodeId, channel: usize) -> Result<(), GraphError> {
        self.set_input(node, channel, InputBinding::Empty)
    }

    /// Returns `true` if `node` reads, directly or transitively, from `upstream`.
    pub fn depends_on(&self, node: NodeId, upstream: NodeId) -> bool {
        let mut visited = vec![false; self.nodes.capacity_bound()];
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            let Some(data) = self.nodes.get(current.0) else {
                continue;
            };
            let idx = current.index() as usize;
            if visited[idx] {
                continue;
            }
            visited[idx] = true;

            for source in data.inputs().iter().filter_map(InputBinding::source_node) {
                if source == upstream {
                    return true;
                }
                stack.push(source);
            }
        }
        false
    }

    // --- Values ---

    /// Cached value of output `channel` of `node` from its latest evaluation.
    ///
    /// Returns `None` if the node does not exist.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is out of range.
    pub fn get(&self, node: NodeId, channel: usize) -> Option<f32> {
        self.nodes.get(node.0).map(|n| n.output(channel))
    }

    /// Current value of input `channel` of `node`, resolved the way the
    /// node's operation would see it.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is out of range.
    pub fn input_value(&self, node: NodeId, channel: usize) -> Option<f32> {
        let binding = self.nodes.get(node.0)?.input(channel);
        Some(match binding {
            InputBinding::Node { node: from, channel } => self
                .nodes
                .get(from.0)
                .and_then(|n| n.output_slot(*channel))
                .map_or(0.0, |slot| slot.value()),
            other => other.literal().unwrap_or(0.0),
        })
    }

    // --- Evaluation ---

    /// Evaluates `node` for one cycle: [`pre_update`](Self::pre_update) then
    /// [`process_operation`](Self::process_operation).
    pub fn update(&mut self, node: NodeId) -> Result<(), GraphError> {
        self.pre_update(node)?;
        self.process_operation(node)
    }

    /// Clears the "has run" state of `node` and everything upstream of it.
    pub fn pre_update(&mut self, node: NodeId) -> Result<(), GraphError> {
        if !self.nodes.contains(node.0) {
            return Err(GraphError::NodeNotFound(node));
        }
        self.reset_pass = self.reset_pass.wrapping_add(1);
        if self.reset_pass == 0 {
            for n in self.nodes.values_mut() {
                n.reset_pass = 0;
            }
            self.reset_pass = 1;
        }
        self.clear_closure(node);
        Ok(())
    }

    /// Runs every upstream operation that has not run yet this cycle, then
    /// `node`'s own. A node that has already run returns immediately.
    pub fn process_operation(&mut self, node: NodeId) -> Result<(), GraphError> {
        if !self.nodes.contains(node.0) {
            return Err(GraphError::NodeNotFound(node));
        }
        self.evaluate(node);
        Ok(())
    }

    /// Resets the private state of every operation (integrators, filters).
    pub fn reset(&mut self) {
        for node in self.nodes.values_mut() {
            node.reset();
        }
    }

    /// Resets the private state of one node's operation.
    pub fn reset_node(&mut self, node: NodeId) -> Result<(), GraphError> {
        self.nodes
            .get_mut(node.0)
            .ok_or(GraphError::NodeNotFound(node))?
            .reset();
        Ok(())
    }

    // --- Internal helpers ---

    pub(crate) fn insert_node(&mut self, group: GroupId, operation: Box<dyn Operation>) -> NodeId {
        let handle = self
            .nodes
            .insert_with(|h| Node::new(NodeId(h), group, operation));
        let id = NodeId(handle);
        if let Some(data) = self.groups.get_mut(group.0) {
            data.members.push(id);
        }
        #[cfg(feature = "tracing")]
        if let Some(node) = self.nodes.get(handle) {
            tracing::debug!("graph_add: {} node {id} in {group}", node.operation().name());
        }
        id
    }

    fn upstream_of(&self, node: NodeId, channel: usize) -> Option<NodeId> {
        self.nodes.get(node.0)?.inputs()[channel].source_node()
    }

    fn clear_closure(&mut self, id: NodeId) {
        let pass = self.reset_pass;
        let count = match self.nodes.get_mut(id.0) {
            Some(node) if node.reset_pass != pass => {
                node.reset_pass = pass;
                node.mark_not_run();
                node.num_inputs()
            }
            _ => return,
        };
        for channel in 0..count {
            if let Some(upstream) = self.upstream_of(id, channel) {
                self.clear_closure(upstream);
            }
        }
    }

    fn evaluate(&mut self, id: NodeId) {
        let count = match self.nodes.get(id.0) {
            Some(node) if !node.has_run() => node.num_inputs(),
            _ => return,
        };
        for channel in 0..count {
            if let Some(upstream) = self.upstream_of(id, channel) {
                self.evaluate(upstream);
            }
        }
        if let Some((node, peers)) = self.nodes.split_mut(id.0) {
            node.mark_run();
            node.evaluate(peers);
        }
    }
}

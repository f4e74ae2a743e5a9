//! Tag-driven node factory over a [`Graph`].
//!
//! A [`Schema`] pairs a graph with an [`OperationRegistry`]. Nodes are
//! created from a runtime tag and handed to a configuration callback before
//! the caller wires them, which is what an editor or loader needs when the
//! kernel type is only known as a string.

#[cfg(not(feature = "std"))]
use alloc::{collections::BTreeMap, string::String, string::ToString};
use core::fmt;
#[cfg(feature = "std")]
use std::collections::BTreeMap;

use patchbay_core::{Graph, GraphError, GroupId, InputBinding, Node, NodeId};

use crate::OperationRegistry;

/// Errors from [`Schema`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// No operation is registered under the tag.
    UnknownOperation(String),
    /// The underlying graph rejected the request.
    Graph(GraphError),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOperation(tag) => write!(f, "unknown operation '{tag}'"),
            Self::Graph(err) => write!(f, "{err}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Graph(err) => Some(err),
            Self::UnknownOperation(_) => None,
        }
    }
}

impl From<GraphError> for SchemaError {
    fn from(err: GraphError) -> Self {
        Self::Graph(err)
    }
}

/// Graph plus operation registry, keyed by node id.
///
/// Remembers the tag each node was created from so hosts can describe a
/// patch without downcasting operations.
pub struct Schema {
    graph: Graph,
    registry: OperationRegistry,
    tags: BTreeMap<NodeId, &'static str>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    /// Creates an empty schema using the built-in operations.
    pub fn new() -> Self {
        Self::with_registry(OperationRegistry::new())
    }

    /// Creates an empty schema over a custom registry.
    pub fn with_registry(registry: OperationRegistry) -> Self {
        Self {
            graph: Graph::new(),
            registry,
            tags: BTreeMap::new(),
        }
    }

    /// Root group of the underlying graph.
    pub fn root(&self) -> GroupId {
        self.graph.root()
    }

    /// Creates a node in the root group from `tag`, then runs `configure` on it.
    pub fn new_node(
        &mut self,
        tag: &str,
        configure: impl FnOnce(&mut Node),
    ) -> Result<NodeId, SchemaError> {
        let root = self.graph.root();
        self.new_node_in(root, tag, configure)
    }

    /// Creates a node owned by `group` from `tag`, then runs `configure` on it.
    pub fn new_node_in(
        &mut self,
        group: GroupId,
        tag: &str,
        configure: impl FnOnce(&mut Node),
    ) -> Result<NodeId, SchemaError> {
        let descriptor = self
            .registry
            .get(tag)
            .ok_or_else(|| SchemaError::UnknownOperation(tag.to_string()))?;
        let id_tag = descriptor.id;
        let operation = self
            .registry
            .create(tag)
            .ok_or_else(|| SchemaError::UnknownOperation(tag.to_string()))?;
        let id = self.graph.add_boxed_node_in(group, operation)?;
        if let Some(node) = self.graph.node_mut(id) {
            configure(node);
        }
        // More tags than live nodes means some were removed through `graph_mut`.
        if self.tags.len() >= self.graph.node_count() {
            self.prune_tags();
        }
        self.tags.insert(id, id_tag);
        Ok(id)
    }

    /// Creates a group nested in `parent`.
    pub fn new_group(
        &mut self,
        parent: GroupId,
        num_inputs: usize,
        num_outputs: usize,
    ) -> Result<GroupId, SchemaError> {
        Ok(self.graph.new_group(parent, num_inputs, num_outputs)?)
    }

    /// Removes `group` with its nested groups and member nodes.
    pub fn remove_group(&mut self, group: GroupId) -> Result<(), SchemaError> {
        self.graph.remove_group(group)?;
        self.prune_tags();
        Ok(())
    }

    /// Resolves a node id, for inspection.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.graph.node(id)
    }

    /// Resolves a node id, for rewiring local bindings.
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.graph.node_mut(id)
    }

    /// Tag the node was created from.
    ///
    /// `None` for nodes added directly to the graph and for nodes that no
    /// longer exist.
    pub fn tag(&self, id: NodeId) -> Option<&'static str> {
        if !self.graph.contains(id) {
            return None;
        }
        self.tags.get(&id).copied()
    }

    /// Nodes created through the schema that are still alive, in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &'static str)> + '_ {
        self.tags
            .iter()
            .filter(|(id, _)| self.graph.contains(**id))
            .map(|(&id, &tag)| (id, tag))
    }

    /// Removes a node from whichever group owns it.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), SchemaError> {
        let owner = self
            .graph
            .node(id)
            .ok_or(GraphError::NodeNotFound(id))?
            .owner();
        self.graph.remove_node(owner, id)?;
        self.tags.remove(&id);
        Ok(())
    }

    /// Connects output `from_channel` of `from` to input `to_channel` of `to`.
    pub fn connect(
        &mut self,
        from: NodeId,
        from_channel: usize,
        to: NodeId,
        to_channel: usize,
    ) -> Result<(), SchemaError> {
        Ok(self.graph.connect(from, from_channel, to, to_channel)?)
    }

    /// Binds input `channel` of `node`.
    pub fn set_input(
        &mut self,
        node: NodeId,
        channel: usize,
        binding: impl Into<InputBinding>,
    ) -> Result<(), SchemaError> {
        Ok(self.graph.set_input(node, channel, binding)?)
    }

    /// Evaluates `node` for one cycle.
    pub fn update(&mut self, node: NodeId) -> Result<(), SchemaError> {
        Ok(self.graph.update(node)?)
    }

    /// Cached value of output `channel` of `node`.
    pub fn get(&self, node: NodeId, channel: usize) -> Option<f32> {
        self.graph.get(node, channel)
    }

    /// The registry nodes are created from.
    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// The underlying graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Mutable access to the underlying graph, for group wiring.
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    fn prune_tags(&mut self) {
        let graph = &self.graph;
        self.tags.retain(|&id, _| graph.contains(id));
    }
}

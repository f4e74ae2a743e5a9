//! Groups: nested subgraphs that behave like a single multi-channel node.
//!
//! A group owns an input proxy, an output proxy, its member nodes, and its
//! child groups. Both proxies run [`Passthrough`], so reading a proxy output
//! is reading whatever its matching input is bound to.
//!
//! - Inside the group, member nodes wire from the input proxy's outputs.
//! - Outside, the group's inputs are the input proxy's inputs and its outputs
//!   are the output proxy's outputs.
//!
//! Updating a group is updating its output proxy, so members that no output
//! depends on are never evaluated.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, string::String, vec::Vec};
use core::fmt;

use crate::external::ExternalValue;
use crate::ops::Passthrough;

use super::arena::Handle;
use super::binding::InputBinding;
use super::node::{Node, NodeId};
use super::processing::{Graph, GraphError};

/// Unique identifier for a group in a [`Graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub(crate) Handle);

impl GroupId {
    /// Returns the raw slot index.
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

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupId({}v{})", self.index(), self.generation())
    }
}

/// Which side of a group a wiring call refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupPort {
    /// The input proxy. Its outputs feed the group's members.
    Input,
    /// The output proxy. Its outputs are the group's results.
    Output,
}

/// Bookkeeping for one group.
pub(crate) struct GroupData {
    pub input: NodeId,
    pub output: NodeId,
    pub parent: Option<GroupId>,
    pub name: Option<String>,
    /// Interior nodes, proxies excluded.
    pub members: Vec<NodeId>,
    pub children: Vec<GroupId>,
}

impl Graph {
    // --- Group lifecycle ---

    /// Creates a group nested in `parent` with the given channel counts.
    pub fn new_group(
        &mut self,
        parent: GroupId,
        num_inputs: usize,
        num_outputs: usize,
    ) -> Result<GroupId, GraphError> {
        if !self.groups.contains(parent.0) {
            return Err(GraphError::GroupNotFound(parent));
        }
        let id = self.insert_group(Some(parent), num_inputs, num_outputs);
        if let Some(data) = self.groups.get_mut(parent.0) {
            data.children.push(id);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "graph_group: {id} in {parent} ({num_inputs} in, {num_outputs} out)"
        );
        Ok(id)
    }

    /// Removes a group with its members, proxies, and nested groups.
    ///
    /// Bindings outside the group that read from it go stale and read `0.0`.
    pub fn remove_group(&mut self, group: GroupId) -> Result<(), GraphError> {
        if group == self.root {
            return Err(GraphError::RootGroup);
        }
        let parent = self
            .groups
            .get(group.0)
            .ok_or(GraphError::GroupNotFound(group))?
            .parent;
        if let Some(data) = parent.and_then(|p| self.groups.get_mut(p.0)) {
            data.children.retain(|&c| c != group);
        }
        self.drop_group_tree(group);
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_group: removed {group}");
        Ok(())
    }

    /// Returns `true` if `group` names a live group.
    pub fn contains_group(&self, group: GroupId) -> bool {
        self.groups.contains(group.0)
    }

    /// Number of live groups, the root included.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Enclosing group. `None` for the root or a stale id.
    pub fn group_parent(&self, group: GroupId) -> Option<GroupId> {
        self.groups.get(group.0)?.parent
    }

    /// Interior nodes of `group`, proxies excluded, in insertion order.
    pub fn group_members(&self, group: GroupId) -> Option<&[NodeId]> {
        self.groups.get(group.0).map(|g| g.members.as_slice())
    }

    /// Groups nested directly in `group`.
    pub fn group_children(&self, group: GroupId) -> Option<&[GroupId]> {
        self.groups.get(group.0).map(|g| g.children.as_slice())
    }

    /// Optional display name.
    pub fn group_name(&self, group: GroupId) -> Option<&str> {
        self.groups.get(group.0)?.name.as_deref()
    }

    /// Sets the display name.
    pub fn set_group_name(
        &mut self,
        group: GroupId,
        name: impl Into<String>,
    ) -> Result<(), GraphError> {
        self.groups
            .get_mut(group.0)
            .ok_or(GraphError::GroupNotFound(group))?
            .name = Some(name.into());
        Ok(())
    }

    /// Looks up a node owned by `group`.
    pub fn group_node(&self, group: GroupId, node: NodeId) -> Result<&Node, GraphError> {
        let data = self.nodes.get(node.0).ok_or(GraphError::NodeNotFound(node))?;
        if data.owner() == group {
            Ok(data)
        } else {
            Err(GraphError::NotInGroup { node, group })
        }
    }

    // --- Proxies and arity ---

    /// The input proxy node of `group`.
    pub fn group_input(&self, group: GroupId) -> Option<NodeId> {
        self.groups.get(group.0).map(|g| g.input)
    }

    /// The output proxy node of `group`.
    pub fn group_output(&self, group: GroupId) -> Option<NodeId> {
        self.groups.get(group.0).map(|g| g.output)
    }

    /// The proxy on the given side of `group`.
    pub fn group_port(&self, group: GroupId, port: GroupPort) -> Option<NodeId> {
        match port {
            GroupPort::Input => self.group_input(group),
            GroupPort::Output => self.group_output(group),
        }
    }

    /// Number of group inputs.
    pub fn group_num_inputs(&self, group: GroupId) -> Option<usize> {
        self.proxy(group, GroupPort::Input).map(Node::num_inputs)
    }

    /// Number of group outputs.
    pub fn group_num_outputs(&self, group: GroupId) -> Option<usize> {
        self.proxy(group, GroupPort::Output).map(Node::num_outputs)
    }

    /// Resizes the group's inputs. Existing bindings below the new count are kept.
    pub fn set_group_num_inputs(
        &mut self,
        group: GroupId,
        count: usize,
    ) -> Result<usize, GraphError> {
        self.resize_proxy(group, GroupPort::Input, count)
    }

    /// Resizes the group's outputs. Existing bindings below the new count are kept.
    pub fn set_group_num_outputs(
        &mut self,
        group: GroupId,
        count: usize,
    ) -> Result<usize, GraphError> {
        self.resize_proxy(group, GroupPort::Output, count)
    }

    // --- Group wiring ---

    /// Binds group input `channel`.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is out of range.
    pub fn set_group_input(
        &mut self,
        group: GroupId,
        channel: usize,
        binding: impl Into<InputBinding>,
    ) -> Result<(), GraphError> {
        let proxy = self
            .group_input(group)
            .ok_or(GraphError::GroupNotFound(group))?;
        self.set_input(proxy, channel, binding)
    }

    /// Binds group input `channel` to a literal.
    pub fn set_group_constant(
        &mut self,
        group: GroupId,
        channel: usize,
        value: f32,
    ) -> Result<(), GraphError> {
        self.set_group_input(group, channel, InputBinding::Constant(value))
    }

    /// Binds group input `channel` to collaborator-owned memory.
    pub fn set_group_external(
        &mut self,
        group: GroupId,
        channel: usize,
        value: &ExternalValue,
    ) -> Result<(), GraphError> {
        self.set_group_input(group, channel, InputBinding::external(value))
    }

    /// Binds group input `channel` to output `from_channel` of a node.
    pub fn set_group_input_from_node(
        &mut self,
        group: GroupId,
        channel: usize,
        from: NodeId,
        from_channel: usize,
    ) -> Result<(), GraphError> {
        self.set_group_input(group, channel, InputBinding::node(from, from_channel))
    }

    /// Binds group input `channel` to a channel of another group's proxy.
    ///
    /// With [`GroupPort::Output`] this chains groups; with
    /// [`GroupPort::Input`] it aliases a group input of the enclosing group,
    /// which is how nested groups see their parent's inputs.
    pub fn set_group_input_from_group(
        &mut self,
        group: GroupId,
        channel: usize,
        from: GroupId,
        from_channel: usize,
        port: GroupPort,
    ) -> Result<(), GraphError> {
        let proxy = self
            .group_port(from, port)
            .ok_or(GraphError::GroupNotFound(from))?;
        self.set_group_input_from_node(group, channel, proxy, from_channel)
    }

    /// Routes output `from_channel` of an interior node to group output `channel`.
    pub fn set_group_output(
        &mut self,
        group: GroupId,
        channel: usize,
        from: NodeId,
        from_channel: usize,
    ) -> Result<(), GraphError> {
        let proxy = self
            .group_output(group)
            .ok_or(GraphError::GroupNotFound(group))?;
        self.connect(from, from_channel, proxy, channel)
    }

    /// Routes a channel of another group's proxy to group output `channel`.
    pub fn set_group_output_from_group(
        &mut self,
        group: GroupId,
        channel: usize,
        from: GroupId,
        from_channel: usize,
        port: GroupPort,
    ) -> Result<(), GraphError> {
        let proxy = self
            .group_port(from, port)
            .ok_or(GraphError::GroupNotFound(from))?;
        self.set_group_output(group, channel, proxy, from_channel)
    }

    // --- Group evaluation ---

    /// Evaluates the group for one cycle by updating its output proxy.
    pub fn update_group(&mut self, group: GroupId) -> Result<(), GraphError> {
        let proxy = self
            .group_output(group)
            .ok_or(GraphError::GroupNotFound(group))?;
        self.update(proxy)
    }

    /// Value of group output `channel` from the latest evaluation.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is out of range.
    pub fn group_get(&self, group: GroupId, channel: usize) -> Option<f32> {
        self.get(self.group_output(group)?, channel)
    }

    // --- Internal helpers ---

    pub(crate) fn insert_group(
        &mut self,
        parent: Option<GroupId>,
        num_inputs: usize,
        num_outputs: usize,
    ) -> GroupId {
        let id = GroupId(self.groups.insert(GroupData {
            input: NodeId::sentinel(),
            output: NodeId::sentinel(),
            parent,
            name: None,
            members: Vec::new(),
            children: Vec::new(),
        }));
        let input = self.insert_proxy(id, num_inputs);
        let output = self.insert_proxy(id, num_outputs);
        if let Some(data) = self.groups.get_mut(id.0) {
            data.input = input;
            data.output = output;
        }
        id
    }

    fn insert_proxy(&mut self, group: GroupId, channels: usize) -> NodeId {
        let op = Box::new(Passthrough::new(channels));
        NodeId(
            self.nodes
                .insert_with(|h| Node::new_proxy(NodeId(h), group, op)),
        )
    }

    fn proxy(&self, group: GroupId, port: GroupPort) -> Option<&Node> {
        self.nodes.get(self.group_port(group, port)?.0)
    }

    fn resize_proxy(
        &mut self,
        group: GroupId,
        port: GroupPort,
        count: usize,
    ) -> Result<usize, GraphError> {
        let proxy = self
            .group_port(group, port)
            .ok_or(GraphError::GroupNotFound(group))?;
        let node = self
            .nodes
            .get_mut(proxy.0)
            .ok_or(GraphError::NodeNotFound(proxy))?;
        Ok(node.set_num_inputs(count))
    }

    fn drop_group_tree(&mut self, group: GroupId) {
        let Some(data) = self.groups.remove(group.0) else {
            return;
        };
        for child in data.children {
            self.drop_group_tree(child);
        }
        for member in data.members {
            self.nodes.remove(member.0);
        }
        self.nodes.remove(data.input.0);
        self.nodes.remove(data.output.0);
    }
}

//! Input binding: where one input channel reads its value from.
//!
//! An [`InputBinding`] is an explicit sum type. The evaluating node does not
//! track which variant is active; [`Operation`](crate::Operation) kernels read
//! through [`Inputs::get`](crate::Inputs::get), which resolves any variant.
//!
//! | Variant | Reads |
//! |---------|-------|
//! | `Empty` | `0.0` |
//! | `Node` | cached output `channel` of another node (a graph edge) |
//! | `Constant` | the literal |
//! | `External` | the current value of a collaborator-owned cell |
//!
//! A `Node` binding whose target was removed, or whose channel no longer
//! exists because the target shrank, reads `0.0` like `Empty`.

use crate::external::{ExternalRef, ExternalValue};

use super::arena::Peers;
use super::node::{Node, NodeId};

/// Source of one input channel.
#[derive(Clone, Debug, Default)]
pub enum InputBinding {
    /// Unbound. Reads `0.0`.
    #[default]
    Empty,
    /// Graph edge from output `channel` of `node`.
    Node {
        /// Upstream node.
        node: NodeId,
        /// Output channel on the upstream node.
        channel: usize,
    },
    /// Literal value.
    Constant(f32),
    /// Non-owning reference to collaborator memory.
    External(ExternalRef),
}

impl InputBinding {
    /// Graph edge from output `channel` of `node`.
    pub fn node(node: NodeId, channel: usize) -> Self {
        Self::Node { node, channel }
    }

    /// Reference to an external value.
    pub fn external(value: &ExternalValue) -> Self {
        Self::External(value.downgrade())
    }

    /// Returns `true` for [`InputBinding::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Upstream node for graph edges.
    pub fn source_node(&self) -> Option<NodeId> {
        match self {
            Self::Node { node, .. } => Some(*node),
            _ => None,
        }
    }

    /// Value of a binding that does not need the graph to resolve.
    ///
    /// Returns `None` for graph edges.
    pub fn literal(&self) -> Option<f32> {
        match self {
            Self::Empty => Some(0.0),
            Self::Constant(value) => Some(*value),
            Self::External(r) => Some(r.get()),
            Self::Node { .. } => None,
        }
    }

    #[inline]
    pub(crate) fn resolve(&self, peers: &Peers<'_, Node>) -> f32 {
        match self {
            Self::Empty => 0.0,
            Self::Constant(value) => *value,
            Self::External(r) => r.get(),
            Self::Node { node, channel } => peers
                .get(node.0)
                .and_then(|n| n.output_slot(*channel))
                .map_or(0.0, |slot| slot.value),
        }
    }
}

impl From<f32> for InputBinding {
    fn from(value: f32) -> Self {
        Self::Constant(value)
    }
}

impl From<&ExternalValue> for InputBinding {
    fn from(value: &ExternalValue) -> Self {
        Self::external(value)
    }
}

impl From<ExternalRef> for InputBinding {
    fn from(value: ExternalRef) -> Self {
        Self::External(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let b = InputBinding::default();
        assert!(b.is_empty());
        assert_eq!(b.literal(), Some(0.0));
        assert_eq!(b.resolve(&Peers::empty()), 0.0);
    }

    #[test]
    fn test_constant_and_external() {
        let ext = ExternalValue::new(1.8);
        assert_eq!(InputBinding::from(2.3).literal(), Some(2.3));
        assert_eq!(InputBinding::from(&ext).literal(), Some(1.8));
        ext.set(0.5);
        assert_eq!(InputBinding::from(&ext).resolve(&Peers::empty()), 0.5);
    }

    #[test]
    fn test_node_binding_without_graph_reads_zero() {
        let b = InputBinding::node(NodeId::sentinel(), 0);
        assert_eq!(b.source_node(), Some(NodeId::sentinel()));
        assert_eq!(b.literal(), None);
        assert_eq!(b.resolve(&Peers::empty()), 0.0);
    }
}

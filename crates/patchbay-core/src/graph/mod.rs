//! Pull-evaluated dependency graph.
//!
//! The graph module holds the mutable topology and evaluates it on demand:
//! ask for a node's output and everything upstream of it runs first, once.
//!
//! # Architecture
//!
//! - [`Graph`] owns everything. Nodes and groups live in generational
//!   [`Arena`](arena::Arena)s and are addressed by [`NodeId`] / [`GroupId`].
//! - [`Node`] wraps one [`Operation`](crate::Operation), its
//!   [`InputBinding`]s and its cached output values.
//! - Groups are subgraphs framed by two proxy nodes. The input proxy publishes
//!   whatever the group's inputs are bound to; the output proxy collects the
//!   group's results. Groups nest.
//!
//! # Evaluation Model
//!
//! Evaluation is demand-driven and memoized per cycle. Each
//! [`update()`](Graph::update) clears the "has run" state over the requested
//! node's upstream closure, then evaluates that closure depth-first,
//! post-order. Nodes that nothing requested are never evaluated.
//!
//! # Cycles
//!
//! Wiring that would close a loop is rejected with
//! [`GraphError::CycleDetected`], so every reachable closure is a DAG.
//!
//! # no_std Support
//!
//! This module is `no_std` compatible with `alloc`.

pub mod arena;
pub mod binding;
pub mod group;
pub mod node;
mod processing;

pub use binding::InputBinding;
pub use group::{GroupId, GroupPort};
pub use node::{EvalState, Node, NodeId, OutputSlot};
pub use processing::{Graph, GraphError};

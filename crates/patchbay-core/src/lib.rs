//! Patchbay Core - pull-based dependency graph engine for real-time signal networks
//!
//! This crate provides a mutable directed graph of computation nodes. Each node
//! wraps a pluggable [`Operation`], is evaluated lazily when something
//! downstream asks for it, and runs at most once per update cycle no matter
//! how many consumers share it.
//!
//! # Core Abstractions
//!
//! ## Graph
//!
//! - [`Graph`] - Arena owning every node and group, and the evaluation driver
//! - [`NodeId`] / [`GroupId`] - Generational handles; stale handles are detectable
//! - [`InputBinding`] - Where an input channel reads from (edge, constant, external, nothing)
//! - [`Node`] - One operation plus its bindings and cached outputs
//!
//! ## Operations
//!
//! - [`Operation`] - Object-safe compute kernel trait
//! - [`Inputs`] / [`Outputs`] - Channel views handed to [`Operation::process`]
//! - Built-in kernels in [`ops`]: passthrough, arithmetic, logic, integral, lowpass
//!
//! ## External memory
//!
//! - [`ExternalValue`] - Collaborator-owned float cell
//! - [`ExternalRef`] - Non-owning reference bound into a node input
//!
//! # Example
//!
//! ```rust
//! use patchbay_core::{Graph, ExternalValue, InputBinding};
//! use patchbay_core::ops::{Add, Multiply};
//!
//! let mut graph = Graph::new();
//! let signal = ExternalValue::new(1.8);
//!
//! let add = graph.add_node(Add::new());
//! let mul = graph.add_node(Multiply::new());
//!
//! let node = graph.node_mut(add).unwrap();
//! node.set_external(0, &signal);
//! node.set_constant(1, 2.3);
//!
//! graph.connect(add, 0, mul, 0).unwrap();
//! graph.node_mut(mul).unwrap().set_constant(1, 2.0);
//!
//! graph.update(mul).unwrap();
//! assert!((graph.get(mul, 0).unwrap() - 8.2).abs() < 1e-4);
//! ```
//!
//! # Groups
//!
//! A group is a subgraph with an input proxy and an output proxy. Wire the
//! proxies and the group behaves like a single multi-channel node:
//!
//! ```rust
//! use patchbay_core::{Graph, GroupPort};
//! use patchbay_core::ops::Negate;
//!
//! let mut graph = Graph::new();
//! let group = graph.new_group(graph.root(), 1, 1).unwrap();
//! let neg = graph.add_node_in(group, Negate::new()).unwrap();
//!
//! let proxy_in = graph.group_input(group).unwrap();
//! graph.connect(proxy_in, 0, neg, 0).unwrap();
//! graph.set_group_output(group, 0, neg, 0).unwrap();
//! graph.set_group_constant(group, 0, 3.0).unwrap();
//!
//! graph.update_group(group).unwrap();
//! assert_eq!(graph.group_get(group, 0), Some(-3.0));
//! # let _ = GroupPort::Output;
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! patchbay-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Once per cycle**: a node's operation runs at most once per `update()`
//! - **Allocation-light**: evaluation never touches the heap
//! - **Safe handles**: removing a node invalidates references to it instead of dangling
//! - **Acyclic by construction**: wiring that would close a loop is rejected

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod external;
pub mod graph;
pub mod math;
pub mod operation;
pub mod ops;

// Re-export main types at crate root
pub use external::{ExternalRef, ExternalValue};
pub use graph::{
    EvalState, Graph, GraphError, GroupId, GroupPort, InputBinding, Node, NodeId, OutputSlot,
    arena::{Arena, Handle},
};
pub use math::{bool_to_signal, flush_denormal, is_truthy};
pub use operation::{Inputs, Operation, Outputs};

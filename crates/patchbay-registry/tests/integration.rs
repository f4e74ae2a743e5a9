//! Integration tests for patchbay-registry.
//!
//! Builds patches purely from string tags, the way an editor or loader would.

use patchbay_core::{ExternalValue, GroupPort};
use patchbay_registry::{OperationRegistry, Schema, SchemaError};

#[test]
fn arithmetic_chain_from_tags() {
    let signal = ExternalValue::new(1.8);
    let mut schema = Schema::new();

    let add = schema
        .new_node("add", |node| {
            node.set_external(0, &signal);
            node.set_constant(1, 2.3);
        })
        .unwrap();
    let mul = schema
        .new_node("multiply", |node| node.set_constant(1, 2.0))
        .unwrap();
    let sub = schema
        .new_node("subtract", |node| node.set_constant(1, 1.3))
        .unwrap();
    let neg = schema.new_node("negate", |_| {}).unwrap();

    schema.connect(add, 0, mul, 0).unwrap();
    schema.connect(mul, 0, sub, 0).unwrap();
    schema.connect(sub, 0, neg, 0).unwrap();

    schema.update(neg).unwrap();
    assert!((schema.get(neg, 0).unwrap() + 6.9).abs() < 1e-4);
}

#[test]
fn every_registered_tag_builds_an_evaluable_node() {
    let registry = OperationRegistry::new();
    let tags: Vec<&str> = registry.all().iter().map(|d| d.id).collect();
    let mut schema = Schema::new();

    for tag in tags {
        let id = schema
            .new_node(tag, |node| {
                for ch in 0..node.num_inputs() {
                    node.set_constant(ch, 0.5);
                }
            })
            .unwrap();
        schema.update(id).unwrap();
        let node = schema.get_node(id).unwrap();
        for ch in 0..node.num_outputs() {
            assert!(node.output(ch).is_finite(), "{tag} output {ch}");
        }
        assert_eq!(schema.tag(id), Some(tag));
    }
}

#[test]
fn variadic_nodes_grow_in_configure() {
    let mut schema = Schema::new();
    let and = schema
        .new_node("and", |node| {
            node.push_constant(1.0);
            node.push_constant(1.0);
            node.set_constant(0, 1.0);
            node.set_constant(1, 1.0);
        })
        .unwrap();
    schema.update(and).unwrap();
    assert_eq!(schema.get_node(and).unwrap().num_inputs(), 4);
    assert_eq!(schema.get(and, 0), Some(1.0));

    schema.set_input(and, 3, 0.0).unwrap();
    schema.update(and).unwrap();
    assert_eq!(schema.get(and, 0), Some(0.0));
}

#[test]
fn group_wiring_through_graph_mut() {
    let mut schema = Schema::new();
    let root = schema.root();
    let group = schema.new_group(root, 1, 1).unwrap();
    let integral = schema.new_node_in(group, "integral", |_| {}).unwrap();

    let graph = schema.graph_mut();
    let proxy_in = graph.group_port(group, GroupPort::Input).unwrap();
    graph.connect(proxy_in, 0, integral, 0).unwrap();
    graph.set_group_output(group, 0, integral, 0).unwrap();
    graph.set_group_constant(group, 0, 0.25).unwrap();

    for _ in 0..4 {
        schema.graph_mut().update_group(group).unwrap();
    }
    assert_eq!(schema.graph().group_get(group, 0), Some(1.0));
}

#[test]
fn missing_group_is_reported() {
    let mut schema = Schema::new();
    let root = schema.root();
    let group = schema.new_group(root, 0, 0).unwrap();
    schema.graph_mut().remove_group(group).unwrap();
    let err = schema.new_node_in(group, "add", |_| {}).unwrap_err();
    assert!(matches!(err, SchemaError::Graph(_)));
}

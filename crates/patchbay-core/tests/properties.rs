//! Property-based tests for patchbay-core evaluation.
//!
//! Checks determinism of stateful networks, once-per-cycle memoization on
//! random fan-out, and wiring-time cycle rejection, using proptest for
//! randomized inputs and topologies.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use patchbay_core::ops::{Add, Integral, Lowpass, Negate};
use patchbay_core::{ExternalValue, Graph, GraphError, Inputs, NodeId, Operation, Outputs};
use proptest::prelude::*;

/// Identity kernel that counts its evaluations.
struct Probe(Arc<AtomicUsize>);

impl Operation for Probe {
    fn name(&self) -> &str {
        "Probe"
    }
    fn num_inputs(&self) -> usize {
        1
    }
    fn num_outputs(&self) -> usize {
        1
    }
    fn process(&mut self, inputs: &Inputs<'_>, outputs: &mut Outputs<'_>) {
        self.0.fetch_add(1, Ordering::Relaxed);
        outputs.set(0, inputs.get(0));
    }
}

/// Integrator feeding a lowpass, driven by one external value.
fn build_filter_chain(graph: &mut Graph, signal: &ExternalValue) -> NodeId {
    let acc = graph.add_node(Integral::new());
    graph.set_input(acc, 0, signal).unwrap();
    let lp = graph.add_node(Lowpass::new());
    graph.set_input(lp, 0, 0.25).unwrap();
    graph.set_input(lp, 1, 0.3).unwrap();
    graph.connect(acc, 0, lp, 2).unwrap();
    lp
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Two identical graphs fed the same sequence produce identical bits.
    #[test]
    fn stateful_evaluation_is_deterministic(
        input in prop::collection::vec(-1.0f32..=1.0f32, 1..64),
    ) {
        let signal = ExternalValue::new(0.0);
        let mut a = Graph::new();
        let mut b = Graph::new();
        let out_a = build_filter_chain(&mut a, &signal);
        let out_b = build_filter_chain(&mut b, &signal);

        for &x in &input {
            signal.set(x);
            a.update(out_a).unwrap();
            b.update(out_b).unwrap();
            let ya = a.get(out_a, 0).unwrap();
            let yb = b.get(out_b, 0).unwrap();
            prop_assert_eq!(ya.to_bits(), yb.to_bits());
            prop_assert!(ya.is_finite());
        }
    }

    /// A shared source runs exactly once per update however many consumers
    /// read it, and never runs without an update.
    #[test]
    fn shared_source_runs_once_per_update(
        fan_out in 1usize..16,
        cycles in 1usize..8,
        value in -100.0f32..100.0f32,
    ) {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut graph = Graph::new();
        let source = graph.add_node(Probe(Arc::clone(&calls)));
        graph.set_input(source, 0, value).unwrap();

        let sum = graph.add_node(Add::new());
        graph.node_mut(sum).unwrap().set_num_inputs(fan_out);
        for ch in 0..fan_out {
            let neg = graph.add_node(Negate::new());
            graph.connect(source, 0, neg, 0).unwrap();
            graph.connect(neg, 0, sum, ch).unwrap();
        }
        prop_assert_eq!(calls.load(Ordering::Relaxed), 0);

        for cycle in 1..=cycles {
            graph.update(sum).unwrap();
            prop_assert_eq!(calls.load(Ordering::Relaxed), cycle);
        }
        let expected = -value * fan_out as f32;
        let actual = graph.get(sum, 0).unwrap();
        prop_assert!((actual - expected).abs() <= expected.abs() * 1e-5 + 1e-5);
    }

    /// Along a random chain, closing the loop from any node to any node
    /// upstream of it is rejected and leaves the graph evaluable.
    #[test]
    fn back_edges_are_rejected(
        len in 2usize..12,
        from_seed in any::<usize>(),
        to_seed in any::<usize>(),
    ) {
        let mut graph = Graph::new();
        let mut chain = Vec::with_capacity(len);
        let head = graph.add_node(Add::new());
        graph.set_input(head, 0, 1.0).unwrap();
        chain.push(head);
        for _ in 1..len {
            let next = graph.add_node(Add::new());
            graph.connect(*chain.last().unwrap(), 0, next, 0).unwrap();
            chain.push(next);
        }

        let to = to_seed % len;
        let from = to + from_seed % (len - to);
        let result = graph.connect(chain[from], 0, chain[to], 1);
        prop_assert_eq!(
            result,
            Err(GraphError::CycleDetected { from: chain[from], to: chain[to] })
        );

        let tail = chain[len - 1];
        graph.update(tail).unwrap();
        prop_assert_eq!(graph.get(tail, 0), Some(1.0));
    }
}

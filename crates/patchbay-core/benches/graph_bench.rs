//! Criterion benchmarks for graph evaluation (`patchbay-core::graph`).
//!
//! Measures per-cycle overhead of pull evaluation with trivial kernels, so the
//! numbers are dominated by traversal and memoization rather than arithmetic.
//!
//! - **Chain**: linear Negate chains of increasing length
//! - **Diamond ladder**: stacked diamonds, where naive re-evaluation is exponential
//! - **Groups**: the same chain wrapped in nested groups
//!
//! Run with: `cargo bench -p patchbay-core -- graph/`
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use patchbay_core::ops::{Add, Negate};
use patchbay_core::{ExternalValue, Graph, NodeId};

const CHAIN_LENGTHS: &[usize] = &[8, 64, 512];
const LADDER_DEPTHS: &[usize] = &[4, 16, 64];

fn build_chain(graph: &mut Graph, signal: &ExternalValue, len: usize) -> NodeId {
    let mut prev = graph.add_node(Negate::new());
    graph.set_input(prev, 0, signal).unwrap();
    for _ in 1..len {
        let next = graph.add_node(Negate::new());
        graph.connect(prev, 0, next, 0).unwrap();
        prev = next;
    }
    prev
}

fn build_ladder(graph: &mut Graph, signal: &ExternalValue, depth: usize) -> NodeId {
    let mut top = graph.add_node(Negate::new());
    graph.set_input(top, 0, signal).unwrap();
    for _ in 0..depth {
        let left = graph.add_node(Negate::new());
        let right = graph.add_node(Negate::new());
        graph.connect(top, 0, left, 0).unwrap();
        graph.connect(top, 0, right, 0).unwrap();
        let join = graph.add_node(Add::new());
        graph.connect(left, 0, join, 0).unwrap();
        graph.connect(right, 0, join, 1).unwrap();
        top = join;
    }
    top
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/chain");
    for &len in CHAIN_LENGTHS {
        let signal = ExternalValue::new(0.5);
        let mut graph = Graph::new();
        let tail = build_chain(&mut graph, &signal, len);
        group.bench_with_input(BenchmarkId::new("update", len), &len, |b, _| {
            b.iter(|| {
                graph.update(black_box(tail)).unwrap();
                black_box(graph.get(tail, 0));
            });
        });
    }
    group.finish();
}

fn bench_ladder(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/diamond_ladder");
    for &depth in LADDER_DEPTHS {
        let signal = ExternalValue::new(0.5);
        let mut graph = Graph::new();
        let bottom = build_ladder(&mut graph, &signal, depth);
        group.bench_with_input(BenchmarkId::new("update", depth), &depth, |b, _| {
            b.iter(|| {
                graph.update(black_box(bottom)).unwrap();
                black_box(graph.get(bottom, 0));
            });
        });
    }
    group.finish();
}

fn bench_nested_groups(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/groups");
    for &depth in &[1usize, 4, 16] {
        let signal = ExternalValue::new(0.5);
        let mut graph = Graph::new();
        let mut parent = graph.root();
        let mut groups = Vec::with_capacity(depth);
        for _ in 0..depth {
            let g = graph.new_group(parent, 1, 1).unwrap();
            groups.push(g);
            parent = g;
        }
        // Innermost group negates; every level routes it outwards.
        let innermost = parent;
        let neg = graph.add_node_in(innermost, Negate::new()).unwrap();
        let inner_in = graph.group_input(innermost).unwrap();
        graph.connect(inner_in, 0, neg, 0).unwrap();
        graph.set_group_output(innermost, 0, neg, 0).unwrap();
        for pair in groups.windows(2) {
            let (outer, inner) = (pair[0], pair[1]);
            let outer_in = graph.group_input(outer).unwrap();
            let inner_out = graph.group_output(inner).unwrap();
            graph.set_group_input_from_node(inner, 0, outer_in, 0).unwrap();
            graph.set_group_output(outer, 0, inner_out, 0).unwrap();
        }
        let Some(&top) = groups.first() else {
            continue;
        };
        graph.set_group_external(top, 0, &signal).unwrap();

        group.bench_with_input(BenchmarkId::new("update", depth), &depth, |b, _| {
            b.iter(|| {
                graph.update_group(black_box(top)).unwrap();
                black_box(graph.group_get(top, 0));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_chain, bench_ladder, bench_nested_groups);
criterion_main!(benches);

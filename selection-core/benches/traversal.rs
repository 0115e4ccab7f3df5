//! Benchmarks for resolution passes and change detection.
//!
//! Run with: cargo bench -p selection-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

use selection_core::graph::{MemoryGraph, MemoryNode, NodeChangeEvent, NodeType, SceneGraph};
use selection_core::reactive::changes_apply_to_selection;
use selection_core::resolve::{resolve_selection, ResolverOptions, Selector};

/// A frame holding `rows` groups of three text layers each.
fn build_document(rows: usize) -> MemoryGraph {
    let mut frame = MemoryNode::new("1:0", NodeType::Frame).with_property("name", json!("List"));
    for row in 0..rows {
        let mut group = MemoryNode::new(format!("2:{row}"), NodeType::Group);
        for column in 0..3 {
            group = group.with_child(
                MemoryNode::new(format!("3:{row}:{column}"), NodeType::Text)
                    .with_property("characters", json!(format!("Cell {row}/{column}")))
                    .with_property("fontSize", json!(14)),
            );
        }
        frame = frame.with_child(group);
    }

    let mut graph = MemoryGraph::new("0:1");
    graph.insert(frame);
    graph.select(["1:0"]);
    graph
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_selection");

    for rows in [10, 100, 1_000] {
        let graph = build_document(rows);

        let nested = ResolverOptions::default().with_children(true);
        group.bench_with_input(BenchmarkId::new("nested_all", rows), &rows, |b, _| {
            b.iter(|| black_box(resolve_selection(&graph, black_box(&nested)).map(|nodes| nodes.len())));
        });

        let flattened = ResolverOptions::default()
            .with_node_types([NodeType::Text])
            .with_children(true)
            .with_properties(Selector::only(["characters"]))
            .with_ancestors_visible(true);
        group.bench_with_input(BenchmarkId::new("flattened_text", rows), &rows, |b, _| {
            b.iter(|| black_box(resolve_selection(&graph, black_box(&flattened)).map(|nodes| nodes.len())));
        });
    }

    group.finish();
}

fn bench_change_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("changes_apply_to_selection");

    for rows in [10, 100, 1_000] {
        let graph = build_document(rows);
        let selection = graph.selection();

        // Worst case: the change is outside the selection, so every node is visited.
        let miss = NodeChangeEvent::new(["9:9"]);
        group.bench_with_input(BenchmarkId::new("miss", rows), &rows, |b, _| {
            b.iter(|| black_box(changes_apply_to_selection(black_box(&miss), &selection)));
        });

        let last = NodeChangeEvent::new([format!("3:{}:2", rows - 1)]);
        group.bench_with_input(BenchmarkId::new("last_leaf", rows), &rows, |b, _| {
            b.iter(|| black_box(changes_apply_to_selection(black_box(&last), &selection)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_change_detection);
criterion_main!(benches);

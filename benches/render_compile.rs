//! Benchmarks for model building, flattening, and layout.
//!
//! These benchmarks measure the performance of:
//! - Model construction from definitions of varying shape
//! - Flattening plus nested-view merging
//! - The full pipeline pass including layout

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use trellis::compiler::{CompileMode, NestedViewCompiler, RenderGraphCompiler};
use trellis::layout::LayoutEngine;
use trellis::model::definition::{DefEdge, DefNode, WorkflowDefinition, WorkflowSection};
use trellis::model::{DynamicSections, GraphModelBuilder};
use trellis::navigation::BreadcrumbState;
use trellis::pipeline::RenderPipeline;
use trellis::types::{END_NODE_ID, START_NODE_ID};

/// Linear workflow: start -> t0 -> ... -> tn -> end.
fn linear_definition(task_count: usize) -> WorkflowDefinition {
    let nodes: Vec<DefNode> = (0..task_count).map(|i| DefNode::task(format!("t{i}"))).collect();
    let mut edges = Vec::with_capacity(task_count + 1);
    let mut prev = START_NODE_ID.to_owned();
    for i in 0..task_count {
        let id = format!("t{i}");
        edges.push(DefEdge::new(prev, id.clone()));
        prev = id;
    }
    edges.push(DefEdge::new(prev, END_NODE_ID));
    WorkflowDefinition {
        id: "wf.bench.linear".into(),
        nodes,
        edges,
        ..WorkflowDefinition::default()
    }
}

/// Wide workflow with `width` sub-workflows of `inner` tasks each.
fn nested_definition(width: usize, inner: usize) -> WorkflowDefinition {
    let mut definition = WorkflowDefinition {
        id: "wf.bench.nested".into(),
        ..WorkflowDefinition::default()
    };
    for s in 0..width {
        let sub_id = format!("sub{s}");
        let workflow_id = format!("wf.bench.nested.{s}");
        definition
            .nodes
            .push(DefNode::subworkflow(sub_id.clone(), workflow_id.clone()));
        definition.edges.push(DefEdge::new(START_NODE_ID, sub_id.clone()));
        definition.edges.push(DefEdge::new(sub_id, END_NODE_ID));

        let section = linear_definition(inner);
        definition.sub_workflows.insert(
            workflow_id,
            WorkflowSection {
                nodes: section.nodes,
                edges: section.edges,
            },
        );
    }
    definition
}

fn bench_model_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_build");
    let dynamic = DynamicSections::default();

    for size in [10, 50, 200] {
        let definition = linear_definition(size);
        group.bench_with_input(BenchmarkId::new("linear", size), &definition, |b, def| {
            b.iter(|| GraphModelBuilder::new(def, &dynamic).build());
        });
    }
    for (width, inner) in [(5, 10), (20, 10), (10, 50)] {
        let definition = nested_definition(width, inner);
        group.bench_with_input(
            BenchmarkId::new("nested", format!("{width}x{inner}")),
            &definition,
            |b, def| {
                b.iter(|| GraphModelBuilder::new(def, &dynamic).build());
            },
        );
    }
    group.finish();
}

fn bench_flatten_and_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten_merge");
    let dynamic = DynamicSections::default();
    let crumbs = BreadcrumbState::new();

    for (width, inner) in [(5, 10), (20, 10), (10, 50)] {
        let definition = nested_definition(width, inner);
        let model = GraphModelBuilder::new(&definition, &dynamic).build();
        group.bench_with_input(
            BenchmarkId::new("nested", format!("{width}x{inner}")),
            &model,
            |b, model| {
                b.iter(|| {
                    let flat = RenderGraphCompiler::compile(model, CompileMode::Interactive);
                    NestedViewCompiler::compile(&flat, &crumbs, 1, CompileMode::Interactive)
                });
            },
        );
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let dynamic = DynamicSections::default();
    let crumbs = BreadcrumbState::new();

    for (width, inner) in [(5, 10), (20, 10)] {
        let definition = nested_definition(width, inner);
        let model = GraphModelBuilder::new(&definition, &dynamic).build();
        let flat = RenderGraphCompiler::compile(&model, CompileMode::Interactive);
        let merged = NestedViewCompiler::compile(&flat, &crumbs, 1, CompileMode::Interactive);
        group.bench_with_input(
            BenchmarkId::new("nested", format!("{width}x{inner}")),
            &merged,
            |b, merged| {
                let mut engine = LayoutEngine::new();
                b.iter(|| engine.layout(merged, &crumbs));
            },
        );
    }
    group.finish();
}

fn bench_full_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pass");

    for (width, inner) in [(5, 10), (20, 10)] {
        let definition = nested_definition(width, inner);
        group.bench_with_input(
            BenchmarkId::new("nested", format!("{width}x{inner}")),
            &definition,
            |b, def| {
                b.iter(|| {
                    let mut pipeline = RenderPipeline::new();
                    pipeline.set_definition(def.clone());
                    pipeline.render()
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_model_build,
    bench_flatten_and_merge,
    bench_layout,
    bench_full_pass
);
criterion_main!(benches);

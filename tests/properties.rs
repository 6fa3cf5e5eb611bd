#[macro_use]
extern crate proptest;

use proptest::prelude::{any, prop, Strategy};
use rustc_hash::FxHashSet;

use trellis::identity::{normalize_retry, strip_namespace};
use trellis::model::definition::{DefEdge, DefNode, WorkflowDefinition};
use trellis::navigation::BreadcrumbState;
use trellis::pipeline::RenderPipeline;
use trellis::types::{END_NODE_ID, START_NODE_ID};

/// Raw node names: a letter followed by letters/digits, no dashes so the
/// retry-slot scheme stays unambiguous at the fixture level.
fn node_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9]{0,8}").unwrap()
}

/// A linear chain definition over the given task names.
fn chain_definition(names: &[String]) -> WorkflowDefinition {
    let nodes: Vec<DefNode> = names.iter().map(DefNode::task).collect();
    let mut edges = Vec::with_capacity(names.len() + 1);
    let mut prev = START_NODE_ID.to_owned();
    for name in names {
        edges.push(DefEdge::new(prev.clone(), name.clone()));
        prev = name.clone();
    }
    edges.push(DefEdge::new(prev, END_NODE_ID));
    WorkflowDefinition {
        id: "wf.prop".into(),
        nodes,
        edges,
        ..WorkflowDefinition::default()
    }
}

proptest! {
    #[test]
    fn prop_normalize_retry_is_idempotent(
        parts in prop::collection::vec(node_name_strategy(), 1..5),
        retries in prop::collection::vec(0u32..42, 0..4),
    ) {
        // Interleave retry segments between name parts.
        let mut id = String::new();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                let n = retries.get(i - 1).copied().unwrap_or(0);
                id.push_str(&format!("-{n}-"));
            }
            id.push_str(part);
        }
        let once = normalize_retry(&id);
        prop_assert_eq!(normalize_retry(&once), once.clone());
        // Every retry slot ends up as -0-.
        if parts.len() > 1 {
            prop_assert!(once.contains("-0-"));
        }
    }

    #[test]
    fn prop_chain_renders_all_tasks(
        mut names in prop::collection::vec(node_name_strategy(), 1..8),
    ) {
        names.sort();
        names.dedup();
        let mut pipeline = RenderPipeline::new();
        pipeline.set_definition(chain_definition(&names));
        prop_assert!(pipeline.render());

        let graph = pipeline.graph().unwrap();
        prop_assert_eq!(graph.nodes.len(), names.len() + 2);
        prop_assert_eq!(graph.edges.len(), names.len() + 1);

        // Edge endpoints always reference published nodes.
        let ids: FxHashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        for edge in &graph.edges {
            prop_assert!(ids.contains(edge.source.as_str()));
            prop_assert!(ids.contains(edge.target.as_str()));
        }
        // No node claims itself as container.
        prop_assert!(graph.nodes.iter().all(|n| !n.is_self_contained()));
        // Identical inputs short-circuit.
        prop_assert!(!pipeline.render());
    }

    #[test]
    fn prop_namespaces_round_trip(
        name in node_name_strategy(),
        seed_a in 0u64..1000,
        seed_b in 0u64..1000,
    ) {
        let a = format!("pass-{seed_a}::{name}");
        let b = format!("pass-{seed_b}::{name}");
        prop_assert_eq!(strip_namespace(&a), name.as_str());
        prop_assert_eq!(strip_namespace(&b), name.as_str());
        if seed_a != seed_b {
            prop_assert_ne!(a, b);
        }
    }

    #[test]
    fn prop_pop_then_push_extends_by_one(
        views in prop::collection::vec(node_name_strategy(), 2..8),
        raw_index in any::<usize>(),
    ) {
        let mut distinct = views.clone();
        distinct.dedup();
        prop_assume!(distinct.len() >= 2);

        let mut crumbs = BreadcrumbState::new();
        for v in &distinct {
            crumbs.push("c", v.clone());
        }
        let index = raw_index % (distinct.len() - 1);
        crumbs.pop("c", index);
        prop_assert!(crumbs.push("c", "fresh-view"));
        prop_assert_eq!(crumbs.depth("c"), index + 2);
        prop_assert_eq!(crumbs.active_view("c"), Some("fresh-view"));
    }
}

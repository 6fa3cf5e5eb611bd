//! RenderGraphCompiler: recursive tree flattening.
//!
//! Flattens the recursive [`GraphNode`] tree into a root [`GraphSection`]
//! plus a [`ContainerMap`] holding the node/edge sets of every nesting
//! level reachable beneath every top-level container.
//!
//! The traversal is depth-first, children before edges-of-self, and pure:
//! each recursion returns a fresh [`FlatGraph`] fragment that the caller
//! merges, so no traversal order can leave a partially mutated map behind.
//!
//! Two bucketing keys drive the flattening. The *root parent* is the
//! nearest top-level container ancestor; every descendant of one top-level
//! container shares it, regardless of depth. The *context parent* is the
//! immediate container a node sits in. `containerMap[rootParent][contextParent]`
//! therefore holds exactly the direct children of one container, tagged
//! with the top-level box they will eventually be drawn inside of.

use crate::model::GraphNode;
use crate::render::{ContainerMap, GraphSection, NodeData, RenderEdge, RenderNode};
use crate::types::NodeKind;

/// Whether a pass compiles an interactive or a read-only (static) view.
///
/// Static views disable drill-down and status overlays; every work and
/// container node is coerced to [`NodeKind::StaticNode`] /
/// [`NodeKind::StaticNestedNode`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompileMode {
    #[default]
    Interactive,
    Static,
}

impl CompileMode {
    #[must_use]
    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static)
    }
}

/// Output of one flattening pass: the root-level section plus the nested
/// levels of every container. Immutable once compiled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlatGraph {
    pub root: GraphSection,
    pub containers: ContainerMap,
}

impl FlatGraph {
    fn merged_with(mut self, other: FlatGraph) -> FlatGraph {
        self.root.extend(other.root);
        self.containers = self.containers.merged_with(other.containers);
        self
    }
}

/// Flattens a graph model into render sections.
pub struct RenderGraphCompiler;

impl RenderGraphCompiler {
    /// Compiles the tree rooted at `root` (the workflow itself; only its
    /// descendants are emitted) into a [`FlatGraph`].
    ///
    /// Nodes that end up claiming themselves as container are dropped
    /// before returning, so the `container_id != id` invariant holds for
    /// every emitted node.
    #[must_use]
    pub fn compile(root: &GraphNode, mode: CompileMode) -> FlatGraph {
        let mut flat = flatten_level(root, None, None, mode);
        flat.containers.drop_self_contained();
        flat.root.nodes.retain(|n| !n.is_self_contained());
        tracing::debug!(
            root_nodes = flat.root.nodes.len(),
            containers = flat.containers.root_parent_ids().len(),
            "flattened graph model"
        );
        flat
    }
}

/// Flattens the direct children of `node`, then `node`'s own edges.
///
/// `root_parent`/`context_parent` locate the bucket the children belong
/// to; both are `None` exactly at the root level.
fn flatten_level(
    node: &GraphNode,
    root_parent: Option<&str>,
    context_parent: Option<&str>,
    mode: CompileMode,
) -> FlatGraph {
    let mut flat = FlatGraph::default();

    for child in &node.children {
        emit_node(&mut flat, child, root_parent, context_parent, mode);

        if !child.children.is_empty() {
            // All descendants of a top-level container keep it as their
            // root parent; only the context parent moves with depth.
            let child_root = root_parent.unwrap_or(child.scoped_id.as_str());
            let nested = flatten_level(child, Some(child_root), Some(&child.scoped_id), mode);
            flat = flat.merged_with(nested);
        }
    }

    emit_edges(&mut flat, node, root_parent, context_parent);
    flat
}

fn emit_node(
    flat: &mut FlatGraph,
    child: &GraphNode,
    root_parent: Option<&str>,
    context_parent: Option<&str>,
    mode: CompileMode,
) {
    let nested = root_parent.is_some();
    let render = RenderNode {
        id: child.scoped_id.clone(),
        kind: effective_kind(child, nested, mode),
        data: NodeData {
            label: child.name.clone(),
            scoped_id: child.scoped_id.clone(),
            is_static: mode.is_static(),
            task: child.task.clone(),
            ..NodeData::default()
        },
        container_id: root_parent.map(str::to_owned),
        ..RenderNode::default()
    };

    match (root_parent, context_parent) {
        (Some(rp), Some(cp)) => flat.containers.section_mut(rp, cp).nodes.push(render),
        _ => flat.root.nodes.push(render),
    }
}

fn emit_edges(
    flat: &mut FlatGraph,
    node: &GraphNode,
    root_parent: Option<&str>,
    context_parent: Option<&str>,
) {
    if node.edges.is_empty() {
        return;
    }
    match (root_parent, context_parent) {
        (Some(rp), Some(cp)) => {
            let section = flat.containers.section_mut(rp, cp);
            for e in &node.edges {
                section.edges.push(RenderEdge::within(&e.source, &e.target, rp));
            }
        }
        _ => {
            for e in &node.edges {
                flat.root.edges.push(RenderEdge::between(&e.source, &e.target));
            }
        }
    }
}

/// Type override applied at emission time.
///
/// Static mode wins over everything except terminals, which keep their
/// structural kind so the renderer can still anchor the graph. In
/// interactive mode, the only override is the unresolved dynamic
/// container, rendered as an unexpandable collapsed placeholder.
fn effective_kind(node: &GraphNode, nested: bool, mode: CompileMode) -> NodeKind {
    if mode.is_static() {
        if node.kind.is_any_terminal() {
            return node.kind;
        }
        return if nested {
            NodeKind::StaticNestedNode
        } else {
            NodeKind::StaticNode
        };
    }
    if node.is_container && !node.is_resolved {
        return NodeKind::NestedMaxDepth;
    }
    node.kind
}

//! GraphModelBuilder: definition tree construction.
//!
//! Builds the recursive [`GraphNode`] tree from a compiled workflow
//! definition plus an optional map of dynamically resolved sub-workflow
//! sections. Construction is depth-first and total: malformed pieces are
//! dropped with a warning, an empty or missing definition yields an empty
//! root, and no input ever raises an error.
//!
//! Every level is wrapped in entry/exit terminals. The root level gets
//! [`NodeKind::Start`]/[`NodeKind::End`]; nested levels get
//! [`NodeKind::NestedStart`]/[`NodeKind::NestedEnd`] under level-scoped
//! ids. Definition edges referencing the sentinel ids are rewritten to
//! those terminals, and all edge endpoints are rewritten from raw ids to
//! scoped ids at build time.

use rustc_hash::FxHashMap;

use crate::identity::normalize_retry;
use crate::model::definition::{
    BranchCase, DefEdge, DefNode, DefNodeKind, WorkflowDefinition, WorkflowSection,
};
use crate::model::node::{GraphEdge, GraphNode};
use crate::types::{END_NODE_ID, NodeKind, START_NODE_ID};

/// Map of dynamically resolved sub-workflow sections, keyed by the scoped
/// id of the dynamic node they belong to.
pub type DynamicSections = FxHashMap<String, WorkflowSection>;

/// Builds the recursive graph model for one workflow definition version.
///
/// The builder borrows its inputs and is cheap to re-create; the model is
/// rebuilt whenever the definition changes or a previously unresolved
/// dynamic section arrives.
///
/// # Examples
///
/// ```rust
/// use trellis::model::{DynamicSections, GraphModelBuilder};
/// use trellis::model::definition::{DefEdge, DefNode, WorkflowDefinition};
///
/// let definition = WorkflowDefinition {
///     id: "wf".into(),
///     nodes: vec![DefNode::task("n0")],
///     edges: vec![
///         DefEdge::new("start-node", "n0"),
///         DefEdge::new("n0", "end-node"),
///     ],
///     ..WorkflowDefinition::default()
/// };
/// let dynamic = DynamicSections::default();
/// let root = GraphModelBuilder::new(&definition, &dynamic).build();
/// // start + n0 + end
/// assert_eq!(root.children.len(), 3);
/// ```
pub struct GraphModelBuilder<'a> {
    definition: &'a WorkflowDefinition,
    dynamic: &'a DynamicSections,
}

impl<'a> GraphModelBuilder<'a> {
    #[must_use]
    pub fn new(definition: &'a WorkflowDefinition, dynamic: &'a DynamicSections) -> Self {
        Self {
            definition,
            dynamic,
        }
    }

    /// Builds the root [`GraphNode`].
    ///
    /// An empty definition yields an empty root (no children, no edges);
    /// the caller surfaces a "graph is empty" state instead of an error.
    #[must_use]
    pub fn build(&self) -> GraphNode {
        let mut root = GraphNode {
            id: self.definition.id.clone(),
            scoped_id: self.definition.id.clone(),
            name: self.definition.id.clone(),
            kind: NodeKind::Subworkflow,
            is_container: true,
            is_resolved: true,
            ..GraphNode::default()
        };
        if self.definition.is_empty() {
            tracing::debug!(workflow = %self.definition.id, "empty workflow definition, building empty root");
            return root;
        }

        let (children, edges) = self.build_level(
            None,
            &self.definition.nodes,
            &self.definition.edges,
        );
        root.children = children;
        root.edges = edges;
        root
    }

    /// Builds one level: terminals, converted nodes, rewritten edges.
    ///
    /// `parent_scope` is `None` for the root level, otherwise the scoped id
    /// of the containing node.
    fn build_level(
        &self,
        parent_scope: Option<&str>,
        nodes: &[DefNode],
        edges: &[DefEdge],
    ) -> (Vec<GraphNode>, Vec<GraphEdge>) {
        let (start, end) = level_terminals(parent_scope);

        let mut scoped: FxHashMap<&str, String> = FxHashMap::default();
        scoped.insert(START_NODE_ID, start.scoped_id.clone());
        scoped.insert(END_NODE_ID, end.scoped_id.clone());

        let mut children = Vec::with_capacity(nodes.len() + 2);
        children.push(start);
        for def in nodes {
            let child = self.build_node(parent_scope, def);
            scoped.insert(def.id.as_str(), child.scoped_id.clone());
            children.push(child);
        }
        children.push(end);

        let edges = rewrite_edges(edges, &scoped);
        (children, edges)
    }

    /// Converts one definition node, recursing into containers.
    fn build_node(&self, parent_scope: Option<&str>, def: &DefNode) -> GraphNode {
        let scoped_id = scope_id(parent_scope, &def.id);
        let mut node = GraphNode {
            id: def.id.clone(),
            scoped_id: scoped_id.clone(),
            name: def.label().to_owned(),
            kind: NodeKind::Task,
            is_resolved: true,
            task: def.task.clone(),
            ..GraphNode::default()
        };

        match &def.kind {
            DefNodeKind::Task => {}
            DefNodeKind::Gate => node.kind = NodeKind::GateNode,
            DefNodeKind::Subworkflow { workflow_id } => {
                node.kind = NodeKind::Subworkflow;
                node.is_container = true;
                match self.definition.sub_workflows.get(workflow_id) {
                    Some(section) => {
                        let (children, edges) = self.build_level(
                            Some(&scoped_id),
                            &section.nodes,
                            &section.edges,
                        );
                        node.children = children;
                        node.edges = edges;
                    }
                    None => {
                        tracing::warn!(
                            node = %def.id,
                            workflow = %workflow_id,
                            "sub-workflow section missing from definition, node stays collapsed"
                        );
                        node.is_resolved = false;
                    }
                }
            }
            DefNodeKind::Dynamic => {
                node.kind = NodeKind::Subworkflow;
                node.is_container = true;
                match self.dynamic.get(&scoped_id) {
                    Some(section) => {
                        let (children, edges) = self.build_level(
                            Some(&scoped_id),
                            &section.nodes,
                            &section.edges,
                        );
                        node.children = children;
                        node.edges = edges;
                    }
                    None => node.is_resolved = false,
                }
            }
            DefNodeKind::Branch { cases } => {
                node.kind = NodeKind::Branch;
                node.is_container = true;
                let (children, edges) = self.build_branch(&scoped_id, cases);
                node.children = children;
                node.edges = edges;
            }
        }
        node
    }

    /// Builds the merged children of a branch container.
    ///
    /// All cases share one pair of nested terminals; each case's sentinel
    /// edges are rewritten against that shared pair. Node ids are assumed
    /// unique across the cases of one branch, as the definition compiler
    /// guarantees.
    fn build_branch(
        &self,
        parent_scope: &str,
        cases: &[BranchCase],
    ) -> (Vec<GraphNode>, Vec<GraphEdge>) {
        let (start, end) = level_terminals(Some(parent_scope));

        let mut scoped: FxHashMap<&str, String> = FxHashMap::default();
        scoped.insert(START_NODE_ID, start.scoped_id.clone());
        scoped.insert(END_NODE_ID, end.scoped_id.clone());

        let mut children = vec![start];
        let mut edges = Vec::new();
        for case in cases {
            for def in &case.section.nodes {
                let child = self.build_node(Some(parent_scope), def);
                scoped.insert(def.id.as_str(), child.scoped_id.clone());
                children.push(child);
            }
        }
        for case in cases {
            edges.extend(rewrite_edges(&case.section.edges, &scoped));
        }
        children.push(end);
        (children, edges)
    }
}

/// Scoped id of a child under `parent_scope`, with the `-0-` retry slot.
fn scope_id(parent_scope: Option<&str>, raw_id: &str) -> String {
    let raw = normalize_retry(raw_id);
    match parent_scope {
        None => raw,
        Some(parent) => format!("{parent}-0-{raw}"),
    }
}

/// Entry/exit terminal pair for one level.
fn level_terminals(parent_scope: Option<&str>) -> (GraphNode, GraphNode) {
    (start_terminal(parent_scope), end_terminal(parent_scope))
}

fn start_terminal(parent_scope: Option<&str>) -> GraphNode {
    let kind = if parent_scope.is_some() {
        NodeKind::NestedStart
    } else {
        NodeKind::Start
    };
    terminal(parent_scope, START_NODE_ID, kind)
}

fn end_terminal(parent_scope: Option<&str>) -> GraphNode {
    let kind = if parent_scope.is_some() {
        NodeKind::NestedEnd
    } else {
        NodeKind::End
    };
    terminal(parent_scope, END_NODE_ID, kind)
}

fn terminal(parent_scope: Option<&str>, sentinel: &str, kind: NodeKind) -> GraphNode {
    GraphNode {
        id: sentinel.to_owned(),
        scoped_id: scope_id(parent_scope, sentinel),
        name: sentinel.to_owned(),
        kind,
        is_resolved: true,
        ..GraphNode::default()
    }
}

/// Rewrites raw edge endpoints to scoped ids, dropping edges that
/// reference ids absent from this level.
fn rewrite_edges(edges: &[DefEdge], scoped: &FxHashMap<&str, String>) -> Vec<GraphEdge> {
    edges
        .iter()
        .filter_map(|e| {
            match (scoped.get(e.source.as_str()), scoped.get(e.target.as_str())) {
                (Some(source), Some(target)) => {
                    Some(GraphEdge::new(source.clone(), target.clone()))
                }
                _ => {
                    tracing::warn!(
                        source = %e.source,
                        target = %e.target,
                        "dropping edge with unknown endpoint"
                    );
                    None
                }
            }
        })
        .collect()
}

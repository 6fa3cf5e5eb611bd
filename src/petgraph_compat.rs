//! Optional petgraph compatibility layer.
//!
//! Converts a flattened [`GraphSection`] into petgraph's `DiGraph`,
//! unlocking petgraph's algorithm library for analysis (cycle detection on
//! incoming definitions, reachability queries) and DOT export for
//! debugging layouts.
//!
//! # Feature Gate
//!
//! Only available with the `petgraph-compat` feature:
//!
//! ```toml
//! [dependencies]
//! trellis = { version = "0.1", features = ["petgraph-compat"] }
//! ```
//!
//! # Examples
//!
//! ```ignore
//! use trellis::petgraph_compat::{is_cyclic, to_dot};
//!
//! let flat = RenderGraphCompiler::compile(&model, CompileMode::Interactive);
//! if is_cyclic(&flat.root) {
//!     // surface a definition warning; layout still degrades gracefully
//! }
//! std::fs::write("root.dot", to_dot(&flat.root))?;
//! ```

use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

use crate::render::GraphSection;
use crate::types::NodeKind;

/// Petgraph representation of one section: node weights are render-node
/// ids, edge weights are unit.
pub type SectionDiGraph = DiGraph<String, ()>;

/// Mapping from render-node id to petgraph index.
pub type NodeIndexMap = FxHashMap<String, NodeIndex>;

/// Result of converting a section to petgraph form.
#[derive(Debug, Clone)]
pub struct PetgraphConversion {
    pub graph: SectionDiGraph,
    pub index_map: NodeIndexMap,
}

impl PetgraphConversion {
    /// Look up the petgraph index of a render-node id.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index_map.get(id).copied()
    }

    /// The render-node id at a petgraph index.
    #[must_use]
    pub fn node_at(&self, index: NodeIndex) -> Option<&str> {
        self.graph.node_weight(index).map(String::as_str)
    }
}

/// Converts a section to a petgraph `DiGraph`.
///
/// Node order (and therefore index assignment) follows the section's node
/// order, which the compiler emits deterministically. Edges referencing
/// ids absent from the section are skipped.
#[must_use]
pub fn to_petgraph(section: &GraphSection) -> PetgraphConversion {
    let mut graph = DiGraph::new();
    let mut index_map: NodeIndexMap = FxHashMap::default();

    for node in &section.nodes {
        let idx = graph.add_node(node.id.clone());
        index_map.insert(node.id.clone(), idx);
    }
    for edge in &section.edges {
        let (Some(&from), Some(&to)) = (index_map.get(&edge.source), index_map.get(&edge.target))
        else {
            continue;
        };
        graph.add_edge(from, to, ());
    }

    PetgraphConversion { graph, index_map }
}

/// Check a section for cycles using petgraph's algorithm.
///
/// The core layout never requires acyclicity; this exists so embedders can
/// warn about cyclic definitions before rendering them.
#[must_use]
pub fn is_cyclic(section: &GraphSection) -> bool {
    petgraph::algo::is_cyclic_directed(&to_petgraph(section).graph)
}

/// Export a section to DOT format for visualization.
///
/// Render with Graphviz (`dot -Tpng section.dot -o section.png`) or any
/// online viewer. Terminals get filled styling so the flow direction is
/// obvious at a glance.
#[must_use]
pub fn to_dot(section: &GraphSection) -> String {
    use std::fmt::Write;

    let conversion = to_petgraph(section);
    let mut output = String::new();

    let _ = writeln!(output, "digraph {{");
    let _ = writeln!(output, "    rankdir=LR;");
    let _ = writeln!(output, "    node [shape=box, style=rounded];");

    for node in &section.nodes {
        let Some(idx) = conversion.index_of(&node.id) else {
            continue;
        };
        let style = match node.kind {
            NodeKind::Start | NodeKind::NestedStart => {
                " style=\"filled\" fillcolor=\"lightgreen\""
            }
            NodeKind::End | NodeKind::NestedEnd => " style=\"filled\" fillcolor=\"lightcoral\"",
            _ => "",
        };
        let _ = writeln!(
            output,
            "    {} [ label=\"{}\"{} ];",
            idx.index(),
            node.data.label,
            style
        );
    }

    let _ = writeln!(output);
    for edge in conversion.graph.edge_indices() {
        if let Some((from, to)) = conversion.graph.edge_endpoints(edge) {
            let _ = writeln!(output, "    {} -> {};", from.index(), to.index());
        }
    }
    let _ = writeln!(output, "}}");

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{NodeData, RenderEdge, RenderNode};

    fn node(id: &str, kind: NodeKind) -> RenderNode {
        RenderNode {
            id: id.to_owned(),
            kind,
            data: NodeData {
                label: id.to_owned(),
                ..NodeData::default()
            },
            ..RenderNode::default()
        }
    }

    fn linear_section() -> GraphSection {
        GraphSection {
            nodes: vec![
                node("start-node", NodeKind::Start),
                node("a", NodeKind::Task),
                node("end-node", NodeKind::End),
            ],
            edges: vec![
                RenderEdge::between("start-node", "a"),
                RenderEdge::between("a", "end-node"),
            ],
        }
    }

    #[test]
    fn converts_linear_section() {
        let conversion = to_petgraph(&linear_section());
        assert_eq!(conversion.graph.node_count(), 3);
        assert_eq!(conversion.graph.edge_count(), 2);
        assert!(conversion.index_of("a").is_some());
        assert_eq!(
            conversion.node_at(conversion.index_of("a").unwrap()),
            Some("a")
        );
    }

    #[test]
    fn linear_section_is_acyclic() {
        assert!(!is_cyclic(&linear_section()));
    }

    #[test]
    fn detects_cycles() {
        let mut section = linear_section();
        section.edges.push(RenderEdge::between("end-node", "a"));
        assert!(is_cyclic(&section));
    }

    #[test]
    fn dot_output_names_every_node() {
        let dot = to_dot(&linear_section());
        assert!(dot.contains("digraph {"));
        assert!(dot.contains("start-node"));
        assert!(dot.contains("end-node"));
        assert!(dot.contains("->"));
    }

    #[test]
    fn deterministic_indices() {
        let section = linear_section();
        let a = to_petgraph(&section);
        let b = to_petgraph(&section);
        assert_eq!(a.index_of("a"), b.index_of("a"));
    }
}

//! The recursive static/runtime-merged graph tree.

use serde::{Deserialize, Serialize};

use crate::model::definition::TaskTemplate;
use crate::types::NodeKind;

/// A node in the recursive graph model built from a workflow definition.
///
/// `id` is the node's identifier within one workflow definition and carries
/// no retry information. `scoped_id` is the retry-normalized path id unique
/// within one execution's graph; it embeds a `-0-` retry slot per nesting
/// level so runtime ids match after [`normalize_retry`]
/// (crate::identity::normalize_retry).
///
/// Containers (branches and sub-workflow references) own `children` plus
/// the `edges` scoped to those direct children. `is_resolved` distinguishes
/// a container whose children are known from a dynamic container still
/// waiting for its runtime section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub scoped_id: String,
    pub name: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub children: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
    /// True for branch/sub-workflow nodes that own nested children.
    #[serde(default)]
    pub is_container: bool,
    /// False only for containers whose children are not yet available.
    #[serde(default)]
    pub is_resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskTemplate>,
}

impl GraphNode {
    /// Depth-first lookup by scoped id, including `self`.
    #[must_use]
    pub fn find(&self, scoped_id: &str) -> Option<&GraphNode> {
        if self.scoped_id == scoped_id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(scoped_id))
    }

    /// Total node count of the tree, including `self`.
    #[must_use]
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(GraphNode::size).sum::<usize>()
    }

    /// Returns `true` when the tree holds no renderable nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A directed edge between two sibling nodes, expressed in scoped ids and
/// owned by the containing [`GraphNode`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

impl GraphEdge {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

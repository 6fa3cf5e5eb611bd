//! Flattened render-graph data model.
//!
//! The types in this module are the output side of the engine: flat
//! node/edge collections the external diagram renderer consumes, plus the
//! [`ContainerMap`] that captures every nesting level of every container
//! produced by one compile pass.
//!
//! A [`RenderGraph`] carries no recursion. Nesting is expressed through
//! [`RenderNode::container_id`], which points at the root-level container
//! box a node is drawn inside of. The invariant that `container_id` never
//! equals the node's own id is enforced during compilation and checked by
//! [`RenderNode::is_self_contained`].

use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::identity::strip_namespace;
use crate::model::definition::TaskTemplate;
use crate::status::ExecutionPhase;
use crate::types::{Dimensions, NodeKind, Point};

/// Renderer-facing payload of a node, independent of geometry.
///
/// `scoped_id` is the retry-normalized identifier used to correlate this
/// node with runtime execution-status records. It is deliberately *not*
/// namespaced per render pass, so status overlays survive recompilation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    /// Human-readable label shown by the renderer.
    pub label: String,
    /// Retry-normalized id correlating static and runtime representations.
    pub scoped_id: String,
    /// Set when nested content was merged into this container for the
    /// current render pass; the layout engine sizes it as a box.
    #[serde(default)]
    pub is_root_parent: bool,
    /// Set when the node was compiled for a read-only view.
    #[serde(default)]
    pub is_static: bool,
    /// Latest execution phase merged from the status overlay, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<ExecutionPhase>,
    /// Task-template metadata supplied by the definition, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskTemplate>,
}

/// A single node of the flattened, positioned render graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    pub kind: NodeKind,
    pub data: NodeData,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub dimensions: Dimensions,
    /// Root-level container this node is drawn inside of, if nested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
}

impl RenderNode {
    /// Returns `true` when the node illegally claims itself as container.
    ///
    /// Such nodes appear when a node is simultaneously a root parent and a
    /// member of its own container bucket; the compiler drops them.
    #[must_use]
    pub fn is_self_contained(&self) -> bool {
        self.container_id.as_deref() == Some(self.id.as_str())
    }
}

/// A single edge of the flattened render graph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Root-level container this edge belongs to, if nested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
}

impl RenderEdge {
    /// Builds an edge between two node ids, deriving a stable edge id.
    #[must_use]
    pub fn between(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("e-{source}-{target}"),
            source,
            target,
            container_id: None,
        }
    }

    /// Same as [`between`](Self::between) with a container tag.
    #[must_use]
    pub fn within(
        source: impl Into<String>,
        target: impl Into<String>,
        container_id: impl Into<String>,
    ) -> Self {
        let mut edge = Self::between(source, target);
        edge.container_id = Some(container_id.into());
        edge
    }
}

/// One flattened node/edge set: either the root level or a single nesting
/// level under one container.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSection {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

impl GraphSection {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Appends another section's nodes and edges to this one.
    pub fn extend(&mut self, other: GraphSection) {
        self.nodes.extend(other.nodes);
        self.edges.extend(other.edges);
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Flattened nested graphs, bucketed per container and nesting level.
///
/// The outer key is the *root parent*: the nearest top-level container
/// ancestor, shared by every descendant regardless of depth. The inner key
/// is the *context parent*: the immediate container a node sits in. One
/// compile pass builds the map in full; it is then immutable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContainerMap {
    buckets: FxHashMap<String, FxHashMap<String, GraphSection>>,
}

impl ContainerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// The section under `root_parent` holding direct children of
    /// `context_parent`, if captured.
    #[must_use]
    pub fn section(&self, root_parent: &str, context_parent: &str) -> Option<&GraphSection> {
        self.buckets.get(root_parent)?.get(context_parent)
    }

    /// All nesting levels captured beneath one root parent.
    #[must_use]
    pub fn levels(&self, root_parent: &str) -> Option<&FxHashMap<String, GraphSection>> {
        self.buckets.get(root_parent)
    }

    /// Root-parent ids in deterministic (sorted) order.
    #[must_use]
    pub fn root_parent_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.buckets.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Returns `true` if `id` is a root parent in this map.
    #[must_use]
    pub fn is_root_parent(&self, id: &str) -> bool {
        self.buckets.contains_key(id)
    }

    pub(crate) fn section_mut(
        &mut self,
        root_parent: &str,
        context_parent: &str,
    ) -> &mut GraphSection {
        self.buckets
            .entry(root_parent.to_owned())
            .or_default()
            .entry(context_parent.to_owned())
            .or_default()
    }

    /// Union of two maps; buckets present in both are concatenated.
    #[must_use]
    pub(crate) fn merged_with(mut self, other: ContainerMap) -> ContainerMap {
        for (root, levels) in other.buckets {
            let target = self.buckets.entry(root).or_default();
            for (ctx, section) in levels {
                target.entry(ctx).or_default().extend(section);
            }
        }
        self
    }

    /// Drops nodes that claim themselves as container, everywhere.
    pub(crate) fn drop_self_contained(&mut self) {
        for levels in self.buckets.values_mut() {
            for section in levels.values_mut() {
                section.nodes.retain(|n| {
                    if n.is_self_contained() {
                        tracing::warn!(id = %n.id, "dropping self-contained node from container map");
                        false
                    } else {
                        true
                    }
                });
            }
        }
    }
}

/// The final flattened, positioned graph handed to the diagram renderer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

impl RenderGraph {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node by its render-pass id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Looks up a node by its pass-independent scoped id.
    #[must_use]
    pub fn node_by_scoped_id(&self, scoped_id: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| n.data.scoped_id == scoped_id)
    }

    /// Structural equality: same node membership (seed-stripped id + kind)
    /// and same edge membership (seed-stripped endpoints).
    ///
    /// Positions, dimensions, and status overlays are ignored, as are the
    /// render-pass namespace seeds: two passes over identical inputs are
    /// structurally equal even though their ids never collide. The pipeline
    /// uses this check to short-circuit rebuilds that would force a
    /// needless downstream re-render.
    #[must_use]
    pub fn structurally_equal(&self, other: &RenderGraph) -> bool {
        if self.nodes.len() != other.nodes.len() || self.edges.len() != other.edges.len() {
            return false;
        }
        let nodes = |g: &RenderGraph| -> FxHashSet<(String, NodeKind)> {
            g.nodes
                .iter()
                .map(|n| (strip_namespace(&n.id).to_owned(), n.kind))
                .collect()
        };
        let edges = |g: &RenderGraph| -> FxHashSet<(String, String)> {
            g.edges
                .iter()
                .map(|e| {
                    (
                        strip_namespace(&e.source).to_owned(),
                        strip_namespace(&e.target).to_owned(),
                    )
                })
                .collect()
        };
        nodes(self) == nodes(other) && edges(self) == edges(other)
    }
}

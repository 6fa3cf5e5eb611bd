//! Two-pass layered layout. Ranks run left to right; siblings of one rank
//! stack top to bottom.
//!
//! Pass one lays out each expanded container's merged children in the
//! container's own relative coordinate space and derives the container box
//! from their bounding box plus drill-depth-scaled padding. Pass two lays
//! out the root level with those container dimensions fixed, then
//! translates every nested node by its container's absolute position.
//!
//! The engine keeps a height-hint cache across passes: when a container
//! was expanded before but carries no merged content in the current pass
//! (a stale view being recompiled), the cached box size is reused so the
//! root layout does not jump around while the content catches up.

use rustc_hash::FxHashMap;

use crate::layout::rank::{order_buckets, rank_nodes};
use crate::navigation::BreadcrumbState;
use crate::render::{GraphSection, RenderEdge, RenderGraph, RenderNode};
use crate::types::{Dimensions, Point};

/// Tunable geometry constants.
///
/// The defaults match the spacing the diagram renderer is styled for;
/// embedders with different node chrome can override them wholesale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Vertical gap between siblings of one rank.
    pub node_spacing: f64,
    /// Horizontal gap between consecutive ranks; flow runs left to right.
    pub rank_spacing: f64,
    /// Container padding per drill-depth level.
    pub base_padding: f64,
    /// Estimated glyph width used to size labels.
    pub char_width: f64,
    /// Horizontal label padding inside a node box.
    pub node_padding_x: f64,
    /// Fixed height of a work node.
    pub node_height: f64,
    /// Lower bound on node width regardless of label length.
    pub min_node_width: f64,
    /// Side length of the circular start/end terminals.
    pub terminal_diameter: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing: 24.0,
            rank_spacing: 64.0,
            base_padding: 40.0,
            char_width: 7.5,
            node_padding_x: 12.0,
            node_height: 36.0,
            min_node_width: 48.0,
            terminal_diameter: 24.0,
        }
    }
}

impl LayoutConfig {
    /// Intrinsic size of a node that is not an expanded container.
    fn node_dimensions(&self, node: &RenderNode) -> Dimensions {
        if node.kind.is_any_terminal() {
            return Dimensions::new(self.terminal_diameter, self.terminal_diameter);
        }
        let label_width = node.data.label.chars().count() as f64 * self.char_width;
        let width = (label_width + 2.0 * self.node_padding_x).max(self.min_node_width);
        Dimensions::new(width, self.node_height)
    }

    /// Container padding for a given drill depth (at least one level).
    fn container_padding(&self, depth: usize) -> f64 {
        self.base_padding * depth.max(1) as f64
    }
}

/// Positions one compiled render pass.
///
/// Stateful only through the height-hint cache; everything else is derived
/// from the section per call.
#[derive(Debug, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
    height_hints: FxHashMap<String, Dimensions>,
}

impl LayoutEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            config,
            height_hints: FxHashMap::default(),
        }
    }

    /// Lays out a merged section into a positioned [`RenderGraph`].
    ///
    /// An empty section yields an empty graph. Edges referencing unknown
    /// ids influence nothing. The output node order is root nodes first,
    /// then nested nodes grouped by container, which is also the paint
    /// order the renderer expects (boxes under their content).
    #[must_use]
    pub fn layout(&mut self, section: &GraphSection, crumbs: &BreadcrumbState) -> RenderGraph {
        if section.nodes.is_empty() {
            return RenderGraph::default();
        }

        // Pass one: each container's children, relative coordinates.
        let mut container_dims: FxHashMap<String, Dimensions> = FxHashMap::default();
        let mut nested: FxHashMap<String, Vec<RenderNode>> = FxHashMap::default();
        let mut container_ids: Vec<String> = Vec::new();
        for node in &section.nodes {
            if let Some(cid) = &node.container_id {
                if !nested.contains_key(cid) {
                    container_ids.push(cid.clone());
                }
                nested.entry(cid.clone()).or_default().push(node.clone());
            }
        }
        for cid in &container_ids {
            let children = nested.get_mut(cid);
            let Some(children) = children else { continue };
            let edges: Vec<&RenderEdge> = section
                .edges
                .iter()
                .filter(|e| e.container_id.as_deref() == Some(cid.as_str()))
                .collect();
            let bbox = self.place(children, &edges);

            let padding = self.config.container_padding(crumbs.depth(cid));
            let dims = Dimensions::new(bbox.width + padding, bbox.height + padding);
            for child in children.iter_mut() {
                child.position = child.position.translated(padding / 2.0, padding / 2.0);
            }
            self.height_hints.insert(cid.clone(), dims);
            container_dims.insert(cid.clone(), dims);
        }

        // Pass two: root level with container boxes fixed.
        let mut roots: Vec<RenderNode> = section
            .nodes
            .iter()
            .filter(|n| n.container_id.is_none())
            .cloned()
            .collect();
        for node in &mut roots {
            if node.data.is_root_parent {
                node.dimensions = container_dims
                    .get(&node.id)
                    .or_else(|| self.height_hints.get(&node.id))
                    .copied()
                    .unwrap_or_default();
            }
        }
        let root_edges: Vec<&RenderEdge> = section
            .edges
            .iter()
            .filter(|e| e.container_id.is_none())
            .collect();
        self.place(&mut roots, &root_edges);

        // Anchor nested nodes to their container's absolute position.
        let anchors: FxHashMap<&str, Point> =
            roots.iter().map(|n| (n.id.as_str(), n.position)).collect();
        let mut out = RenderGraph {
            nodes: roots.clone(),
            edges: section.edges.clone(),
        };
        for cid in &container_ids {
            let Some(children) = nested.remove(cid) else { continue };
            let anchor = anchors.get(cid.as_str()).copied().unwrap_or_default();
            for mut child in children {
                child.position = child.position.translated(anchor.x, anchor.y);
                out.nodes.push(child);
            }
        }
        out
    }

    /// Assigns positions within one coordinate space and returns the
    /// bounding box of everything placed. Nodes without preset dimensions
    /// get their intrinsic size first.
    fn place(&self, nodes: &mut [RenderNode], edges: &[&RenderEdge]) -> Dimensions {
        for node in nodes.iter_mut() {
            if node.dimensions.is_zero() {
                node.dimensions = self.config.node_dimensions(node);
            }
        }

        let owned: Vec<RenderEdge> = edges.iter().map(|e| (*e).clone()).collect();
        let mut buckets = rank_nodes(nodes, &owned);
        order_buckets(&mut buckets, nodes, &owned);

        // Rank columns marching left to right, each column centered on the
        // tallest column's midline.
        let column_height = |bucket: &[usize], nodes: &[RenderNode]| -> f64 {
            let heights: f64 = bucket.iter().map(|&i| nodes[i].dimensions.height).sum();
            let gaps = bucket.len().saturating_sub(1) as f64 * self.config.node_spacing;
            heights + gaps
        };
        let max_height = buckets
            .iter()
            .map(|b| column_height(b, nodes))
            .fold(0.0_f64, f64::max);

        let mut x = 0.0;
        let mut bbox = Dimensions::default();
        for bucket in &buckets {
            let height = column_height(bucket, nodes);
            let mut y = (max_height - height) / 2.0;
            let mut column_width = 0.0_f64;
            for &i in bucket {
                nodes[i].position = Point::new(x, y);
                y += nodes[i].dimensions.height + self.config.node_spacing;
                column_width = column_width.max(nodes[i].dimensions.width);
            }
            x += column_width + self.config.rank_spacing;
            bbox.height = bbox.height.max(height);
            bbox.width += column_width;
        }
        bbox.width += buckets.len().saturating_sub(1) as f64 * self.config.rank_spacing;
        bbox.height = bbox.height.max(0.0);
        bbox
    }
}

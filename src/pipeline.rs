//! RenderPipeline: the engine's orchestrating facade.
//!
//! Owns every stage of one workflow view: the definition and dynamic
//! sections feeding the model builder, the breadcrumb navigation state,
//! the compile mode and render depth, the layout engine, and the
//! render-pass id generator. Embedders mutate inputs through the methods
//! here and call [`render`](RenderPipeline::render) to produce the next
//! graph.
//!
//! All pipeline stages run synchronously inside `render`; the pipeline is
//! single-threaded by design and holds no locks. Recompilation is
//! incremental in effect rather than in mechanism: a full pass runs, but
//! when the result is structurally identical to the current graph the
//! current graph is kept, so the renderer never sees a spurious id churn.
//!
//! # Examples
//!
//! ```rust
//! use trellis::model::definition::{DefEdge, DefNode, WorkflowDefinition};
//! use trellis::pipeline::RenderPipeline;
//!
//! let definition = WorkflowDefinition {
//!     id: "wf".into(),
//!     nodes: vec![DefNode::task("n0")],
//!     edges: vec![
//!         DefEdge::new("start-node", "n0"),
//!         DefEdge::new("n0", "end-node"),
//!     ],
//!     ..WorkflowDefinition::default()
//! };
//! let mut pipeline = RenderPipeline::new();
//! pipeline.set_definition(definition);
//! assert!(pipeline.render());
//! assert_eq!(pipeline.graph().unwrap().nodes.len(), 3);
//! ```

use rustc_hash::FxHashMap;

use crate::compiler::{CompileMode, NestedViewCompiler, RenderGraphCompiler};
use crate::identity::{namespace_ids, normalize_retry, RenderPassIdGenerator};
use crate::layout::{LayoutConfig, LayoutEngine};
use crate::model::definition::{WorkflowDefinition, WorkflowSection};
use crate::model::{DynamicSections, GraphModelBuilder, GraphNode};
use crate::navigation::BreadcrumbState;
use crate::render::RenderGraph;
use crate::status::{apply_status, StatusRecord};

/// Default number of simultaneously expandable nesting levels.
pub const DEFAULT_MAX_RENDER_DEPTH: u32 = 1;

/// Drives definition, navigation, and status inputs through to positioned
/// render graphs.
#[derive(Debug, Default)]
pub struct RenderPipeline {
    definition: Option<WorkflowDefinition>,
    dynamic: DynamicSections,
    crumbs: BreadcrumbState,
    max_render_depth: u32,
    mode: CompileMode,
    layout: LayoutEngine,
    ids: RenderPassIdGenerator,
    /// Cached model tree; rebuilt lazily when inputs change.
    model: Option<GraphNode>,
    model_dirty: bool,
    /// Latest status record per normalized scoped id.
    status: FxHashMap<String, StatusRecord>,
    current: Option<RenderGraph>,
}

impl RenderPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_render_depth: DEFAULT_MAX_RENDER_DEPTH,
            ..Self::default()
        }
    }

    /// A pipeline with non-default layout geometry.
    #[must_use]
    pub fn with_layout_config(config: LayoutConfig) -> Self {
        Self {
            layout: LayoutEngine::with_config(config),
            ..Self::new()
        }
    }

    /// Installs a new workflow definition version.
    ///
    /// Dynamic sections and breadcrumbs belong to the previous version and
    /// are discarded; accumulated status survives, since scoped ids that
    /// still exist keep meaning the same node.
    pub fn set_definition(&mut self, definition: WorkflowDefinition) {
        tracing::debug!(workflow = %definition.id, "installing workflow definition");
        self.definition = Some(definition);
        self.dynamic.clear();
        self.crumbs = BreadcrumbState::new();
        self.model_dirty = true;
    }

    /// Supplies the runtime-resolved section of a dynamic container.
    ///
    /// Returns `false` without touching anything when `scoped_id` does not
    /// name a node of the current model.
    pub fn resolve_dynamic(&mut self, scoped_id: &str, section: WorkflowSection) -> bool {
        self.ensure_model();
        let known = self
            .model
            .as_ref()
            .is_some_and(|m| m.find(scoped_id).is_some());
        if !known {
            tracing::warn!(node = %scoped_id, "dynamic section for unknown node, ignoring");
            return false;
        }
        self.dynamic.insert(scoped_id.to_owned(), section);
        self.model_dirty = true;
        true
    }

    /// Caps how many containers may show merged content at once.
    pub fn set_max_render_depth(&mut self, depth: u32) {
        self.max_render_depth = depth;
    }

    pub fn set_mode(&mut self, mode: CompileMode) {
        self.mode = mode;
    }

    /// Drills a container down to `view_id`.
    ///
    /// Both ids must name nodes of the current model; anything else is a
    /// no-op returning `false`, as is re-pushing the active view.
    pub fn expand(&mut self, container_id: &str, view_id: &str) -> bool {
        self.ensure_model();
        let Some(model) = self.model.as_ref() else {
            return false;
        };
        if model.find(container_id).is_none() || model.find(view_id).is_none() {
            tracing::warn!(
                container = %container_id,
                view = %view_id,
                "expand request references unknown node, ignoring"
            );
            return false;
        }
        self.crumbs.push(container_id, view_id)
    }

    /// Truncates a container's breadcrumb stack to entries `0..=index`.
    pub fn collapse(&mut self, container_id: &str, index: usize) -> bool {
        self.crumbs.pop(container_id, index)
    }

    /// Returns a container to its collapsed/root view.
    pub fn reset_view(&mut self, container_id: &str) -> bool {
        self.crumbs.reset(container_id)
    }

    /// Merges runtime status records into the pipeline and, when present,
    /// into the current graph in place. Never triggers a relayout.
    ///
    /// Returns whether any visible node's phase changed.
    pub fn apply_status(&mut self, records: &[StatusRecord]) -> bool {
        for record in records {
            let key = normalize_retry(&record.scoped_id);
            match self.status.get(&key) {
                Some(existing) if existing.attempts >= record.attempts => {}
                _ => {
                    self.status.insert(key, record.clone());
                }
            }
        }
        // Overlay from the merged store, not the raw batch: a stale
        // lower-attempt record must never shadow a phase already won by a
        // higher attempt.
        match self.current.as_mut() {
            Some(graph) => {
                let merged: Vec<StatusRecord> = self.status.values().cloned().collect();
                apply_status(graph, &merged)
            }
            None => false,
        }
    }

    /// Runs a full pipeline pass and returns whether the published graph
    /// changed.
    ///
    /// A pass whose output is structurally equal to the current graph is
    /// discarded (the current ids stay valid); otherwise the new graph is
    /// namespaced under a fresh render-pass seed and published. A missing
    /// or empty definition publishes an empty graph rather than failing.
    pub fn render(&mut self) -> bool {
        self.ensure_model();
        let Some(model) = self.model.as_ref() else {
            return self.publish_empty();
        };
        if model.is_empty() {
            return self.publish_empty();
        }

        let flat = RenderGraphCompiler::compile(model, self.mode);
        let merged =
            NestedViewCompiler::compile(&flat, &self.crumbs, self.max_render_depth, self.mode);
        let mut graph = self.layout.layout(&merged, &self.crumbs);
        let records: Vec<StatusRecord> = self.status.values().cloned().collect();
        apply_status(&mut graph, &records);

        if let Some(current) = self.current.as_mut() {
            if current.structurally_equal(&graph) {
                // Same structure: keep the published ids, refresh overlay.
                return apply_status(current, &records);
            }
        }

        let seed = self.ids.next_seed();
        let (nodes, edges) = namespace_ids(&graph.nodes, &graph.edges, &seed);
        tracing::debug!(
            seed = %seed,
            nodes = nodes.len(),
            edges = edges.len(),
            "publishing render pass"
        );
        self.current = Some(RenderGraph { nodes, edges });
        true
    }

    /// The most recently published graph, if any pass has run.
    #[must_use]
    pub fn graph(&self) -> Option<&RenderGraph> {
        self.current.as_ref()
    }

    /// Current breadcrumb state, for UI chrome.
    #[must_use]
    pub fn breadcrumbs(&self) -> &BreadcrumbState {
        &self.crumbs
    }

    fn ensure_model(&mut self) {
        if !self.model_dirty && self.model.is_some() {
            return;
        }
        let Some(definition) = self.definition.as_ref() else {
            return;
        };
        self.model = Some(GraphModelBuilder::new(definition, &self.dynamic).build());
        self.model_dirty = false;
    }

    /// Publishes an empty graph; returns whether that is a change.
    fn publish_empty(&mut self) -> bool {
        let was_empty = self.current.as_ref().is_some_and(RenderGraph::is_empty);
        self.current = Some(RenderGraph::default());
        !was_empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::definition::{DefEdge, DefNode};
    use crate::status::ExecutionPhase;
    use crate::types::{END_NODE_ID, START_NODE_ID};

    fn linear_definition() -> WorkflowDefinition {
        WorkflowDefinition {
            id: "wf".into(),
            nodes: vec![DefNode::task("t0")],
            edges: vec![
                DefEdge::new(START_NODE_ID, "t0"),
                DefEdge::new("t0", END_NODE_ID),
            ],
            ..WorkflowDefinition::default()
        }
    }

    #[test]
    fn render_without_definition_publishes_empty_graph() {
        let mut pipeline = RenderPipeline::new();
        assert!(pipeline.render());
        assert!(pipeline.graph().unwrap().is_empty());
        // Second empty pass is no change.
        assert!(!pipeline.render());
    }

    #[test]
    fn identical_inputs_short_circuit() {
        let mut pipeline = RenderPipeline::new();
        pipeline.set_definition(linear_definition());
        assert!(pipeline.render());
        let first: Vec<String> = pipeline
            .graph()
            .unwrap()
            .nodes
            .iter()
            .map(|n| n.id.clone())
            .collect();
        assert!(!pipeline.render());
        let second: Vec<String> = pipeline
            .graph()
            .unwrap()
            .nodes
            .iter()
            .map(|n| n.id.clone())
            .collect();
        // Ids survive untouched, no reseed.
        assert_eq!(first, second);
    }

    #[test]
    fn status_overlay_never_changes_structure() {
        let mut pipeline = RenderPipeline::new();
        pipeline.set_definition(linear_definition());
        pipeline.render();
        let before: Vec<String> = pipeline
            .graph()
            .unwrap()
            .nodes
            .iter()
            .map(|n| n.id.clone())
            .collect();

        assert!(pipeline.apply_status(&[StatusRecord::new("t0", ExecutionPhase::Running)]));
        let graph = pipeline.graph().unwrap();
        let after: Vec<String> = graph.nodes.iter().map(|n| n.id.clone()).collect();
        assert_eq!(before, after);
        assert_eq!(
            graph.node_by_scoped_id("t0").unwrap().data.phase,
            Some(ExecutionPhase::Running)
        );
    }

    #[test]
    fn expand_validates_against_model() {
        let mut pipeline = RenderPipeline::new();
        pipeline.set_definition(linear_definition());
        assert!(!pipeline.expand("ghost", "ghost-0-child"));
        assert!(pipeline.breadcrumbs().is_empty());
    }
}

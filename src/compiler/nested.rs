//! NestedViewCompiler: breadcrumb-driven nested view selection and merge.
//!
//! Given the [`FlatGraph`] of one compile pass and the current per-container
//! breadcrumb selections, this compiler decides which single nesting level
//! to merge into the root graph for each top-level container, then merges
//! it. Expansion is always exactly one level at a time: containers inside a
//! merged level are coerced to collapsed placeholders so the user drills
//! down click by click instead of the graph auto-expanding recursively.

use rustc_hash::FxHashSet;

use crate::compiler::flatten::{CompileMode, FlatGraph};
use crate::navigation::BreadcrumbState;
use crate::render::GraphSection;
use crate::types::NodeKind;

/// Merges the active nested level of each container into the root graph.
pub struct NestedViewCompiler;

impl NestedViewCompiler {
    /// Produces the merged section for the current render pass.
    ///
    /// With `max_render_depth == 0` or in static mode no merging occurs and
    /// every container renders as a collapsed placeholder. Otherwise the
    /// active view per container is the last breadcrumb entry when present,
    /// else the container itself ("show its direct children"). A breadcrumb
    /// that references a level absent from the map falls back to the
    /// container's own children; a container with no captured levels at all
    /// stays collapsed.
    #[must_use]
    pub fn compile(
        flat: &FlatGraph,
        crumbs: &BreadcrumbState,
        max_render_depth: u32,
        mode: CompileMode,
    ) -> GraphSection {
        let mut out = flat.root.clone();

        if mode.is_static() {
            return out;
        }
        if max_render_depth == 0 {
            collapse_containers(&mut out);
            return out;
        }

        let root_parent_ids: FxHashSet<&str> =
            flat.containers.root_parent_ids().into_iter().collect();

        for rp in flat.containers.root_parent_ids() {
            let active = crumbs.active_view(rp).unwrap_or(rp);
            let section = flat.containers.section(rp, active).or_else(|| {
                if active != rp {
                    tracing::warn!(
                        container = %rp,
                        view = %active,
                        "breadcrumb view not captured, falling back to container's own children"
                    );
                }
                flat.containers.section(rp, rp)
            });
            let Some(section) = section else {
                // Nothing mergeable; leave the container collapsed.
                continue;
            };

            let mut merged = section.clone();
            merged.nodes.retain(|n| {
                // A merged node carrying a root parent's id would collide
                // with the container box itself (shared-recursion trees).
                !root_parent_ids.contains(n.id.as_str())
            });
            for node in &mut merged.nodes {
                if node.kind.is_container_kind() {
                    node.kind = NodeKind::NestedMaxDepth;
                }
                node.container_id = Some(rp.to_owned());
            }
            for edge in &mut merged.edges {
                edge.container_id = Some(rp.to_owned());
            }

            if let Some(parent) = out.nodes.iter_mut().find(|n| n.id == rp) {
                parent.data.is_root_parent = true;
            }
            out.extend(merged);
        }

        collapse_containers(&mut out);
        out
    }
}

/// Rewrites container-kind nodes that had no content merged into them to
/// the collapsed placeholder kind.
fn collapse_containers(section: &mut GraphSection) {
    for node in &mut section.nodes {
        if node.kind.is_container_kind() && !node.data.is_root_parent {
            node.kind = NodeKind::NestedMaxDepth;
        }
    }
}

//! Execution-status overlay.
//!
//! Runtime status is a stream of per-node records keyed by scoped id,
//! supplied by an external execution-status collaborator. The overlay
//! merges the latest phase per node into an already-laid-out
//! [`RenderGraph`] without touching structure or geometry, so a status
//! tick never forces a relayout.
//!
//! Status ids carry retry counts (`-N-` segments) that the static graph
//! does not; [`normalize_retry`](crate::identity::normalize_retry) maps
//! both sides onto a common key. When several records normalize to the
//! same node (retries), the record with the highest attempt count wins.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::identity::normalize_retry;
use crate::render::RenderGraph;

/// Lifecycle phase of one node execution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionPhase {
    Queued,
    Running,
    Succeeded,
    Failed,
    Aborted,
    Paused,
    /// Reported phase not understood by this engine version.
    #[default]
    Unknown,
}

impl ExecutionPhase {
    /// Returns `true` for phases no further record can follow.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Aborted)
    }

    /// Returns `true` while the node is still doing or awaiting work.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Queued | Self::Running | Self::Paused)
    }
}

/// One runtime status record for one node execution attempt.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    /// Execution-side scoped id; may embed retry counts.
    pub scoped_id: String,
    pub phase: ExecutionPhase,
    /// Attempt counter, starting at 0. Higher attempts shadow lower ones.
    #[serde(default)]
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StatusRecord {
    #[must_use]
    pub fn new(scoped_id: impl Into<String>, phase: ExecutionPhase) -> Self {
        Self {
            scoped_id: scoped_id.into(),
            phase,
            ..Self::default()
        }
    }
}

/// Merges status records into the graph in place.
///
/// Records for ids absent from the graph are ignored (the node may live in
/// a collapsed container this pass). Returns whether any node's phase
/// actually changed; the caller uses this to decide between emitting an
/// updated graph and keeping the current one.
pub fn apply_status(graph: &mut RenderGraph, records: &[StatusRecord]) -> bool {
    if records.is_empty() || graph.is_empty() {
        return false;
    }

    // Latest attempt per normalized id.
    let mut latest: FxHashMap<String, &StatusRecord> = FxHashMap::default();
    for record in records {
        let key = normalize_retry(&record.scoped_id);
        match latest.get(&key) {
            Some(existing) if existing.attempts >= record.attempts => {}
            _ => {
                latest.insert(key, record);
            }
        }
    }

    let mut changed = false;
    for node in &mut graph.nodes {
        let Some(record) = latest.get(node.data.scoped_id.as_str()) else {
            continue;
        };
        if node.data.phase != Some(record.phase) {
            node.data.phase = Some(record.phase);
            changed = true;
        }
    }
    if changed {
        tracing::debug!(records = records.len(), "merged status overlay");
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{NodeData, RenderNode};

    fn graph(ids: &[&str]) -> RenderGraph {
        RenderGraph {
            nodes: ids
                .iter()
                .map(|id| RenderNode {
                    id: format!("pass-0::{id}"),
                    data: NodeData {
                        scoped_id: (*id).to_owned(),
                        ..NodeData::default()
                    },
                    ..RenderNode::default()
                })
                .collect(),
            edges: vec![],
        }
    }

    #[test]
    fn overlay_sets_phase_by_scoped_id() {
        let mut g = graph(&["a", "b"]);
        let changed = apply_status(
            &mut g,
            &[StatusRecord::new("a", ExecutionPhase::Running)],
        );
        assert!(changed);
        assert_eq!(
            g.node_by_scoped_id("a").unwrap().data.phase,
            Some(ExecutionPhase::Running)
        );
        assert_eq!(g.node_by_scoped_id("b").unwrap().data.phase, None);
    }

    #[test]
    fn retry_ids_normalize_onto_static_ids() {
        let mut g = graph(&["sub-0-t0"]);
        let changed = apply_status(
            &mut g,
            &[StatusRecord::new("sub-2-t0", ExecutionPhase::Failed)],
        );
        assert!(changed);
        assert_eq!(
            g.node_by_scoped_id("sub-0-t0").unwrap().data.phase,
            Some(ExecutionPhase::Failed)
        );
    }

    #[test]
    fn highest_attempt_wins() {
        let mut g = graph(&["t"]);
        let failed = StatusRecord::new("t", ExecutionPhase::Failed);
        let mut retried = StatusRecord::new("t", ExecutionPhase::Running);
        retried.attempts = 2;
        apply_status(&mut g, &[failed, retried]);
        assert_eq!(
            g.node_by_scoped_id("t").unwrap().data.phase,
            Some(ExecutionPhase::Running)
        );
    }

    #[test]
    fn unchanged_overlay_reports_no_change() {
        let mut g = graph(&["a"]);
        let records = [StatusRecord::new("a", ExecutionPhase::Succeeded)];
        assert!(apply_status(&mut g, &records));
        assert!(!apply_status(&mut g, &records));
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut g = graph(&["a"]);
        assert!(!apply_status(
            &mut g,
            &[StatusRecord::new("ghost", ExecutionPhase::Running)],
        ));
    }

    #[test]
    fn phase_classification() {
        assert!(ExecutionPhase::Failed.is_terminal());
        assert!(!ExecutionPhase::Running.is_terminal());
        assert!(ExecutionPhase::Paused.is_active());
        assert!(!ExecutionPhase::Unknown.is_active());
    }
}

//! Compiled workflow definition input types.
//!
//! A [`WorkflowDefinition`] is the static, version-pinned description of a
//! workflow: its nodes, the edges between them, and the sections of any
//! statically known sub-workflows. It is supplied by an external
//! definition-fetching collaborator, usually as JSON, and is read-only to
//! this engine.
//!
//! Edges reference the entry and exit of their level through the sentinel
//! ids [`START_NODE_ID`](crate::types::START_NODE_ID) and
//! [`END_NODE_ID`](crate::types::END_NODE_ID).
//!
//! Malformed or empty input never aborts graph construction: the model
//! builder degrades to an empty graph. [`DefinitionError`] exists only at
//! the JSON-decode seam, before a definition enters the engine.
//!
//! # Examples
//!
//! ```rust
//! use trellis::model::definition::WorkflowDefinition;
//! use serde_json::json;
//!
//! let def = WorkflowDefinition::from_json(json!({
//!     "id": "wf.hello",
//!     "nodes": [{"id": "n0", "name": "greet"}],
//!     "edges": [
//!         {"source": "start-node", "target": "n0"},
//!         {"source": "n0", "target": "end-node"},
//!     ],
//! })).unwrap();
//! assert_eq!(def.nodes.len(), 1);
//! ```

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised while decoding a workflow definition from JSON.
#[derive(Debug, Error, Diagnostic)]
pub enum DefinitionError {
    /// The JSON payload did not match the definition schema.
    #[error("failed to decode workflow definition: {0}")]
    #[diagnostic(
        code(trellis::definition::decode),
        help("Check that the payload matches the compiled workflow definition schema.")
    )]
    Decode(#[from] serde_json::Error),
}

/// The static, version-pinned description of a workflow.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    /// Version-pinned workflow id.
    #[serde(default)]
    pub id: String,
    /// Top-level nodes.
    #[serde(default)]
    pub nodes: Vec<DefNode>,
    /// Top-level edges; may reference the sentinel start/end ids.
    #[serde(default)]
    pub edges: Vec<DefEdge>,
    /// Statically known sub-workflow sections, keyed by workflow id.
    #[serde(default)]
    pub sub_workflows: FxHashMap<String, WorkflowSection>,
}

impl WorkflowDefinition {
    /// Decodes a definition from a JSON value.
    pub fn from_json(value: serde_json::Value) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Returns `true` when the definition describes no work at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// One node of a workflow definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefNode {
    /// Id unique within the enclosing workflow definition.
    pub id: String,
    /// Display name; the node id is used when absent.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: DefNodeKind,
    /// Task-template metadata, if this node executes a task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskTemplate>,
}

impl DefNode {
    /// A plain task node.
    #[must_use]
    pub fn task(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            kind: DefNodeKind::Task,
            task: None,
        }
    }

    /// A sub-workflow reference node.
    #[must_use]
    pub fn subworkflow(id: impl Into<String>, workflow_id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            kind: DefNodeKind::Subworkflow {
                workflow_id: workflow_id.into(),
            },
            task: None,
        }
    }

    /// A dynamic node whose children are only known at runtime.
    #[must_use]
    pub fn dynamic(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            kind: DefNodeKind::Dynamic,
            task: None,
        }
    }

    /// The label shown by the renderer.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// The structural role of a definition node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DefNodeKind {
    /// A leaf task.
    #[default]
    Task,
    /// A gate awaiting external approval.
    Gate,
    /// A conditional container with one section per case.
    Branch { cases: Vec<BranchCase> },
    /// A reference to a sub-workflow section carried in
    /// [`WorkflowDefinition::sub_workflows`].
    Subworkflow { workflow_id: String },
    /// A container whose children are resolvable only at runtime and must
    /// be supplied through the dynamic sub-workflow map.
    Dynamic,
}

/// One case of a branch node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchCase {
    /// Condition label, e.g. `"x > 3"` or `"otherwise"`.
    #[serde(default)]
    pub label: String,
    pub section: WorkflowSection,
}

/// A nodes/edges pair describing one workflow level, used both for the
/// statically known sub-workflows of a definition and for dynamically
/// resolved sections supplied at runtime.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSection {
    #[serde(default)]
    pub nodes: Vec<DefNode>,
    #[serde(default)]
    pub edges: Vec<DefEdge>,
}

/// A directed edge between two definition nodes, scoped to one level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefEdge {
    pub source: String,
    pub target: String,
}

impl DefEdge {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Read-only task-template metadata supplied by the definition source.
///
/// The engine never interprets this beyond carrying it through to
/// [`NodeData`](crate::render::NodeData); it is the renderer's business.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    /// Task type discriminator, e.g. `"python-task"` or `"spark"`.
    #[serde(default)]
    pub task_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Opaque configuration blob, forwarded untouched.
    #[serde(default)]
    pub config: serde_json::Value,
}

//! Core types for the Trellis render-graph engine.
//!
//! This module defines the fundamental types used throughout the engine
//! for classifying nodes and describing geometry. These are the core
//! domain concepts that define what a render graph *is*.
//!
//! # Key Types
//!
//! - [`NodeKind`]: Classifies every node in a compiled render graph. The
//!   renderer dispatches on this tag to pick a visual representation, so
//!   the enum is exhaustive by design: adding a kind is a compile-time
//!   exhaustiveness failure at every match site, never a silent fallback.
//! - [`Point`] / [`Dimensions`]: Positions and sizes produced by the
//!   layout engine.
//!
//! # Sentinel Identifiers
//!
//! Compiled workflow definitions reference the entry and exit of a
//! workflow level through the sentinel ids [`START_NODE_ID`] and
//! [`END_NODE_ID`]. The model builder rewrites these to level-scoped
//! terminal nodes during tree construction.
//!
//! # Examples
//!
//! ```rust
//! use trellis::types::NodeKind;
//!
//! let task = NodeKind::Task;
//! assert!(!task.is_container_kind());
//! assert!(NodeKind::Subworkflow.is_container_kind());
//! assert!(NodeKind::NestedStart.is_nested_terminal());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel id used by workflow definitions for the entry of a level.
pub const START_NODE_ID: &str = "start-node";

/// Sentinel id used by workflow definitions for the exit of a level.
pub const END_NODE_ID: &str = "end-node";

/// Classifies a node within a compiled render graph.
///
/// `NodeKind` is the single dispatch key the external diagram renderer uses
/// to pick a visual representation. Kinds fall into three groups:
///
/// - **Work**: [`Task`](Self::Task), [`GateNode`](Self::GateNode)
/// - **Containers**: [`Branch`](Self::Branch), [`Subworkflow`](Self::Subworkflow),
///   and [`NestedMaxDepth`](Self::NestedMaxDepth) for a container rendered as
///   a collapsed, unexpandable placeholder
/// - **Terminals**: [`Start`](Self::Start)/[`End`](Self::End) for the root
///   level, [`NestedStart`](Self::NestedStart)/[`NestedEnd`](Self::NestedEnd)
///   inside containers
///
/// The `Static*` kinds mark nodes compiled for a read-only view, where no
/// interaction (drill-down, status overlay) is offered.
///
/// # Examples
///
/// ```rust
/// use trellis::types::NodeKind;
///
/// assert!(NodeKind::Start.is_terminal());
/// assert!(NodeKind::Branch.is_container_kind());
/// assert_eq!(NodeKind::Task.to_string(), "task");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// A leaf unit of work backed by a task template.
    #[default]
    Task,
    /// A conditional container owning one subgraph per branch case.
    Branch,
    /// A container owning the nodes of a referenced sub-workflow.
    Subworkflow,
    /// Entry terminal of the root level.
    Start,
    /// Exit terminal of the root level.
    End,
    /// Entry terminal of a nested level.
    NestedStart,
    /// Exit terminal of a nested level.
    NestedEnd,
    /// A container whose children are collapsed at the current render
    /// depth, or whose dynamic children have not been resolved yet.
    NestedMaxDepth,
    /// A root-level node compiled for a read-only view.
    StaticNode,
    /// A nested node compiled for a read-only view.
    StaticNestedNode,
    /// A gate node that pauses execution until approved.
    GateNode,
}

impl NodeKind {
    /// Returns `true` for root-level entry/exit terminals.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Start | Self::End)
    }

    /// Returns `true` for nested-level entry/exit terminals.
    #[must_use]
    pub fn is_nested_terminal(&self) -> bool {
        matches!(self, Self::NestedStart | Self::NestedEnd)
    }

    /// Returns `true` for any terminal, root or nested.
    #[must_use]
    pub fn is_any_terminal(&self) -> bool {
        self.is_terminal() || self.is_nested_terminal()
    }

    /// Returns `true` for kinds that own nested children when expanded.
    ///
    /// `NestedMaxDepth` is intentionally excluded: it is the collapsed
    /// rendering of a container, not a container in its own right.
    #[must_use]
    pub fn is_container_kind(&self) -> bool {
        matches!(self, Self::Branch | Self::Subworkflow)
    }

    /// Returns `true` for kinds compiled for read-only views.
    #[must_use]
    pub fn is_static(&self) -> bool {
        matches!(self, Self::StaticNode | Self::StaticNestedNode)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Task => "task",
            Self::Branch => "branch",
            Self::Subworkflow => "subworkflow",
            Self::Start => "start",
            Self::End => "end",
            Self::NestedStart => "nestedStart",
            Self::NestedEnd => "nestedEnd",
            Self::NestedMaxDepth => "nestedMaxDepth",
            Self::StaticNode => "staticNode",
            Self::StaticNestedNode => "staticNestedNode",
            Self::GateNode => "gateNode",
        };
        write!(f, "{s}")
    }
}

/// An absolute position in render coordinates, top-left anchored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point translated by `dx`/`dy`.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The rendered size of a node or container box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `true` when either extent is zero (an unsized box).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

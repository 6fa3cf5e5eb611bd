//! # Trellis: Workflow Render-Graph Engine
//!
//! Trellis turns a recursive workflow definition plus runtime execution
//! status into a flat, positioned graph an external diagram renderer can
//! draw directly. It owns the full pipeline from definition to geometry:
//! model construction, flattening, breadcrumb-driven nested-view merging,
//! layered layout, and status overlay.
//!
//! ## Core Concepts
//!
//! - **Model**: A recursive tree built from a workflow definition, with
//!   dynamic sub-workflow sections merged in as they resolve at runtime
//! - **Flattening**: The tree compiled into a root section plus a
//!   container map holding every nesting level of every container
//! - **Nested views**: Per-container breadcrumb stacks selecting which
//!   single nesting level is merged into the root graph, one level per
//!   click
//! - **Layout**: A two-pass layered layout that sizes container boxes from
//!   their merged content before placing the root level
//! - **Status overlay**: Runtime phases merged onto nodes by retry-
//!   normalized scoped id, without relayout
//!
//! ## Quick Start
//!
//! ```
//! use trellis::model::definition::{DefEdge, DefNode, WorkflowDefinition};
//! use trellis::pipeline::RenderPipeline;
//!
//! let definition = WorkflowDefinition {
//!     id: "wf.demo".into(),
//!     nodes: vec![DefNode::task("fetch"), DefNode::task("transform")],
//!     edges: vec![
//!         DefEdge::new("start-node", "fetch"),
//!         DefEdge::new("fetch", "transform"),
//!         DefEdge::new("transform", "end-node"),
//!     ],
//!     ..WorkflowDefinition::default()
//! };
//!
//! let mut pipeline = RenderPipeline::new();
//! pipeline.set_definition(definition);
//! assert!(pipeline.render());
//!
//! let graph = pipeline.graph().unwrap();
//! assert_eq!(graph.nodes.len(), 4); // start, fetch, transform, end
//! assert!(graph.nodes.iter().all(|n| !n.dimensions.is_zero()));
//! ```
//!
//! Re-rendering with unchanged inputs keeps the published graph and its
//! ids intact; the renderer is only handed a new graph (under a fresh id
//! namespace) when the structure actually changed:
//!
//! ```
//! # use trellis::model::definition::{DefEdge, DefNode, WorkflowDefinition};
//! # use trellis::pipeline::RenderPipeline;
//! # let definition = WorkflowDefinition {
//! #     id: "wf".into(),
//! #     nodes: vec![DefNode::task("t")],
//! #     edges: vec![DefEdge::new("start-node", "t"), DefEdge::new("t", "end-node")],
//! #     ..WorkflowDefinition::default()
//! # };
//! # let mut pipeline = RenderPipeline::new();
//! # pipeline.set_definition(definition);
//! assert!(pipeline.render());
//! assert!(!pipeline.render()); // structurally identical, nothing published
//! ```
//!
//! ## Error Philosophy
//!
//! Rendering never fails: empty or malformed input degrades to an empty
//! graph, unknown ids are dropped with a `tracing` warning, and cycles are
//! laid out best-effort. The only fallible seam is decoding a definition
//! from JSON ([`model::definition::DefinitionError`]).
//!
//! ## Module Guide
//!
//! - [`types`] - Node kinds, sentinel ids, and geometry primitives
//! - [`model`] - Definition input types and the recursive model builder
//! - [`compiler`] - Flattening and nested-view merging
//! - [`layout`] - Layered layout engine and its configuration
//! - [`navigation`] - Per-container breadcrumb stacks
//! - [`status`] - Execution phases and the status overlay
//! - [`identity`] - Retry normalization and render-pass id namespacing
//! - [`render`] - The flattened render-graph output types
//! - [`pipeline`] - The orchestrating facade most embedders use
//! - [`telemetry`] - Tracing subscriber setup helper

pub mod compiler;
pub mod identity;
pub mod layout;
pub mod model;
pub mod navigation;
#[cfg(feature = "petgraph-compat")]
pub mod petgraph_compat;
pub mod pipeline;
pub mod render;
pub mod status;
pub mod telemetry;
pub mod types;

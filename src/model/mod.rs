//! Graph model construction from compiled workflow definitions.
//!
//! The model side of the engine: input types for the compiled workflow
//! definition ([`definition`]), the recursive tree those definitions are
//! built into ([`GraphNode`]), and the [`GraphModelBuilder`] that performs
//! the depth-first construction, merging dynamically resolved sub-workflow
//! sections as they arrive.
//!
//! The model is rebuilt whenever the definition changes or a previously
//! unresolved dynamic section is supplied; everything downstream
//! (flattening, nested-view merging, layout) is a pure function of the
//! resulting tree.

pub mod definition;

mod builder;
mod node;


pub use builder::{DynamicSections, GraphModelBuilder};
pub use node::{GraphEdge, GraphNode};

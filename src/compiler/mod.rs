//! Render-graph compilation: flattening and nested-view merging.
//!
//! Two compilers live here, run back to back once per render pass:
//!
//! 1. [`RenderGraphCompiler`] flattens the recursive graph model into a
//!    root section plus a [`ContainerMap`](crate::render::ContainerMap)
//!    of every nesting level under every top-level container.
//! 2. [`NestedViewCompiler`] selects, per container, the single nested
//!    level the current breadcrumb state asks for and merges it into the
//!    root section.
//!
//! Both are pure functions over immutable inputs; the layout engine
//! consumes their output.

mod flatten;
mod nested;


pub use flatten::{CompileMode, FlatGraph, RenderGraphCompiler};
pub use nested::NestedViewCompiler;

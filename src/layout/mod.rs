//! Layout: turns a merged render section into positioned geometry.
//!
//! See [`LayoutEngine`] for the two-pass scheme; the underlying layered
//! ranking lives in the private `rank` module.

mod engine;
mod rank;

pub use engine::{LayoutConfig, LayoutEngine};

//! Identity normalization and render-pass id namespacing.
//!
//! Two identity problems run through the engine:
//!
//! 1. **Retry normalization.** The same logical node carries different ids
//!    in the static definition (no retry information) and in a runtime
//!    execution record (retry count embedded as a `-N-` segment).
//!    [`normalize_retry`] rewrites every retry segment to `-0-`, giving
//!    both sides a common, retry-agnostic scoped id.
//!
//! 2. **Render-pass collision avoidance.** The external renderer caches
//!    per-id state internally, so two consecutive render passes over
//!    structurally different graphs must never reuse ids.
//!    [`RenderPassIdGenerator`] hands out monotonically increasing seeds
//!    and [`namespace_ids`] prefixes a pass's id fields with one, making
//!    the namespaces of any two passes disjoint. A counter is used instead
//!    of random hashing so uniqueness is guaranteed, not probabilistic.
//!
//! # Examples
//!
//! ```rust
//! use trellis::identity::{normalize_retry, strip_namespace};
//!
//! assert_eq!(normalize_retry("n0-3-n1"), "n0-0-n1");
//! assert_eq!(normalize_retry("n0-0-n1"), "n0-0-n1"); // idempotent
//! assert_eq!(strip_namespace("pass-7::n0"), "n0");
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use crate::render::{RenderEdge, RenderNode};

/// Separator between a render-pass seed and the original id.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Rewrites every retry-count segment (`-N-`, N decimal) to `-0-`.
///
/// Idempotent: applying it twice yields the same string. Characters
/// outside retry segments are preserved in order. Segments are consumed
/// left to right, so in `a-1-2-b` only `-1-` is a segment; the `2` no
/// longer has a leading dash of its own.
#[must_use]
pub fn normalize_retry(id: &str) -> String {
    let bytes = id.as_bytes();
    let mut out = String::with_capacity(id.len());
    let mut literal_from = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'-' {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j > i + 1 && j < bytes.len() && bytes[j] == b'-' {
                out.push_str(&id[literal_from..i]);
                out.push_str("-0-");
                i = j + 1;
                literal_from = i;
                continue;
            }
        }
        i += 1;
    }
    out.push_str(&id[literal_from..]);
    out
}

/// Removes the render-pass namespace prefix from an id, if present.
#[must_use]
pub fn strip_namespace(id: &str) -> &str {
    match id.split_once(NAMESPACE_SEPARATOR) {
        Some((_, rest)) => rest,
        None => id,
    }
}

/// Prefixes `id` with a render-pass seed.
#[must_use]
pub fn namespaced(seed: &str, id: &str) -> String {
    format!("{seed}{NAMESPACE_SEPARATOR}{id}")
}

/// Source of render-pass namespace seeds.
///
/// Each call to [`next_seed`](Self::next_seed) returns a seed no earlier
/// pass of this generator has produced. The counter is atomic so a shared
/// generator stays collision-free even if callers race, though the engine
/// itself is single-threaded.
#[derive(Debug, Default)]
pub struct RenderPassIdGenerator {
    counter: AtomicU64,
}

impl RenderPassIdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next render-pass seed, e.g. `pass-3`.
    pub fn next_seed(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("pass-{n}")
    }
}

/// Returns copies of `nodes` and `edges` with every `id`, `source`,
/// `target`, and `container_id` prefixed by `seed`.
///
/// Node payloads ([`scoped_id`](crate::render::NodeData::scoped_id) in
/// particular) are left untouched; status correlation is pass-independent.
#[must_use]
pub fn namespace_ids(
    nodes: &[RenderNode],
    edges: &[RenderEdge],
    seed: &str,
) -> (Vec<RenderNode>, Vec<RenderEdge>) {
    let nodes = nodes
        .iter()
        .map(|n| {
            let mut n = n.clone();
            n.id = namespaced(seed, &n.id);
            n.container_id = n.container_id.as_deref().map(|c| namespaced(seed, c));
            n
        })
        .collect();
    let edges = edges
        .iter()
        .map(|e| {
            let mut e = e.clone();
            e.id = namespaced(seed, &e.id);
            e.source = namespaced(seed, &e.source);
            e.target = namespaced(seed, &e.target);
            e.container_id = e.container_id.as_deref().map(|c| namespaced(seed, c));
            e
        })
        .collect();
    (nodes, edges)
}

//! Breadcrumb navigation state for nested-view drill-down.
//!
//! Each root-level container owns an independent stack of nested-view
//! selections: drilling into one sub-workflow never disturbs the drill
//! state of its siblings. An absent (or emptied) stack means the container
//! shows its collapsed/root view.
//!
//! The state is the engine's only shared mutable piece; it is owned by the
//! navigation component and mutated exclusively through
//! [`push`](BreadcrumbState::push) and [`pop`](BreadcrumbState::pop).
//!
//! # Examples
//!
//! ```rust
//! use trellis::navigation::BreadcrumbState;
//!
//! let mut crumbs = BreadcrumbState::new();
//! assert!(crumbs.push("sub", "sub-0-inner"));
//! assert!(!crumbs.push("sub", "sub-0-inner")); // idempotent no-op
//! assert_eq!(crumbs.active_view("sub"), Some("sub-0-inner"));
//!
//! crumbs.push("sub", "sub-0-inner-0-deeper");
//! crumbs.pop("sub", 0); // truncate back to the first entry
//! assert_eq!(crumbs.depth("sub"), 1);
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Per-container stacks of nested-view selections.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BreadcrumbState {
    stacks: FxHashMap<String, Vec<String>>,
}

impl BreadcrumbState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `view_id` to the container's stack unless it is already the
    /// last entry. Returns whether the state changed.
    pub fn push(&mut self, container_id: impl Into<String>, view_id: impl Into<String>) -> bool {
        let view_id = view_id.into();
        let stack = self.stacks.entry(container_id.into()).or_default();
        if stack.last() == Some(&view_id) {
            return false;
        }
        stack.push(view_id);
        true
    }

    /// Truncates the container's stack to keep entries `0..=index`,
    /// discarding everything after. The key is removed entirely when the
    /// result is empty. Unknown containers and truncations that keep the
    /// full stack are no-ops returning `false`.
    pub fn pop(&mut self, container_id: &str, index: usize) -> bool {
        let Some(stack) = self.stacks.get_mut(container_id) else {
            return false;
        };
        let keep = index.saturating_add(1);
        if keep >= stack.len() {
            return false;
        }
        stack.truncate(keep);
        if stack.is_empty() {
            self.stacks.remove(container_id);
        }
        true
    }

    /// Drops the container's stack entirely, returning it to the
    /// collapsed/root view. Returns whether the state changed.
    pub fn reset(&mut self, container_id: &str) -> bool {
        self.stacks.remove(container_id).is_some()
    }

    /// The currently selected nested view for a container: the last stack
    /// entry, or `None` when the container is at its root view.
    #[must_use]
    pub fn active_view(&self, container_id: &str) -> Option<&str> {
        self.stacks
            .get(container_id)
            .and_then(|s| s.last())
            .map(String::as_str)
    }

    /// Current drill depth for a container (0 = root view).
    #[must_use]
    pub fn depth(&self, container_id: &str) -> usize {
        self.stacks.get(container_id).map_or(0, Vec::len)
    }

    /// The full stack for a container, for breadcrumb UI rendering.
    #[must_use]
    pub fn stack(&self, container_id: &str) -> &[String] {
        self.stacks
            .get(container_id)
            .map_or(&[] as &[String], Vec::as_slice)
    }

    /// Snapshot of all stacks, consumed by breadcrumb UI chrome.
    #[must_use]
    pub fn snapshot(&self) -> FxHashMap<String, Vec<String>> {
        self.stacks.clone()
    }

    /// Returns `true` when no container has an active drill-down.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

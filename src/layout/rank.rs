//! Longest-path ranking and barycenter ordering for one graph section.
//!
//! Ranking follows Kahn's algorithm: a node's rank is one past the maximum
//! rank of its predecessors, so every edge points from a lower rank to a
//! higher one whenever the section is acyclic. Nodes the traversal never
//! reaches (members of a cycle) are appended after the last settled rank
//! in input order, which keeps the layout total on malformed input instead
//! of failing.

use rustc_hash::FxHashMap;

use crate::render::{RenderEdge, RenderNode};

/// Nodes grouped by rank, each rank holding indices into the input slice.
pub(crate) type RankBuckets = Vec<Vec<usize>>;

/// Computes a rank per node and groups nodes into per-rank buckets.
pub(crate) fn rank_nodes(nodes: &[RenderNode], edges: &[RenderEdge]) -> RankBuckets {
    if nodes.is_empty() {
        return Vec::new();
    }

    let index: FxHashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut in_degree: Vec<usize> = vec![0; nodes.len()];
    for edge in edges {
        let (Some(&s), Some(&t)) = (index.get(edge.source.as_str()), index.get(edge.target.as_str()))
        else {
            continue;
        };
        if s == t {
            continue;
        }
        outgoing[s].push(t);
        in_degree[t] += 1;
    }

    let mut rank: Vec<Option<usize>> = vec![None; nodes.len()];
    let mut queue: Vec<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
    for &i in &queue {
        rank[i] = Some(0);
    }

    let mut head = 0;
    while head < queue.len() {
        let current = queue[head];
        head += 1;
        let next_rank = rank[current].unwrap_or(0) + 1;
        for &succ in &outgoing[current] {
            let settled = rank[succ].unwrap_or(0);
            if next_rank > settled {
                rank[succ] = Some(next_rank);
            }
            in_degree[succ] -= 1;
            if in_degree[succ] == 0 {
                queue.push(succ);
            }
        }
    }

    // Cycle members never reach in-degree zero; park them past the end.
    let overflow = rank.iter().flatten().max().map_or(0, |r| r + 1);
    let mut buckets: RankBuckets = Vec::new();
    for (i, r) in rank.iter().enumerate() {
        let r = match r {
            Some(r) if in_degree[i] == 0 => *r,
            _ => {
                tracing::warn!(id = %nodes[i].id, "node is part of a cycle, appending past last rank");
                overflow
            }
        };
        if buckets.len() <= r {
            buckets.resize_with(r + 1, Vec::new);
        }
        buckets[r].push(i);
    }
    buckets
}

/// Reorders nodes within each rank by the barycenter of their neighbors.
///
/// One downward sweep (sort by mean predecessor position) followed by one
/// upward sweep (mean successor position); nodes without neighbors in the
/// adjacent rank keep their current slot via a stable sort on their own
/// position.
pub(crate) fn order_buckets(
    buckets: &mut RankBuckets,
    nodes: &[RenderNode],
    edges: &[RenderEdge],
) {
    if buckets.len() < 2 {
        return;
    }

    let index: FxHashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut succs: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for edge in edges {
        let (Some(&s), Some(&t)) = (index.get(edge.source.as_str()), index.get(edge.target.as_str()))
        else {
            continue;
        };
        preds[t].push(s);
        succs[s].push(t);
    }

    let mut slot: Vec<f64> = vec![0.0; nodes.len()];
    let assign = |buckets: &RankBuckets, slot: &mut Vec<f64>| {
        for bucket in buckets {
            for (pos, &i) in bucket.iter().enumerate() {
                slot[i] = pos as f64;
            }
        }
    };
    let barycenter = |neighbors: &[usize], slot: &[f64], own: f64| -> f64 {
        if neighbors.is_empty() {
            own
        } else {
            neighbors.iter().map(|&n| slot[n]).sum::<f64>() / neighbors.len() as f64
        }
    };

    assign(buckets, &mut slot);
    for r in 1..buckets.len() {
        let mut keyed: Vec<(f64, usize)> = buckets[r]
            .iter()
            .map(|&i| (barycenter(&preds[i], &slot, slot[i]), i))
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        buckets[r] = keyed.into_iter().map(|(_, i)| i).collect();
        assign(buckets, &mut slot);
    }
    for r in (0..buckets.len().saturating_sub(1)).rev() {
        let mut keyed: Vec<(f64, usize)> = buckets[r]
            .iter()
            .map(|&i| (barycenter(&succs[i], &slot, slot[i]), i))
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        buckets[r] = keyed.into_iter().map(|(_, i)| i).collect();
        assign(buckets, &mut slot);
    }
}

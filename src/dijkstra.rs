//! Dijkstra shortest-path search over congestion-scaled edge weights.
//!
//! Each relaxation asks the congestion index for the edge's current factor,
//! so the effective weight is `base_travel_time * factor` at the snapshot
//! the caller holds. Distances accumulate in f64; the reported total is
//! narrowed to f32 at the end.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::congestion::CongestionIndex;
use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteResult {
    pub nodes: Vec<NodeId>,
    pub total_travel_time: f32,
    pub reachable: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RouteStats {
    /// Non-stale heap pops
    pub expanded_nodes: u32,
    /// Successful distance improvements
    pub relaxed_edges: u32,
    /// Distinct nodes expanded at least once
    pub visited_nodes: u32,
}

#[derive(Debug, Clone, Default)]
pub struct RouteComputation {
    pub result: RouteResult,
    pub stats: RouteStats,
}

const NO_PREDECESSOR: NodeId = NodeId::MAX;

#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    node: NodeId,
    cost: f64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

/// Single-pair shortest path from `source` to `target`.
///
/// Relaxation uses strict `<`, so among equal-cost paths the one discovered
/// first wins. Stale heap entries are discarded before they touch the stats.
pub fn shortest_path(
    graph: &Graph,
    congestion: &CongestionIndex,
    source: NodeId,
    target: NodeId,
) -> Result<RouteComputation> {
    let node_count = graph.node_count();
    if source as usize >= node_count || target as usize >= node_count {
        return Err(Error::OutOfRange(format!(
            "route endpoints {source}->{target} exceed node count {node_count}"
        )));
    }

    let mut stats = RouteStats::default();
    let mut result = RouteResult::default();

    if source == target {
        result.nodes = vec![source];
        result.reachable = true;
        stats.expanded_nodes = 1;
        stats.visited_nodes = 1;
        return Ok(RouteComputation { result, stats });
    }

    let mut dist = vec![f64::INFINITY; node_count];
    let mut pred = vec![NO_PREDECESSOR; node_count];
    let mut visited = vec![false; node_count];
    dist[source as usize] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(QueueEntry {
        node: source,
        cost: 0.0,
    });

    while let Some(QueueEntry { node: u, cost: d }) = heap.pop() {
        // Skip stale entries
        if d > dist[u as usize] {
            continue;
        }

        stats.expanded_nodes += 1;

        if !visited[u as usize] {
            visited[u as usize] = true;
            stats.visited_nodes += 1;
        }

        if u == target {
            break;
        }

        for edge in graph.neighbors(u) {
            let factor = congestion.point_query(edge.id as usize)?;
            let effective_weight = f64::from(edge.base_travel_time) * f64::from(factor);
            let next_cost = d + effective_weight;

            if next_cost < dist[edge.to as usize] {
                dist[edge.to as usize] = next_cost;
                pred[edge.to as usize] = u;
                stats.relaxed_edges += 1;
                heap.push(QueueEntry {
                    node: edge.to,
                    cost: next_cost,
                });
            }
        }
    }

    if dist[target as usize].is_infinite() {
        return Ok(RouteComputation { result, stats });
    }

    let mut path = Vec::new();
    let mut current = target;
    while current != NO_PREDECESSOR {
        path.push(current);
        if current == source {
            break;
        }
        current = pred[current as usize];
    }

    if path.last() != Some(&source) {
        return Ok(RouteComputation { result, stats });
    }

    path.reverse();

    result.nodes = path;
    result.total_travel_time = dist[target as usize] as f32;
    result.reachable = true;
    Ok(RouteComputation { result, stats })
}

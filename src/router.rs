//! Router: graph and congestion index behind a reader-writer lock.
//!
//! Route queries take shared access for the whole search, so every query
//! sees a fixed snapshot of the congestion factors. Updates take exclusive
//! access and are O(log E). The graph itself is immutable after load; the
//! lock guards the congestion index, the only mutable state.

use std::sync::RwLock;

use serde::Deserialize;

use crate::congestion::CongestionIndex;
use crate::dijkstra::{self, RouteComputation};
use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};

/// Wire form of a graph: node count plus an ordered edge list. The edge id
/// of each entry is its position in the list.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphDescription {
    pub nodes: usize,
    pub edges: Vec<EdgeDescription>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeDescription {
    pub from: NodeId,
    pub to: NodeId,
    pub base_travel_time: f32,
}

impl GraphDescription {
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input)
            .map_err(|err| Error::InvalidInput(format!("malformed graph description: {err}")))
    }
}

pub struct Router {
    graph: Graph,
    congestion: RwLock<CongestionIndex>,
}

impl Router {
    /// Wrap a loaded graph with a fresh congestion index sized to its edge
    /// count (every factor starts at 1.0).
    pub fn new(graph: Graph) -> Self {
        let congestion = CongestionIndex::new(graph.edge_count());
        Self {
            graph,
            congestion: RwLock::new(congestion),
        }
    }

    pub fn from_description(description: &GraphDescription) -> Result<Self> {
        let mut graph = Graph::new(description.nodes);
        for edge in &description.edges {
            if !edge.base_travel_time.is_finite() || edge.base_travel_time < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "edge {}->{} has invalid base travel time {}",
                    edge.from, edge.to, edge.base_travel_time
                )));
            }
            graph.add_edge(edge.from, edge.to, edge.base_travel_time)?;
        }
        Ok(Self::new(graph))
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Shortest path under the congestion snapshot held for the duration of
    /// the search. Many queries may run in parallel.
    pub fn compute_route(&self, source: NodeId, target: NodeId) -> Result<RouteComputation> {
        let congestion = self
            .congestion
            .read()
            .map_err(|_| Error::Internal("congestion lock poisoned".to_string()))?;
        dijkstra::shortest_path(&self.graph, &congestion, source, target)
    }

    /// Multiply `factor` into the inclusive edge-id range [edge_start,
    /// edge_end]. Excludes all queries while it runs.
    ///
    /// Factors must be strictly positive finite numbers; zero would make
    /// edges free and negative values break the non-negativity Dijkstra
    /// relies on.
    pub fn apply_congestion_update(
        &self,
        edge_start: usize,
        edge_end: usize,
        factor: f32,
    ) -> Result<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "congestion factor must be a positive finite number, got {factor}"
            )));
        }
        let mut congestion = self
            .congestion
            .write()
            .map_err(|_| Error::Internal("congestion lock poisoned".to_string()))?;
        congestion.range_multiply(edge_start, edge_end, factor)
    }
}

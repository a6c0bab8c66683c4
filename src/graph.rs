//! Immutable adjacency graph with dense, insertion-ordered edge ids.
//!
//! Edge ids double as positions in the congestion index, so they are
//! assigned once at load time and never renumbered.

use crate::error::{Error, Result};

pub type NodeId = u32;
pub type EdgeId = u32;

/// Outgoing edge record, immutable after load
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: NodeId,
    pub base_travel_time: f32,
    pub id: EdgeId,
}

#[derive(Debug)]
pub struct Graph {
    adjacency: Vec<Vec<Edge>>,
    next_edge_id: EdgeId,
}

impl Graph {
    pub fn new(node_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); node_count],
            next_edge_id: 0,
        }
    }

    /// Append an edge and assign it the next dense id.
    ///
    /// Load-time only: the adjacency is frozen once the router takes
    /// ownership. Duplicate (from, to) pairs are allowed.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, base_travel_time: f32) -> Result<()> {
        let node_count = self.adjacency.len();
        if from as usize >= node_count || to as usize >= node_count {
            return Err(Error::OutOfRange(format!(
                "edge {from}->{to} exceeds node count {node_count}"
            )));
        }

        let id = self.next_edge_id;
        self.adjacency[from as usize].push(Edge {
            to,
            base_travel_time,
            id,
        });
        self.next_edge_id += 1;
        Ok(())
    }

    /// Outgoing edges of `u`, in insertion order. Unknown nodes get an
    /// empty slice rather than an error (hot path).
    #[inline(always)]
    pub fn neighbors(&self, u: NodeId) -> &[Edge] {
        self.adjacency
            .get(u as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.next_edge_id as usize
    }
}

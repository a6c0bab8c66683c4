//! Fluxroute: shortest-path routing over congestion-modulated edge weights.
//!
//! Pipeline for a query: router takes shared access, Dijkstra walks the
//! immutable graph and asks the congestion index for each edge's current
//! factor, the engine façade wraps the call with timing and counters.
//! A congestion update takes exclusive access and range-multiplies a
//! contiguous edge-id interval in O(log E).
//!
//! - `graph` - immutable adjacency with dense, insertion-ordered edge ids
//! - `congestion` - lazy multiplicative segment tree over edge ids
//! - `dijkstra` - shortest-path search consulting the index per relaxation
//! - `router` - reader-writer composition plus the JSON graph loader
//! - `engine` - per-call timing and aggregate counters
//! - `server` - HTTP API (axum) for queries, updates, and metrics
//!
//! Key principle: point queries on the congestion index never mutate lazy
//! state, so route computations only need shared access and run in
//! parallel with one another.

pub mod congestion;
pub mod dijkstra;
pub mod engine;
pub mod error;
pub mod graph;
pub mod router;
pub mod server;

pub use congestion::CongestionIndex;
pub use dijkstra::{shortest_path, RouteComputation, RouteResult, RouteStats};
pub use engine::{Engine, EngineStats, RouteResponse};
pub use error::{Error, Result};
pub use graph::{Edge, EdgeId, Graph, NodeId};
pub use router::{EdgeDescription, GraphDescription, Router};

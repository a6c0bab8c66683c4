//! Engine façade: per-call timing and aggregate counters around a router.
//!
//! The aggregate stats live behind their own mutex, taken twice per query
//! (once to commit the query's deltas, once to sample the snapshot for the
//! response) and never inside the router's reader-writer section.

use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use crate::dijkstra::RouteResult;
use crate::error::{Error, Result};
use crate::graph::NodeId;
use crate::router::{GraphDescription, Router};

#[derive(Debug, Clone, Copy, Default)]
pub struct EngineStats {
    pub total_queries: u64,
    pub total_updates: u64,
    pub total_compute_time_us: f64,
    pub max_compute_time_us: f64,
}

/// One route answer plus the engine aggregates sampled right after it.
#[derive(Debug, Clone)]
pub struct RouteResponse {
    pub result: RouteResult,
    pub stats: EngineStats,
    pub expanded_nodes: u64,
    pub compute_time_us: f64,
}

pub struct Engine {
    router: Router,
    stats: Mutex<EngineStats>,
}

impl Engine {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            stats: Mutex::new(EngineStats::default()),
        }
    }

    pub fn from_description(description: &GraphDescription) -> Result<Self> {
        Ok(Self::new(Router::from_description(description)?))
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Compute a route and record its wall-clock duration in the
    /// aggregates. Failed queries propagate before any counter moves.
    pub fn route(&self, source: NodeId, target: NodeId) -> Result<RouteResponse> {
        let started = Instant::now();
        let computation = self.router.compute_route(source, target)?;
        let compute_time_us = started.elapsed().as_micros() as f64;

        {
            let mut stats = self.lock_stats()?;
            stats.total_queries += 1;
            stats.total_compute_time_us += compute_time_us;
            stats.max_compute_time_us = stats.max_compute_time_us.max(compute_time_us);
        }

        // Second, separate acquisition: the snapshot may include other
        // queries that committed in between.
        let snapshot = *self.lock_stats()?;

        Ok(RouteResponse {
            result: computation.result,
            stats: snapshot,
            expanded_nodes: u64::from(computation.stats.expanded_nodes),
            compute_time_us,
        })
    }

    pub fn apply_congestion_update(
        &self,
        edge_start: usize,
        edge_end: usize,
        factor: f32,
    ) -> Result<()> {
        self.router
            .apply_congestion_update(edge_start, edge_end, factor)?;
        self.lock_stats()?.total_updates += 1;
        Ok(())
    }

    pub fn stats(&self) -> Result<EngineStats> {
        Ok(*self.lock_stats()?)
    }

    pub fn reset_stats(&self) -> Result<()> {
        *self.lock_stats()? = EngineStats::default();
        Ok(())
    }

    fn lock_stats(&self) -> Result<MutexGuard<'_, EngineStats>> {
        self.stats
            .lock()
            .map_err(|_| Error::Internal("stats lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    const TOLERANCE: f32 = 1e-5;

    fn sample_engine() -> Engine {
        let mut graph = Graph::new(4);
        graph.add_edge(0, 1, 1.0).unwrap();
        graph.add_edge(1, 3, 1.0).unwrap();
        graph.add_edge(0, 2, 2.0).unwrap();
        graph.add_edge(2, 3, 1.0).unwrap();
        Engine::new(Router::new(graph))
    }

    #[test]
    fn route_reports_result_and_aggregates() {
        let engine = sample_engine();

        let response = engine.route(0, 3).unwrap();
        assert!(response.result.reachable);
        assert!((response.result.total_travel_time - 2.0).abs() < TOLERANCE);
        assert_eq!(response.result.nodes, vec![0, 1, 3]);
        assert!(response.expanded_nodes > 0);
        assert!(response.compute_time_us >= 0.0);

        let stats = engine.stats().unwrap();
        assert_eq!(stats.total_queries, 1);
        assert_eq!(stats.total_updates, 0);
        assert!(stats.total_compute_time_us >= 0.0);
        assert!(stats.max_compute_time_us <= stats.total_compute_time_us + f64::EPSILON);
    }

    #[test]
    fn updates_are_counted_and_applied() {
        let engine = sample_engine();

        let baseline = engine.route(0, 3).unwrap();
        assert_eq!(baseline.result.nodes, vec![0, 1, 3]);

        engine.apply_congestion_update(0, 1, 2.5).unwrap();

        let congested = engine.route(0, 3).unwrap();
        assert!((congested.result.total_travel_time - 3.0).abs() < TOLERANCE);
        assert_eq!(congested.result.nodes, vec![0, 2, 3]);

        let stats = engine.stats().unwrap();
        assert_eq!(stats.total_queries, 2);
        assert_eq!(stats.total_updates, 1);
    }

    #[test]
    fn failed_operations_do_not_count() {
        let engine = sample_engine();

        engine.route(0, 99).unwrap_err();
        engine.apply_congestion_update(3, 1, 2.0).unwrap_err();

        let stats = engine.stats().unwrap();
        assert_eq!(stats.total_queries, 0);
        assert_eq!(stats.total_updates, 0);
    }

    #[test]
    fn reset_clears_aggregates() {
        let engine = sample_engine();
        engine.route(0, 3).unwrap();
        engine.apply_congestion_update(0, 0, 1.1).unwrap();

        engine.reset_stats().unwrap();

        let stats = engine.stats().unwrap();
        assert_eq!(stats.total_queries, 0);
        assert_eq!(stats.total_updates, 0);
        assert_eq!(stats.total_compute_time_us, 0.0);
        assert_eq!(stats.max_compute_time_us, 0.0);
    }
}

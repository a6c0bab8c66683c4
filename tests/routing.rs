//! End-to-end scenarios over the router, loader, and engine façade.

use fluxroute::{Engine, Graph, GraphDescription, Router};

const TOLERANCE: f32 = 1e-5;

fn build_graph(nodes: usize, edges: &[(u32, u32, f32)]) -> Graph {
    let mut graph = Graph::new(nodes);
    for &(from, to, time) in edges {
        graph.add_edge(from, to, time).unwrap();
    }
    graph
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "got {actual}, expected {expected}"
    );
}

/// Every consecutive pair in a reported path must be an edge of the graph.
fn assert_valid_path(edges: &[(u32, u32, f32)], path: &[u32], source: u32, target: u32) {
    assert!(!path.is_empty(), "path is empty");
    assert_eq!(*path.first().unwrap(), source, "path must start at source");
    assert_eq!(*path.last().unwrap(), target, "path must end at target");
    for pair in path.windows(2) {
        assert!(
            edges.iter().any(|&(from, to, _)| from == pair[0] && to == pair[1]),
            "no edge {} -> {} in graph",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn congestion_shifts_route_between_alternatives() {
    let edges = [(0, 1, 1.0), (1, 2, 1.0), (0, 2, 3.0)];
    let router = Router::new(build_graph(3, &edges));

    let baseline = router.compute_route(0, 2).unwrap();
    assert!(baseline.result.reachable);
    assert_close(baseline.result.total_travel_time, 2.0);
    assert_eq!(baseline.result.nodes, vec![0, 1, 2]);

    // Doubling edge 0 brings the via path to parity with the direct one;
    // either path is a correct answer at cost 3.0.
    router.apply_congestion_update(0, 0, 2.0).unwrap();
    let tied = router.compute_route(0, 2).unwrap();
    assert!(tied.result.reachable);
    assert_close(tied.result.total_travel_time, 3.0);
    assert_valid_path(&edges, &tied.result.nodes, 0, 2);

    // Doubling both via edges makes the direct path strictly better.
    router.apply_congestion_update(0, 1, 2.0).unwrap();
    let rerouted = router.compute_route(0, 2).unwrap();
    assert!(rerouted.result.reachable);
    assert_close(rerouted.result.total_travel_time, 3.0);
    assert_eq!(rerouted.result.nodes, vec![0, 2]);
}

#[test]
fn range_update_over_whole_path_reroutes() {
    let edges = [(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (0, 3, 5.0)];
    let router = Router::new(build_graph(4, &edges));

    let baseline = router.compute_route(0, 3).unwrap();
    assert_close(baseline.result.total_travel_time, 3.0);
    assert_eq!(baseline.result.nodes, vec![0, 1, 2, 3]);

    router.apply_congestion_update(0, 2, 2.0).unwrap();

    let rerouted = router.compute_route(0, 3).unwrap();
    assert_close(rerouted.result.total_travel_time, 5.0);
    assert_eq!(rerouted.result.nodes, vec![0, 3]);
}

#[test]
fn unreachable_target_reports_empty_path() {
    let router = Router::new(build_graph(3, &[(0, 1, 2.0)]));

    let computation = router.compute_route(0, 2).unwrap();
    assert!(!computation.result.reachable);
    assert!(computation.result.nodes.is_empty());
    assert_eq!(computation.result.total_travel_time, 0.0);
}

#[test]
fn source_equals_target_through_engine() {
    let engine = Engine::new(Router::new(build_graph(2, &[(0, 1, 3.0)])));

    let response = engine.route(1, 1).unwrap();
    assert!(response.result.reachable);
    assert_eq!(response.result.nodes, vec![1]);
    assert_eq!(response.result.total_travel_time, 0.0);
    assert_eq!(response.expanded_nodes, 1);
}

#[test]
fn reported_paths_are_walkable() {
    let edges = [
        (0, 1, 1.0),
        (1, 2, 2.0),
        (2, 5, 1.0),
        (0, 3, 1.5),
        (3, 4, 1.0),
        (4, 5, 1.0),
    ];
    let router = Router::new(build_graph(6, &edges));

    let computation = router.compute_route(0, 5).unwrap();
    assert!(computation.result.reachable);
    assert_valid_path(&edges, &computation.result.nodes, 0, 5);
    assert_close(computation.result.total_travel_time, 3.5);
}

#[test]
fn json_description_round_trips_through_engine() {
    let description = GraphDescription::from_json_str(
        r#"{
            "nodes": 4,
            "edges": [
                { "from": 0, "to": 1, "base_travel_time": 1.0 },
                { "from": 1, "to": 3, "base_travel_time": 1.0 },
                { "from": 0, "to": 2, "base_travel_time": 3.0 },
                { "from": 2, "to": 3, "base_travel_time": 1.0 }
            ]
        }"#,
    )
    .unwrap();

    let engine = Engine::from_description(&description).unwrap();

    let response = engine.route(0, 3).unwrap();
    assert!(response.result.reachable);
    assert_close(response.result.total_travel_time, 2.0);
    assert_eq!(response.result.nodes, vec![0, 1, 3]);

    // Edge ids follow the description order, so [2, 3] is the direct path.
    engine.apply_congestion_update(0, 1, 10.0).unwrap();
    let rerouted = engine.route(0, 3).unwrap();
    assert_close(rerouted.result.total_travel_time, 4.0);
    assert_eq!(rerouted.result.nodes, vec![0, 2, 3]);

    let stats = engine.stats().unwrap();
    assert_eq!(stats.total_queries, 2);
    assert_eq!(stats.total_updates, 1);

    engine.reset_stats().unwrap();
    assert_eq!(engine.stats().unwrap().total_queries, 0);
}

#[test]
fn response_snapshot_tracks_other_queries() {
    let engine = Engine::new(Router::new(build_graph(2, &[(0, 1, 1.0)])));

    let first = engine.route(0, 1).unwrap();
    assert_eq!(first.stats.total_queries, 1);

    let second = engine.route(0, 1).unwrap();
    assert_eq!(second.stats.total_queries, 2);
    assert!(second.stats.total_compute_time_us >= first.stats.total_compute_time_us);
}

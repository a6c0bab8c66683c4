//! HTTP API for the routing engine.
//!
//! # Endpoints
//!
//! - `GET /route?src=&dst=` - Point-to-point route query
//! - `POST /api/v1/route` - Route query with JSON body
//! - `POST /api/v1/congestion/update` - Range congestion update
//! - `GET /metrics` - Aggregate engine counters
//! - `GET /health`, `GET /api/v1/health` - Health checks
//! - `GET /docs` - Swagger UI

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Json;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::engine::Engine;
use crate::error::Error;
use crate::graph::NodeId;

#[derive(OpenApi)]
#[openapi(
    paths(route_query, route_post, congestion_update, metrics, health),
    components(schemas(
        RouteBody,
        CongestionBody,
        RouteReply,
        RouteQueryStats,
        MetricsReply,
        HealthReply,
        ErrorResponse
    )),
    info(
        title = "Fluxroute API",
        version = "0.1.0",
        description = "Shortest-path routing with live congestion updates"
    )
)]
struct ApiDoc;

#[derive(Debug, Deserialize, IntoParams)]
pub struct RouteQueryParams {
    /// Source node id
    pub src: NodeId,
    /// Destination node id
    pub dst: NodeId,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RouteBody {
    /// Source node id
    #[schema(example = 0)]
    pub source: NodeId,
    /// Destination node id
    #[schema(example = 3)]
    pub target: NodeId,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CongestionBody {
    /// First edge id of the inclusive range
    #[schema(example = 0)]
    pub edge_start: usize,
    /// Last edge id of the inclusive range
    #[schema(example = 2)]
    pub edge_end: usize,
    /// Multiplicative congestion factor, strictly positive
    #[schema(example = 2.0)]
    pub factor: f32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RouteQueryStats {
    pub compute_us: f64,
    pub expanded_nodes: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RouteReply {
    pub src: NodeId,
    pub dst: NodeId,
    /// Total travel time in seconds
    pub distance: f32,
    /// Travel time in milliseconds (convenience field)
    pub eta_ms: i64,
    /// Node ids from source to destination, empty when unreachable
    pub path: Vec<NodeId>,
    pub reachable: bool,
    pub stats: RouteQueryStats,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MetricsReply {
    pub queries_total: u64,
    pub updates_total: u64,
    pub compute_time_total_us: f64,
    pub compute_time_max_us: f64,
    pub compute_time_avg_us: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthReply {
    pub status: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_reply(err: Error) -> ApiError {
    let status = match err {
        Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

fn run_route(engine: &Engine, source: NodeId, target: NodeId) -> Result<RouteReply, ApiError> {
    let response = engine.route(source, target).map_err(error_reply)?;
    Ok(RouteReply {
        src: source,
        dst: target,
        distance: response.result.total_travel_time,
        eta_ms: (response.result.total_travel_time * 1000.0) as i64,
        path: response.result.nodes,
        reachable: response.result.reachable,
        stats: RouteQueryStats {
            compute_us: response.compute_time_us,
            expanded_nodes: response.expanded_nodes,
        },
    })
}

#[utoipa::path(
    get,
    path = "/route",
    params(RouteQueryParams),
    responses(
        (status = 200, description = "Route computed", body = RouteReply),
        (status = 400, description = "Invalid node ids", body = ErrorResponse)
    ),
    tag = "routing"
)]
async fn route_query(
    State(engine): State<Arc<Engine>>,
    Query(params): Query<RouteQueryParams>,
) -> Result<Json<RouteReply>, ApiError> {
    run_route(&engine, params.src, params.dst).map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/route",
    request_body = RouteBody,
    responses(
        (status = 200, description = "Route computed", body = RouteReply),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "routing"
)]
async fn route_post(
    State(engine): State<Arc<Engine>>,
    Json(body): Json<RouteBody>,
) -> Result<Json<RouteReply>, ApiError> {
    run_route(&engine, body.source, body.target).map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/congestion/update",
    request_body = CongestionBody,
    responses(
        (status = 200, description = "Update applied", body = HealthReply),
        (status = 400, description = "Invalid range or factor", body = ErrorResponse)
    ),
    tag = "congestion"
)]
async fn congestion_update(
    State(engine): State<Arc<Engine>>,
    Json(body): Json<CongestionBody>,
) -> Result<Json<HealthReply>, ApiError> {
    engine
        .apply_congestion_update(body.edge_start, body.edge_end, body.factor)
        .map_err(error_reply)?;
    Ok(Json(HealthReply { status: "ok" }))
}

#[utoipa::path(
    get,
    path = "/metrics",
    responses((status = 200, description = "Aggregate counters", body = MetricsReply)),
    tag = "metrics"
)]
async fn metrics(State(engine): State<Arc<Engine>>) -> Result<Json<MetricsReply>, ApiError> {
    let stats = engine.stats().map_err(error_reply)?;
    let avg = if stats.total_queries > 0 {
        stats.total_compute_time_us / stats.total_queries as f64
    } else {
        0.0
    };
    Ok(Json(MetricsReply {
        queries_total: stats.total_queries,
        updates_total: stats.total_updates,
        compute_time_total_us: stats.total_compute_time_us,
        compute_time_max_us: stats.max_compute_time_us,
        compute_time_avg_us: avg,
    }))
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthReply)),
    tag = "health"
)]
async fn health() -> Json<HealthReply> {
    Json(HealthReply { status: "ok" })
}

/// Build the Axum router
pub fn build_router(engine: Arc<Engine>) -> axum::Router {
    axum::Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/route", get(route_query))
        .route("/api/v1/route", post(route_post))
        .route("/api/v1/congestion/update", post(congestion_update))
        .route("/metrics", get(metrics))
        .route("/health", get(health))
        .route("/api/v1/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(engine)
}

/// Initialize structured logging with tracing.
///
/// - `log_format`: "text" for human-readable, "json" for structured JSON lines.
/// - Respects RUST_LOG env var for filtering (default: `info,tower_http=debug`).
pub fn init_tracing(log_format: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    match log_format {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().with_env_filter(filter).with_target(false).init();
        }
    }
}

/// Shutdown signal: waits for SIGINT (Ctrl-C) or SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, starting graceful shutdown");
}

/// Serve the engine until SIGINT/SIGTERM.
pub async fn serve(engine: Engine, host: &str, port: u16) -> anyhow::Result<()> {
    let engine = Arc::new(engine);
    let app = build_router(engine);

    let addr = format!("{host}:{port}");
    tracing::info!(port = port, "server listening on http://{}", addr);
    tracing::info!(port = port, "API docs at http://{}/docs", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down gracefully");
    Ok(())
}

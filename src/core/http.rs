//! HTTP endpoint server using Axum

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::core::scanner::ScanStatus;
use crate::metrics::Metrics;
use crate::models::summary::MarketSummary;

pub const SERVICE_NAME: &str = "confluex-scanner";

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub scan_status: Arc<RwLock<ScanStatus>>,
    pub latest_summary: Arc<RwLock<Option<MarketSummary>>>,
}

impl AppState {
    pub fn new(
        metrics: Arc<Metrics>,
        scan_status: Arc<RwLock<ScanStatus>>,
        latest_summary: Arc<RwLock<Option<MarketSummary>>>,
    ) -> Self {
        Self {
            metrics,
            start_time: Arc::new(Instant::now()),
            scan_status,
            latest_summary,
        }
    }
}

/// `degraded` while the last scan attempt failed, `healthy` otherwise.
pub fn health_label(status: &ScanStatus) -> &'static str {
    if status.last_error.is_some() {
        "degraded"
    } else {
        "healthy"
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let scan = state.scan_status.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health_label(&scan),
        "uptime_seconds": uptime_seconds,
        "service": SERVICE_NAME,
        "scanning": scan.scanning,
        "last_scan_at": scan.last_scan_at,
        "last_setups": scan.last_setups,
        "last_error": scan.last_error,
    })))
}

/// Latest completed scan; 503 until the first one finishes.
pub async fn summary_handler(
    State(state): State<AppState>,
) -> Result<Json<MarketSummary>, StatusCode> {
    state
        .latest_summary
        .read()
        .await
        .clone()
        .map(Json)
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    state.metrics.http_requests_in_flight.dec();

    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/summary", get(summary_handler))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}

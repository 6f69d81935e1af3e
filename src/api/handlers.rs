//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::advisor::{
    Advisor, FeeAdvice, HealthStatus, Readiness, RouteAdvice, DEFAULT_TARGET_BLOCKS,
};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Advisor shared by every request.
    pub advisor: Arc<Advisor>,
    /// Prometheus handle, present when metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(advisor: Advisor) -> Self {
        Self {
            advisor: Arc::new(advisor),
            metrics: None,
        }
    }

    /// Serve metrics from the given handle.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Query for `/ai/fee`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeeQuery {
    /// Confirmation target in blocks.
    #[serde(default = "default_target_blocks")]
    #[param(default = 3)]
    pub target_blocks: i64,
}

fn default_target_blocks() -> i64 {
    DEFAULT_TARGET_BLOCKS
}

/// Query for `/ai/route`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RouteQuery {
    /// Destination node public key.
    pub dest_pubkey: String,
}

/// Body returned when the query string cannot be parsed.
#[derive(Debug, Serialize, ToSchema)]
pub struct InvalidQuery {
    /// Why the query was rejected.
    pub detail: String,
}

impl From<QueryRejection> for InvalidQuery {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for InvalidQuery {
    fn into_response(self) -> Response {
        (StatusCode::UNPROCESSABLE_ENTITY, Json(self)).into_response()
    }
}

/// Health check handler - always reports ok.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthStatus))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.advisor.check_health().await)
}

/// Readiness check handler - returns 200 if LND answers, 503 otherwise.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Upstreams reachable", body = Readiness),
        (status = 503, description = "An upstream is unreachable", body = Readiness)
    )
)]
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let readiness = state.advisor.readiness().await;

    if readiness.ready {
        (StatusCode::OK, Json(readiness))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(readiness))
    }
}

/// Fee advice handler.
#[utoipa::path(
    get,
    path = "/ai/fee",
    tag = "advisor",
    params(FeeQuery),
    responses(
        (status = 200, description = "Fee advice", body = FeeAdvice),
        (status = 422, description = "Invalid query", body = InvalidQuery)
    )
)]
pub async fn fee_advice(
    State(state): State<AppState>,
    query: Result<Query<FeeQuery>, QueryRejection>,
) -> Result<Json<FeeAdvice>, InvalidQuery> {
    let Query(query) = query?;
    Ok(Json(state.advisor.fee_advice(query.target_blocks).await))
}

/// Route advice handler.
#[utoipa::path(
    get,
    path = "/ai/route",
    tag = "advisor",
    params(RouteQuery),
    responses(
        (status = 200, description = "Route advice", body = RouteAdvice),
        (status = 422, description = "Missing dest_pubkey", body = InvalidQuery)
    )
)]
pub async fn route_advice(
    State(state): State<AppState>,
    query: Result<Query<RouteQuery>, QueryRejection>,
) -> Result<Json<RouteAdvice>, InvalidQuery> {
    let Query(query) = query?;
    Ok(Json(state.advisor.route_advice(query.dest_pubkey)))
}

/// Prometheus metrics handler - 404 when metrics are disabled.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

//! HTTP API route definitions.

use axum::{http::Method, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    self, fee_advice, health, metrics, ready, route_advice, AppState, InvalidQuery,
};
use crate::advisor::{FeeAdvice, HealthStatus, Readiness, RouteAdvice};

/// OpenAPI document for the public endpoints.
#[derive(OpenApi)]
#[openapi(
    info(title = "Brixa AI Service"),
    paths(
        handlers::health,
        handlers::ready,
        handlers::fee_advice,
        handlers::route_advice
    ),
    components(schemas(FeeAdvice, RouteAdvice, HealthStatus, Readiness, InvalidQuery)),
    tags(
        (name = "health", description = "Liveness and readiness"),
        (name = "advisor", description = "Fee and routing advice")
    )
)]
pub struct ApiDoc;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        // Advisory endpoints
        .route("/ai/fee", get(fee_advice))
        .route("/ai/route", get(route_advice))
        .route("/metrics", get(metrics))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

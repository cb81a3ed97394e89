//! HTTP API route definitions.

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use super::handlers::{self, health, metrics_export, openapi, sum, AppState};
use crate::error::{FieldError, FieldErrorKind, ValidationErrorResponse};
use crate::metrics::track_requests;

/// OpenAPI description of the public endpoints.
#[derive(OpenApi)]
#[openapi(
    info(title = "Sum Service"),
    paths(handlers::health, handlers::sum),
    components(schemas(
        handlers::HealthResponse,
        handlers::SumResponse,
        ValidationErrorResponse,
        FieldError,
        FieldErrorKind,
    )),
    tags(
        (name = "Observability", description = "Service health"),
        (name = "Arithmetic", description = "Number operations"),
    )
)]
pub struct ApiDoc;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(health))
        // Arithmetic
        .route("/sum", get(sum))
        // Introspection
        .route("/metrics", get(metrics_export))
        .route("/openapi.json", get(openapi))
        .layer(middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

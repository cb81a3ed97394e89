//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query, State},
    http::{header, request::Parts},
    response::IntoResponse,
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::debug;
use utoipa::{OpenApi, ToSchema};

use crate::error::{ApiError, FieldError, FieldErrorKind, ValidationErrorResponse};
use crate::metrics;

/// Content type of the Prometheus text exposition format.
const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Application state shared with handlers.
///
/// Read-only after startup; requests never mutate it.
#[derive(Clone)]
pub struct AppState {
    /// Name reported by the health endpoint.
    pub service_name: Arc<str>,
    /// Render handle for the metrics endpoint.
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// Create new app state.
    pub fn new(service_name: impl Into<Arc<str>>, metrics: PrometheusHandle) -> Self {
        Self {
            service_name: service_name.into(),
            metrics,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "healthy".
    pub status: String,
    /// Configured service name.
    pub service: String,
}

/// Raw `/sum` query parameters, validated by hand so every bad field is reported.
#[derive(Debug, Default)]
pub struct SumQuery {
    /// First addend.
    pub a: Option<String>,
    /// Second addend.
    pub b: Option<String>,
}

impl SumQuery {
    /// Collect operands from decoded query pairs.
    ///
    /// A repeated parameter keeps its last value; unrelated keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "a" => query.a = Some(value),
                "b" => query.b = Some(value),
                _ => {}
            }
        }
        query
    }
}

/// Validated `/sum` operands.
///
/// Extraction fails with [`ApiError::Validation`] listing every bad field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SumOperands {
    /// First addend.
    pub a: f64,
    /// Second addend.
    pub b: f64,
}

#[async_trait]
impl<S> FromRequestParts<S> for SumOperands
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                debug!(error = %rejection, "rejected undecodable query string");
                ApiError::Validation(vec![FieldError::query_string(rejection.body_text())])
            })?;
        let query = SumQuery::from_pairs(pairs);

        let (a, b) = query.validate().inspect_err(|err| {
            debug!(error = %err, "rejected sum request");
        })?;

        Ok(Self { a, b })
    }
}

/// Sum response. All three values are finite.
#[derive(Debug, Serialize, ToSchema)]
pub struct SumResponse {
    /// First addend.
    pub a: f64,
    /// Second addend.
    pub b: f64,
    /// `a + b`.
    pub sum: f64,
}

/// Parse one operand, recording why it was rejected.
fn parse_operand(field: &str, raw: Option<&str>) -> Result<f64, FieldError> {
    let Some(raw) = raw else {
        return Err(FieldError::query(field, FieldErrorKind::Missing, None));
    };

    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(FieldError::query(field, FieldErrorKind::FiniteNumber, Some(raw))),
        Err(_) => Err(FieldError::query(field, FieldErrorKind::FloatParsing, Some(raw))),
    }
}

impl SumQuery {
    /// Validate both operands, collecting every failure.
    ///
    /// Operands whose sum overflows to infinity are rejected too.
    pub fn validate(&self) -> Result<(f64, f64), ApiError> {
        let a = parse_operand("a", self.a.as_deref());
        let b = parse_operand("b", self.b.as_deref());

        let detail: Vec<FieldError> = match (a, b) {
            (Ok(a), Ok(b)) if (a + b).is_finite() => return Ok((a, b)),
            (Ok(a), Ok(b)) => vec![FieldError::sum_overflow(a, b)],
            (a, b) => [a.err(), b.err()].into_iter().flatten().collect(),
        };

        for err in &detail {
            if let Some(field) = err.loc.last() {
                metrics::inc_sum_validation_failure(field);
            }
        }
        Err(ApiError::Validation(detail))
    }
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "Observability"
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.service_name.to_string(),
    })
}

/// Sum handler - adds the `a` and `b` query parameters.
#[utoipa::path(
    get,
    path = "/sum",
    params(
        ("a" = f64, Query, description = "First addend"),
        ("b" = f64, Query, description = "Second addend")
    ),
    responses(
        (status = 200, description = "Sum computed", body = SumResponse),
        (status = 422, description = "Missing or non-numeric parameter, or the sum overflows", body = ValidationErrorResponse)
    ),
    tag = "Arithmetic"
)]
pub async fn sum(operands: SumOperands) -> Json<SumResponse> {
    let SumOperands { a, b } = operands;
    let sum = a + b;
    metrics::inc_sums_computed();
    debug!(a, b, sum, "computed sum");

    Json(SumResponse { a, b, sum })
}

/// Prometheus metrics handler.
pub async fn metrics_export(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics.render(),
    )
}

/// OpenAPI document handler.
pub async fn openapi() -> impl IntoResponse {
    Json(super::ApiDoc::openapi())
}

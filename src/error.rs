//! Unified error types for the sum service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Unified error type for startup and serving.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// IO error (bind, accept).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Kind of problem found with a single request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// Required parameter was not supplied.
    Missing,
    /// Value could not be parsed as a number.
    FloatParsing,
    /// Value parsed but is infinite or NaN.
    FiniteNumber,
    /// The query string itself could not be decoded.
    QueryParsing,
    /// Both operands are finite but their sum is not.
    SumOverflow,
}

impl FieldErrorKind {
    fn message(self) -> &'static str {
        match self {
            Self::Missing => "Field required",
            Self::FloatParsing => "Input should be a valid number, unable to parse string as a number",
            Self::FiniteNumber => "Input should be a finite number",
            Self::QueryParsing => "Query string could not be decoded",
            Self::SumOverflow => "Sum of the inputs is not a finite number",
        }
    }
}

/// One invalid field in a rejected request.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FieldError {
    /// Error kind.
    #[serde(rename = "type")]
    pub kind: FieldErrorKind,
    /// Location of the field, e.g. `["query", "a"]`.
    pub loc: Vec<String>,
    /// Human readable description.
    pub msg: String,
    /// The offending raw input, if any was supplied.
    pub input: Option<String>,
}

impl FieldError {
    /// Error for a query parameter.
    pub fn query(field: &str, kind: FieldErrorKind, input: Option<&str>) -> Self {
        Self {
            kind,
            loc: vec!["query".to_string(), field.to_string()],
            msg: kind.message().to_string(),
            input: input.map(str::to_string),
        }
    }

    /// Error for an undecodable query string.
    pub fn query_string(detail: impl Into<String>) -> Self {
        Self {
            kind: FieldErrorKind::QueryParsing,
            loc: vec!["query".to_string()],
            msg: FieldErrorKind::QueryParsing.message().to_string(),
            input: Some(detail.into()),
        }
    }

    /// Error for operands whose sum overflows.
    pub fn sum_overflow(a: f64, b: f64) -> Self {
        Self {
            kind: FieldErrorKind::SumOverflow,
            loc: vec!["query".to_string()],
            msg: FieldErrorKind::SumOverflow.message().to_string(),
            input: Some(format!("{a:e} + {b:e}")),
        }
    }
}

/// Body returned with a 422 response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    /// Every invalid field found in the request.
    pub detail: Vec<FieldError>,
}

/// Errors surfaced to HTTP callers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// One or more request fields were missing or invalid.
    #[error("invalid input: {}", describe(.0))]
    Validation(Vec<FieldError>),
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({})", e.loc.join("."), e.msg))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(detail) => {
                (status, Json(ValidationErrorResponse { detail })).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn field_error_serializes_with_type_and_location() {
        let err = FieldError::query("a", FieldErrorKind::FloatParsing, Some("abc"));
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "type": "float_parsing",
                "loc": ["query", "a"],
                "msg": "Input should be a valid number, unable to parse string as a number",
                "input": "abc",
            })
        );
    }

    #[test]
    fn missing_field_has_null_input() {
        let err = FieldError::query("b", FieldErrorKind::Missing, None);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "missing");
        assert!(json["input"].is_null());
    }

    #[test]
    fn sum_overflow_points_at_query() {
        let json = serde_json::to_value(FieldError::sum_overflow(1e308, 1e308)).unwrap();
        assert_eq!(json["type"], "sum_overflow");
        assert_eq!(json["loc"], serde_json::json!(["query"]));
        assert_eq!(json["input"], "1e308 + 1e308");
    }

    #[test]
    fn validation_error_is_unprocessable() {
        let err = ApiError::Validation(vec![FieldError::query("a", FieldErrorKind::Missing, None)]);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "invalid input: query.a (Field required)");
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

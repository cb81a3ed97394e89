//! Minimal HTTP sum service.
//!
//! Exposes a health check and an endpoint that adds two floating-point query
//! parameters:
//!
//! ```text
//! GET /health           -> {"status":"healthy","service":"sum-service"}
//! GET /sum?a=2.5&b=3.5  -> {"a":2.5,"b":3.5,"sum":6.0}
//! GET /sum?a=abc&b=2    -> 422 {"detail":[{"type":"float_parsing","loc":["query","a"],...}]}
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`api`]: HTTP handlers and routes
//! - [`metrics`]: Prometheus metrics
//! - [`server`]: Listener binding and serving
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod server;
pub mod utils;

pub use config::Config;
pub use error::{ApiError, Result, ServiceError};

//! HTTP server startup.

use std::future::Future;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::error::Result;

/// Bind the HTTP listener described by the configuration.
pub async fn bind(config: &Config) -> Result<TcpListener> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Serve requests on `listener` until `shutdown` resolves.
///
/// In-flight requests are allowed to finish after the shutdown signal.
pub async fn serve<F>(
    listener: TcpListener,
    config: &Config,
    metrics: PrometheusHandle,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::new(config.service_name.as_str(), metrics);
    let router = create_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

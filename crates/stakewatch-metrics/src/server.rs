// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! HTTP server for the Prometheus scrape endpoint
//!
//! Every request to the metrics path runs a full scrape: a fresh
//! [`ScrapeRegistry`](crate::ScrapeRegistry) is filled by the collector and
//! rendered once. Upstream failures never change the status code.

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::{render::render, types::MetricsConfig, GeneralCollector};

/// HTTP server exposing the scrape endpoint and `/health`
#[derive(Clone)]
pub struct MetricsServer {
    collector: Arc<GeneralCollector>,
    config: MetricsConfig,
}

impl MetricsServer {
    /// Create a new metrics server
    pub fn new(collector: GeneralCollector, config: MetricsConfig) -> Self {
        Self {
            collector: Arc::new(collector),
            config,
        }
    }

    /// Get the bind address for the server
    pub fn bind_address(&self) -> String {
        self.config.socket_addr()
    }

    /// Router serving the configured metrics path and `/health`
    pub fn router(&self) -> Router {
        Router::new()
            .route(&self.config.path, get(metrics_handler))
            .route("/health", get(health_handler))
            .with_state(Arc::clone(&self.collector))
    }

    /// Bind and serve until `shutdown` resolves
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;
        self.serve_on(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!("Listening on http://{}{}", addr, self.config.path);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!("Metrics server error: {}", e))
    }
}

/// Handler for the metrics path
///
/// Runs one scrape under a span carrying a fresh request id.
async fn metrics_handler(
    State(collector): State<Arc<GeneralCollector>>,
    method: Method,
    uri: Uri,
) -> Response {
    let span = info_span!("scrape", request_id = %Uuid::new_v4());

    async move {
        let started = Instant::now();
        let registry = collector.scrape().await;

        let response = match render(&registry, &collector.settings().const_labels) {
            Ok(exposition) => (
                StatusCode::OK,
                [("content-type", exposition.content_type)],
                exposition.body,
            )
                .into_response(),
            Err(e) => {
                error!("Failed to encode metrics: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to encode metrics: {}", e),
                )
                    .into_response()
            }
        };

        info!(
            method = %method,
            endpoint = uri.path(),
            request_time = started.elapsed().as_secs_f64(),
            "Request processed"
        );
        response
    }
    .instrument(span)
    .await
}

/// Handler for `/health`
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::ScrapeSettings;
    use stakewatch_test_utils::{FakeChain, FakeStatus};
    use stakewatch_upstream::Upstreams;

    fn server(config: MetricsConfig) -> MetricsServer {
        let upstreams = Upstreams {
            status: Arc::new(FakeStatus::height(42)),
            chain: Arc::new(FakeChain::healthy()),
            price: None,
        };
        let settings = ScrapeSettings::new("cosmoshub-4", "atom", 1_000_000.0);
        MetricsServer::new(GeneralCollector::new(upstreams, settings), config)
    }

    #[tokio::test]
    async fn test_bind_address() {
        let config = MetricsConfig {
            port: 8080,
            bind_address: "127.0.0.1".to_string(),
            path: "/metrics".to_string(),
        };
        assert_eq!(server(config).bind_address(), "127.0.0.1:8080");
    }

    #[tokio::test]
    async fn test_serve_until_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = tokio::sync::oneshot::channel::<()>();

        let server = server(MetricsConfig::default());
        let handle = tokio::spawn(server.serve_on(listener, async {
            let _ = stopped.await;
        }));

        let health = reqwest::get(format!("http://{addr}/health")).await.unwrap();
        assert_eq!(health.status(), 200);
        assert_eq!(health.text().await.unwrap(), "OK");

        let metrics = reqwest::get(format!("http://{addr}/metrics")).await.unwrap();
        assert_eq!(metrics.status(), 200);
        let body = metrics.text().await.unwrap();
        assert!(body.contains(r#"cosmos_latest_block_height{chain_id="cosmoshub-4"} 42"#));

        stop.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}

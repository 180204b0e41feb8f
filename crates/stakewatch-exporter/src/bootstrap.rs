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
//! Wiring from a loaded [`Config`] to a running scrape endpoint

use anyhow::{Context, Result};
use stakewatch_config::Config;
use stakewatch_metrics::{GeneralCollector, MetricsConfig, MetricsServer, ScrapeSettings};
use stakewatch_upstream::{
    ChainDirectoryClient, GrpcChainClient, Paging, PriceSource, TendermintRpcClient, Upstreams,
};
use std::future::Future;
use std::sync::Arc;
use tracing::info;

/// Scrape settings derived from the chain and node sections
pub fn scrape_settings(config: &Config) -> ScrapeSettings {
    ScrapeSettings {
        chain_id: config.chain.chain_id.clone(),
        denom: config.chain.denom.clone(),
        base_denom: config.chain.base_denom.clone(),
        denom_coefficient: config.chain.denom_coefficient,
        const_labels: config.const_labels(),
        query_timeout: config.node.timeout(),
    }
}

/// Listener settings derived from the server section
pub fn metrics_config(config: &Config) -> MetricsConfig {
    MetricsConfig {
        port: config.server.port,
        bind_address: config.server.host.clone(),
        path: config.server.metrics_path.clone(),
    }
}

/// Construct the upstream clients. The gRPC channel connects on first use.
pub fn build_upstreams(config: &Config) -> Result<Upstreams> {
    let timeout = config.node.timeout();

    let status = TendermintRpcClient::new(&config.node.rpc_url, timeout)
        .context("Failed to create RPC client")?;

    let paging = Paging {
        page_limit: config.node.page_limit,
        max_pages: config.node.max_pages,
    };
    let chain = GrpcChainClient::connect_lazy(&config.node.grpc_url, timeout, paging)
        .context("Failed to create gRPC client")?;

    let price: Option<Arc<dyn PriceSource>> = if config.chain.price_enabled {
        let client = ChainDirectoryClient::new(
            &config.chain.price_directory_url,
            &config.chain.denom,
            timeout,
        )
        .context("Failed to create price client")?;
        Some(Arc::new(client))
    } else {
        info!("Price lookup disabled");
        None
    };

    Ok(Upstreams {
        status: Arc::new(status),
        chain: Arc::new(chain),
        price,
    })
}

/// Override `server.host` and `server.port` from a `HOST:PORT` string
pub fn apply_listen(config: &mut Config, listen: &str) -> Result<()> {
    let (host, port) = listen
        .rsplit_once(':')
        .with_context(|| format!("Listen address '{}' is not HOST:PORT", listen))?;
    let port: u16 = port
        .parse()
        .with_context(|| format!("Invalid port in listen address '{}'", listen))?;

    // An empty host keeps the configured one; IPv6 hosts keep their brackets
    if !host.is_empty() {
        config.server.host = host.to_string();
    }
    config.server.port = port;
    Ok(())
}

/// Serve scrapes until `shutdown` resolves
pub async fn run<F>(config: Config, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let upstreams = build_upstreams(&config)?;
    let collector = GeneralCollector::new(upstreams, scrape_settings(&config));

    info!(
        chain_id = %config.chain.chain_id,
        rpc = %config.node.rpc_url,
        grpc = %config.node.grpc_url,
        denom = %config.chain.denom,
        "Starting stakewatch exporter"
    );

    MetricsServer::new(collector, metrics_config(&config))
        .serve(shutdown)
        .await
}

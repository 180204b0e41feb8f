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
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Top-level configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// HTTP listener serving the scrape endpoint
    pub server: ServerConfig,

    /// Upstream node endpoints
    pub node: NodeConfig,

    /// Chain identity and denomination
    pub chain: ChainConfig,

    /// Extra constant labels attached to every exported metric
    pub labels: BTreeMap<String, String>,

    /// Logging settings
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Constant label set for every metric: `chain_id` plus the configured extras.
    ///
    /// An explicit `chain_id` entry under `[labels]` wins over the chain section.
    pub fn const_labels(&self) -> BTreeMap<String, String> {
        let mut labels = BTreeMap::new();
        if !self.chain.chain_id.is_empty() {
            labels.insert("chain_id".to_string(), self.chain.chain_id.clone());
        }
        for (name, value) in &self.labels {
            labels.insert(name.clone(), value.clone());
        }
        labels
    }
}

/// Scrape endpoint listener
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path of the scrape endpoint
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            metrics_path: default_metrics_path(),
        }
    }
}

/// Upstream node endpoints and request limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeConfig {
    /// Tendermint/CometBFT JSON-RPC base URL
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Cosmos SDK gRPC endpoint (plaintext HTTP/2)
    #[serde(default = "default_grpc_url")]
    pub grpc_url: String,

    /// Deadline applied to each upstream query, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Upper bound on pages fetched for paginated gRPC queries
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Page size requested for paginated gRPC queries
    #[serde(default = "default_page_limit")]
    pub page_limit: u64,
}

impl NodeConfig {
    /// Per-query deadline
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            grpc_url: default_grpc_url(),
            timeout_secs: default_timeout_secs(),
            max_pages: default_max_pages(),
            page_limit: default_page_limit(),
        }
    }
}

/// Chain identity and denomination settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChainConfig {
    /// Chain id, e.g. `cosmoshub-4`
    #[serde(default)]
    pub chain_id: String,

    /// Display denomination used for the `denom` label, e.g. `atom`
    #[serde(default = "default_denom")]
    pub denom: String,

    /// Base denomination, e.g. `uatom`. When set, collection entries in other
    /// denominations are skipped.
    #[serde(default)]
    pub base_denom: Option<String>,

    /// Base units per display unit
    #[serde(default = "default_denom_coefficient")]
    pub denom_coefficient: f64,

    /// Chain directory used for the USD price lookup
    #[serde(default = "default_price_directory_url")]
    pub price_directory_url: String,

    /// Whether to query the chain directory at all
    #[serde(default = "default_true")]
    pub price_enabled: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: String::new(),
            denom: default_denom(),
            base_denom: None,
            denom_coefficient: default_denom_coefficient(),
            price_directory_url: default_price_directory_url(),
            price_enabled: true,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObservabilityConfig {
    /// Filter directive, e.g. `info` or `info,stakewatch_metrics=debug`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// One of `pretty`, `compact`, `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9300
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:26657".to_string()
}

fn default_grpc_url() -> String {
    "http://127.0.0.1:9090".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_pages() -> usize {
    50
}

fn default_page_limit() -> u64 {
    100
}

fn default_denom() -> String {
    "atom".to_string()
}

fn default_denom_coefficient() -> f64 {
    1_000_000.0
}

fn default_price_directory_url() -> String {
    "https://chains.cosmos.directory".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

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
//! Tendermint/CometBFT JSON-RPC client.

use crate::error::{UpstreamError, UpstreamResult};
use crate::StatusSource;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct StatusResult {
    sync_info: SyncInfo,
}

#[derive(Debug, Deserialize)]
struct SyncInfo {
    latest_block_height: String,
}

/// Client for the node's `/status` endpoint
#[derive(Debug, Clone)]
pub struct TendermintRpcClient {
    client: Client,
    base_url: String,
}

impl TendermintRpcClient {
    /// Create a client for `base_url`, e.g. `http://127.0.0.1:26657`
    pub fn new(base_url: &str, timeout: Duration) -> UpstreamResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Config(format!("failed to build RPC client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }
}

#[async_trait]
impl StatusSource for TendermintRpcClient {
    async fn latest_block_height(&self) -> UpstreamResult<u64> {
        let url = self.url("status");
        debug!(%url, "Querying node status");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        let envelope: RpcEnvelope<StatusResult> = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(UpstreamError::Transport(format!("HTTP {status} from {url}")));
            }
            Err(e) => return Err(UpstreamError::Decode(format!("invalid status response: {e}"))),
        };

        if let Some(error) = envelope.error {
            let message = match error.data {
                Some(serde_json::Value::String(data)) => format!("{}: {}", error.message, data),
                _ => error.message,
            };
            return Err(UpstreamError::JsonRpc {
                code: error.code,
                message,
            });
        }

        let result = envelope
            .result
            .ok_or_else(|| UpstreamError::Decode("status response has no result".to_string()))?;
        let height = result.sync_info.latest_block_height;
        height
            .trim()
            .parse()
            .map_err(|_| UpstreamError::Decode(format!("invalid block height '{height}'")))
    }
}

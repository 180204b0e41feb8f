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
//! USD price lookup through a cosmos.directory style chain registry.

use crate::error::{UpstreamError, UpstreamResult};
use crate::PriceSource;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Directory {
    #[serde(default)]
    chains: Vec<ChainEntry>,
}

#[derive(Debug, Deserialize)]
struct ChainEntry {
    // Entries without an id are never matched
    #[serde(default)]
    chain_id: String,
    #[serde(default)]
    display: Option<String>,
    #[serde(default)]
    prices: Option<Prices>,
}

#[derive(Debug, Deserialize)]
struct Prices {
    #[serde(default)]
    coingecko: BTreeMap<String, Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    usd: Option<f64>,
}

impl ChainEntry {
    /// Price of the chain's display denom, then of `display_denom`, then the
    /// first quoted price by name
    fn price_usd(&self, display_denom: &str) -> Option<f64> {
        let quotes = &self.prices.as_ref()?.coingecko;
        let quoted = |denom: &str| quotes.get(denom).and_then(|quote| quote.usd);

        self.display
            .as_deref()
            .and_then(quoted)
            .or_else(|| quoted(display_denom))
            .or_else(|| quotes.values().find_map(|quote| quote.usd))
    }
}

/// Price source backed by the chain directory API
#[derive(Debug, Clone)]
pub struct ChainDirectoryClient {
    client: Client,
    base_url: String,
    display_denom: String,
}

impl ChainDirectoryClient {
    /// Create a client for `base_url`, e.g. `https://chains.cosmos.directory`
    pub fn new(base_url: &str, display_denom: &str, timeout: Duration) -> UpstreamResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Config(format!("failed to build price client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            display_denom: display_denom.to_string(),
        })
    }
}

#[async_trait]
impl PriceSource for ChainDirectoryClient {
    async fn price_usd(&self, chain_id: &str) -> UpstreamResult<f64> {
        let url = format!("{}/", self.base_url);
        debug!(%url, chain_id, "Querying chain directory");

        let directory: Directory = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        select_price(&directory, chain_id, &self.display_denom)
    }
}

fn select_price(directory: &Directory, chain_id: &str, display_denom: &str) -> UpstreamResult<f64> {
    let chain = directory
        .chains
        .iter()
        .find(|chain| !chain.chain_id.is_empty() && chain.chain_id == chain_id)
        .ok_or_else(|| UpstreamError::NotFound(format!("chain {chain_id} not in directory")))?;

    chain
        .price_usd(display_denom)
        .ok_or_else(|| UpstreamError::NotFound(format!("no USD price listed for {chain_id}")))
}

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
//! Upstream query clients for the stakewatch exporter
//!
//! Each upstream subsystem sits behind an async trait so the scrape
//! coordinator can be driven by the real clients or by in-memory fakes:
//!
//! - [`StatusSource`]: latest block height from the node's JSON-RPC
//! - [`ChainQueries`]: staking, distribution, bank, mint and gov over gRPC
//! - [`PriceSource`]: USD token price from a chain directory
//!
//! The clients hold connection handles only and never retry.

pub mod decimal;
pub mod error;
pub mod governance;
pub mod grpc;
pub mod price;
pub mod proto;
pub mod rpc;
pub mod types;

pub use decimal::{dec_bytes_to_string, dec_mantissa_to_string};
pub use error::{UpstreamError, UpstreamResult};
pub use governance::{classify, voting_period_proposals, GovSchema, ProbeOutcome};
pub use grpc::{GrpcChainClient, Paging};
pub use price::ChainDirectoryClient;
pub use proto::ProposalStatus;
pub use rpc::TendermintRpcClient;
pub use types::{DenomAmount, StakingPool};

use async_trait::async_trait;
use std::sync::Arc;

/// Node status queries
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Height of the latest committed block
    async fn latest_block_height(&self) -> UpstreamResult<u64>;
}

/// Cosmos SDK module queries
#[async_trait]
pub trait ChainQueries: Send + Sync {
    /// Bonded and not-bonded staking pool amounts
    async fn staking_pool(&self) -> UpstreamResult<StakingPool>;

    /// Community pool holdings, one entry per denom
    async fn community_pool(&self) -> UpstreamResult<Vec<DenomAmount>>;

    /// Total supply, one entry per denom, across all pages
    async fn total_supply(&self) -> UpstreamResult<Vec<DenomAmount>>;

    /// Current inflation rate as a decimal string
    async fn inflation(&self) -> UpstreamResult<String>;

    /// Annual provisions in base units as a decimal string
    async fn annual_provisions(&self) -> UpstreamResult<String>;

    /// Number of proposals with `status`, asked through the `schema` service
    async fn proposals(&self, schema: GovSchema, status: ProposalStatus) -> UpstreamResult<usize>;
}

/// External price queries
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// USD price of the chain's display token
    async fn price_usd(&self, chain_id: &str) -> UpstreamResult<f64>;
}

/// The set of upstreams one scrape talks to
#[derive(Clone)]
pub struct Upstreams {
    /// Node JSON-RPC
    pub status: Arc<dyn StatusSource>,
    /// Node gRPC
    pub chain: Arc<dyn ChainQueries>,
    /// Price lookup, `None` when disabled
    pub price: Option<Arc<dyn PriceSource>>,
}

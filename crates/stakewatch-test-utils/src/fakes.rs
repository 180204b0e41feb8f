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
//! In-memory upstreams.
//!
//! Each fake returns a scripted reply per query. Replies are plain data so a
//! fake can be cloned into several scrapes and answer identically each time.

use async_trait::async_trait;
use stakewatch_upstream::{
    ChainQueries, DenomAmount, GovSchema, PriceSource, ProposalStatus, StakingPool, StatusSource,
    UpstreamError, UpstreamResult,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Scripted upstream failure
#[derive(Debug, Clone, PartialEq)]
pub enum FakeFailure {
    /// Connection refused or reset
    Unreachable,
    /// gRPC status with an arbitrary message
    Status(String),
    /// The `v1beta1` refusal sent by nodes storing `gov/v1` proposals
    GovConversion,
    /// Response that cannot be decoded
    Malformed,
    /// Entity missing upstream
    NotFound,
}

impl FakeFailure {
    /// Error a real client would return for this failure
    pub fn to_error(&self) -> UpstreamError {
        match self {
            FakeFailure::Unreachable => {
                UpstreamError::Transport("tcp connect error: Connection refused".to_string())
            }
            FakeFailure::Status(message) => UpstreamError::Status {
                code: tonic::Code::Internal,
                message: message.clone(),
            },
            FakeFailure::GovConversion => UpstreamError::Status {
                code: tonic::Code::Internal,
                message: "invalid type: can't convert a gov/v1 Proposal to gov/v1beta1 Proposal"
                    .to_string(),
            },
            FakeFailure::Malformed => UpstreamError::Decode("unexpected end of buffer".to_string()),
            FakeFailure::NotFound => UpstreamError::NotFound("not in directory".to_string()),
        }
    }
}

fn reply<T: Clone>(scripted: &Result<T, FakeFailure>) -> UpstreamResult<T> {
    scripted.clone().map_err(|failure| failure.to_error())
}

/// Held-open barrier a fake waits on before answering
#[derive(Clone, Default)]
pub struct Gate {
    notify: Arc<Notify>,
}

impl Gate {
    /// Create a closed gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Let the waiting query answer. Opening before the wait is remembered.
    pub fn open(&self) {
        self.notify.notify_one();
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// How a fake behaves before it replies
#[derive(Clone, Default)]
enum Latency {
    #[default]
    Immediate,
    Delay(Duration),
    Gated(Gate),
    Panic,
}

impl Latency {
    async fn apply(&self) {
        match self {
            Latency::Immediate => {}
            Latency::Delay(duration) => tokio::time::sleep(*duration).await,
            Latency::Gated(gate) => gate.wait().await,
            Latency::Panic => panic!("scripted upstream panic"),
        }
    }
}

/// Node status fake
#[derive(Clone)]
pub struct FakeStatus {
    height: Result<u64, FakeFailure>,
    latency: Latency,
}

impl FakeStatus {
    /// Reports `height`
    pub fn height(height: u64) -> Self {
        Self {
            height: Ok(height),
            latency: Latency::Immediate,
        }
    }

    /// Fails with `failure`
    pub fn failing(failure: FakeFailure) -> Self {
        Self {
            height: Err(failure),
            latency: Latency::Immediate,
        }
    }

    /// Panics instead of answering
    pub fn panicking() -> Self {
        Self {
            height: Ok(0),
            latency: Latency::Panic,
        }
    }

    /// Sleep for `delay` before answering
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.latency = Latency::Delay(delay);
        self
    }
}

#[async_trait]
impl StatusSource for FakeStatus {
    async fn latest_block_height(&self) -> UpstreamResult<u64> {
        self.latency.apply().await;
        reply(&self.height)
    }
}

/// Price directory fake
#[derive(Clone)]
pub struct FakePrice {
    price: Result<f64, FakeFailure>,
    latency: Latency,
    chain_ids: Arc<Mutex<Vec<String>>>,
}

impl FakePrice {
    /// Quotes `usd`
    pub fn usd(usd: f64) -> Self {
        Self {
            price: Ok(usd),
            latency: Latency::Immediate,
            chain_ids: Arc::default(),
        }
    }

    /// Fails with `failure`
    pub fn failing(failure: FakeFailure) -> Self {
        Self {
            price: Err(failure),
            ..Self::usd(0.0)
        }
    }

    /// Quotes `usd` once `gate` is opened
    pub fn gated(usd: f64, gate: Gate) -> Self {
        Self {
            latency: Latency::Gated(gate),
            ..Self::usd(usd)
        }
    }

    /// Sleep for `delay` before answering
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.latency = Latency::Delay(delay);
        self
    }

    /// Chain ids asked for so far
    pub fn requested_chain_ids(&self) -> Vec<String> {
        self.chain_ids
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl PriceSource for FakePrice {
    async fn price_usd(&self, chain_id: &str) -> UpstreamResult<f64> {
        self.chain_ids
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(chain_id.to_string());
        self.latency.apply().await;
        reply(&self.price)
    }
}

/// Cosmos SDK module query fake
///
/// Fields are public so tests can script individual queries on top of
/// [`FakeChain::healthy`].
#[derive(Clone)]
pub struct FakeChain {
    /// Staking pool reply
    pub staking_pool: Result<StakingPool, FakeFailure>,
    /// Community pool reply
    pub community_pool: Result<Vec<DenomAmount>, FakeFailure>,
    /// Total supply reply
    pub total_supply: Result<Vec<DenomAmount>, FakeFailure>,
    /// Inflation reply
    pub inflation: Result<String, FakeFailure>,
    /// Annual provisions reply
    pub annual_provisions: Result<String, FakeFailure>,
    /// Voting proposals through `cosmos.gov.v1beta1`
    pub gov_v1beta1: Result<usize, FakeFailure>,
    /// Voting proposals through `cosmos.gov.v1`
    pub gov_v1: Result<usize, FakeFailure>,
    /// Recorded governance query schemas, in call order
    pub gov_calls: Arc<Mutex<Vec<GovSchema>>>,
}

impl FakeChain {
    /// Chain answering every query with the fixture values
    pub fn healthy() -> Self {
        use crate::fixtures::*;

        Self {
            staking_pool: Ok(staking_pool()),
            community_pool: Ok(community_pool()),
            total_supply: Ok(total_supply()),
            inflation: Ok(INFLATION.to_string()),
            annual_provisions: Ok(ANNUAL_PROVISIONS.to_string()),
            gov_v1beta1: Ok(VOTING_PROPOSALS),
            gov_v1: Ok(VOTING_PROPOSALS),
            gov_calls: Arc::default(),
        }
    }

    /// Chain whose every query fails with `failure`
    pub fn failing(failure: FakeFailure) -> Self {
        Self {
            staking_pool: Err(failure.clone()),
            community_pool: Err(failure.clone()),
            total_supply: Err(failure.clone()),
            inflation: Err(failure.clone()),
            annual_provisions: Err(failure.clone()),
            gov_v1beta1: Err(failure.clone()),
            gov_v1: Err(failure),
            gov_calls: Arc::default(),
        }
    }

    /// Gov schemas asked so far, in order
    pub fn gov_calls(&self) -> Vec<GovSchema> {
        self.gov_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl ChainQueries for FakeChain {
    async fn staking_pool(&self) -> UpstreamResult<StakingPool> {
        reply(&self.staking_pool)
    }

    async fn community_pool(&self) -> UpstreamResult<Vec<DenomAmount>> {
        reply(&self.community_pool)
    }

    async fn total_supply(&self) -> UpstreamResult<Vec<DenomAmount>> {
        reply(&self.total_supply)
    }

    async fn inflation(&self) -> UpstreamResult<String> {
        reply(&self.inflation)
    }

    async fn annual_provisions(&self) -> UpstreamResult<String> {
        reply(&self.annual_provisions)
    }

    async fn proposals(&self, schema: GovSchema, status: ProposalStatus) -> UpstreamResult<usize> {
        self.gov_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(schema);

        if status != ProposalStatus::VotingPeriod {
            return Ok(0);
        }
        match schema {
            GovSchema::V1Beta1 => reply(&self.gov_v1beta1),
            GovSchema::V1 => reply(&self.gov_v1),
        }
    }
}

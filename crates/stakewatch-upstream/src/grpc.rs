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
//! Cosmos SDK gRPC query client.
//!
//! Queries are issued as plain unary calls against the well-known service
//! paths with hand-declared prost messages, so no generated client code is
//! needed. The channel is plaintext HTTP/2 and is connected lazily; the
//! first query establishes the connection.

use crate::decimal::{dec_bytes_to_string, dec_mantissa_to_string};
use crate::error::{UpstreamError, UpstreamResult};
use crate::governance::GovSchema;
use crate::proto::{
    PageRequest, PageResponse, ProposalStatus, QueryAnnualProvisionsRequest,
    QueryAnnualProvisionsResponse, QueryCommunityPoolRequest, QueryCommunityPoolResponse,
    QueryInflationRequest, QueryInflationResponse, QueryPoolRequest, QueryPoolResponse,
    QueryProposalsRequest, QueryProposalsResponse, QueryTotalSupplyRequest,
    QueryTotalSupplyResponse,
};
use crate::types::{DenomAmount, StakingPool};
use crate::ChainQueries;
use async_trait::async_trait;
use std::time::Duration;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, warn};

const STAKING_POOL: &str = "/cosmos.staking.v1beta1.Query/Pool";
const COMMUNITY_POOL: &str = "/cosmos.distribution.v1beta1.Query/CommunityPool";
const TOTAL_SUPPLY: &str = "/cosmos.bank.v1beta1.Query/TotalSupply";
const INFLATION: &str = "/cosmos.mint.v1beta1.Query/Inflation";
const ANNUAL_PROVISIONS: &str = "/cosmos.mint.v1beta1.Query/AnnualProvisions";

/// Paging limits for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    /// Entries requested per page
    pub page_limit: u64,
    /// Pages fetched before giving up on `next_key`
    pub max_pages: usize,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page_limit: 100,
            max_pages: 50,
        }
    }
}

/// gRPC client for the staking, distribution, bank, mint and gov query services
#[derive(Debug, Clone)]
pub struct GrpcChainClient {
    channel: Channel,
    paging: Paging,
}

impl GrpcChainClient {
    /// Build a client for `url` without connecting.
    ///
    /// `timeout` bounds both connecting and each individual call.
    pub fn connect_lazy(url: &str, timeout: Duration, paging: Paging) -> UpstreamResult<Self> {
        let endpoint = Endpoint::from_shared(url.to_string())
            .map_err(|e| UpstreamError::Config(format!("invalid gRPC endpoint {url}: {e}")))?
            .timeout(timeout)
            .connect_timeout(timeout);

        debug!(endpoint = %url, ?timeout, "Created lazy gRPC channel");
        Ok(Self {
            channel: endpoint.connect_lazy(),
            paging,
        })
    }

    async fn unary<Req, Resp>(&self, path: &'static str, request: Req) -> UpstreamResult<Resp>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let mut grpc = tonic::client::Grpc::new(self.channel.clone());
        grpc.ready()
            .await
            .map_err(|e| UpstreamError::Transport(format!("gRPC channel not ready: {e}")))?;

        let codec: ProstCodec<Req, Resp> = ProstCodec::default();
        let response = grpc
            .unary(
                tonic::Request::new(request),
                PathAndQuery::from_static(path),
                codec,
            )
            .await?;
        Ok(response.into_inner())
    }

    fn page_request(&self, key: Vec<u8>) -> Option<PageRequest> {
        Some(PageRequest {
            key,
            limit: self.paging.page_limit,
            ..Default::default()
        })
    }
}

/// Key of the next page, `None` once the listing is exhausted
fn next_page_key(pagination: Option<PageResponse>) -> Option<Vec<u8>> {
    pagination
        .map(|page| page.next_key)
        .filter(|key| !key.is_empty())
}

#[async_trait]
impl ChainQueries for GrpcChainClient {
    async fn staking_pool(&self) -> UpstreamResult<StakingPool> {
        let response: QueryPoolResponse = self.unary(STAKING_POOL, QueryPoolRequest {}).await?;
        let pool = response
            .pool
            .ok_or_else(|| UpstreamError::Decode("staking pool missing from response".to_string()))?;

        Ok(StakingPool {
            bonded_tokens: pool.bonded_tokens,
            not_bonded_tokens: pool.not_bonded_tokens,
        })
    }

    async fn community_pool(&self) -> UpstreamResult<Vec<DenomAmount>> {
        let response: QueryCommunityPoolResponse = self
            .unary(COMMUNITY_POOL, QueryCommunityPoolRequest {})
            .await?;

        // Unconvertible amounts are passed through raw and skipped by the collector
        Ok(response
            .pool
            .into_iter()
            .map(|coin| {
                let amount = dec_mantissa_to_string(&coin.amount).unwrap_or(coin.amount);
                DenomAmount::new(coin.denom, amount)
            })
            .collect())
    }

    async fn total_supply(&self) -> UpstreamResult<Vec<DenomAmount>> {
        let mut supply = Vec::new();
        let mut key = Vec::new();

        for _ in 0..self.paging.max_pages {
            let request = QueryTotalSupplyRequest {
                pagination: self.page_request(key),
            };
            let response: QueryTotalSupplyResponse = self.unary(TOTAL_SUPPLY, request).await?;
            supply.extend(
                response
                    .supply
                    .into_iter()
                    .map(|coin| DenomAmount::new(coin.denom, coin.amount)),
            );

            match next_page_key(response.pagination) {
                Some(next) => key = next,
                None => return Ok(supply),
            }
        }

        warn!(
            max_pages = self.paging.max_pages,
            entries = supply.len(),
            "Total supply pagination limit reached, result is truncated"
        );
        Ok(supply)
    }

    async fn inflation(&self) -> UpstreamResult<String> {
        let response: QueryInflationResponse =
            self.unary(INFLATION, QueryInflationRequest {}).await?;
        dec_bytes_to_string(&response.inflation)
    }

    async fn annual_provisions(&self) -> UpstreamResult<String> {
        let response: QueryAnnualProvisionsResponse = self
            .unary(ANNUAL_PROVISIONS, QueryAnnualProvisionsRequest {})
            .await?;
        dec_bytes_to_string(&response.annual_provisions)
    }

    async fn proposals(&self, schema: GovSchema, status: ProposalStatus) -> UpstreamResult<usize> {
        let mut count = 0;
        let mut key = Vec::new();

        for _ in 0..self.paging.max_pages {
            let request = QueryProposalsRequest {
                proposal_status: status as i32,
                pagination: self.page_request(key),
                ..Default::default()
            };
            let response: QueryProposalsResponse = self.unary(schema.path(), request).await?;
            count += response.proposals.len();

            match next_page_key(response.pagination) {
                Some(next) => key = next,
                None => return Ok(count),
            }
        }

        warn!(
            max_pages = self.paging.max_pages,
            count,
            schema = schema.as_str(),
            "Proposal pagination limit reached, count is truncated"
        );
        Ok(count)
    }
}

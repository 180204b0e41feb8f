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
//! Protobuf messages for the Cosmos SDK query services used by the exporter.
//!
//! Only the fields the exporter reads are declared; prost skips unknown
//! fields while decoding, so proposals decode to their id alone.
#![allow(missing_docs)]

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PageRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub key: Vec<u8>,
    #[prost(uint64, tag = "2")]
    pub offset: u64,
    #[prost(uint64, tag = "3")]
    pub limit: u64,
    #[prost(bool, tag = "4")]
    pub count_total: bool,
    #[prost(bool, tag = "5")]
    pub reverse: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PageResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub next_key: Vec<u8>,
    #[prost(uint64, tag = "2")]
    pub total: u64,
}

/// `cosmos.base.v1beta1.Coin`, amount is an `Int` string
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Coin {
    #[prost(string, tag = "1")]
    pub denom: String,
    #[prost(string, tag = "2")]
    pub amount: String,
}

/// `cosmos.base.v1beta1.DecCoin`, amount is a `Dec` mantissa
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DecCoin {
    #[prost(string, tag = "1")]
    pub denom: String,
    #[prost(string, tag = "2")]
    pub amount: String,
}

// cosmos.staking.v1beta1

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryPoolRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryPoolResponse {
    #[prost(message, optional, tag = "1")]
    pub pool: Option<Pool>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Pool {
    #[prost(string, tag = "1")]
    pub not_bonded_tokens: String,
    #[prost(string, tag = "2")]
    pub bonded_tokens: String,
}

// cosmos.distribution.v1beta1

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryCommunityPoolRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryCommunityPoolResponse {
    #[prost(message, repeated, tag = "1")]
    pub pool: Vec<DecCoin>,
}

// cosmos.bank.v1beta1

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryTotalSupplyRequest {
    #[prost(message, optional, tag = "1")]
    pub pagination: Option<PageRequest>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryTotalSupplyResponse {
    #[prost(message, repeated, tag = "1")]
    pub supply: Vec<Coin>,
    #[prost(message, optional, tag = "2")]
    pub pagination: Option<PageResponse>,
}

// cosmos.mint.v1beta1

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryInflationRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryInflationResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub inflation: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryAnnualProvisionsRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryAnnualProvisionsResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub annual_provisions: Vec<u8>,
}

// cosmos.gov.v1beta1 and cosmos.gov.v1 share the request layout and the
// position of the proposal id.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ProposalStatus {
    Unspecified = 0,
    DepositPeriod = 1,
    VotingPeriod = 2,
    Passed = 3,
    Rejected = 4,
    Failed = 5,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryProposalsRequest {
    #[prost(enumeration = "ProposalStatus", tag = "1")]
    pub proposal_status: i32,
    #[prost(string, tag = "2")]
    pub voter: String,
    #[prost(string, tag = "3")]
    pub depositor: String,
    #[prost(message, optional, tag = "4")]
    pub pagination: Option<PageRequest>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryProposalsResponse {
    #[prost(message, repeated, tag = "1")]
    pub proposals: Vec<ProposalId>,
    #[prost(message, optional, tag = "2")]
    pub pagination: Option<PageResponse>,
}

/// Field 1 of both `gov.v1beta1.Proposal` (`proposal_id`) and `gov.v1.Proposal` (`id`)
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProposalId {
    #[prost(uint64, tag = "1")]
    pub id: u64,
}

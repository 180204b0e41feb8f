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
//! Common types for metrics collection

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Configuration for the scrape endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Port for the HTTP server
    pub port: u16,

    /// Bind address (default: 0.0.0.0)
    pub bind_address: String,

    /// Path serving the exposition
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: 9300,
            bind_address: "0.0.0.0".to_string(),
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Create new config with port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get bind address with port
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Immutable per-process settings threaded into every scrape
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeSettings {
    /// Chain id used for the price lookup
    pub chain_id: String,
    /// Display denomination written into the `denom` label
    pub denom: String,
    /// When set, collection entries in other denominations are skipped
    pub base_denom: Option<String>,
    /// Base units per display unit
    pub denom_coefficient: f64,
    /// Labels attached to every metric family
    pub const_labels: BTreeMap<String, String>,
    /// Deadline for each upstream query
    pub query_timeout: Duration,
}

impl ScrapeSettings {
    /// Settings with `chain_id` as the only constant label
    pub fn new(chain_id: impl Into<String>, denom: impl Into<String>, denom_coefficient: f64) -> Self {
        let chain_id = chain_id.into();
        let mut const_labels = BTreeMap::new();
        const_labels.insert("chain_id".to_string(), chain_id.clone());

        Self {
            chain_id,
            denom: denom.into(),
            base_denom: None,
            denom_coefficient,
            const_labels,
            query_timeout: Duration::from_secs(10),
        }
    }

    /// Restrict collection entries to `base_denom`
    pub fn with_base_denom(mut self, base_denom: impl Into<String>) -> Self {
        self.base_denom = Some(base_denom.into());
        self
    }

    /// Override the per-query deadline
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Base units to display units
    pub fn denominate(&self, base_units: f64) -> f64 {
        base_units / self.denom_coefficient
    }
}

/// Exported metric families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    /// Latest committed block height
    LatestBlockHeight,
    /// USD token price
    TokenPrice,
    /// Bonded staking pool
    BondedTokens,
    /// Not-bonded staking pool
    NotBondedTokens,
    /// Community pool per denom
    CommunityPool,
    /// Total supply per denom
    SupplyTotal,
    /// Inflation rate
    Inflation,
    /// Annual provisions per denom
    AnnualProvisions,
    /// Proposals in voting period
    GovVotingPeriodProposals,
    /// Per-query outcome
    QuerySuccess,
    /// Wall time of the fan-out
    ScrapeDuration,
}

impl Metric {
    /// Every family, in exposition order
    pub const ALL: [Metric; 11] = [
        Metric::LatestBlockHeight,
        Metric::TokenPrice,
        Metric::BondedTokens,
        Metric::NotBondedTokens,
        Metric::CommunityPool,
        Metric::SupplyTotal,
        Metric::Inflation,
        Metric::AnnualProvisions,
        Metric::GovVotingPeriodProposals,
        Metric::QuerySuccess,
        Metric::ScrapeDuration,
    ];

    /// Prometheus metric name
    pub fn name(&self) -> &'static str {
        match self {
            Metric::LatestBlockHeight => "cosmos_latest_block_height",
            Metric::TokenPrice => "cosmos_token_price",
            Metric::BondedTokens => "cosmos_general_bonded_tokens",
            Metric::NotBondedTokens => "cosmos_general_not_bonded_tokens",
            Metric::CommunityPool => "cosmos_general_community_pool",
            Metric::SupplyTotal => "cosmos_general_supply_total",
            Metric::Inflation => "cosmos_general_inflation",
            Metric::AnnualProvisions => "cosmos_general_annual_provisions",
            Metric::GovVotingPeriodProposals => "cosmos_gov_voting_period_proposals",
            Metric::QuerySuccess => "cosmos_exporter_query_success",
            Metric::ScrapeDuration => "cosmos_exporter_scrape_duration_seconds",
        }
    }

    /// HELP text
    pub fn help(&self) -> &'static str {
        match self {
            Metric::LatestBlockHeight => "Latest block height",
            Metric::TokenPrice => "Cosmos token price in USD",
            Metric::BondedTokens => "Bonded tokens",
            Metric::NotBondedTokens => "Not bonded tokens",
            Metric::CommunityPool => "Community pool",
            Metric::SupplyTotal => "Total supply",
            Metric::Inflation => "Total inflation",
            Metric::AnnualProvisions => "Annual provisions",
            Metric::GovVotingPeriodProposals => "Voting period proposals",
            Metric::QuerySuccess => "Whether the upstream query succeeded during this scrape (1) or not (0)",
            Metric::ScrapeDuration => "Time spent querying upstreams for this scrape",
        }
    }

    /// Variable label names, empty for scalar families
    pub fn label_names(&self) -> &'static [&'static str] {
        match self {
            Metric::CommunityPool | Metric::SupplyTotal | Metric::AnnualProvisions => &["denom"],
            Metric::QuerySuccess => &["query"],
            _ => &[],
        }
    }
}

/// One upstream query launched per scrape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Node status
    BlockHeight,
    /// Price directory
    TokenPrice,
    /// Staking pool
    StakingPool,
    /// Distribution community pool
    CommunityPool,
    /// Bank total supply
    TotalSupply,
    /// Mint inflation
    Inflation,
    /// Mint annual provisions
    AnnualProvisions,
    /// Gov voting period proposals
    GovProposals,
}

impl QueryKind {
    /// Every query, in launch order
    pub const ALL: [QueryKind; 8] = [
        QueryKind::BlockHeight,
        QueryKind::TokenPrice,
        QueryKind::StakingPool,
        QueryKind::CommunityPool,
        QueryKind::TotalSupply,
        QueryKind::Inflation,
        QueryKind::AnnualProvisions,
        QueryKind::GovProposals,
    ];

    /// Value of the `query` label
    pub fn as_label(&self) -> &'static str {
        match self {
            QueryKind::BlockHeight => "block_height",
            QueryKind::TokenPrice => "token_price",
            QueryKind::StakingPool => "staking_pool",
            QueryKind::CommunityPool => "community_pool",
            QueryKind::TotalSupply => "total_supply",
            QueryKind::Inflation => "inflation",
            QueryKind::AnnualProvisions => "annual_provisions",
            QueryKind::GovProposals => "gov_proposals",
        }
    }

    /// Value written when the query fails, if any
    pub fn failure_sentinel(&self) -> Option<(Metric, f64)> {
        match self {
            QueryKind::GovProposals => Some((Metric::GovVotingPeriodProposals, -1.0)),
            _ => None,
        }
    }
}

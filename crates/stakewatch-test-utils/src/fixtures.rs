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
//! Chain fixtures.
//!
//! Values resemble a Cosmos Hub node: `uatom` base units with a
//! coefficient of `1_000_000`.

use crate::fakes::{FakeChain, FakePrice, FakeStatus};
use stakewatch_upstream::{DenomAmount, StakingPool, Upstreams};
use std::sync::Arc;

/// Chain id used throughout the fixtures
pub const CHAIN_ID: &str = "cosmoshub-4";

/// Display denomination
pub const DENOM: &str = "atom";

/// Base denomination
pub const BASE_DENOM: &str = "uatom";

/// Base units per display unit
pub const COEFFICIENT: f64 = 1_000_000.0;

/// Block height reported by the status fake
pub const BLOCK_HEIGHT: u64 = 23_456_789;

/// Token price in USD
pub const PRICE_USD: f64 = 8.75;

/// Inflation as returned by the mint module
pub const INFLATION: &str = "0.100000000000000000";

/// Annual provisions in base units
pub const ANNUAL_PROVISIONS: &str = "39000000000000.000000000000000000";

/// Proposals currently in voting period
pub const VOTING_PROPOSALS: usize = 2;

/// Staking pool: 250M bonded, 12M not bonded
pub fn staking_pool() -> StakingPool {
    StakingPool {
        bonded_tokens: "250000000000000".to_string(),
        not_bonded_tokens: "12000000000000".to_string(),
    }
}

/// Community pool: 1.5M atom
pub fn community_pool() -> Vec<DenomAmount> {
    vec![DenomAmount::new(BASE_DENOM, "1500000000000.000000000000000000")]
}

/// Total supply: 390M atom plus one IBC voucher listed first
pub fn total_supply() -> Vec<DenomAmount> {
    vec![
        DenomAmount::new(
            "ibc/14F9BC3E44B8A9C1BE1FB08980FAB87034C9905EF17CF2F5008FC085218811CC",
            "123456",
        ),
        DenomAmount::new(BASE_DENOM, "390000000000000"),
    ]
}

/// Upstreams wrapping the given fakes
pub fn upstreams(status: FakeStatus, chain: FakeChain, price: Option<FakePrice>) -> Upstreams {
    Upstreams {
        status: Arc::new(status),
        chain: Arc::new(chain),
        price: price.map(|p| Arc::new(p) as Arc<dyn stakewatch_upstream::PriceSource>),
    }
}

/// Every upstream healthy
pub fn healthy_upstreams() -> Upstreams {
    upstreams(
        FakeStatus::height(BLOCK_HEIGHT),
        FakeChain::healthy(),
        Some(FakePrice::usd(PRICE_USD)),
    )
}

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
//! Decoded query results handed to the collector.
//!
//! Amounts stay decimal strings here; conversion to `f64` and division by
//! the denomination coefficient happen where the gauges are set.

use serde::{Deserialize, Serialize};

/// One entry of a coin collection (community pool, total supply)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenomAmount {
    /// Upstream denomination, e.g. `uatom` or `ibc/27394FB0...`
    pub denom: String,
    /// Amount in base units as a decimal string
    pub amount: String,
}

impl DenomAmount {
    /// Convenience constructor
    pub fn new(denom: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

/// Staking module pool, both values in base units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingPool {
    /// Tokens bonded to validators
    pub bonded_tokens: String,
    /// Tokens unbonding or unbonded
    pub not_bonded_tokens: String,
}

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
//! # Stakewatch Test Utilities
//!
//! Shared test utilities for stakewatch crates providing:
//! - Scriptable in-memory upstreams implementing the query traits
//! - Realistic chain fixtures
//! - Assertions over rendered exposition text

pub mod assertions;
pub mod fakes;
pub mod fixtures;

// Re-export commonly used items at crate root
pub use assertions::*;
pub use fakes::{FakeChain, FakeFailure, FakePrice, FakeStatus, Gate};
pub use fixtures::{healthy_upstreams, upstreams};

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
//! Stakewatch metrics
//!
//! Per-scrape collection of Cosmos chain metrics and the HTTP endpoint
//! serving them in the Prometheus text exposition format.
//!
//! # Features
//!
//! - **Fan-out**: one task per upstream query, joined before rendering
//! - **Partial failure**: a failed query leaves only its own gauges unset
//! - **Request scoped**: every scrape fills a fresh [`ScrapeRegistry`]
//!
//! # Example
//!
//! ```ignore
//! use stakewatch_metrics::{GeneralCollector, MetricsConfig, MetricsServer, ScrapeSettings};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = ScrapeSettings::new("cosmoshub-4", "atom", 1_000_000.0);
//!     let collector = GeneralCollector::new(upstreams, settings);
//!
//!     MetricsServer::new(collector, MetricsConfig::default())
//!         .serve(async { let _ = tokio::signal::ctrl_c().await; })
//!         .await
//! }
//! ```

pub mod collector;
pub mod registry;
pub mod render;
pub mod server;
pub mod types;

pub use collector::GeneralCollector;
pub use registry::{ScrapeRegistry, SlotKey};
pub use render::{render, Exposition, RenderError};
pub use server::MetricsServer;
pub use types::{Metric, MetricsConfig, QueryKind, ScrapeSettings};

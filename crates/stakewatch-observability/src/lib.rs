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
//! Stakewatch Observability Module
//!
//! Structured logging for the stakewatch exporter.
//!
//! # Features
//!
//! - **Multiple Output Formats**: Pretty, JSON, and compact output formats
//! - **Environment-based Filtering**: `RUST_LOG` applies when no level is configured
//! - **Async Context Propagation**: scrape spans follow the query tasks they spawn
//!
//! # Example
//!
//! ```ignore
//! use stakewatch_observability::{init_tracing, LogFormat};
//!
//! init_tracing(LogFormat::Json, Some("stakewatch=debug"))?;
//! tracing::info!("exporter started");
//! ```

pub mod config;
pub mod initialization;

pub use config::{LogConfig, LogError, LogFormat, QUIET_TARGETS};
pub use initialization::{init_tracing, init_tracing_with_config};

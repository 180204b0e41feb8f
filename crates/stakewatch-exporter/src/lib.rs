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
//! Stakewatch exporter
//!
//! Process-level wiring for the `stakewatch` binary: builds the upstream
//! clients and scrape settings from a [`stakewatch_config::Config`] and
//! serves the Prometheus endpoint until shutdown.

pub mod bootstrap;

pub use bootstrap::{apply_listen, build_upstreams, metrics_config, run, scrape_settings};

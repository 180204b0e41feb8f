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
//! Configuration management for the stakewatch exporter
//!
//! Loads the exporter configuration from TOML, YAML or JSON, layers
//! `STAKEWATCH_*` environment overrides on top and validates the result.
//!
//! # Example
//!
//! ```no_run
//! use stakewatch_config::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = ConfigLoader::new();
//!     let config = loader.load_with_overrides(Some("stakewatch.toml")).await?;
//!
//!     println!("Exporting {} on {}", config.chain.chain_id, config.server.bind_addr());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{apply_overrides, ConfigFormat, ConfigLoader};
pub use schema::*;
pub use validation::Validator;

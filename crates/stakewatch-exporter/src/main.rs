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
//! `stakewatch` command line entry point

use anyhow::{Context, Result};
use clap::Parser;
use stakewatch_config::{ConfigLoader, Validator};
use stakewatch_observability::{init_tracing_with_config, LogConfig, LogFormat};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "stakewatch")]
#[command(version, about = "Prometheus exporter for Cosmos SDK chain metrics")]
#[command(
    long_about = "Stakewatch answers every scrape by querying a Cosmos SDK node's RPC and gRPC
endpoints and a chain directory in parallel, then serves the results as Prometheus gauges."
)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Listen address, overrides server.host and server.port
    #[arg(short, long, value_name = "HOST:PORT")]
    listen: Option<String>,

    /// Log filter, e.g. info or stakewatch_metrics=debug
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    /// Log format (pretty|compact|json)
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Defaults, then file, then environment, then command line
    let mut config = ConfigLoader::without_validation()
        .load_with_overrides(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;

    if let Some(listen) = &cli.listen {
        stakewatch_exporter::apply_listen(&mut config, listen)?;
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.observability.log_format = format;
    }
    config.validate().context("Invalid configuration")?;

    let format: LogFormat = config.observability.log_format.parse()?;
    init_tracing_with_config(
        LogConfig::new()
            .with_format(format)
            .with_level(config.observability.log_level.clone()),
    )?;

    info!("Server configuration: {:?}", config);
    info!("Press Ctrl+C to stop");

    stakewatch_exporter::run(config, shutdown_signal()).await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await
        }
    }
}

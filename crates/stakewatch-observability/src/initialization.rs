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
//! Installation of the global `tracing` subscriber.
//!
//! This can only happen once per process; a second call returns
//! [`LogError::AlreadyInitialized`].

use crate::config::{LogConfig, LogError, LogFormat};
use std::io;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Initialize tracing with the specified format and optional level filter.
///
/// # Example
///
/// ```ignore
/// use stakewatch_observability::{init_tracing, LogFormat};
///
/// init_tracing(LogFormat::Compact, Some("debug")).unwrap();
/// tracing::info!("exporter started");
/// ```
pub fn init_tracing(format: LogFormat, level: Option<&str>) -> Result<(), LogError> {
    let mut config = LogConfig::new().with_format(format);
    if let Some(level) = level {
        config = config.with_level(level);
    }
    init_tracing_with_config(config)
}

/// Initialize tracing with a detailed configuration.
pub fn init_tracing_with_config(config: LogConfig) -> Result<(), LogError> {
    let filter = build_env_filter(&config)?;

    Registry::default()
        .with(fmt_layer(&config))
        .with(filter)
        .try_init()
        .map_err(|e| LogError::AlreadyInitialized(e.to_string()))
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn fmt_layer(config: &LogConfig) -> BoxedLayer {
    let base = fmt::layer().with_writer(io::stderr).with_target(true);

    match (config.format, config.use_timestamps) {
        (LogFormat::Pretty, true) => base.with_ansi(config.use_color).pretty().boxed(),
        (LogFormat::Pretty, false) => base
            .with_ansi(config.use_color)
            .pretty()
            .without_time()
            .boxed(),
        (LogFormat::Compact, true) => base.with_ansi(config.use_color).compact().boxed(),
        (LogFormat::Compact, false) => base
            .with_ansi(config.use_color)
            .compact()
            .without_time()
            .boxed(),
        // The scrape span carries the request id
        (LogFormat::Json, true) => base.json().with_current_span(true).boxed(),
        (LogFormat::Json, false) => base
            .json()
            .with_current_span(true)
            .without_time()
            .boxed(),
    }
}

fn build_env_filter(config: &LogConfig) -> Result<EnvFilter, LogError> {
    let filter = config.effective_filter();

    EnvFilter::try_new(&filter).map_err(|e| LogError::InvalidFilter {
        filter: config.effective_level(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global subscriber is never installed here; it can only be set once
    // per test binary.

    #[test]
    fn test_env_filter_parsing() {
        let result = build_env_filter(&LogConfig::new().with_level("debug"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_per_crate_directive() {
        let result = build_env_filter(
            &LogConfig::new().with_level("info,stakewatch_metrics=debug"),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_directive_rejected() {
        let result = build_env_filter(&LogConfig::new().with_level("stakewatch=loud"));
        match result {
            Err(LogError::InvalidFilter { filter, .. }) => assert_eq!(filter, "stakewatch=loud"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_every_format_builds_a_layer() {
        for format in [LogFormat::Pretty, LogFormat::Compact, LogFormat::Json] {
            for timestamps in [true, false] {
                let config = LogConfig::new()
                    .with_format(format)
                    .with_timestamps(timestamps);
                let _ = fmt_layer(&config);
            }
        }
    }
}

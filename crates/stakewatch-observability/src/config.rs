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
//! Configuration for structured logging.
//!
//! The exporter logs to stderr in one of three formats. The level filter
//! uses `EnvFilter` directive syntax.

use std::io::{self, IsTerminal};
use std::str::FromStr;
use thiserror::Error;

/// Targets capped at `warn` unless the filter names them.
///
/// The gRPC and HTTP client stacks log every frame at `debug`, which would
/// bury the per-query lines of a scrape.
pub const QUIET_TARGETS: [&str; 4] = ["h2", "hyper", "tower", "rustls"];

/// Errors that can occur during logging setup
#[derive(Error, Debug)]
pub enum LogError {
    /// The requested output format is not one of the known formats
    #[error("unknown log format '{0}' (expected pretty, compact or json)")]
    InvalidFormat(String),

    /// The level filter is not valid `EnvFilter` syntax
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// Filter as given
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("failed to install subscriber: {0}")]
    AlreadyInitialized(String),
}

/// Output format for logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line, human-readable output
    #[default]
    Pretty,

    /// Single-line output
    Compact,

    /// One JSON object per event, with the current span's fields
    Json,
}

impl LogFormat {
    /// Name used in configuration files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(LogError::InvalidFormat(s.to_string())),
        }
    }
}

/// Configuration for logging
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Output format for logs
    pub format: LogFormat,

    /// Filter directives, e.g. `info` or `info,stakewatch_metrics=debug`.
    /// Falls back to `RUST_LOG`, then `info`.
    pub level: Option<String>,

    /// ANSI colors for the text formats
    pub use_color: bool,

    /// Whether to include timestamps in output
    pub use_timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Pretty,
            level: None,
            use_color: io::stderr().is_terminal(),
            use_timestamps: true,
        }
    }
}

impl LogConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the level filter
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Enable or disable color output
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// Enable or disable timestamps
    pub fn with_timestamps(mut self, use_timestamps: bool) -> Self {
        self.use_timestamps = use_timestamps;
        self
    }

    /// Configured filter, else `RUST_LOG`, else `info`
    pub fn effective_level(&self) -> String {
        self.level
            .clone()
            .filter(|level| !level.trim().is_empty())
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| "info".to_string())
    }

    /// [`effective_level`](Self::effective_level) with a `warn` cap appended
    /// for each of [`QUIET_TARGETS`] the filter does not mention
    pub fn effective_filter(&self) -> String {
        let level = self.effective_level();
        let mut directives = vec![level.clone()];

        for target in QUIET_TARGETS {
            let named = level
                .split(',')
                .any(|directive| directive.trim().split('=').next() == Some(target));
            if !named {
                directives.push(format!("{target}=warn"));
            }
        }
        directives.join(",")
    }
}

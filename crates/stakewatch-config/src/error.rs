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
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating exporter configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// TOML syntax or type mismatch
    #[error("failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML syntax or type mismatch
    #[error("failed to parse YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON syntax or type mismatch
    #[error("failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension is not toml, yaml, yml or json
    #[error("unsupported configuration format '{0}' (expected toml, yaml or json)")]
    UnsupportedFormat(String),

    /// No file at the given path
    #[error("configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Path has no extension to pick a format from
    #[error("cannot infer configuration format from path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// A `STAKEWATCH_*` override did not parse
    #[error("invalid value for {variable}={value}: {reason}")]
    EnvOverride {
        /// Environment variable name
        variable: String,
        /// Raw value found in the environment
        value: String,
        /// Expected shape of the value
        reason: String,
    },

    /// A field holds a value the exporter cannot run with
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted field path, e.g. `upstreams.grpc_url`
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// A field that has no default was left empty
    #[error("missing required configuration field: {0}")]
    MissingRequired(String),
}

impl ConfigError {
    /// Build a [`ConfigError::EnvOverride`]
    pub fn env_override(
        variable: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::EnvOverride {
            variable: variable.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`ConfigError::InvalidValue`]
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout this crate
pub type ConfigResult<T> = Result<T, ConfigError>;

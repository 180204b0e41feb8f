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
use crate::error::{ConfigError, ConfigResult};
use crate::schema::*;
use std::collections::BTreeMap;

/// Label names the exporter sets itself on some metric families
const RESERVED_LABELS: [&str; 2] = ["denom", "query"];

/// Validator for configuration settings
pub trait Validator {
    /// Check the section, returning the first problem found
    fn validate(&self) -> ConfigResult<()>;
}

impl Validator for Config {
    fn validate(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.node.validate()?;
        self.chain.validate()?;
        self.observability.validate()?;
        validate_labels(&self.labels)?;
        Ok(())
    }
}

impl Validator for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.host.is_empty() {
            return Err(ConfigError::MissingRequired("server.host".to_string()));
        }

        if self.port == 0 {
            return Err(ConfigError::invalid_value(
                "server.port",
                "port must be between 1 and 65535",
            ));
        }

        if !self.metrics_path.starts_with('/') {
            return Err(ConfigError::invalid_value(
                "server.metrics_path",
                format!("must start with '/', got {}", self.metrics_path),
            ));
        }

        if self.metrics_path == "/health" {
            return Err(ConfigError::invalid_value(
                "server.metrics_path",
                "/health is reserved for the liveness endpoint",
            ));
        }

        Ok(())
    }
}

impl Validator for NodeConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_http_url("node.rpc_url", &self.rpc_url)?;

        // The gRPC channel is built without TLS support.
        if !self.grpc_url.starts_with("http://") {
            return Err(ConfigError::invalid_value(
                "node.grpc_url",
                format!("must be a plaintext http:// endpoint, got {}", self.grpc_url),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "node.timeout_secs",
                "must be at least 1 second",
            ));
        }

        if self.max_pages == 0 {
            return Err(ConfigError::invalid_value("node.max_pages", "must be at least 1"));
        }

        if self.page_limit == 0 {
            return Err(ConfigError::invalid_value("node.page_limit", "must be at least 1"));
        }

        Ok(())
    }
}

impl Validator for ChainConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.chain_id.is_empty() {
            return Err(ConfigError::MissingRequired("chain.chain_id".to_string()));
        }

        if self.denom.is_empty() {
            return Err(ConfigError::MissingRequired("chain.denom".to_string()));
        }

        if matches!(&self.base_denom, Some(base) if base.is_empty()) {
            return Err(ConfigError::invalid_value(
                "chain.base_denom",
                "must not be empty when set",
            ));
        }

        if !self.denom_coefficient.is_finite() || self.denom_coefficient <= 0.0 {
            return Err(ConfigError::invalid_value(
                "chain.denom_coefficient",
                format!("must be a positive number, got {}", self.denom_coefficient),
            ));
        }

        if self.price_enabled {
            validate_http_url("chain.price_directory_url", &self.price_directory_url)?;
        }

        Ok(())
    }
}

impl Validator for ObservabilityConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::MissingRequired(
                "observability.log_level".to_string(),
            ));
        }

        let valid_formats = ["pretty", "compact", "json"];
        if !valid_formats.contains(&self.log_format.to_lowercase().as_str()) {
            return Err(ConfigError::invalid_value(
                "observability.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        Ok(())
    }
}

fn validate_http_url(field: &str, url: &str) -> ConfigResult<()> {
    if url.is_empty() {
        return Err(ConfigError::MissingRequired(field.to_string()));
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::invalid_value(
            field,
            format!("must start with http:// or https://, got {}", url),
        ));
    }

    Ok(())
}

fn validate_labels(labels: &BTreeMap<String, String>) -> ConfigResult<()> {
    for name in labels.keys() {
        let field = format!("labels.{}", name);

        if !is_valid_label_name(name) {
            return Err(ConfigError::invalid_value(
                field,
                "label names must match [a-zA-Z_][a-zA-Z0-9_]* and not start with __",
            ));
        }

        if RESERVED_LABELS.contains(&name.as_str()) {
            return Err(ConfigError::invalid_value(
                field,
                "label name is set by the exporter itself",
            ));
        }
    }

    Ok(())
}

fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    let first_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    first_ok
        && !name.starts_with("__")
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

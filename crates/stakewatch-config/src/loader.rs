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
use crate::schema::Config;
use crate::validation::Validator;
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tracing::{debug, info};

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::InvalidPath(path.to_path_buf())),
        }
    }

    /// Get format name as string
    pub fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Yaml => "YAML",
            ConfigFormat::Json => "JSON",
        }
    }
}

/// Configuration loader
///
/// Precedence, lowest first: built-in defaults, the config file,
/// `STAKEWATCH_*` environment variables. Validation runs last.
pub struct ConfigLoader {
    validate: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        ConfigLoader { validate: true }
    }

    /// Create a loader without validation
    pub fn without_validation() -> Self {
        ConfigLoader { validate: false }
    }

    /// Load configuration from a file, without environment overrides
    pub async fn load_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<Config> {
        let config = self.read_file(path.as_ref()).await?;
        self.finish(config)
    }

    /// Load configuration from a string
    pub fn load_from_string(&self, content: &str, format: ConfigFormat) -> ConfigResult<Config> {
        let config = parse(content, format)?;
        self.finish(config)
    }

    /// Load configuration from an optional file, then apply environment overrides.
    ///
    /// With no path the built-in defaults are the starting point.
    pub async fn load_with_overrides<P: AsRef<Path>>(
        &self,
        path: Option<P>,
    ) -> ConfigResult<Config> {
        let mut config = match path {
            Some(path) => self.read_file(path.as_ref()).await?,
            None => {
                info!("No configuration file given, using defaults");
                Config::default()
            }
        };
        self.apply_env_overrides(&mut config)?;
        self.finish(config)
    }

    /// Apply `STAKEWATCH_*` overrides from the process environment
    pub fn apply_env_overrides(&self, config: &mut Config) -> ConfigResult<()> {
        apply_overrides(config, |name| std::env::var(name).ok())
    }

    async fn read_file(&self, path: &Path) -> ConfigResult<Config> {
        debug!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path).await?;

        info!(
            "Loaded {} configuration file: {}",
            format.name(),
            path.display()
        );

        parse(&content, format)
    }

    fn finish(&self, config: Config) -> ConfigResult<Config> {
        if self.validate {
            config.validate()?;
            debug!("Configuration validated successfully");
        }
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse(content: &str, format: ConfigFormat) -> ConfigResult<Config> {
    let config: Config = match format {
        ConfigFormat::Toml => toml::from_str(content)?,
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Json => serde_json::from_str(content)?,
    };
    Ok(config)
}

/// Apply overrides using `lookup` as the variable source
pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("STAKEWATCH_HOST") {
        config.server.host = value;
    }
    if let Some(value) = lookup("STAKEWATCH_PORT") {
        config.server.port = parse_var("STAKEWATCH_PORT", &value, "expected valid port number")?;
    }
    if let Some(value) = lookup("STAKEWATCH_RPC_URL") {
        config.node.rpc_url = value;
    }
    if let Some(value) = lookup("STAKEWATCH_GRPC_URL") {
        config.node.grpc_url = value;
    }
    if let Some(value) = lookup("STAKEWATCH_TIMEOUT_SECS") {
        config.node.timeout_secs =
            parse_var("STAKEWATCH_TIMEOUT_SECS", &value, "expected whole seconds")?;
    }
    if let Some(value) = lookup("STAKEWATCH_CHAIN_ID") {
        config.chain.chain_id = value;
    }
    if let Some(value) = lookup("STAKEWATCH_DENOM") {
        config.chain.denom = value;
    }
    if let Some(value) = lookup("STAKEWATCH_DENOM_COEFFICIENT") {
        config.chain.denom_coefficient =
            parse_var("STAKEWATCH_DENOM_COEFFICIENT", &value, "expected a number")?;
    }
    if let Some(value) = lookup("STAKEWATCH_LOG_LEVEL") {
        config.observability.log_level = value;
    }
    if let Some(value) = lookup("STAKEWATCH_LOG_FORMAT") {
        config.observability.log_format = value;
    }

    Ok(())
}

fn parse_var<T: FromStr>(name: &str, value: &str, reason: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::env_override(name, value, reason))
}

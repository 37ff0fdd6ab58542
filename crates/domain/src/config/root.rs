use super::{
    BlockingConfig, ConfigError, DatabaseConfig, LoggingConfig, TunnelConfig, UpstreamConfig,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Config file looked up in the working directory when no path is given.
const DEFAULT_CONFIG_FILE: &str = "ferrous-shield.toml";

/// Linux limits interface names to IFNAMSIZ - 1 bytes.
const MAX_INTERFACE_NAME_LEN: usize = 15;

/// Smallest read buffer that still holds a full Ethernet-MTU datagram.
const MIN_READ_BUFFER_SIZE: usize = 1500;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tunnel: TunnelConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub blocking: BlockingConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values given on the command line; each one replaces the file value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub tunnel_name: Option<String>,
    pub upstream: Option<SocketAddr>,
    pub database_path: Option<String>,
    pub bloom_snapshot_path: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    /// Loads configuration from `config_path`, or from `ferrous-shield.toml`
    /// when it exists, or falls back to defaults. CLI overrides are applied
    /// last.
    pub fn load(config_path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };

        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(name) = overrides.tunnel_name {
            self.tunnel.name = name;
        }
        if let Some(upstream) = overrides.upstream {
            self.upstream.address = upstream;
        }
        if let Some(path) = overrides.database_path {
            self.database.path = path;
        }
        if let Some(path) = overrides.bloom_snapshot_path {
            self.blocking.bloom_snapshot_path = path;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tunnel.name.is_empty() || self.tunnel.name.len() > MAX_INTERFACE_NAME_LEN {
            return Err(ConfigError::Validation(format!(
                "tunnel.name must be 1..={MAX_INTERFACE_NAME_LEN} bytes, got '{}'",
                self.tunnel.name
            )));
        }
        if self.tunnel.read_buffer_size < MIN_READ_BUFFER_SIZE {
            return Err(ConfigError::Validation(format!(
                "tunnel.read_buffer_size must be at least {MIN_READ_BUFFER_SIZE}"
            )));
        }
        if self.tunnel.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "tunnel.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.upstream.workers == 0 {
            return Err(ConfigError::Validation(
                "upstream.workers must be greater than zero".to_string(),
            ));
        }
        if self.upstream.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "upstream.timeout_ms must be greater than zero".to_string(),
            ));
        }
        if !self.upstream.is_tunnel_exempt() {
            return Err(ConfigError::Validation(
                "upstream.routing_mark is 0 and no upstream.bind_interface is set; \
                 forwarded queries would loop back into the tunnel"
                    .to_string(),
            ));
        }
        if let Some(ref interface) = self.upstream.bind_interface {
            if interface.is_empty() || interface.len() > MAX_INTERFACE_NAME_LEN {
                return Err(ConfigError::Validation(format!(
                    "upstream.bind_interface must be 1..={MAX_INTERFACE_NAME_LEN} bytes"
                )));
            }
        }
        if self.blocking.cache_capacity == 0 {
            return Err(ConfigError::Validation(
                "blocking.cache_capacity must be greater than zero".to_string(),
            ));
        }
        if !(self.blocking.bloom_fp_rate > 0.0 && self.blocking.bloom_fp_rate < 1.0) {
            return Err(ConfigError::Validation(format!(
                "blocking.bloom_fp_rate must be in (0, 1), got {}",
                self.blocking.bloom_fp_rate
            )));
        }
        if self.blocking.store_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "blocking.store_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.blocking.source_fetch_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "blocking.source_fetch_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

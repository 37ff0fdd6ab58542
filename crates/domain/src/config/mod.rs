//! Service configuration: one struct per TOML table, assembled by [`Config`].

pub mod blocking;
pub mod database;
pub mod errors;
pub mod logging;
pub mod root;
pub mod tunnel;
pub mod upstream;

pub use blocking::BlockingConfig;
pub use database::DatabaseConfig;
pub use errors::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use root::{CliOverrides, Config};
pub use tunnel::TunnelConfig;
pub use upstream::{UpstreamConfig, DEFAULT_ROUTING_MARK};

//! Ferrous Shield Domain Layer
pub mod blocklist;
pub mod blocklist_source;
pub mod config;
pub mod dns_flow;
pub mod errors;
pub mod query_log;
pub mod stats;
pub mod validators;
pub mod verdict;

pub use blocklist::{BlockedDomain, DomainCategory};
pub use blocklist_source::BlocklistSource;
pub use config::{
    BlockingConfig, CliOverrides, Config, ConfigError, DatabaseConfig, LogFormat, LoggingConfig,
    TunnelConfig, UpstreamConfig, DEFAULT_ROUTING_MARK,
};
pub use dns_flow::DnsFlow;
pub use errors::DomainError;
pub use query_log::{QueryLog, QueryStats};
pub use stats::ServiceStats;
pub use verdict::{Verdict, VerdictSource};

use async_trait::async_trait;
use ferrous_shield_domain::DomainError;

/// Running total of blocked queries, persisted across restarts.
pub const BLOCKED_COUNT_KEY: &str = "blocked_count";

/// SHA-256 of the last imported blocklist file.
pub const LAST_IMPORT_HASH_KEY: &str = "last_import_hash";

/// Small key/value table for service bookkeeping.
#[async_trait]
pub trait ServiceStateRepository: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;
}

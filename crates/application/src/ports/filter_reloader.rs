use async_trait::async_trait;
use ferrous_shield_domain::DomainError;

/// The reload signal: refresh the whitelist, drop every cached decision and
/// rebuild the bloom filter from the store.
#[async_trait]
pub trait FilterReloader: Send + Sync {
    async fn reload(&self) -> Result<(), DomainError>;
}

use async_trait::async_trait;
use ferrous_shield_domain::{BlocklistSource, DomainError};

/// URLs that `import --from-sources` downloads and merges.
#[async_trait]
pub trait BlocklistSourceRepository: Send + Sync {
    /// Returns false when the URL was already registered.
    async fn add(&self, url: &str) -> Result<bool, DomainError>;

    /// Returns false when the URL was not registered.
    async fn remove(&self, url: &str) -> Result<bool, DomainError>;

    /// Every source, oldest first.
    async fn list(&self) -> Result<Vec<BlocklistSource>, DomainError>;
}

use async_trait::async_trait;
use ferrous_shield_domain::DomainError;

/// Downloads the raw text of one blocklist source.
#[async_trait]
pub trait BlocklistFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, DomainError>;
}

use async_trait::async_trait;
use ferrous_shield_domain::{BlockedDomain, DomainError};
use futures::stream::BoxStream;

/// Authoritative domain store consumed by the decision cascade.
///
/// Lookups take normalised (lowercase, no trailing dot) domains. The store
/// must allow concurrent reads while an import appends chunks.
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Exact, indexed membership test against the blocked-domain table.
    async fn is_blocked(&self, domain: &str) -> Result<bool, DomainError>;

    /// Exact membership test against the whitelist table. Consulted after a
    /// store hit so entries added since the last whitelist refresh still win.
    async fn is_whitelisted(&self, domain: &str) -> Result<bool, DomainError>;

    /// Cursor over every blocked domain. Rows are streamed, never collected,
    /// so bloom rebuilds stay bounded in memory.
    fn stream_domains(&self) -> BoxStream<'_, Result<String, DomainError>>;

    async fn count_domains(&self) -> Result<u64, DomainError>;

    /// Inserts one chunk inside a single transaction. Duplicates are ignored.
    /// Returns the number of rows actually inserted.
    async fn insert_chunk(&self, chunk: &[BlockedDomain]) -> Result<u64, DomainError>;

    async fn clear_domains(&self) -> Result<u64, DomainError>;

    async fn list_whitelist(&self) -> Result<Vec<String>, DomainError>;

    /// Returns false when the domain was already whitelisted.
    async fn add_whitelist(&self, domain: &str) -> Result<bool, DomainError>;

    /// Returns false when the domain was not whitelisted.
    async fn remove_whitelist(&self, domain: &str) -> Result<bool, DomainError>;
}

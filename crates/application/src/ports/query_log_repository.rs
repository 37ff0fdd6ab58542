use async_trait::async_trait;
use ferrous_shield_domain::{DomainError, QueryLog, QueryStats};

#[async_trait]
pub trait QueryLogRepository: Send + Sync {
    /// Records one query. Implementations may buffer; the call must not wait
    /// on disk I/O.
    async fn log_query(&self, query: &QueryLog) -> Result<(), DomainError>;

    async fn get_recent(&self, limit: u32) -> Result<Vec<QueryLog>, DomainError>;

    async fn get_stats(&self) -> Result<QueryStats, DomainError>;

    async fn clear(&self) -> Result<u64, DomainError>;
}

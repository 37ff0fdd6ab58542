use crate::ports::{BlockStore, QueryLogRepository, ServiceStateRepository, BLOCKED_COUNT_KEY};
use ferrous_shield_domain::{DomainError, QueryStats};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShieldSummary {
    pub blocked_domains: u64,
    pub whitelisted_domains: usize,
    /// Blocked queries across all runs, as persisted at the last shutdown.
    pub blocked_total: u64,
    pub queries: QueryStats,
}

pub struct GetShieldStatsUseCase {
    store: Arc<dyn BlockStore>,
    query_log: Arc<dyn QueryLogRepository>,
    state: Arc<dyn ServiceStateRepository>,
}

impl GetShieldStatsUseCase {
    pub fn new(
        store: Arc<dyn BlockStore>,
        query_log: Arc<dyn QueryLogRepository>,
        state: Arc<dyn ServiceStateRepository>,
    ) -> Self {
        Self {
            store,
            query_log,
            state,
        }
    }

    pub async fn execute(&self) -> Result<ShieldSummary, DomainError> {
        let blocked_domains = self.store.count_domains().await?;
        let whitelisted_domains = self.store.list_whitelist().await?.len();
        let queries = self.query_log.get_stats().await?;
        let blocked_total = self
            .state
            .get(BLOCKED_COUNT_KEY)
            .await?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        Ok(ShieldSummary {
            blocked_domains,
            whitelisted_domains,
            blocked_total,
            queries,
        })
    }
}

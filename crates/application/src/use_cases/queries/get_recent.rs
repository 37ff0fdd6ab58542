use crate::ports::QueryLogRepository;
use ferrous_shield_domain::{DomainError, QueryLog};
use std::sync::Arc;

const MAX_LIMIT: u32 = 10_000;

pub struct GetRecentQueriesUseCase {
    repository: Arc<dyn QueryLogRepository>,
}

impl GetRecentQueriesUseCase {
    pub fn new(repository: Arc<dyn QueryLogRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, limit: u32) -> Result<Vec<QueryLog>, DomainError> {
        self.repository.get_recent(limit.clamp(1, MAX_LIMIT)).await
    }
}

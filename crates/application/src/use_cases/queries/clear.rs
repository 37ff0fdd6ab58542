use crate::ports::QueryLogRepository;
use ferrous_shield_domain::DomainError;
use std::sync::Arc;
use tracing::info;

pub struct ClearQueryLogUseCase {
    repository: Arc<dyn QueryLogRepository>,
}

impl ClearQueryLogUseCase {
    pub fn new(repository: Arc<dyn QueryLogRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Result<u64, DomainError> {
        let removed = self.repository.clear().await?;
        info!(removed, "Query log cleared");
        Ok(removed)
    }
}

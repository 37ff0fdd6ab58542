use crate::ports::BlockStore;
use ferrous_shield_domain::validators::normalize_domain;
use ferrous_shield_domain::DomainError;
use std::sync::Arc;
use tracing::{info, instrument};

/// User-managed whitelist. Changes reach a running service on its next
/// reload signal.
pub struct ManageWhitelistUseCase {
    store: Arc<dyn BlockStore>,
}

impl ManageWhitelistUseCase {
    pub fn new(store: Arc<dyn BlockStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn add(&self, domain: &str) -> Result<String, DomainError> {
        let domain = normalize_domain(domain)?;
        let added = self.store.add_whitelist(&domain).await?;
        info!(domain = %domain, added, "Whitelist entry added");
        Ok(domain)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, domain: &str) -> Result<String, DomainError> {
        let domain = normalize_domain(domain)?;
        if !self.store.remove_whitelist(&domain).await? {
            return Err(DomainError::NotFound(format!(
                "{domain} is not whitelisted"
            )));
        }
        info!(domain = %domain, "Whitelist entry removed");
        Ok(domain)
    }

    pub async fn list(&self) -> Result<Vec<String>, DomainError> {
        self.store.list_whitelist().await
    }
}

use crate::ports::BlocklistSourceRepository;
use ferrous_shield_domain::validators::validate_source_url;
use ferrous_shield_domain::{BlocklistSource, DomainError};
use std::sync::Arc;
use tracing::{info, instrument};

/// Registered blocklist URLs. Nothing is downloaded until the next
/// `import --from-sources`.
pub struct ManageBlocklistSourcesUseCase {
    sources: Arc<dyn BlocklistSourceRepository>,
}

impl ManageBlocklistSourcesUseCase {
    pub fn new(sources: Arc<dyn BlocklistSourceRepository>) -> Self {
        Self { sources }
    }

    #[instrument(skip(self))]
    pub async fn add(&self, url: &str) -> Result<String, DomainError> {
        let url = validate_source_url(url)?;
        let added = self.sources.add(&url).await?;
        info!(url = %url, added, "Blocklist source added");
        Ok(url)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, url: &str) -> Result<String, DomainError> {
        let url = url.trim();
        if !self.sources.remove(url).await? {
            return Err(DomainError::NotFound(format!(
                "{url} is not a blocklist source"
            )));
        }
        info!(url = %url, "Blocklist source removed");
        Ok(url.to_string())
    }

    pub async fn list(&self) -> Result<Vec<BlocklistSource>, DomainError> {
        self.sources.list().await
    }
}

use crate::ports::{BlocklistFetcher, BlocklistSourceRepository};
use crate::use_cases::blocklist::{ImportBlocklistUseCase, ImportOutcome};
use ferrous_shield_domain::DomainError;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Sources whose content went into the import, in registration order.
    pub fetched: Vec<String>,
    /// Sources that could not be downloaded, with the reason.
    pub failed: Vec<(String, String)>,
    pub import: ImportOutcome,
}

/// Downloads every registered source in parallel, merges the lists and
/// replaces the store with the result through the regular import path.
///
/// A source that fails to download is skipped. When every source fails the
/// store is left untouched.
pub struct SyncBlocklistSourcesUseCase {
    sources: Arc<dyn BlocklistSourceRepository>,
    fetcher: Arc<dyn BlocklistFetcher>,
    import: Arc<ImportBlocklistUseCase>,
}

impl SyncBlocklistSourcesUseCase {
    pub fn new(
        sources: Arc<dyn BlocklistSourceRepository>,
        fetcher: Arc<dyn BlocklistFetcher>,
        import: Arc<ImportBlocklistUseCase>,
    ) -> Self {
        Self {
            sources,
            fetcher,
            import,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, force: bool) -> Result<SyncOutcome, DomainError> {
        let sources = self.sources.list().await?;
        if sources.is_empty() {
            return Err(DomainError::NotFound(
                "no blocklist sources registered".to_string(),
            ));
        }

        let results = join_all(sources.iter().map(|source| async move {
            (source, self.fetcher.fetch(&source.url).await)
        }))
        .await;

        let mut merged = String::new();
        let mut fetched = Vec::new();
        let mut failed = Vec::new();
        for (source, result) in results {
            match result {
                Ok(body) => {
                    info!(url = %source.url, bytes = body.len(), "Fetched blocklist source");
                    merged.push_str(&body);
                    if !body.ends_with('\n') {
                        merged.push('\n');
                    }
                    fetched.push(source.url.to_string());
                }
                Err(e) => {
                    warn!(url = %source.url, error = %e, "Failed to fetch blocklist source");
                    failed.push((source.url.to_string(), e.to_string()));
                }
            }
        }

        if fetched.is_empty() {
            return Err(DomainError::FetchError(format!(
                "all {} blocklist sources failed",
                failed.len()
            )));
        }

        let import = self.import.execute(&merged, force).await?;

        Ok(SyncOutcome {
            fetched,
            failed,
            import,
        })
    }
}

use super::parser::parse_blocklist;
use crate::ports::{BlockStore, FilterReloader, ServiceStateRepository, LAST_IMPORT_HASH_KEY};
use ferrous_shield_domain::DomainError;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Rows written per store transaction.
pub const IMPORT_CHUNK_SIZE: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Rows inserted into the store.
    pub imported: u64,
    /// Non-comment lines that did not yield a valid domain.
    pub rejected_lines: usize,
    /// True when the content matched the last import and nothing was written.
    pub unchanged: bool,
    /// Hex SHA-256 of the imported content.
    pub hash: String,
}

/// Replaces the blocked-domain store with the contents of a blocklist file,
/// then fires the reload signal so the bloom filter is rebuilt.
pub struct ImportBlocklistUseCase {
    store: Arc<dyn BlockStore>,
    state: Arc<dyn ServiceStateRepository>,
    reloader: Arc<dyn FilterReloader>,
}

impl ImportBlocklistUseCase {
    pub fn new(
        store: Arc<dyn BlockStore>,
        state: Arc<dyn ServiceStateRepository>,
        reloader: Arc<dyn FilterReloader>,
    ) -> Self {
        Self {
            store,
            state,
            reloader,
        }
    }

    #[instrument(skip(self, content), fields(bytes = content.len()))]
    pub async fn execute(&self, content: &str, force: bool) -> Result<ImportOutcome, DomainError> {
        let hash = content_hash(content.as_bytes());

        if !force {
            let last = self.state.get(LAST_IMPORT_HASH_KEY).await?;
            if last.as_deref() == Some(hash.as_str()) {
                info!(hash = %hash, "Blocklist unchanged since last import, skipping");
                return Ok(ImportOutcome {
                    imported: 0,
                    rejected_lines: 0,
                    unchanged: true,
                    hash,
                });
            }
        }

        let (domains, rejected_lines) = parse_blocklist(content);
        if domains.is_empty() {
            return Err(DomainError::ImportError(
                "blocklist contains no valid domains".to_string(),
            ));
        }

        let removed = self.store.clear_domains().await?;
        debug!(removed, "Previous blocklist cleared");

        let total_chunks = domains.len().div_ceil(IMPORT_CHUNK_SIZE);
        let mut imported = 0u64;
        for (i, chunk) in domains.chunks(IMPORT_CHUNK_SIZE).enumerate() {
            imported += self.store.insert_chunk(chunk).await?;
            debug!(chunk = i + 1, total_chunks, "Blocklist chunk imported");
        }

        self.state.set(LAST_IMPORT_HASH_KEY, &hash).await?;

        info!(
            imported,
            rejected_lines,
            hash = %hash,
            "Blocklist imported"
        );

        self.reloader.reload().await?;

        Ok(ImportOutcome {
            imported,
            rejected_lines,
            unchanged: false,
            hash,
        })
    }
}

fn content_hash(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

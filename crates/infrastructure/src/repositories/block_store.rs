use async_trait::async_trait;
use ferrous_shield_application::ports::BlockStore;
use ferrous_shield_domain::{BlockedDomain, DomainError};
use futures::stream::{BoxStream, TryStreamExt};
use sqlx::SqlitePool;
use tracing::{debug, error, instrument};

pub struct SqliteBlockStore {
    pool: SqlitePool,
}

impl SqliteBlockStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn db_error(e: sqlx::Error) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

#[async_trait]
impl BlockStore for SqliteBlockStore {
    async fn is_blocked(&self, domain: &str) -> Result<bool, DomainError> {
        let exists: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM blocked_domains WHERE domain = ?)",
        )
        .bind(domain)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(exists != 0)
    }

    async fn is_whitelisted(&self, domain: &str) -> Result<bool, DomainError> {
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM whitelist WHERE domain = ?)")
                .bind(domain)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error)?;

        Ok(exists != 0)
    }

    fn stream_domains(&self) -> BoxStream<'_, Result<String, DomainError>> {
        Box::pin(
            sqlx::query_scalar::<_, String>("SELECT domain FROM blocked_domains")
                .fetch(&self.pool)
                .map_err(db_error),
        )
    }

    async fn count_domains(&self) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blocked_domains")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(count as u64)
    }

    #[instrument(skip(self, chunk), fields(size = chunk.len()))]
    async fn insert_chunk(&self, chunk: &[BlockedDomain]) -> Result<u64, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            error!(error = %e, "Failed to open import transaction");
            db_error(e)
        })?;

        let mut inserted = 0u64;
        for record in chunk {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO blocked_domains (domain, category) VALUES (?, ?)",
            )
            .bind(record.domain.as_ref())
            .bind(record.category.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!(error = %e, domain = %record.domain, "Failed to insert blocked domain");
                db_error(e)
            })?;
            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(db_error)?;

        debug!(inserted, "Blocklist chunk committed");
        Ok(inserted)
    }

    #[instrument(skip(self))]
    async fn clear_domains(&self) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM blocked_domains")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to clear blocked domains");
                db_error(e)
            })?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn list_whitelist(&self) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar::<_, String>("SELECT domain FROM whitelist ORDER BY domain")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list whitelist");
                db_error(e)
            })
    }

    #[instrument(skip(self))]
    async fn add_whitelist(&self, domain: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("INSERT OR IGNORE INTO whitelist (domain) VALUES (?)")
            .bind(domain)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to add whitelist entry");
                db_error(e)
            })?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn remove_whitelist(&self, domain: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM whitelist WHERE domain = ?")
            .bind(domain)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to remove whitelist entry");
                db_error(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}

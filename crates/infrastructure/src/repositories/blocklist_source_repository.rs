use async_trait::async_trait;
use ferrous_shield_application::ports::BlocklistSourceRepository;
use ferrous_shield_domain::{BlocklistSource, DomainError};
use sqlx::{Row, SqlitePool};
use tracing::{error, instrument};

pub struct SqliteBlocklistSourceRepository {
    pool: SqlitePool,
}

impl SqliteBlocklistSourceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlocklistSourceRepository for SqliteBlocklistSourceRepository {
    #[instrument(skip(self))]
    async fn add(&self, url: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("INSERT OR IGNORE INTO blocklist_urls (url) VALUES (?)")
            .bind(url)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to add blocklist source");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn remove(&self, url: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM blocklist_urls WHERE url = ?")
            .bind(url)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to remove blocklist source");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<BlocklistSource>, DomainError> {
        let rows = sqlx::query("SELECT id, url, created_at FROM blocklist_urls ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| {
                BlocklistSource::new(
                    row.get("id"),
                    row.get::<String, _>("url").as_str(),
                    row.get("created_at"),
                )
            })
            .collect())
    }
}

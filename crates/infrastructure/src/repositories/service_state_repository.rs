use async_trait::async_trait;
use ferrous_shield_application::ports::ServiceStateRepository;
use ferrous_shield_domain::DomainError;
use sqlx::SqlitePool;
use tracing::{error, instrument};

pub struct SqliteServiceStateRepository {
    pool: SqlitePool,
}

impl SqliteServiceStateRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceStateRepository for SqliteServiceStateRepository {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        sqlx::query_scalar::<_, String>("SELECT value FROM service_state WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to read service state");
                DomainError::DatabaseError(e.to_string())
            })
    }

    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO service_state (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to write service state");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }
}

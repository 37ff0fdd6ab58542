use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ferrous_shield_application::ports::QueryLogRepository;
use ferrous_shield_domain::{DomainError, QueryLog, QueryStats, VerdictSource};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

const CHANNEL_CAPACITY: usize = 10_000;
const MAX_BATCH_SIZE: usize = 500;
const FLUSH_INTERVAL_MS: u64 = 100;

/// Owned row waiting in the channel.
struct QueryLogEntry {
    domain: Arc<str>,
    client_ip: String,
    blocked: bool,
    source: &'static str,
    created_at_ms: i64,
}

impl QueryLogEntry {
    fn from_query_log(q: &QueryLog) -> Self {
        Self {
            domain: Arc::clone(&q.domain),
            client_ip: q.client_ip.to_string(),
            blocked: q.blocked,
            source: q.source.as_str(),
            created_at_ms: q.timestamp.unwrap_or_else(Utc::now).timestamp_millis(),
        }
    }
}

/// SQLite query log. Writes go through a bounded channel to one writer task;
/// a full channel drops the entry. Must be created inside a tokio runtime.
pub struct SqliteQueryLogRepository {
    pool: SqlitePool,
    sender: mpsc::Sender<QueryLogEntry>,
}

impl SqliteQueryLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);

        let flush_pool = pool.clone();
        tokio::spawn(async move {
            Self::run_writer(flush_pool, receiver).await;
        });

        Self { pool, sender }
    }

    /// Drains the channel into `pending` and writes whenever a full batch is
    /// waiting or the interval elapses. Exits after a final write once every
    /// sender is gone.
    async fn run_writer(pool: SqlitePool, mut receiver: mpsc::Receiver<QueryLogEntry>) {
        let mut pending: Vec<QueryLogEntry> = Vec::with_capacity(MAX_BATCH_SIZE);
        let mut ticker = tokio::time::interval(Duration::from_millis(FLUSH_INTERVAL_MS));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                received = receiver.recv_many(&mut pending, MAX_BATCH_SIZE) => {
                    if received == 0 {
                        Self::write_batch(&pool, &mut pending).await;
                        debug!("Query log writer stopped");
                        return;
                    }
                    if pending.len() >= MAX_BATCH_SIZE {
                        Self::write_batch(&pool, &mut pending).await;
                    }
                }
                _ = ticker.tick() => Self::write_batch(&pool, &mut pending).await,
            }
        }
    }

    async fn write_batch(pool: &SqlitePool, pending: &mut Vec<QueryLogEntry>) {
        if pending.is_empty() {
            return;
        }
        let rows = pending.len();

        let mut insert = QueryBuilder::<Sqlite>::new(
            "INSERT INTO query_log (domain, client_ip, blocked, source, created_at) ",
        );
        insert.push_values(pending.drain(..), |mut row, entry| {
            row.push_bind(entry.domain.to_string())
                .push_bind(entry.client_ip)
                .push_bind(i64::from(entry.blocked))
                .push_bind(entry.source)
                .push_bind(entry.created_at_ms);
        });

        if let Err(e) = insert.build().execute(pool).await {
            error!(error = %e, rows, "Query log batch lost");
        } else {
            debug!(rows, "Query log batch written");
        }
    }
}

#[async_trait]
impl QueryLogRepository for SqliteQueryLogRepository {
    async fn log_query(&self, query: &QueryLog) -> Result<(), DomainError> {
        match self.sender.try_send(QueryLogEntry::from_query_log(query)) {
            Err(TrySendError::Full(entry)) => {
                warn!(domain = %entry.domain, "Query log backlog full, entry dropped");
            }
            Err(TrySendError::Closed(_)) => {
                return Err(DomainError::DatabaseError("query log writer stopped".into()));
            }
            Ok(()) => {}
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_recent(&self, limit: u32) -> Result<Vec<QueryLog>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, domain, client_ip, blocked, source, created_at
             FROM query_log ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch recent queries");
            DomainError::DatabaseError(e.to_string())
        })?;

        let entries: Vec<QueryLog> = rows
            .into_iter()
            .filter_map(|row| {
                let domain: String = row.get("domain");
                let client_ip: String = row.get("client_ip");
                let source: String = row.get("source");

                Some(QueryLog {
                    id: Some(row.get("id")),
                    domain: Arc::from(domain.as_str()),
                    client_ip: client_ip.parse().ok()?,
                    blocked: row.get::<i64, _>("blocked") != 0,
                    source: VerdictSource::from_str(&source)?,
                    timestamp: DateTime::<Utc>::from_timestamp_millis(row.get("created_at")),
                })
            })
            .collect();

        debug!(count = entries.len(), "Recent queries fetched");
        Ok(entries)
    }

    #[instrument(skip(self))]
    async fn get_stats(&self) -> Result<QueryStats, DomainError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total, COALESCE(SUM(blocked), 0) AS blocked FROM query_log",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch query statistics");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(QueryStats {
            total: row.get::<i64, _>("total") as u64,
            blocked: row.get::<i64, _>("blocked") as u64,
        })
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM query_log")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to clear query log");
                DomainError::DatabaseError(e.to_string())
            })?;

        info!(deleted = result.rows_affected(), "Query log cleared");
        Ok(result.rows_affected())
    }
}

use async_trait::async_trait;
use ferrous_shield_application::ports::BlockStore;
use ferrous_shield_domain::{BlockedDomain, DomainError};
use ferrous_shield_infrastructure::database::create_memory_pool;
use ferrous_shield_infrastructure::repositories::SqliteBlockStore;
use futures::stream::{self, BoxStream, StreamExt};
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub async fn memory_pool() -> SqlitePool {
    create_memory_pool().await.unwrap()
}

/// A SQLite store holding `domains`.
pub async fn seeded_store(domains: &[&str]) -> Arc<SqliteBlockStore> {
    let store = SqliteBlockStore::new(memory_pool().await);
    let records: Vec<BlockedDomain> = domains.iter().map(|d| BlockedDomain::classified(d)).collect();
    store.insert_chunk(&records).await.unwrap();
    Arc::new(store)
}

/// Wraps a store, counts exact lookups and can be switched into failure.
pub struct FlakyStore {
    inner: Arc<dyn BlockStore>,
    failing: AtomicBool,
    lookups: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: Arc<dyn BlockStore>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            failing: AtomicBool::new(false),
            lookups: AtomicUsize::new(0),
        })
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(DomainError::DatabaseError("database is locked".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BlockStore for FlakyStore {
    async fn is_blocked(&self, domain: &str) -> Result<bool, DomainError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.is_blocked(domain).await
    }

    async fn is_whitelisted(&self, domain: &str) -> Result<bool, DomainError> {
        self.check()?;
        self.inner.is_whitelisted(domain).await
    }

    fn stream_domains(&self) -> BoxStream<'_, Result<String, DomainError>> {
        match self.check() {
            Ok(()) => self.inner.stream_domains(),
            Err(e) => stream::iter(vec![Err(e)]).boxed(),
        }
    }

    async fn count_domains(&self) -> Result<u64, DomainError> {
        self.check()?;
        self.inner.count_domains().await
    }

    async fn insert_chunk(&self, chunk: &[BlockedDomain]) -> Result<u64, DomainError> {
        self.check()?;
        self.inner.insert_chunk(chunk).await
    }

    async fn clear_domains(&self) -> Result<u64, DomainError> {
        self.check()?;
        self.inner.clear_domains().await
    }

    async fn list_whitelist(&self) -> Result<Vec<String>, DomainError> {
        self.check()?;
        self.inner.list_whitelist().await
    }

    async fn add_whitelist(&self, domain: &str) -> Result<bool, DomainError> {
        self.check()?;
        self.inner.add_whitelist(domain).await
    }

    async fn remove_whitelist(&self, domain: &str) -> Result<bool, DomainError> {
        self.check()?;
        self.inner.remove_whitelist(domain).await
    }
}

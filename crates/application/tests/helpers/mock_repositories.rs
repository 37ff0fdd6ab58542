#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_shield_application::ports::{
    BlockStore, BlocklistFetcher, BlocklistSourceRepository, FilterReloader, QueryLogRepository,
    ServiceStateRepository,
};
use ferrous_shield_domain::{BlockedDomain, BlocklistSource, DomainError, QueryLog, QueryStats};
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock BlockStore
// ============================================================================

#[derive(Clone, Default)]
pub struct MockBlockStore {
    domains: Arc<Mutex<BTreeMap<String, BlockedDomain>>>,
    whitelist: Arc<Mutex<BTreeSet<String>>>,
    chunk_sizes: Arc<Mutex<Vec<usize>>>,
}

impl MockBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domains(domains: &[&str]) -> Self {
        let store = Self::new();
        {
            let mut map = store.domains.lock().unwrap();
            for d in domains {
                map.insert(d.to_string(), BlockedDomain::classified(d));
            }
        }
        store
    }

    pub fn domain(&self, domain: &str) -> Option<BlockedDomain> {
        self.domains.lock().unwrap().get(domain).cloned()
    }

    pub fn chunk_sizes(&self) -> Vec<usize> {
        self.chunk_sizes.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlockStore for MockBlockStore {
    async fn is_blocked(&self, domain: &str) -> Result<bool, DomainError> {
        Ok(self.domains.lock().unwrap().contains_key(domain))
    }

    async fn is_whitelisted(&self, domain: &str) -> Result<bool, DomainError> {
        Ok(self.whitelist.lock().unwrap().contains(domain))
    }

    fn stream_domains(&self) -> BoxStream<'_, Result<String, DomainError>> {
        let all: Vec<String> = self.domains.lock().unwrap().keys().cloned().collect();
        stream::iter(all.into_iter().map(Ok)).boxed()
    }

    async fn count_domains(&self) -> Result<u64, DomainError> {
        Ok(self.domains.lock().unwrap().len() as u64)
    }

    async fn insert_chunk(&self, chunk: &[BlockedDomain]) -> Result<u64, DomainError> {
        self.chunk_sizes.lock().unwrap().push(chunk.len());
        let mut map = self.domains.lock().unwrap();
        let mut inserted = 0;
        for record in chunk {
            if !map.contains_key(&*record.domain) {
                map.insert(record.domain.to_string(), record.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn clear_domains(&self) -> Result<u64, DomainError> {
        let mut map = self.domains.lock().unwrap();
        let removed = map.len() as u64;
        map.clear();
        Ok(removed)
    }

    async fn list_whitelist(&self) -> Result<Vec<String>, DomainError> {
        Ok(self.whitelist.lock().unwrap().iter().cloned().collect())
    }

    async fn add_whitelist(&self, domain: &str) -> Result<bool, DomainError> {
        Ok(self.whitelist.lock().unwrap().insert(domain.to_string()))
    }

    async fn remove_whitelist(&self, domain: &str) -> Result<bool, DomainError> {
        Ok(self.whitelist.lock().unwrap().remove(domain))
    }
}

// ============================================================================
// Mock ServiceStateRepository
// ============================================================================

#[derive(Clone, Default)]
pub struct MockStateRepository {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MockStateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ServiceStateRepository for MockStateRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// Mock FilterReloader
// ============================================================================

#[derive(Clone, Default)]
pub struct MockReloader {
    calls: Arc<AtomicUsize>,
}

impl MockReloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FilterReloader for MockReloader {
    async fn reload(&self) -> Result<(), DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Mock BlocklistSourceRepository
// ============================================================================

#[derive(Clone, Default)]
pub struct MockSourceRepository {
    urls: Arc<Mutex<Vec<String>>>,
}

impl MockSourceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_urls(urls: &[&str]) -> Self {
        let repo = Self::new();
        repo.urls
            .lock()
            .unwrap()
            .extend(urls.iter().map(|u| u.to_string()));
        repo
    }
}

#[async_trait]
impl BlocklistSourceRepository for MockSourceRepository {
    async fn add(&self, url: &str) -> Result<bool, DomainError> {
        let mut urls = self.urls.lock().unwrap();
        if urls.iter().any(|u| u == url) {
            return Ok(false);
        }
        urls.push(url.to_string());
        Ok(true)
    }

    async fn remove(&self, url: &str) -> Result<bool, DomainError> {
        let mut urls = self.urls.lock().unwrap();
        let before = urls.len();
        urls.retain(|u| u != url);
        Ok(urls.len() != before)
    }

    async fn list(&self) -> Result<Vec<BlocklistSource>, DomainError> {
        let urls = self.urls.lock().unwrap();
        Ok(urls
            .iter()
            .enumerate()
            .map(|(i, u)| BlocklistSource::new(i as i64 + 1, u, None))
            .collect())
    }
}

// ============================================================================
// Mock BlocklistFetcher
// ============================================================================

/// Serves canned bodies by URL; any other URL fails like an HTTP 404.
#[derive(Clone, Default)]
pub struct MockFetcher {
    bodies: Arc<Mutex<HashMap<String, String>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(self, url: &str, body: &str) -> Self {
        self.bodies
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlocklistFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, DomainError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.bodies
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| DomainError::FetchError(format!("HTTP 404 for {url}")))
    }
}

// ============================================================================
// Mock QueryLogRepository
// ============================================================================

#[derive(Clone, Default)]
pub struct MockQueryLogRepository {
    entries: Arc<Mutex<Vec<QueryLog>>>,
}

impl MockQueryLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QueryLogRepository for MockQueryLogRepository {
    async fn log_query(&self, query: &QueryLog) -> Result<(), DomainError> {
        self.entries.lock().unwrap().push(query.clone());
        Ok(())
    }

    async fn get_recent(&self, limit: u32) -> Result<Vec<QueryLog>, DomainError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.iter().rev().take(limit as usize).cloned().collect())
    }

    async fn get_stats(&self) -> Result<QueryStats, DomainError> {
        let entries = self.entries.lock().unwrap();
        Ok(QueryStats {
            total: entries.len() as u64,
            blocked: entries.iter().filter(|e| e.blocked).count() as u64,
        })
    }

    async fn clear(&self) -> Result<u64, DomainError> {
        let mut entries = self.entries.lock().unwrap();
        let removed = entries.len() as u64;
        entries.clear();
        Ok(removed)
    }
}

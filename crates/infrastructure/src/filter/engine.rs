use super::bloom::BloomSnapshot;
use super::breaker::StoreBreaker;
use super::decision_cache::DecisionCache;
use super::whitelist::Whitelist;
use arc_swap::ArcSwapOption;
use ferrous_shield_application::ports::BlockStore;
use ferrous_shield_domain::{BlockingConfig, DomainError, Verdict, VerdictSource};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Outcome of the in-memory tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FastPath {
    /// Bloom, cache or whitelist settled the query.
    Decided(Verdict),
    /// Only the exact store can decide. `generation` is the cache generation
    /// observed before the lookup and must be handed back to `verify`.
    Verify { generation: u64 },
}

/// The decision cascade.
///
/// Tier order is fixed: bloom → decision cache → whitelist → store. The first
/// three tiers are in memory and safe to call from the blocking tunnel
/// thread (`check_fast`); the store tier is async (`verify`).
///
/// Domains must already be normalised (lowercase, no trailing dot).
pub struct FilterEngine {
    /// Current pre-filter. `None` until the first build or load; every query
    /// then falls through to the exact tiers.
    bloom: ArcSwapOption<BloomSnapshot>,

    cache: DecisionCache,

    whitelist: Whitelist,

    store: Arc<dyn BlockStore>,

    breaker: StoreBreaker,

    store_timeout: Duration,
}

impl FilterEngine {
    pub fn new(store: Arc<dyn BlockStore>, config: &BlockingConfig) -> Self {
        Self {
            bloom: ArcSwapOption::empty(),
            cache: DecisionCache::new(config.cache_capacity),
            whitelist: Whitelist::new(),
            store,
            breaker: StoreBreaker::new(config.breaker_cooldown()),
            store_timeout: config.store_timeout(),
        }
    }

    /// Tiers 1–3. Never blocks on I/O.
    pub fn check_fast(&self, domain: &str) -> FastPath {
        if let Some(bloom) = self.bloom.load().as_deref() {
            if !bloom.might_contain(domain) {
                return FastPath::Decided(Verdict::allow(domain, VerdictSource::Bloom));
            }
        }

        let generation = self.cache.generation();

        if let Some(blocked) = self.cache.get(domain) {
            return FastPath::Decided(Verdict {
                domain: Arc::from(domain),
                blocked,
                source: VerdictSource::Cache,
            });
        }

        if self.whitelist.contains(domain) {
            self.cache.insert(domain, false, generation);
            return FastPath::Decided(Verdict::allow(domain, VerdictSource::Whitelist));
        }

        FastPath::Verify { generation }
    }

    /// Tier 4: exact store lookup, bounded by the store timeout.
    ///
    /// A store failure or timeout blocks the query (fail-closed) without
    /// caching, and opens the breaker so the next queries skip the store
    /// until the cooldown passes.
    pub async fn verify(&self, domain: &str, generation: u64) -> Verdict {
        if !self.breaker.allow_request() {
            debug!(domain = %domain, "Store breaker open, failing closed");
            return Verdict::block(domain, VerdictSource::Breaker);
        }

        match tokio::time::timeout(self.store_timeout, self.exact_lookup(domain)).await {
            Ok(Ok(verdict)) => {
                self.breaker.record_success();
                self.cache.insert(domain, verdict.blocked, generation);
                verdict
            }
            Ok(Err(e)) => {
                warn!(domain = %domain, error = %e, "Store lookup failed, failing closed");
                self.breaker.record_failure();
                Verdict::block(domain, VerdictSource::Breaker)
            }
            Err(_) => {
                warn!(
                    domain = %domain,
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "Store lookup timed out, failing closed"
                );
                self.breaker.record_failure();
                Verdict::block(domain, VerdictSource::Breaker)
            }
        }
    }

    /// A store hit is confirmed against the whitelist table, which may hold
    /// entries newer than the in-memory snapshot.
    async fn exact_lookup(&self, domain: &str) -> Result<Verdict, DomainError> {
        if !self.store.is_blocked(domain).await? {
            return Ok(Verdict::allow(domain, VerdictSource::Store));
        }
        if self.store.is_whitelisted(domain).await? {
            return Ok(Verdict::allow(domain, VerdictSource::Whitelist));
        }
        Ok(Verdict::block(domain, VerdictSource::Store))
    }

    /// Full cascade.
    pub async fn check(&self, domain: &str) -> Verdict {
        match self.check_fast(domain) {
            FastPath::Decided(verdict) => verdict,
            FastPath::Verify { generation } => self.verify(domain, generation).await,
        }
    }

    /// Swaps in a new pre-filter. Readers holding the old one finish with it.
    pub fn install_bloom(&self, snapshot: Arc<BloomSnapshot>) {
        self.bloom.store(Some(snapshot));
    }

    pub fn bloom(&self) -> Option<Arc<BloomSnapshot>> {
        self.bloom.load_full()
    }

    pub fn replace_whitelist<I, S>(&self, domains: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.whitelist.replace(domains)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cached_decisions(&self) -> usize {
        self.cache.len()
    }

    pub fn breaker_open(&self) -> bool {
        self.breaker.is_open()
    }
}

use compact_str::CompactString;
use lru::LruCache;
use rustc_hash::FxBuildHasher;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

type DecisionLru = LruCache<CompactString, bool, FxBuildHasher>;

/// Bounded LRU of `domain → blocked` verdicts.
///
/// Every `clear` bumps a generation counter. Writers pass the generation
/// they observed before their lookup started; a write whose generation is
/// stale is discarded, so a verdict computed before a reload can never land
/// in the cache after it.
pub struct DecisionCache {
    inner: Mutex<DecisionLru>,
    generation: AtomicU64,
}

impl DecisionCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::with_hasher(capacity, FxBuildHasher)),
            generation: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DecisionLru> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Returns the cached verdict (true = blocked) and marks it recently used.
    #[inline]
    pub fn get(&self, domain: &str) -> Option<bool> {
        self.lock().get(domain).copied()
    }

    /// Stores a verdict unless the cache was cleared since `generation`.
    pub fn insert(&self, domain: &str, blocked: bool, generation: u64) -> bool {
        let mut cache = self.lock();
        if self.generation.load(Ordering::Acquire) != generation {
            return false;
        }
        cache.put(CompactString::new(domain), blocked);
        true
    }

    /// Drops every verdict and invalidates lookups already in flight.
    pub fn clear(&self) {
        let mut cache = self.lock();
        self.generation.fetch_add(1, Ordering::AcqRel);
        cache.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Decision cascade and bloom filter configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlockingConfig {
    /// Capacity of the LRU decision cache (default: 2000)
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Where the built bloom filter is persisted between runs
    #[serde(default = "default_bloom_snapshot_path")]
    pub bloom_snapshot_path: String,

    /// Lower bound on the filter's expected insertions (default: 50000)
    #[serde(default = "default_bloom_min_items")]
    pub bloom_min_items: usize,

    /// Target false-positive rate of the filter (default: 0.01)
    #[serde(default = "default_bloom_fp_rate")]
    pub bloom_fp_rate: f64,

    /// Budget for one exact store lookup before it counts as a failure
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// How long store lookups are skipped after a failure (default: 30 s)
    #[serde(default = "default_breaker_cooldown_secs")]
    pub breaker_cooldown_secs: u64,

    /// Domains to allow even if present in the store, merged with the
    /// whitelist table
    #[serde(default)]
    pub whitelist: Vec<String>,

    /// Per-URL budget when downloading blocklist sources (default: 30 s)
    #[serde(default = "default_source_fetch_timeout_secs")]
    pub source_fetch_timeout_secs: u64,
}

impl Default for BlockingConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            bloom_snapshot_path: default_bloom_snapshot_path(),
            bloom_min_items: default_bloom_min_items(),
            bloom_fp_rate: default_bloom_fp_rate(),
            store_timeout_ms: default_store_timeout_ms(),
            breaker_cooldown_secs: default_breaker_cooldown_secs(),
            whitelist: vec![],
            source_fetch_timeout_secs: default_source_fetch_timeout_secs(),
        }
    }
}

impl BlockingConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn breaker_cooldown(&self) -> Duration {
        Duration::from_secs(self.breaker_cooldown_secs)
    }

    pub fn source_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.source_fetch_timeout_secs)
    }
}

fn default_cache_capacity() -> usize {
    2000
}

fn default_bloom_snapshot_path() -> String {
    "./bloom.bin".to_string()
}

fn default_bloom_min_items() -> usize {
    50_000
}

fn default_bloom_fp_rate() -> f64 {
    0.01
}

fn default_store_timeout_ms() -> u64 {
    500
}

fn default_breaker_cooldown_secs() -> u64 {
    30
}

fn default_source_fetch_timeout_secs() -> u64 {
    30
}

use super::bloom::BloomSnapshot;
use super::engine::FilterEngine;
use async_trait::async_trait;
use ferrous_shield_application::ports::{BlockStore, FilterReloader};
use ferrous_shield_domain::{BlockingConfig, DomainError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Builds, persists and installs the bloom pre-filter, and performs reloads.
///
/// Builds are serialised; while one runs the engine keeps serving the
/// previously installed filter. A failed build leaves that filter in place.
pub struct BloomLifecycle {
    engine: Arc<FilterEngine>,
    store: Arc<dyn BlockStore>,
    snapshot_path: PathBuf,
    min_items: usize,
    fp_rate: f64,
    /// Always-allowed domains from the config file, merged with the table.
    configured_whitelist: Vec<String>,
    build_lock: Mutex<()>,
}

impl BloomLifecycle {
    pub fn new(
        engine: Arc<FilterEngine>,
        store: Arc<dyn BlockStore>,
        config: &BlockingConfig,
    ) -> Self {
        let configured_whitelist = config
            .whitelist
            .iter()
            .map(|d| d.trim().trim_end_matches('.').to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();

        Self {
            engine,
            store,
            snapshot_path: PathBuf::from(&config.bloom_snapshot_path),
            min_items: config.bloom_min_items,
            fp_rate: config.bloom_fp_rate,
            configured_whitelist,
            build_lock: Mutex::new(()),
        }
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Startup: load the whitelist, then install the persisted filter or
    /// build one from the store.
    pub async fn start(&self) -> Result<(), DomainError> {
        self.refresh_whitelist().await?;
        self.load_or_build(false).await?;
        Ok(())
    }

    /// Replaces the in-memory whitelist with the table plus configured entries.
    pub async fn refresh_whitelist(&self) -> Result<usize, DomainError> {
        let stored = self.store.list_whitelist().await?;
        let count = self
            .engine
            .replace_whitelist(stored.iter().chain(self.configured_whitelist.iter()));
        info!(entries = count, "Whitelist loaded");
        Ok(count)
    }

    /// Installs a filter. Unless `force` is set a readable persisted snapshot
    /// is used as-is; otherwise the filter is rebuilt from the store and
    /// persisted.
    pub async fn load_or_build(&self, force: bool) -> Result<Arc<BloomSnapshot>, DomainError> {
        let _guard = self.build_lock.lock().await;

        if !force {
            match self.load_snapshot().await {
                Ok(Some(snapshot)) => {
                    info!(
                        path = %self.snapshot_path.display(),
                        items = snapshot.items(),
                        "Bloom snapshot loaded"
                    );
                    let snapshot = Arc::new(snapshot);
                    self.engine.install_bloom(Arc::clone(&snapshot));
                    return Ok(snapshot);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        path = %self.snapshot_path.display(),
                        error = %e,
                        "Bloom snapshot unreadable, rebuilding"
                    );
                }
            }
        }

        let started = Instant::now();
        let snapshot =
            BloomSnapshot::build_from_store(self.store.as_ref(), self.min_items, self.fp_rate)
                .await
                .map_err(|e| {
                    error!(error = %e, "Bloom rebuild failed, keeping current filter");
                    e
                })?;

        if let Err(e) = self.persist_snapshot(&snapshot).await {
            warn!(
                path = %self.snapshot_path.display(),
                error = %e,
                "Failed to persist bloom snapshot"
            );
        }

        let items = snapshot.items();
        let snapshot = Arc::new(snapshot);
        self.engine.install_bloom(Arc::clone(&snapshot));

        info!(
            items,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Bloom filter rebuilt"
        );
        Ok(snapshot)
    }

    async fn load_snapshot(&self) -> Result<Option<BloomSnapshot>, DomainError> {
        let bytes = match tokio::fs::read(&self.snapshot_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        BloomSnapshot::from_bytes(&bytes).map(Some)
    }

    /// Writes next to the target and renames, so readers never see a
    /// partial file.
    async fn persist_snapshot(&self, snapshot: &BloomSnapshot) -> Result<(), DomainError> {
        let mut tmp = OsString::from(self.snapshot_path.as_os_str());
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, snapshot.to_bytes()).await?;
        tokio::fs::rename(&tmp, &self.snapshot_path).await?;
        Ok(())
    }
}

#[async_trait]
impl FilterReloader for BloomLifecycle {
    async fn reload(&self) -> Result<(), DomainError> {
        info!("Filter reload started");

        self.refresh_whitelist().await?;
        self.engine.clear_cache();
        self.load_or_build(true).await?;

        info!("Filter reload completed");
        Ok(())
    }
}

use ferrous_shield_application::ports::{
    BlockStore, BlocklistFetcher, BlocklistSourceRepository, FilterReloader, QueryLogRepository,
    ServiceStateRepository,
};
use ferrous_shield_application::use_cases::{
    ClearQueryLogUseCase, GetRecentQueriesUseCase, GetShieldStatsUseCase, ImportBlocklistUseCase,
    ManageBlocklistSourcesUseCase, ManageWhitelistUseCase, SyncBlocklistSourcesUseCase,
};
use ferrous_shield_domain::BlockingConfig;
use ferrous_shield_infrastructure::filter::{BloomLifecycle, FilterEngine};
use ferrous_shield_infrastructure::repositories::{
    SqliteBlockStore, SqliteBlocklistSourceRepository, SqliteQueryLogRepository,
    SqliteServiceStateRepository,
};
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct Repositories {
    pub block_store: Arc<dyn BlockStore>,
    pub query_log: Arc<dyn QueryLogRepository>,
    pub service_state: Arc<dyn ServiceStateRepository>,
    pub blocklist_sources: Arc<dyn BlocklistSourceRepository>,
}

impl Repositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            block_store: Arc::new(SqliteBlockStore::new(pool.clone())),
            query_log: Arc::new(SqliteQueryLogRepository::new(pool.clone())),
            service_state: Arc::new(SqliteServiceStateRepository::new(pool.clone())),
            blocklist_sources: Arc::new(SqliteBlocklistSourceRepository::new(pool)),
        }
    }
}

/// The decision engine and the lifecycle that feeds it its bloom filter.
pub struct FilterServices {
    pub engine: Arc<FilterEngine>,
    pub lifecycle: Arc<BloomLifecycle>,
}

impl FilterServices {
    pub fn new(repos: &Repositories, config: &BlockingConfig) -> Self {
        let engine = Arc::new(FilterEngine::new(Arc::clone(&repos.block_store), config));
        let lifecycle = Arc::new(BloomLifecycle::new(
            Arc::clone(&engine),
            Arc::clone(&repos.block_store),
            config,
        ));
        Self { engine, lifecycle }
    }

    pub fn reloader(&self) -> Arc<dyn FilterReloader> {
        self.lifecycle.clone()
    }
}

pub struct UseCases {
    pub import_blocklist: Arc<ImportBlocklistUseCase>,
    pub sources: ManageBlocklistSourcesUseCase,
    pub sync_sources: SyncBlocklistSourcesUseCase,
    pub whitelist: ManageWhitelistUseCase,
    pub stats: GetShieldStatsUseCase,
    pub recent_queries: GetRecentQueriesUseCase,
    pub clear_query_log: ClearQueryLogUseCase,
}

impl UseCases {
    pub fn new(
        repos: &Repositories,
        filter: &FilterServices,
        fetcher: Arc<dyn BlocklistFetcher>,
    ) -> Self {
        let import_blocklist = Arc::new(ImportBlocklistUseCase::new(
            Arc::clone(&repos.block_store),
            Arc::clone(&repos.service_state),
            filter.reloader(),
        ));
        Self {
            sources: ManageBlocklistSourcesUseCase::new(Arc::clone(&repos.blocklist_sources)),
            sync_sources: SyncBlocklistSourcesUseCase::new(
                Arc::clone(&repos.blocklist_sources),
                fetcher,
                Arc::clone(&import_blocklist),
            ),
            import_blocklist,
            whitelist: ManageWhitelistUseCase::new(Arc::clone(&repos.block_store)),
            stats: GetShieldStatsUseCase::new(
                Arc::clone(&repos.block_store),
                Arc::clone(&repos.query_log),
                Arc::clone(&repos.service_state),
            ),
            recent_queries: GetRecentQueriesUseCase::new(Arc::clone(&repos.query_log)),
            clear_query_log: ClearQueryLogUseCase::new(Arc::clone(&repos.query_log)),
        }
    }
}

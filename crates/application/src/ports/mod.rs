mod block_store;
mod blocklist_fetcher;
mod blocklist_source_repository;
mod filter_reloader;
mod query_log_repository;
mod service_state_repository;
mod tunnel_device;

pub use block_store::BlockStore;
pub use blocklist_fetcher::BlocklistFetcher;
pub use blocklist_source_repository::BlocklistSourceRepository;
pub use filter_reloader::FilterReloader;
pub use query_log_repository::QueryLogRepository;
pub use service_state_repository::{
    ServiceStateRepository, BLOCKED_COUNT_KEY, LAST_IMPORT_HASH_KEY,
};
pub use tunnel_device::TunnelDevice;

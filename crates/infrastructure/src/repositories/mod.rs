pub mod block_store;
pub mod blocklist_source_repository;
pub mod query_log_repository;
pub mod service_state_repository;

pub use block_store::SqliteBlockStore;
pub use blocklist_source_repository::SqliteBlocklistSourceRepository;
pub use query_log_repository::SqliteQueryLogRepository;
pub use service_state_repository::SqliteServiceStateRepository;

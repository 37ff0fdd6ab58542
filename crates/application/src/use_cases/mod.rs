pub mod blocklist;
pub mod queries;
pub mod sources;
pub mod stats;
pub mod whitelist;

pub use blocklist::{ImportBlocklistUseCase, ImportOutcome};
pub use queries::{ClearQueryLogUseCase, GetRecentQueriesUseCase};
pub use sources::{ManageBlocklistSourcesUseCase, SyncBlocklistSourcesUseCase, SyncOutcome};
pub use stats::{GetShieldStatsUseCase, ShieldSummary};
pub use whitelist::ManageWhitelistUseCase;

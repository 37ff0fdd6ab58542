mod get_stats;

pub use get_stats::{GetShieldStatsUseCase, ShieldSummary};

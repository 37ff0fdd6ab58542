//! The decision cascade: bloom → decision cache → whitelist → store.

pub mod bloom;
pub mod breaker;
pub mod decision_cache;
pub mod engine;
pub mod lifecycle;
pub mod whitelist;

pub use bloom::BloomSnapshot;
pub use breaker::StoreBreaker;
pub use decision_cache::DecisionCache;
pub use engine::{FastPath, FilterEngine};
pub use lifecycle::BloomLifecycle;
pub use whitelist::Whitelist;

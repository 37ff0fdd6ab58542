mod manage;
mod sync;

pub use manage::ManageBlocklistSourcesUseCase;
pub use sync::{SyncBlocklistSourcesUseCase, SyncOutcome};

mod clear;
mod get_recent;

pub use clear::ClearQueryLogUseCase;
pub use get_recent::GetRecentQueriesUseCase;

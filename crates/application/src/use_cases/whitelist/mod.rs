mod manage;

pub use manage::ManageWhitelistUseCase;

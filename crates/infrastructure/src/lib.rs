pub mod database;
pub mod filter;
pub mod forwarding;
pub mod packet;
pub mod repositories;
pub mod sources;
pub mod tunnel;

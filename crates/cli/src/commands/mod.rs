pub mod import;
pub mod queries;
pub mod run;
pub mod signals;
pub mod sources;
pub mod stats;
pub mod whitelist;

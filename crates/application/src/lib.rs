//! Ferrous Shield Application Layer
//!
//! Ports implemented by the infrastructure crate and the use cases driven by
//! the CLI.
pub mod ports;
pub mod use_cases;

#![allow(dead_code)]
pub mod dns_server_mock;
pub mod frames;
pub mod http_server_mock;
pub mod memory_tunnel;
pub mod stores;

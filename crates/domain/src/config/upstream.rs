use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Upstream resolver and forwarding pool settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Resolver that receives allowed queries (default: 8.8.8.8:53)
    #[serde(default = "default_address")]
    pub address: SocketAddr,

    /// Reply timeout per forwarded query (default: 2000 ms)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum concurrent upstream exchanges (default: 10)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// `SO_MARK` applied to every forwarding socket so policy routing keeps
    /// it out of the tunnel (default: 0x5348). 0 disables marking, which is
    /// only valid together with `bind_interface`.
    #[serde(default = "default_routing_mark")]
    pub routing_mark: u32,

    /// Physical interface forwarding sockets are bound to (`SO_BINDTODEVICE`)
    #[serde(default)]
    pub bind_interface: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            timeout_ms: default_timeout_ms(),
            workers: default_workers(),
            routing_mark: default_routing_mark(),
            bind_interface: None,
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// True when forwarding sockets carry a mark or are pinned to an
    /// interface, so forwarded queries cannot re-enter the tunnel.
    pub fn is_tunnel_exempt(&self) -> bool {
        self.routing_mark != 0 || self.bind_interface.is_some()
    }
}

fn default_address() -> SocketAddr {
    SocketAddr::from(([8, 8, 8, 8], 53))
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_workers() -> usize {
    10
}

/// "SH" in ASCII. Matches `ip rule add fwmark 0x5348 lookup main`.
pub const DEFAULT_ROUTING_MARK: u32 = 0x5348;

fn default_routing_mark() -> u32 {
    DEFAULT_ROUTING_MARK
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Capturing tunnel device settings.
///
/// Address assignment and routing of the device are done by the host; the
/// service only opens the named interface and reads datagrams from it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TunnelConfig {
    /// TUN interface name (default: "shield0")
    #[serde(default = "default_name")]
    pub name: String,

    /// Size of the read buffer in bytes (default: 16384)
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,

    /// How long a blocking read waits before re-checking the running flag
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            read_buffer_size: default_read_buffer_size(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl TunnelConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn default_name() -> String {
    "shield0".to_string()
}

fn default_read_buffer_size() -> usize {
    16 * 1024
}

fn default_poll_interval_ms() -> u64 {
    500
}

use crate::packet::build_udp_datagram;
use ferrous_shield_application::ports::TunnelDevice;
use ferrous_shield_domain::{DnsFlow, DomainError};
use std::sync::{Arc, Mutex, PoisonError};

/// Writes DNS answers back into the tunnel as IPv4/UDP datagrams.
///
/// Lookup tasks, forwarding tasks and the tunnel thread all write through
/// one instance; each datagram is written whole under the mutex.
pub struct ResponseWriter {
    device: Arc<dyn TunnelDevice>,
    write_lock: Mutex<()>,
}

impl ResponseWriter {
    pub fn new(device: Arc<dyn TunnelDevice>) -> Self {
        Self {
            device,
            write_lock: Mutex::new(()),
        }
    }

    /// Sends `message` to the client of `flow`, from the resolver it queried.
    pub fn write_reply(&self, flow: &DnsFlow, message: &[u8]) -> Result<(), DomainError> {
        let datagram = build_udp_datagram(flow.resolver, flow.client, message)
            .map_err(|e| DomainError::MalformedPacket(e.to_string()))?;

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.device.write_frame(&datagram)
    }
}

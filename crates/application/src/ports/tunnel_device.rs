use ferrous_shield_domain::DomainError;

/// Duplex, datagram-oriented virtual network interface.
///
/// Both methods block the calling thread. Reads only happen on the dedicated
/// tunnel thread; writes are serialised by the response writer.
pub trait TunnelDevice: Send + Sync {
    /// Reads one complete IP datagram into `buf`.
    ///
    /// Returns `Ok(None)` when no datagram arrived within the device's poll
    /// interval, so the caller can re-check its running flag.
    fn read_frame(&self, buf: &mut [u8]) -> Result<Option<usize>, DomainError>;

    /// Writes one complete IP datagram.
    fn write_frame(&self, frame: &[u8]) -> Result<(), DomainError>;
}

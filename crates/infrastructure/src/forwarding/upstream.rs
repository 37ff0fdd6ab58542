use ferrous_shield_domain::{DomainError, UpstreamConfig};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};
use tracing::debug;

/// Pending exchanges allowed per worker before new queries are dropped.
pub const QUEUE_DEPTH_PER_WORKER: usize = 64;

/// Largest reply accepted from the upstream.
const MAX_REPLY_SIZE: usize = 4096;

/// Slot in the bounded forwarding queue. Held for the lifetime of one
/// exchange, queued or running.
pub struct ForwardTicket {
    _permit: OwnedSemaphorePermit,
}

/// Relays allowed queries to the configured upstream resolver.
///
/// At most `workers` exchanges run at once; up to
/// `workers × QUEUE_DEPTH_PER_WORKER` may be pending in total. Each exchange
/// uses its own socket, exempted from the tunnel by routing mark and/or
/// interface binding so the query does not loop back into it. A socket that
/// cannot be exempted is never used.
pub struct UpstreamForwarder {
    upstream: SocketAddr,
    timeout: Duration,
    routing_mark: u32,
    bind_interface: Option<String>,
    workers: Arc<Semaphore>,
    queue: Arc<Semaphore>,
}

impl UpstreamForwarder {
    pub fn new(config: &UpstreamConfig) -> Self {
        let workers = config.workers.max(1);
        Self {
            upstream: config.address,
            timeout: config.timeout(),
            routing_mark: config.routing_mark,
            bind_interface: config.bind_interface.clone(),
            workers: Arc::new(Semaphore::new(workers)),
            queue: Arc::new(Semaphore::new(workers * QUEUE_DEPTH_PER_WORKER)),
        }
    }

    pub fn upstream(&self) -> SocketAddr {
        self.upstream
    }

    /// Reserves a queue slot, or `None` when the queue is full.
    pub fn try_enqueue(&self) -> Option<ForwardTicket> {
        match Arc::clone(&self.queue).try_acquire_owned() {
            Ok(permit) => Some(ForwardTicket { _permit: permit }),
            Err(TryAcquireError::NoPermits) | Err(TryAcquireError::Closed) => None,
        }
    }

    /// Waits for a worker slot, then performs one exchange. The timeout
    /// covers the exchange only, not the wait.
    pub async fn forward(&self, query: &[u8]) -> Result<Vec<u8>, DomainError> {
        let _worker = self
            .workers
            .acquire()
            .await
            .map_err(|e| DomainError::IoError(e.to_string()))?;

        match tokio::time::timeout(self.timeout, self.exchange(query)).await {
            Ok(result) => result.map_err(DomainError::from),
            Err(_) => Err(DomainError::QueryTimeout),
        }
    }

    async fn exchange(&self, query: &[u8]) -> io::Result<Vec<u8>> {
        let socket = self.bind_socket()?;
        socket.connect(self.upstream).await?;
        socket.send(query).await?;

        let mut buf = vec![0u8; MAX_REPLY_SIZE];
        let len = socket.recv(&mut buf).await?;
        buf.truncate(len);

        debug!(upstream = %self.upstream, bytes = len, "Upstream reply received");
        Ok(buf)
    }

    /// Opens one forwarding socket and drops it, so a missing capability
    /// (`CAP_NET_ADMIN` for `SO_MARK`) or a bad interface name surfaces at
    /// startup instead of on every query.
    pub fn check_exemption(&self) -> Result<(), DomainError> {
        self.bind_socket().map(drop).map_err(|e| {
            DomainError::IoError(format!(
                "cannot exempt forwarding socket from the tunnel \
                 (routing_mark={:#x}, bind_interface={:?}): {e}",
                self.routing_mark, self.bind_interface
            ))
        })
    }

    fn bind_socket(&self) -> io::Result<UdpSocket> {
        let (domain, local): (Domain, SocketAddr) = match self.upstream {
            SocketAddr::V4(_) => (Domain::IPV4, (Ipv4Addr::UNSPECIFIED, 0).into()),
            SocketAddr::V6(_) => (Domain::IPV6, (Ipv6Addr::UNSPECIFIED, 0).into()),
        };

        let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
        self.exempt(&socket)?;
        socket.set_nonblocking(true)?;
        socket.bind(&local.into())?;

        UdpSocket::from_std(socket.into())
    }

    #[cfg(target_os = "linux")]
    fn exempt(&self, socket: &Socket) -> io::Result<()> {
        if let Some(ref interface) = self.bind_interface {
            socket.bind_device(Some(interface.as_bytes()))?;
        }
        if self.routing_mark != 0 {
            socket.set_mark(self.routing_mark)?;
        }
        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    fn exempt(&self, _socket: &Socket) -> io::Result<()> {
        if self.routing_mark != 0 || self.bind_interface.is_some() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "routing marks and interface binding require Linux",
            ));
        }
        Ok(())
    }
}

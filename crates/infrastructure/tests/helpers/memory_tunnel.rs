use ferrous_shield_application::ports::TunnelDevice;
use ferrous_shield_domain::DomainError;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const IDLE_POLL: Duration = Duration::from_millis(5);

/// In-memory tunnel: frames pushed by the test are read by the loop, and
/// every written datagram is captured.
#[derive(Default)]
pub struct MemoryTunnel {
    inbound: Mutex<VecDeque<Vec<u8>>>,
    outbound: Mutex<Vec<Vec<u8>>>,
    broken: AtomicBool,
}

impl MemoryTunnel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_frame(&self, frame: Vec<u8>) {
        self.inbound.lock().unwrap().push_back(frame);
    }

    /// Makes every following read fail as if the device vanished.
    pub fn break_device(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    pub fn written(&self) -> Vec<Vec<u8>> {
        self.outbound.lock().unwrap().clone()
    }

    /// Polls until at least `count` datagrams were written or `timeout`
    /// passes, then returns whatever was written.
    pub async fn wait_for_writes(&self, count: usize, timeout: Duration) -> Vec<Vec<u8>> {
        let deadline = Instant::now() + timeout;
        loop {
            let written = self.written();
            if written.len() >= count || Instant::now() >= deadline {
                return written;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl TunnelDevice for MemoryTunnel {
    fn read_frame(&self, buf: &mut [u8]) -> Result<Option<usize>, DomainError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(DomainError::TunnelError("device removed".to_string()));
        }

        let next = self.inbound.lock().unwrap().pop_front();
        match next {
            Some(frame) => {
                let len = frame.len().min(buf.len());
                buf[..len].copy_from_slice(&frame[..len]);
                Ok(Some(len))
            }
            None => {
                std::thread::sleep(IDLE_POLL);
                Ok(None)
            }
        }
    }

    fn write_frame(&self, frame: &[u8]) -> Result<(), DomainError> {
        self.outbound.lock().unwrap().push(frame.to_vec());
        Ok(())
    }
}

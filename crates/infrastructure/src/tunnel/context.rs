use ferrous_shield_domain::ServiceStats;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;

/// Process-wide service state shared by the tunnel thread and runtime tasks.
pub struct ServiceContext {
    running: AtomicBool,
    shutdown: CancellationToken,

    frames: AtomicU64,
    dropped: AtomicU64,
    queries: AtomicU64,
    blocked: AtomicU64,
    allowed: AtomicU64,
    forwarded: AtomicU64,
    upstream_failures: AtomicU64,
}

impl ServiceContext {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
            shutdown: CancellationToken::new(),
            frames: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            queries: AtomicU64::new(0),
            blocked: AtomicU64::new(0),
            allowed: AtomicU64::new(0),
            forwarded: AtomicU64::new(0),
            upstream_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Clears the running flag and cancels every task holding the token.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
        self.shutdown.cancel();
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Seeds the blocked counter with the total persisted by a previous run.
    pub fn restore_blocked(&self, total: u64) {
        self.blocked.fetch_add(total, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_frame(&self) {
        self.frames.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_drop(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_verdict(&self, blocked: bool) {
        self.queries.fetch_add(1, Ordering::Relaxed);
        if blocked {
            self.blocked.fetch_add(1, Ordering::Relaxed);
        } else {
            self.allowed.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn record_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_upstream_failure(&self) {
        self.upstream_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            frames: self.frames.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            queries: self.queries.load(Ordering::Relaxed),
            blocked: self.blocked.load(Ordering::Relaxed),
            allowed: self.allowed.load(Ordering::Relaxed),
            forwarded: self.forwarded.load(Ordering::Relaxed),
            upstream_failures: self.upstream_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for ServiceContext {
    fn default() -> Self {
        Self::new()
    }
}

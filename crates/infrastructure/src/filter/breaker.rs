use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

const CLOSED: u64 = 0;

/// Time-bounded circuit breaker in front of the exact store lookup.
///
/// After a failure, lookups are refused until the cooldown passes. The first
/// caller after that is let through as a trial request and pushes the deadline out by
/// another cooldown, so concurrent callers keep failing fast until the trial
/// reports back. A trial that never reports only costs one more cooldown.
pub struct StoreBreaker {
    /// Millis since `epoch` until which lookups are refused; 0 when closed.
    open_until_ms: AtomicU64,
    cooldown: Duration,
    epoch: Instant,
}

impl StoreBreaker {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            open_until_ms: AtomicU64::new(CLOSED),
            cooldown,
            epoch: Instant::now(),
        }
    }

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn deadline(&self) -> u64 {
        // +1 keeps a zero-elapsed deadline distinct from CLOSED.
        self.now_ms() + self.cooldown.as_millis() as u64 + 1
    }

    /// Whether a store lookup may run now.
    pub fn allow_request(&self) -> bool {
        let until = self.open_until_ms.load(Ordering::Acquire);
        if until == CLOSED {
            return true;
        }
        if self.now_ms() < until {
            return false;
        }
        self.open_until_ms
            .compare_exchange(until, self.deadline(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn record_success(&self) {
        self.open_until_ms.store(CLOSED, Ordering::Release);
    }

    pub fn record_failure(&self) {
        self.open_until_ms.store(self.deadline(), Ordering::Release);
    }

    pub fn is_open(&self) -> bool {
        let until = self.open_until_ms.load(Ordering::Acquire);
        until != CLOSED && self.now_ms() < until
    }
}

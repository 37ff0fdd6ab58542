/// Point-in-time copy of the running service counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceStats {
    pub frames: u64,
    pub dropped: u64,
    pub queries: u64,
    pub blocked: u64,
    pub allowed: u64,
    pub forwarded: u64,
    pub upstream_failures: u64,
}

use std::fmt;
use std::sync::Arc;

/// Which tier of the decision cascade produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerdictSource {
    /// Bloom filter miss. Authoritative allow.
    Bloom,
    /// Memoized verdict from the decision cache.
    Cache,
    /// User whitelist. Always an allow.
    Whitelist,
    /// Exact lookup in the blocked-domain store.
    Store,
    /// Store unavailable; the query was blocked without an exact lookup.
    Breaker,
}

impl VerdictSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictSource::Bloom => "bloom",
            VerdictSource::Cache => "cache",
            VerdictSource::Whitelist => "whitelist",
            VerdictSource::Store => "store",
            VerdictSource::Breaker => "breaker",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "bloom" => Some(VerdictSource::Bloom),
            "cache" => Some(VerdictSource::Cache),
            "whitelist" => Some(VerdictSource::Whitelist),
            "store" => Some(VerdictSource::Store),
            "breaker" => Some(VerdictSource::Breaker),
            _ => None,
        }
    }
}

impl fmt::Display for VerdictSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the decision cascade for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub domain: Arc<str>,
    pub blocked: bool,
    pub source: VerdictSource,
}

impl Verdict {
    pub fn allow(domain: &str, source: VerdictSource) -> Self {
        Self {
            domain: Arc::from(domain),
            blocked: false,
            source,
        }
    }

    pub fn block(domain: &str, source: VerdictSource) -> Self {
        Self {
            domain: Arc::from(domain),
            blocked: true,
            source,
        }
    }
}

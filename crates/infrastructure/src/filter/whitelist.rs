use arc_swap::ArcSwap;
use compact_str::CompactString;
use rustc_hash::FxHashSet;
use std::sync::Arc;

type DomainSet = FxHashSet<CompactString>;

/// In-memory copy of the whitelist, replaced wholesale on reload so the
/// tunnel thread can test membership without touching the store.
pub struct Whitelist {
    domains: ArcSwap<DomainSet>,
}

impl Whitelist {
    pub fn new() -> Self {
        Self {
            domains: ArcSwap::from_pointee(DomainSet::default()),
        }
    }

    #[inline]
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.load().contains(domain)
    }

    /// Installs a new set and returns its size.
    pub fn replace<I, S>(&self, domains: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: DomainSet = domains
            .into_iter()
            .map(|d| CompactString::new(d.as_ref()))
            .collect();
        let len = set.len();
        self.domains.store(Arc::new(set));
        len
    }

    pub fn len(&self) -> usize {
        self.domains.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Whitelist {
    fn default() -> Self {
        Self::new()
    }
}

use bloomfilter::Bloom;
use ferrous_shield_application::ports::BlockStore;
use ferrous_shield_domain::DomainError;
use futures::TryStreamExt;
use std::fmt;

const SNAPSHOT_MAGIC: &[u8; 4] = b"FSBF";
const SNAPSHOT_VERSION: u8 = 1;
const SNAPSHOT_HEADER_LEN: usize = 4 + 1 + 8;

/// Immutable probabilistic set over every blocked domain at build time.
///
/// A negative answer is authoritative; a positive one only means the exact
/// store has to be consulted.
pub struct BloomSnapshot {
    bloom: Bloom<str>,
    items: u64,
}

impl BloomSnapshot {
    pub fn with_capacity(expected_items: usize, fp_rate: f64) -> Result<Self, DomainError> {
        let bloom = Bloom::new_for_fp_rate(expected_items.max(1), fp_rate)
            .map_err(|e| DomainError::BloomSnapshotError(e.to_string()))?;
        Ok(Self { bloom, items: 0 })
    }

    /// Streams every domain out of `store` into a fresh filter sized for
    /// `max(store count, min_items)`.
    pub async fn build_from_store(
        store: &dyn BlockStore,
        min_items: usize,
        fp_rate: f64,
    ) -> Result<Self, DomainError> {
        let count = store.count_domains().await?;
        let capacity = usize::try_from(count).unwrap_or(usize::MAX).max(min_items);
        let mut snapshot = Self::with_capacity(capacity, fp_rate)?;

        let mut domains = store.stream_domains();
        while let Some(domain) = domains.try_next().await? {
            snapshot.insert(&domain);
        }

        Ok(snapshot)
    }

    pub fn insert(&mut self, domain: &str) {
        self.bloom.set(domain);
        self.items += 1;
    }

    #[inline]
    pub fn might_contain(&self, domain: &str) -> bool {
        self.bloom.check(domain)
    }

    /// Domains inserted when the snapshot was built.
    pub fn items(&self) -> u64 {
        self.items
    }

    /// File image: magic, version, item count (LE), then the filter itself.
    pub fn to_bytes(&self) -> Vec<u8> {
        let filter = self.bloom.to_bytes();
        let mut out = Vec::with_capacity(SNAPSHOT_HEADER_LEN + filter.len());
        out.extend_from_slice(SNAPSHOT_MAGIC);
        out.push(SNAPSHOT_VERSION);
        out.extend_from_slice(&self.items.to_le_bytes());
        out.extend_from_slice(&filter);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DomainError> {
        if bytes.len() < SNAPSHOT_HEADER_LEN || &bytes[..4] != SNAPSHOT_MAGIC {
            return Err(DomainError::BloomSnapshotError(
                "not a bloom snapshot".to_string(),
            ));
        }
        if bytes[4] != SNAPSHOT_VERSION {
            return Err(DomainError::BloomSnapshotError(format!(
                "unsupported snapshot version {}",
                bytes[4]
            )));
        }

        let mut items = [0u8; 8];
        items.copy_from_slice(&bytes[5..SNAPSHOT_HEADER_LEN]);

        let bloom = Bloom::from_bytes(bytes[SNAPSHOT_HEADER_LEN..].to_vec())
            .map_err(|e| DomainError::BloomSnapshotError(e.to_string()))?;

        Ok(Self {
            bloom,
            items: u64::from_le_bytes(items),
        })
    }
}

impl fmt::Debug for BloomSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomSnapshot")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

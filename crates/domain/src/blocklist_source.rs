use std::sync::Arc;

/// Remote blocklist merged into the store by `import --from-sources`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlocklistSource {
    pub id: i64,
    pub url: Arc<str>,
    pub created_at: Option<String>,
}

impl BlocklistSource {
    pub fn new(id: i64, url: &str, created_at: Option<String>) -> Self {
        Self {
            id,
            url: Arc::from(url),
            created_at,
        }
    }
}

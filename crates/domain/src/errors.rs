use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Malformed packet: {0}")]
    MalformedPacket(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Tunnel error: {0}")]
    TunnelError(String),

    #[error("Bloom snapshot error: {0}")]
    BloomSnapshotError(String),

    #[error("Blocklist import failed: {0}")]
    ImportError(String),

    #[error("Invalid blocklist source URL: {0}")]
    InvalidSourceUrl(String),

    #[error("Blocklist fetch failed: {0}")]
    FetchError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::IoError(e.to_string())
    }
}

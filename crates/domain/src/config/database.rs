use serde::{Deserialize, Serialize};

/// Database configuration for the domain store and query log
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file (default: "./ferrous-shield.db")
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Record every classified query in the query log (default: true)
    #[serde(default = "default_true")]
    pub log_queries: bool,

    /// Upper bound on pooled SQLite connections (default: 8)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            log_queries: true,
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!("sqlite://{}", self.path)
    }
}

fn default_db_path() -> String {
    "./ferrous-shield.db".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_connections() -> u32 {
    8
}

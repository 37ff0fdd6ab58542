use crate::verdict::{Verdict, VerdictSource};
use chrono::{DateTime, Utc};
use std::net::Ipv4Addr;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct QueryLog {
    pub id: Option<i64>,
    pub domain: Arc<str>,
    pub client_ip: Ipv4Addr,
    pub blocked: bool,
    pub source: VerdictSource,
    pub timestamp: Option<DateTime<Utc>>,
}

impl QueryLog {
    pub fn from_verdict(verdict: &Verdict, client_ip: Ipv4Addr) -> Self {
        Self {
            id: None,
            domain: Arc::clone(&verdict.domain),
            client_ip,
            blocked: verdict.blocked,
            source: verdict.source,
            timestamp: Some(Utc::now()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    pub total: u64,
    pub blocked: u64,
}

impl QueryStats {
    pub fn allowed(&self) -> u64 {
        self.total.saturating_sub(self.blocked)
    }
}

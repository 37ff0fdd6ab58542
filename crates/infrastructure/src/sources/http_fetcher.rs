use async_trait::async_trait;
use ferrous_shield_application::ports::BlocklistFetcher;
use ferrous_shield_domain::DomainError;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("ferrous-shield/", env!("CARGO_PKG_VERSION"), " (blocklist-sync)");

/// Downloads blocklist sources over HTTP(S).
pub struct HttpBlocklistFetcher {
    client: reqwest::Client,
}

impl HttpBlocklistFetcher {
    pub fn new(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::FetchError(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl BlocklistFetcher for HttpBlocklistFetcher {
    async fn fetch(&self, url: &str) -> Result<String, DomainError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::FetchError(format!("fetch error for {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(DomainError::FetchError(format!(
                "HTTP {} for {url}",
                response.status().as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DomainError::FetchError(format!("read error for {url}: {e}")))?;
        debug!(url = %url, bytes = body.len(), "Blocklist source downloaded");
        Ok(body)
    }
}

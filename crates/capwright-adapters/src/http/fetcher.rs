use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use capwright_ports::error::FetchError;
use capwright_ports::outbound::DocumentFetcher;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches remote CAP documents over HTTP(S) with a bounded timeout.
pub struct HttpDocumentFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpDocumentFetcher {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

impl Default for HttpDocumentFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;
        debug!(%url, bytes = body.len(), "fetched document");
        Ok(body)
    }
}

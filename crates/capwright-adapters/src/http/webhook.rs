use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use capwright_ports::error::DeliverError;
use capwright_ports::outbound::WebhookSink;
use capwright_ports::types::WebhookEndpoint;

/// Unix timestamp of the publication, for receiver-side replay detection.
pub const REQUEST_TIMESTAMP_HEADER: &str = "CAP-Webhook-Request-Timestamp";
/// Shared secret agreed with the receiver, sent verbatim.
pub const AUTH_HEADER: &str = "CAP-Webhook-Auth";

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(15);

/// Pushes published CAP documents to registered HTTP receivers.
pub struct HttpWebhookSink {
    client: reqwest::Client,
}

impl HttpWebhookSink {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpWebhookSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebhookSink for HttpWebhookSink {
    async fn deliver(
        &self,
        endpoint: &WebhookEndpoint,
        payload: &[u8],
        sent_at: DateTime<Utc>,
    ) -> Result<(), DeliverError> {
        let mut request = self
            .client
            .post(&endpoint.url)
            .header("Content-Type", "application/xml")
            .header(REQUEST_TIMESTAMP_HEADER, sent_at.timestamp().to_string())
            .timeout(DELIVERY_TIMEOUT)
            .body(payload.to_vec());
        if let Some(token) = &endpoint.auth_token {
            request = request.header(AUTH_HEADER, token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DeliverError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliverError::Rejected(format!(
                "{} returned {}",
                endpoint.url, status
            )));
        }
        debug!(url = %endpoint.url, "webhook delivered");
        Ok(())
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use capwright_core::alert::Alert;
use capwright_core::ids::Reference;

use crate::error::{DeliverError, FetchError, PortError, SignError};
use crate::types::{AlertFilter, CachedDocument, Qos, WebhookEndpoint};

/// Applies an XML digital signature to a rendered document. Implementations
/// wrap external signing tooling; the domain only sees bytes in, bytes out.
#[async_trait]
pub trait Signer: Send + Sync {
    async fn sign(&self, document: &[u8]) -> Result<Vec<u8>, SignError>;
}

/// Retrieves remote CAP documents for import.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[async_trait]
pub trait DocumentCache: Send + Sync {
    async fn get(&self, identifier: &str) -> Result<Option<CachedDocument>, PortError>;
    async fn store(&self, document: &CachedDocument) -> Result<(), PortError>;
    async fn invalidate(&self, identifier: &str) -> Result<(), PortError>;
}

#[async_trait]
pub trait AlertRepository: Send + Sync {
    async fn save(&self, alert: &Alert) -> Result<(), PortError>;
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Alert>, PortError>;
    /// Resolves a `sender,identifier,sent` triple to a stored alert.
    async fn find_by_reference(&self, reference: &Reference) -> Result<Option<Alert>, PortError>;
    async fn find_by_filter(&self, filter: &AlertFilter) -> Result<Vec<Alert>, PortError>;
}

/// Topic-based broker fan-out.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: &[u8], qos: Qos) -> Result<(), DeliverError>;
}

/// Push delivery of published documents to registered HTTP receivers.
#[async_trait]
pub trait WebhookSink: Send + Sync {
    async fn deliver(
        &self,
        endpoint: &WebhookEndpoint,
        payload: &[u8],
        sent_at: DateTime<Utc>,
    ) -> Result<(), DeliverError>;
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use capwright_core::ids::Reference;

/// A rendered CAP document stored for fast retrieval, keyed by alert
/// identifier. Write-once per identifier; superseding an alert invalidates
/// the entry instead of rewriting it.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedDocument {
    pub identifier: String,
    pub content: Vec<u8>,
    pub signed: bool,
    pub cached_at: DateTime<Utc>,
}

/// Registered receiver of published alert documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEndpoint {
    pub url: String,
    /// Shared secret echoed in the auth header when set.
    pub auth_token: Option<String>,
}

/// MQTT-style delivery guarantee requested from the broker publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Qos {
    AtMostOnce,
    AtLeastOnce,
    ExactlyOnce,
}

/// What a successful publication produced. Webhook failures are recorded
/// rather than failing the publication.
#[derive(Debug, Clone)]
pub struct PublishReceipt {
    pub reference: Reference,
    pub document: Vec<u8>,
    pub signed: bool,
    pub failed_webhooks: Vec<String>,
}

/// Filter criteria for querying stored alerts.
#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    pub actual_public_only: bool,
    /// Only alerts with at least one info block unexpired at this instant.
    pub active_at: Option<DateTime<Utc>>,
}

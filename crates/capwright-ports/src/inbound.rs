use async_trait::async_trait;
use chrono::{DateTime, Utc};

use capwright_core::alert::Alert;
use capwright_core::xml::import::ValidationMode;

use crate::error::ServiceError;
use crate::types::PublishReceipt;

#[async_trait]
pub trait AlertPublishing: Send + Sync {
    /// Validates, stamps, renders, signs and fans out the alert.
    async fn publish_alert(
        &self,
        alert: Alert,
        now: DateTime<Utc>,
    ) -> Result<PublishReceipt, ServiceError>;
}

#[async_trait]
pub trait AlertImporting: Send + Sync {
    async fn import_document(
        &self,
        xml: &str,
        mode: ValidationMode,
    ) -> Result<Alert, ServiceError>;
    async fn import_from_url(
        &self,
        url: &str,
        mode: ValidationMode,
    ) -> Result<Alert, ServiceError>;
}

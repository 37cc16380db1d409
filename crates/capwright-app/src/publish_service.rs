use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use capwright_core::alert::Alert;
use capwright_core::settings::CapSettings;
use capwright_core::xml::{attach_stylesheet, serialize_alert};
use capwright_ports::error::ServiceError;
use capwright_ports::inbound::AlertPublishing;
use capwright_ports::outbound::{AlertRepository, DocumentCache, Publisher, Signer, WebhookSink};
use capwright_ports::types::{CachedDocument, PublishReceipt, Qos, WebhookEndpoint};

use crate::error::AppError;

/// Broker topic for published alert documents.
fn alert_topic(identifier: &str) -> String {
    format!("cap/alerts/{identifier}")
}

pub struct PublishService<R, C, S, P, W>
where
    R: AlertRepository,
    C: DocumentCache,
    S: Signer,
    P: Publisher,
    W: WebhookSink,
{
    alerts: R,
    cache: C,
    signer: S,
    publisher: P,
    webhook_sink: W,
    settings: CapSettings,
    webhooks: Vec<WebhookEndpoint>,
}

impl<R, C, S, P, W> PublishService<R, C, S, P, W>
where
    R: AlertRepository,
    C: DocumentCache,
    S: Signer,
    P: Publisher,
    W: WebhookSink,
{
    pub fn new(
        alerts: R,
        cache: C,
        signer: S,
        publisher: P,
        webhook_sink: W,
        settings: CapSettings,
        webhooks: Vec<WebhookEndpoint>,
    ) -> Self {
        Self {
            alerts,
            cache,
            signer,
            publisher,
            webhook_sink,
            settings,
            webhooks,
        }
    }

    /// Publishes one alert: stamp, validate, render, sign, cache, fan out.
    ///
    /// Signing and webhook delivery are best-effort; a broker failure for an
    /// Actual/Public alert is fatal because downstream consumers depend on
    /// the topic.
    pub async fn publish(
        &self,
        mut alert: Alert,
        now: DateTime<Utc>,
    ) -> Result<PublishReceipt, AppError> {
        alert.stamp_sent(now, self.settings.oid_prefix.as_deref());

        for reference in &alert.references {
            if self.alerts.find_by_reference(reference).await?.is_none() {
                return Err(AppError::UnknownReference(reference.to_string()));
            }
        }
        alert.validate()?;

        let rendered = serialize_alert(&alert, &self.settings)?;
        let (mut document, signed) = match self.signer.sign(&rendered).await {
            Ok(signed) => (signed, true),
            Err(e) => {
                warn!(error = %e, identifier = %alert.identifier, "signing failed, publishing unsigned");
                (rendered, false)
            }
        };
        if let Some(url) = &self.settings.stylesheet_url {
            document = attach_stylesheet(document, url);
        }

        self.alerts.save(&alert).await?;

        // Superseded documents must not be served from cache anymore, and
        // neither must an earlier rendering of this alert: the cache is
        // write-once per identifier, so the old entry has to go first.
        for reference in &alert.references {
            self.cache.invalidate(reference.identifier.as_str()).await?;
        }
        self.cache.invalidate(alert.identifier.as_str()).await?;
        self.cache
            .store(&CachedDocument {
                identifier: alert.identifier.to_string(),
                content: document.clone(),
                signed,
                cached_at: now,
            })
            .await?;

        let mut failed_webhooks = Vec::new();
        if alert.is_actual_public() {
            let topic = alert_topic(alert.identifier.as_str());
            self.publisher
                .publish(&topic, &document, Qos::AtLeastOnce)
                .await?;
            debug!(%topic, "alert published to broker");

            for endpoint in &self.webhooks {
                if let Err(e) = self
                    .webhook_sink
                    .deliver(endpoint, &document, now)
                    .await
                {
                    warn!(url = %endpoint.url, error = %e, "webhook delivery failed");
                    failed_webhooks.push(endpoint.url.clone());
                }
            }
        }

        Ok(PublishReceipt {
            reference: alert.reference(),
            document,
            signed,
            failed_webhooks,
        })
    }
}

#[async_trait::async_trait]
impl<R, C, S, P, W> AlertPublishing for PublishService<R, C, S, P, W>
where
    R: AlertRepository,
    C: DocumentCache,
    S: Signer,
    P: Publisher,
    W: WebhookSink,
{
    async fn publish_alert(
        &self,
        alert: Alert,
        now: DateTime<Utc>,
    ) -> Result<PublishReceipt, ServiceError> {
        self.publish(alert, now).await.map_err(Into::into)
    }
}

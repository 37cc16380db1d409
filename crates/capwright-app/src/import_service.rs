use tracing::debug;

use capwright_core::alert::Alert;
use capwright_core::settings::CapSettings;
use capwright_core::xml::import::{self, AlertData, ValidationMode};
use capwright_ports::error::ServiceError;
use capwright_ports::inbound::AlertImporting;
use capwright_ports::outbound::DocumentFetcher;

use crate::error::AppError;

pub struct ImportService<F>
where
    F: DocumentFetcher,
{
    fetcher: F,
    settings: CapSettings,
}

impl<F> ImportService<F>
where
    F: DocumentFetcher,
{
    pub fn new(fetcher: F, settings: CapSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Parses without building an envelope, for previewing a feed entry.
    pub fn preview(&self, xml: &str, mode: ValidationMode) -> Result<AlertData, AppError> {
        Ok(import::parse_alert_xml(xml, mode, self.settings.timezone)?)
    }

    pub fn import_str(&self, xml: &str, mode: ValidationMode) -> Result<Alert, AppError> {
        Ok(import::import_alert(xml, mode, &self.settings)?)
    }

    /// Fetches a remote document and imports it. Transport failures surface
    /// as [`AppError::Fetch`], distinct from schema validation failures.
    pub async fn import_url(&self, url: &str, mode: ValidationMode) -> Result<Alert, AppError> {
        let body = self.fetcher.fetch(url).await?;
        debug!(%url, bytes = body.len(), "fetched remote CAP document");
        self.import_str(&body, mode)
    }
}

#[async_trait::async_trait]
impl<F> AlertImporting for ImportService<F>
where
    F: DocumentFetcher,
{
    async fn import_document(
        &self,
        xml: &str,
        mode: ValidationMode,
    ) -> Result<Alert, ServiceError> {
        self.import_str(xml, mode).map_err(Into::into)
    }

    async fn import_from_url(
        &self,
        url: &str,
        mode: ValidationMode,
    ) -> Result<Alert, ServiceError> {
        self.import_url(url, mode).await.map_err(Into::into)
    }
}

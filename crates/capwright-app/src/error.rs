use capwright_core::error::DomainError;
use capwright_core::xml::import::ImportError;
use capwright_core::xml::SerializeError;
use capwright_ports::error::{DeliverError, FetchError, PortError, ServiceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("serialize error: {0}")]
    Serialize(#[from] SerializeError),
    #[error("import error: {0}")]
    Import(#[from] ImportError),
    #[error("port error: {0}")]
    Port(#[from] PortError),
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("broker delivery failed: {0}")]
    Delivery(#[from] DeliverError),
    #[error("reference does not resolve to a stored alert: {0}")]
    UnknownReference(String),
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::UnknownReference(r) => ServiceError::UnknownReference(r),
            AppError::Port(p) => ServiceError::Port(p),
            AppError::Import(e) => ServiceError::ImportFailed(e.to_string()),
            AppError::Fetch(e) => ServiceError::ImportFailed(e.to_string()),
            other => ServiceError::InvalidAlert(other.to_string()),
        }
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("not found")]
    NotFound,
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("connection error: {0}")]
    Connection(String),
}

/// Failure to sign a rendered document. Publication falls back to the
/// unsigned document on any of these.
#[derive(Debug, Error)]
pub enum SignError {
    #[error("no signing key configured")]
    NoKey,
    #[error("signing failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected status code: {0}")]
    Status(u16),
    #[error("response body was not text: {0}")]
    Body(String),
}

#[derive(Debug, Error)]
pub enum DeliverError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("delivery rejected: {0}")]
    Rejected(String),
}

/// Error surface of the inbound service ports.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid alert: {0}")]
    InvalidAlert(String),
    #[error("unknown reference: {0}")]
    UnknownReference(String),
    #[error("import failed: {0}")]
    ImportFailed(String),
    #[error(transparent)]
    Port(#[from] PortError),
}

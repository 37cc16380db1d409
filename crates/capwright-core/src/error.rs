use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("references required when msgType is not Alert")]
    ReferencesRequired,
    #[error("duplicate reference: {0}")]
    DuplicateReference(String),
    #[error("alert must not reference itself")]
    SelfReference,
    #[error("effective date is earlier than sent")]
    EffectiveBeforeSent,
    #[error("expiry date is earlier than sent")]
    ExpiresBeforeSent,
    #[error("expiry date is earlier than effective")]
    ExpiresBeforeEffective,
    #[error("expiry date is earlier than onset")]
    ExpiresBeforeOnset,
    #[error("alert requires at least one info block")]
    InfoRequired,
    #[error("info block requires at least one area")]
    AreaRequired,
    #[error("geometry reduced to a degenerate ring")]
    DegenerateGeometry,
    #[error("invalid geometry string: {0}")]
    InvalidGeometry(String),
    #[error("unknown {field} code: {value}")]
    UnknownCode { field: &'static str, value: String },
    #[error("invalid reference id: {0}")]
    InvalidReference(String),
    #[error("ceiling must not be used without altitude")]
    CeilingWithoutAltitude,
}

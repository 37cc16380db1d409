use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Code denoting the intended distribution of the alert message. Governs
/// which of `restriction` or `addresses` is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    /// General dissemination to unrestricted audiences.
    Public,
    /// Dissemination only to users with a known operational requirement,
    /// described in `restriction`.
    Restricted,
    /// Dissemination only to the recipients listed in `addresses`.
    Private,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Restricted => "Restricted",
            Self::Private => "Private",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "Public" => Ok(Self::Public),
            "Restricted" => Ok(Self::Restricted),
            "Private" => Ok(Self::Private),
            other => Err(DomainError::UnknownCode {
                field: "scope",
                value: other.to_string(),
            }),
        }
    }
}

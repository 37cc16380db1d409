use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Code denoting the nature of the alert message. The CAP `Ack` and `Error`
/// message types are not modeled here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MsgType {
    /// Initial information requiring attention by targeted recipients.
    Alert,
    /// Updates and supersedes the earlier message(s) in `references`.
    Update,
    /// Cancels the earlier message(s) in `references`.
    Cancel,
}

impl MsgType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alert => "Alert",
            Self::Update => "Update",
            Self::Cancel => "Cancel",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "Alert" => Ok(Self::Alert),
            "Update" => Ok(Self::Update),
            "Cancel" => Ok(Self::Cancel),
            other => Err(DomainError::UnknownCode {
                field: "msgType",
                value: other.to_string(),
            }),
        }
    }

    /// Supersession semantics: everything but the initial Alert must point
    /// at the message(s) it supersedes.
    pub fn requires_references(&self) -> bool {
        !matches!(self, Self::Alert)
    }
}

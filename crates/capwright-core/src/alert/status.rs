use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Code denoting the appropriate handling of the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Preliminary template or draft, not actionable.
    Draft,
    /// Actionable by all targeted recipients.
    Actual,
    /// Technical testing only, all recipients disregard.
    Test,
    /// Actionable only by designated exercise participants.
    Exercise,
    /// Messages supporting alert network internal functions.
    System,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Actual => "Actual",
            Self::Test => "Test",
            Self::Exercise => "Exercise",
            Self::System => "System",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "Draft" => Ok(Self::Draft),
            "Actual" => Ok(Self::Actual),
            "Test" => Ok(Self::Test),
            "Exercise" => Ok(Self::Exercise),
            // legacy feeds carry a lowercase variant
            "System" | "system" => Ok(Self::System),
            other => Err(DomainError::UnknownCode {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

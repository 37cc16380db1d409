//! CAP enumerated code tables with presentation metadata.
//!
//! The `rank` of each code is the sort/tie-break key (higher is more
//! pressing), never the display value.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Extreme,
    Severe,
    Moderate,
    Minor,
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extreme => "Extreme",
            Self::Severe => "Severe",
            Self::Moderate => "Moderate",
            Self::Minor => "Minor",
            Self::Unknown => "Unknown",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "Extreme" => Ok(Self::Extreme),
            "Severe" => Ok(Self::Severe),
            "Moderate" => Ok(Self::Moderate),
            "Minor" => Ok(Self::Minor),
            "Unknown" => Ok(Self::Unknown),
            other => Err(DomainError::UnknownCode {
                field: "severity",
                value: other.to_string(),
            }),
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Self::Extreme => 4,
            Self::Severe => 3,
            Self::Moderate => 2,
            Self::Minor => 1,
            Self::Unknown => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Extreme => "Red severity",
            Self::Severe => "Orange severity",
            Self::Moderate => "Yellow severity",
            Self::Minor => "Minor severity",
            Self::Unknown => "Unknown severity",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Extreme => "#d72f2a",
            Self::Severe => "#fe9900",
            Self::Moderate => "#ffff00",
            Self::Minor => "#03ffff",
            Self::Unknown => "#3366ff",
        }
    }

    pub fn background_color(&self) -> &'static str {
        match self {
            Self::Extreme => "#fcf2f2",
            Self::Severe => "#fff9f2",
            _ => "#fffdf1",
        }
    }

    pub fn border_color(&self) -> &'static str {
        match self {
            Self::Extreme => "#721515",
            Self::Severe => "#9a6100",
            Self::Moderate | Self::Minor => "#938616",
            Self::Unknown => "#122663",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    Immediate,
    Expected,
    Future,
    Past,
    Unknown,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Immediate => "Immediate",
            Self::Expected => "Expected",
            Self::Future => "Future",
            Self::Past => "Past",
            Self::Unknown => "Unknown",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "Immediate" => Ok(Self::Immediate),
            "Expected" => Ok(Self::Expected),
            "Future" => Ok(Self::Future),
            "Past" => Ok(Self::Past),
            "Unknown" => Ok(Self::Unknown),
            other => Err(DomainError::UnknownCode {
                field: "urgency",
                value: other.to_string(),
            }),
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Self::Immediate => 4,
            Self::Expected => 3,
            Self::Future => 2,
            Self::Past => 1,
            Self::Unknown => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Certainty {
    Observed,
    Likely,
    Possible,
    Unlikely,
    Unknown,
}

impl Certainty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Observed => "Observed",
            Self::Likely => "Likely",
            Self::Possible => "Possible",
            Self::Unlikely => "Unlikely",
            Self::Unknown => "Unknown",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "Observed" => Ok(Self::Observed),
            "Likely" => Ok(Self::Likely),
            "Possible" => Ok(Self::Possible),
            "Unlikely" => Ok(Self::Unlikely),
            "Unknown" => Ok(Self::Unknown),
            other => Err(DomainError::UnknownCode {
                field: "certainty",
                value: other.to_string(),
            }),
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Self::Observed => 4,
            Self::Likely => 3,
            Self::Possible => 2,
            Self::Unlikely => 1,
            Self::Unknown => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Geo,
    Met,
    Safety,
    Security,
    Rescue,
    Fire,
    Health,
    Env,
    Transport,
    Infra,
    Cbrne,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Geo => "Geo",
            Self::Met => "Met",
            Self::Safety => "Safety",
            Self::Security => "Security",
            Self::Rescue => "Rescue",
            Self::Fire => "Fire",
            Self::Health => "Health",
            Self::Env => "Env",
            Self::Transport => "Transport",
            Self::Infra => "Infra",
            Self::Cbrne => "CBRNE",
            Self::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "Geo" => Ok(Self::Geo),
            "Met" => Ok(Self::Met),
            "Safety" => Ok(Self::Safety),
            "Security" => Ok(Self::Security),
            "Rescue" => Ok(Self::Rescue),
            "Fire" => Ok(Self::Fire),
            "Health" => Ok(Self::Health),
            "Env" => Ok(Self::Env),
            "Transport" => Ok(Self::Transport),
            "Infra" => Ok(Self::Infra),
            "CBRNE" | "Cbrne" => Ok(Self::Cbrne),
            "Other" => Ok(Self::Other),
            other => Err(DomainError::UnknownCode {
                field: "category",
                value: other.to_string(),
            }),
        }
    }
}

/// CAP responseType values. `Ack`/`Error` message handling is out of scope,
/// but `None` is a legitimate response type and serializes as the literal
/// string "None".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseType {
    Shelter,
    Evacuate,
    Prepare,
    Execute,
    Avoid,
    Monitor,
    Assess,
    AllClear,
    None,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shelter => "Shelter",
            Self::Evacuate => "Evacuate",
            Self::Prepare => "Prepare",
            Self::Execute => "Execute",
            Self::Avoid => "Avoid",
            Self::Monitor => "Monitor",
            Self::Assess => "Assess",
            Self::AllClear => "AllClear",
            Self::None => "None",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "Shelter" => Ok(Self::Shelter),
            "Evacuate" => Ok(Self::Evacuate),
            "Prepare" => Ok(Self::Prepare),
            "Execute" => Ok(Self::Execute),
            "Avoid" => Ok(Self::Avoid),
            "Monitor" => Ok(Self::Monitor),
            "Assess" => Ok(Self::Assess),
            "AllClear" => Ok(Self::AllClear),
            "None" => Ok(Self::None),
            other => Err(DomainError::UnknownCode {
                field: "responseType",
                value: other.to_string(),
            }),
        }
    }
}

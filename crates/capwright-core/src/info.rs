use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::area::{Area, NamedValue};
use crate::error::DomainError;
use crate::taxonomy::{Category, Certainty, ResponseType, Severity, Urgency};

/// Derived event state relative to the current time. Never persisted;
/// recomputed at read/render time to avoid staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Expired,
    Ongoing,
    Expected,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expired => "Expired",
            Self::Ongoing => "Ongoing",
            Self::Expected => "Expected",
        }
    }
}

/// File- or URL-backed supplemental resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Resource {
    File {
        resource_desc: String,
        uri: String,
        /// Sniffed from the file; left unset when sniffing fails.
        mime_type: Option<String>,
        size: Option<u64>,
    },
    External {
        resource_desc: String,
        uri: String,
    },
}

impl Resource {
    pub fn resource_desc(&self) -> &str {
        match self {
            Self::File { resource_desc, .. } | Self::External { resource_desc, .. } => {
                resource_desc
            }
        }
    }

    pub fn uri(&self) -> &str {
        match self {
            Self::File { uri, .. } | Self::External { uri, .. } => uri,
        }
    }

    pub fn mime_type(&self) -> Option<&str> {
        match self {
            Self::File { mime_type, .. } => mime_type.as_deref(),
            Self::External { .. } => None,
        }
    }

    pub fn size(&self) -> Option<u64> {
        match self {
            Self::File { size, .. } => *size,
            Self::External { .. } => None,
        }
    }
}

/// Per-language information block of an alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub language: String,
    pub category: Category,
    pub event: String,
    pub response_type: Vec<ResponseType>,
    pub urgency: Urgency,
    pub severity: Severity,
    pub certainty: Certainty,
    pub audience: Option<String>,
    pub event_code: Vec<NamedValue>,
    pub effective: Option<DateTime<Utc>>,
    pub onset: Option<DateTime<Utc>>,
    pub expires: DateTime<Utc>,
    pub sender_name: Option<String>,
    pub headline: Option<String>,
    pub description: Option<String>,
    pub instruction: Option<String>,
    pub web: Option<String>,
    pub contact: Option<String>,
    pub parameter: Vec<NamedValue>,
    pub resource: Vec<Resource>,
    pub area: Vec<Area>,
}

impl Info {
    pub fn new(
        category: Category,
        event: impl Into<String>,
        urgency: Urgency,
        severity: Severity,
        certainty: Certainty,
        expires: DateTime<Utc>,
    ) -> Self {
        Self {
            language: "en".to_string(),
            category,
            event: event.into(),
            response_type: Vec::new(),
            urgency,
            severity,
            certainty,
            audience: None,
            event_code: Vec::new(),
            effective: None,
            onset: None,
            expires,
            sender_name: None,
            headline: None,
            description: None,
            instruction: None,
            web: None,
            contact: None,
            parameter: Vec::new(),
            resource: Vec::new(),
            area: Vec::new(),
        }
    }

    /// Expired when past `expires`; else Ongoing once past `effective`
    /// (falling back to the envelope's `sent`); else Expected.
    pub fn event_status(&self, now: DateTime<Utc>, sent: DateTime<Utc>) -> EventStatus {
        if self.expires < now {
            return EventStatus::Expired;
        }
        let start = self.effective.unwrap_or(sent);
        if now > start {
            EventStatus::Ongoing
        } else {
            EventStatus::Expected
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(effective) = self.effective {
            if self.expires < effective {
                return Err(DomainError::ExpiresBeforeEffective);
            }
        }
        if let Some(onset) = self.onset {
            if self.expires < onset {
                return Err(DomainError::ExpiresBeforeOnset);
            }
        }
        if self.area.is_empty() {
            return Err(DomainError::AreaRequired);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::Area;

    fn ts(s: &str) -> DateTime<Utc> {
        chrono::DateTime::parse_from_rfc3339(s)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn make_info() -> Info {
        let mut info = Info::new(
            Category::Met,
            "Flood",
            Urgency::Immediate,
            Severity::Extreme,
            Certainty::Observed,
            ts("2024-01-02T00:00:00Z"),
        );
        info.area.push(Area::circle("Zone A", 10.0, 20.0, 5.0));
        info
    }

    #[test]
    fn status_expired_after_expiry() {
        let info = make_info();
        let status = info.event_status(ts("2024-01-03T00:00:00Z"), ts("2024-01-01T00:00:00Z"));
        assert_eq!(status, EventStatus::Expired);
    }

    #[test]
    fn status_ongoing_between_effective_and_expiry() {
        let mut info = make_info();
        info.effective = Some(ts("2024-01-01T06:00:00Z"));
        let status = info.event_status(ts("2024-01-01T12:00:00Z"), ts("2024-01-01T00:00:00Z"));
        assert_eq!(status, EventStatus::Ongoing);
    }

    #[test]
    fn status_falls_back_to_sent_when_effective_unset() {
        let info = make_info();
        let status = info.event_status(ts("2024-01-01T12:00:00Z"), ts("2024-01-01T00:00:00Z"));
        assert_eq!(status, EventStatus::Ongoing);
    }

    #[test]
    fn status_expected_before_start() {
        let mut info = make_info();
        info.effective = Some(ts("2024-01-01T18:00:00Z"));
        let status = info.event_status(ts("2024-01-01T12:00:00Z"), ts("2024-01-01T00:00:00Z"));
        assert_eq!(status, EventStatus::Expected);
    }

    #[test]
    fn expires_before_effective_fails_validation() {
        let mut info = make_info();
        info.effective = Some(ts("2024-01-05T00:00:00Z"));
        assert_eq!(info.validate(), Err(DomainError::ExpiresBeforeEffective));
    }

    #[test]
    fn expires_before_onset_fails_validation() {
        let mut info = make_info();
        info.onset = Some(ts("2024-01-04T00:00:00Z"));
        assert_eq!(info.validate(), Err(DomainError::ExpiresBeforeOnset));
    }

    #[test]
    fn info_without_area_fails_validation() {
        let mut info = make_info();
        info.area.clear();
        assert_eq!(info.validate(), Err(DomainError::AreaRequired));
    }
}

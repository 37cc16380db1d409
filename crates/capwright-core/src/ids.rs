use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::timestamp::format_cap_utc;

/// Stable unique alert identifier. A random UUID is assigned at creation and
/// never regenerated; institutions with a registered OID prefix instead
/// derive the identifier from the sent timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier(String);

impl Identifier {
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// `urn:oid:{prefix}.{year}.{month}.{day}.{hour}.{minute}.{second}`
    /// of the sent timestamp.
    pub fn from_oid(oid_prefix: &str, sent: &DateTime<Utc>) -> Self {
        Self(format!(
            "urn:oid:{}.{}.{}.{}.{}.{}.{}",
            oid_prefix,
            sent.year(),
            sent.month(),
            sent.day(),
            sent.hour(),
            sent.minute(),
            sent.second()
        ))
    }

    /// Resolves the identifier scheme: OID-derived when an institution
    /// prefix is configured, a fresh UUID otherwise.
    pub fn resolve(oid_prefix: Option<&str>, sent: &DateTime<Utc>) -> Self {
        match oid_prefix {
            Some(prefix) => Self::from_oid(prefix, sent),
            None => Self::random(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identity of a previously published alert: the `sender,identifier,sent`
/// triple used in the CAP `references` element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub sender: String,
    pub identifier: Identifier,
    pub sent: DateTime<Utc>,
}

impl Reference {
    pub fn new(sender: String, identifier: Identifier, sent: DateTime<Utc>) -> Self {
        Self {
            sender,
            identifier,
            sent,
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return Err(DomainError::InvalidReference(s.to_string()));
        }
        let sent = DateTime::parse_from_rfc3339(parts[2])
            .map_err(|_| DomainError::InvalidReference(s.to_string()))?
            .with_timezone(&Utc);
        Ok(Self {
            sender: parts[0].to_string(),
            identifier: Identifier::from(parts[1].to_string()),
            sent,
        })
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{}",
            self.sender,
            self.identifier,
            format_cap_utc(&self.sent)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sent() -> DateTime<Utc> {
        chrono::DateTime::parse_from_rfc3339("2024-03-05T09:07:02Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn oid_identifier_uses_unpadded_date_components() {
        let id = Identifier::from_oid("2.49.0.0.404", &sent());
        assert_eq!(id.as_str(), "urn:oid:2.49.0.0.404.2024.3.5.9.7.2");
    }

    #[test]
    fn resolve_without_prefix_yields_uuid() {
        let id = Identifier::resolve(None, &sent());
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn random_identifiers_are_distinct() {
        assert_ne!(Identifier::random(), Identifier::random());
    }

    #[test]
    fn reference_round_trips_through_display() {
        let reference = Reference::new(
            "alerts@example.org".into(),
            Identifier::from("abc-123".to_string()),
            sent(),
        );
        let rendered = reference.to_string();
        assert_eq!(
            rendered,
            "alerts@example.org,abc-123,2024-03-05T09:07:02-00:00"
        );
        let parsed = Reference::parse(&rendered).unwrap();
        assert_eq!(parsed, reference);
    }

    #[test]
    fn reference_with_missing_parts_is_rejected() {
        let result = Reference::parse("only-two,parts");
        assert_eq!(
            result,
            Err(DomainError::InvalidReference("only-two,parts".into()))
        );
    }
}

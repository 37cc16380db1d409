pub mod msg_type;
pub mod scope;
pub mod status;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::DomainError;
use crate::ids::{Identifier, Reference};
use crate::info::Info;
use crate::timestamp::truncate_to_minute;

pub use msg_type::MsgType;
pub use scope::Scope;
pub use status::Status;

/// Intended recipient of a Private-scope alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub name: String,
    pub address: String,
}

/// The outer CAP `<alert>` message.
///
/// Content is edited only while `status` is Draft; once an alert is Actual
/// and public it is immutable for deletion/unpublish (enforced at the
/// application boundary). The serializer never mutates its input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub identifier: Identifier,
    pub sender: String,
    pub sent: DateTime<Utc>,
    pub status: Status,
    pub msg_type: MsgType,
    pub scope: Scope,
    pub source: Option<String>,
    pub restriction: Option<String>,
    pub code: Option<String>,
    pub note: Option<String>,
    pub addresses: Vec<Address>,
    pub references: Vec<Reference>,
    pub incidents: Vec<String>,
    pub info: Vec<Info>,
    /// Imported alerts keep their original `sent`; locally authored ones
    /// are stamped at publish time.
    pub imported: bool,
}

impl Alert {
    pub fn new(
        sender: impl Into<String>,
        sent: DateTime<Utc>,
        status: Status,
        msg_type: MsgType,
        scope: Scope,
        oid_prefix: Option<&str>,
    ) -> Self {
        Self {
            identifier: Identifier::resolve(oid_prefix, &sent),
            sender: sender.into(),
            sent,
            status,
            msg_type,
            scope,
            source: None,
            restriction: None,
            code: None,
            note: None,
            addresses: Vec::new(),
            references: Vec::new(),
            incidents: Vec::new(),
            info: Vec::new(),
            imported: false,
        }
    }

    /// Identity triple other alerts use to reference this one.
    pub fn reference(&self) -> Reference {
        Reference::new(self.sender.clone(), self.identifier.clone(), self.sent)
    }

    pub fn is_actual_public(&self) -> bool {
        self.status == Status::Actual && self.scope == Scope::Public
    }

    /// Stamps `sent` to "now" truncated to the minute for locally authored
    /// alerts, so that `sent` reflects actual publication time. Imported
    /// alerts keep the original timestamp. OID-derived identifiers follow
    /// the stamped timestamp; UUID identifiers are never regenerated.
    pub fn stamp_sent(&mut self, now: DateTime<Utc>, oid_prefix: Option<&str>) {
        if self.imported {
            return;
        }
        self.sent = truncate_to_minute(now);
        if let Some(prefix) = oid_prefix {
            self.identifier = Identifier::from_oid(prefix, &self.sent);
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.validate_references()?;
        self.validate_dates()?;
        if self.info.is_empty() {
            return Err(DomainError::InfoRequired);
        }
        for info in &self.info {
            info.validate()?;
        }
        Ok(())
    }

    fn validate_references(&self) -> Result<(), DomainError> {
        if self.msg_type.requires_references() && self.references.is_empty() {
            return Err(DomainError::ReferencesRequired);
        }
        let mut seen = HashSet::new();
        for reference in &self.references {
            if reference.identifier == self.identifier {
                return Err(DomainError::SelfReference);
            }
            if !seen.insert(reference.to_string()) {
                return Err(DomainError::DuplicateReference(reference.to_string()));
            }
        }
        Ok(())
    }

    fn validate_dates(&self) -> Result<(), DomainError> {
        for info in &self.info {
            if let Some(effective) = info.effective {
                if effective < self.sent {
                    return Err(DomainError::EffectiveBeforeSent);
                }
            }
            if info.expires < self.sent {
                return Err(DomainError::ExpiresBeforeSent);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::Area;
    use crate::taxonomy::{Category, Certainty, Severity, Urgency};

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

    fn make_alert() -> Alert {
        let mut alert = Alert::new(
            "x@y.org",
            ts("2024-01-01T00:00:00Z"),
            Status::Actual,
            MsgType::Alert,
            Scope::Public,
            None,
        );
        alert.info.push(make_info());
        alert
    }

    #[test]
    fn minimal_alert_validates() {
        assert_eq!(make_alert().validate(), Ok(()));
    }

    #[test]
    fn cancel_without_references_fails() {
        let mut alert = make_alert();
        alert.msg_type = MsgType::Cancel;
        assert_eq!(alert.validate(), Err(DomainError::ReferencesRequired));
    }

    #[test]
    fn update_with_reference_validates() {
        let mut alert = make_alert();
        alert.msg_type = MsgType::Update;
        alert.references.push(Reference::new(
            "x@y.org".into(),
            Identifier::random(),
            ts("2023-12-31T00:00:00Z"),
        ));
        assert_eq!(alert.validate(), Ok(()));
    }

    #[test]
    fn duplicate_reference_fails() {
        let mut alert = make_alert();
        alert.msg_type = MsgType::Update;
        let reference = Reference::new(
            "x@y.org".into(),
            Identifier::random(),
            ts("2023-12-31T00:00:00Z"),
        );
        alert.references.push(reference.clone());
        alert.references.push(reference.clone());
        assert_eq!(
            alert.validate(),
            Err(DomainError::DuplicateReference(reference.to_string()))
        );
    }

    #[test]
    fn self_reference_fails() {
        let mut alert = make_alert();
        alert.msg_type = MsgType::Update;
        alert.references.push(alert.reference());
        assert_eq!(alert.validate(), Err(DomainError::SelfReference));
    }

    #[test]
    fn effective_before_sent_fails() {
        let mut alert = make_alert();
        alert.info[0].effective = Some(ts("2023-12-31T00:00:00Z"));
        assert_eq!(alert.validate(), Err(DomainError::EffectiveBeforeSent));
    }

    #[test]
    fn expires_before_sent_fails() {
        let mut alert = make_alert();
        alert.info[0].expires = ts("2023-12-31T00:00:00Z");
        assert_eq!(alert.validate(), Err(DomainError::ExpiresBeforeSent));
    }

    #[test]
    fn alert_without_info_fails() {
        let mut alert = make_alert();
        alert.info.clear();
        assert_eq!(alert.validate(), Err(DomainError::InfoRequired));
    }

    #[test]
    fn stamp_sent_truncates_to_minute() {
        let mut alert = make_alert();
        alert.stamp_sent(ts("2024-01-01T10:30:45Z"), None);
        assert_eq!(alert.sent, ts("2024-01-01T10:30:00Z"));
    }

    #[test]
    fn stamp_sent_keeps_imported_timestamp() {
        let mut alert = make_alert();
        alert.imported = true;
        alert.stamp_sent(ts("2024-06-01T10:30:45Z"), None);
        assert_eq!(alert.sent, ts("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn stamp_sent_rederives_oid_identifier() {
        let mut alert = make_alert();
        alert.stamp_sent(ts("2024-06-01T10:30:45Z"), Some("2.49.0.0.404"));
        assert_eq!(
            alert.identifier.as_str(),
            "urn:oid:2.49.0.0.404.2024.6.1.10.30.0"
        );
    }

    #[test]
    fn stamp_sent_never_regenerates_uuid_identifier() {
        let mut alert = make_alert();
        let original = alert.identifier.clone();
        alert.stamp_sent(ts("2024-06-01T10:30:45Z"), None);
        assert_eq!(alert.identifier, original);
    }

    #[test]
    fn actual_public_alert_is_published_publicly() {
        let alert = make_alert();
        assert!(alert.is_actual_public());

        let mut draft = make_alert();
        draft.status = Status::Draft;
        assert!(!draft.is_actual_public());
    }
}

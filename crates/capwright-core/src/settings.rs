//! Institution configuration snapshot.
//!
//! Resolved once by the surrounding application and passed explicitly into
//! every serialize/import call; the codec never consults a global "current
//! site". A snapshot must be treated as immutable for the duration of one
//! call.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapSettings {
    /// Originator identity, e.g. the institution website or email.
    pub sender: String,
    /// Human-readable name of the issuing institution.
    pub sender_name: Option<String>,
    /// Registered OID prefix; when set, identifiers are derived from the
    /// sent timestamp instead of a UUID.
    pub oid_prefix: Option<String>,
    /// Timezone offset-less imported timestamps are interpreted in.
    pub timezone: Tz,
    pub default_language: String,
    pub contact_list: Vec<String>,
    pub audience_list: Vec<String>,
    pub hazard_event_types: Vec<HazardEventType>,
    pub predefined_areas: Vec<PredefinedArea>,
    /// XSL stylesheet the rendered document should point at, when any.
    pub stylesheet_url: Option<String>,
}

impl CapSettings {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            sender_name: None,
            oid_prefix: None,
            timezone: Tz::UTC,
            default_language: "en".to_string(),
            contact_list: Vec::new(),
            audience_list: Vec::new(),
            hazard_event_types: Vec::new(),
            predefined_areas: Vec::new(),
            stylesheet_url: None,
        }
    }

    pub fn hazard_event(&self, event: &str) -> Option<&HazardEventType> {
        self.hazard_event_types
            .iter()
            .find(|h| h.event.eq_ignore_ascii_case(event))
    }

    pub fn predefined_area(&self, name: &str) -> Option<&PredefinedArea> {
        self.predefined_areas
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

/// Hazard monitored by the institution; drives the event choice list and
/// per-event icon lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardEventType {
    pub event: String,
    pub icon: String,
}

/// Named, reusable alert area configured by the institution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredefinedArea {
    pub name: String,
    pub geometry: geojson::Geometry,
}

//! Core CAP 1.2 domain model and codec.
//!
//! Pure types and transformations only: no I/O, no clocks, no global
//! state. Everything time- or site-dependent is passed in explicitly.

pub mod alert;
pub mod area;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod info;
pub mod settings;
pub mod taxonomy;
pub mod timestamp;
pub mod xml;

pub use alert::{Alert, Address, MsgType, Scope, Status};
pub use area::{Area, CapArea, NamedValue};
pub use error::DomainError;
pub use ids::{Identifier, Reference};
pub use info::{EventStatus, Info, Resource};
pub use settings::{CapSettings, HazardEventType, PredefinedArea};
pub use taxonomy::{Category, Certainty, ResponseType, Severity, Urgency};
pub use xml::import::{import_alert, parse_alert_xml, AlertData, ImportError, ValidationMode};
pub use xml::{attach_stylesheet, serialize_alert, SerializeError, CAP_NAMESPACE};

//! CAP 1.2 XML rendering.
//!
//! Serialization is a pure function of the envelope, its info blocks, and
//! the settings snapshot: identical input state yields byte-identical
//! output, which is what allows the rendered document to be cached by
//! identifier.

pub mod import;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use crate::alert::{Alert, MsgType, Scope};
use crate::area::NamedValue;
use crate::error::DomainError;
use crate::info::Info;
use crate::settings::CapSettings;
use crate::timestamp::format_cap_utc;

pub const CAP_NAMESPACE: &str = "urn:oasis:names:tc:emergency:cap:1.2";

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("{0}")]
    Domain(#[from] DomainError),
    #[error("xml write failed: {0}")]
    Write(String),
}

struct CapWriter {
    inner: Writer<Vec<u8>>,
}

impl CapWriter {
    fn new() -> Self {
        Self {
            inner: Writer::new(Vec::new()),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), SerializeError> {
        self.inner
            .write_event(event)
            .map_err(|e| SerializeError::Write(e.to_string()))
    }

    fn start(&mut self, name: &str) -> Result<(), SerializeError> {
        self.event(Event::Start(BytesStart::new(format!("cap:{name}"))))
    }

    fn end(&mut self, name: &str) -> Result<(), SerializeError> {
        self.event(Event::End(BytesEnd::new(format!("cap:{name}"))))
    }

    fn text_element(&mut self, name: &str, value: &str) -> Result<(), SerializeError> {
        self.start(name)?;
        self.event(Event::Text(BytesText::new(value)))?;
        self.end(name)
    }

    /// Elides empty strings; literal `0`/`false` renderings are the
    /// caller's concern and arrive as non-empty text.
    fn optional_element(&mut self, name: &str, value: Option<&str>) -> Result<(), SerializeError> {
        if let Some(v) = value {
            if !v.is_empty() {
                self.text_element(name, v)?;
            }
        }
        Ok(())
    }

    fn named_values(&mut self, name: &str, values: &[NamedValue]) -> Result<(), SerializeError> {
        for nv in values {
            self.start(name)?;
            self.text_element("valueName", &nv.value_name)?;
            self.text_element("value", &nv.value)?;
            self.end(name)?;
        }
        Ok(())
    }

    fn into_bytes(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

/// Renders the envelope as a namespaced CAP 1.2 document, UTF-8 encoded.
/// Field order follows the canonical CAP element sequence; scope and
/// msgType suppression rules are applied regardless of what the model
/// carries.
pub fn serialize_alert(alert: &Alert, settings: &CapSettings) -> Result<Vec<u8>, SerializeError> {
    let mut w = CapWriter::new();
    w.event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut root = BytesStart::new("cap:alert");
    root.push_attribute(("xmlns:cap", CAP_NAMESPACE));
    w.event(Event::Start(root))?;

    w.text_element("identifier", alert.identifier.as_str())?;
    w.text_element("sender", &alert.sender)?;
    w.text_element("sent", &format_cap_utc(&alert.sent))?;
    w.text_element("status", alert.status.as_str())?;
    w.text_element("msgType", alert.msg_type.as_str())?;
    w.optional_element("source", alert.source.as_deref())?;
    w.text_element("scope", alert.scope.as_str())?;

    // Scope suppression: only the distribution-control field the scope
    // makes meaningful survives.
    match alert.scope {
        Scope::Restricted => {
            w.optional_element("restriction", alert.restriction.as_deref())?;
        }
        Scope::Private => {
            let joined = alert
                .addresses
                .iter()
                .map(|a| a.address.clone())
                .collect::<Vec<_>>()
                .join(" ");
            w.optional_element("addresses", Some(&joined).filter(|s| !s.is_empty()).map(|s| s.as_str()))?;
        }
        Scope::Public => {}
    }

    w.optional_element("code", alert.code.as_deref())?;

    // msgType suppression: note is dropped for Update/Cancel, and both
    // note and references for Alert.
    if alert.msg_type != MsgType::Alert && !alert.references.is_empty() {
        let refs = alert
            .references
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        w.text_element("references", &refs)?;
    }

    if !alert.incidents.is_empty() {
        let incidents = alert
            .incidents
            .iter()
            .map(|i| format!("\"{i}\""))
            .collect::<Vec<_>>()
            .join(" ");
        w.text_element("incidents", &incidents)?;
    }

    for info in &alert.info {
        write_info(&mut w, alert, info, settings)?;
    }

    w.event(Event::End(BytesEnd::new("cap:alert")))?;
    Ok(w.into_bytes())
}

fn write_info(
    w: &mut CapWriter,
    alert: &Alert,
    info: &Info,
    settings: &CapSettings,
) -> Result<(), SerializeError> {
    w.start("info")?;
    w.text_element("language", &info.language)?;
    w.text_element("category", info.category.as_str())?;
    w.text_element("event", &info.event)?;
    for rt in &info.response_type {
        w.text_element("responseType", rt.as_str())?;
    }
    w.text_element("urgency", info.urgency.as_str())?;
    w.text_element("severity", info.severity.as_str())?;
    w.text_element("certainty", info.certainty.as_str())?;
    w.optional_element("audience", info.audience.as_deref())?;
    w.named_values("eventCode", &info.event_code)?;

    // effective falls back to sent so consumers always see a window start
    let effective = info.effective.unwrap_or(alert.sent);
    w.text_element("effective", &format_cap_utc(&effective))?;
    if let Some(onset) = info.onset {
        w.text_element("onset", &format_cap_utc(&onset))?;
    }
    w.text_element("expires", &format_cap_utc(&info.expires))?;

    let sender_name = info
        .sender_name
        .as_deref()
        .or(settings.sender_name.as_deref());
    w.optional_element("senderName", sender_name)?;
    w.optional_element("headline", info.headline.as_deref())?;
    w.optional_element("description", info.description.as_deref())?;
    w.optional_element("instruction", info.instruction.as_deref())?;
    w.optional_element("web", info.web.as_deref())?;
    w.optional_element("contact", info.contact.as_deref())?;
    w.named_values("parameter", &info.parameter)?;

    for resource in &info.resource {
        w.start("resource")?;
        w.text_element("resourceDesc", resource.resource_desc())?;
        w.optional_element("mimeType", resource.mime_type())?;
        if let Some(size) = resource.size() {
            w.text_element("size", &size.to_string())?;
        }
        w.text_element("uri", resource.uri())?;
        w.end("resource")?;
    }

    for area in &info.area {
        let cap_area = area.normalize()?;
        w.start("area")?;
        w.text_element("areaDesc", &cap_area.area_desc)?;
        for ring in &cap_area.polygons {
            w.text_element("polygon", ring)?;
        }
        w.named_values("geocode", &cap_area.geocode)?;
        if let Some(altitude) = cap_area.altitude {
            w.text_element("altitude", &altitude.to_string())?;
        }
        if let Some(ceiling) = cap_area.ceiling {
            w.text_element("ceiling", &ceiling.to_string())?;
        }
        w.end("area")?;
    }

    w.end("info")
}

/// Inserts an `xml-stylesheet` processing instruction after the XML
/// declaration. Applied after signing so the signature covers the alert
/// document itself.
pub fn attach_stylesheet(document: Vec<u8>, stylesheet_url: &str) -> Vec<u8> {
    let pi = format!("\n<?xml-stylesheet type=\"text/xsl\" href=\"{stylesheet_url}\"?>");
    match document.windows(2).position(|w| w == b"?>") {
        Some(pos) => {
            let mut out = Vec::with_capacity(document.len() + pi.len());
            out.extend_from_slice(&document[..pos + 2]);
            out.extend_from_slice(pi.as_bytes());
            out.extend_from_slice(&document[pos + 2..]);
            out
        }
        None => {
            let mut out = pi.trim_start().to_string().into_bytes();
            out.extend_from_slice(&document);
            out
        }
    }
}

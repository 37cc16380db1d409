//! CAP 1.2 XML ingestion.
//!
//! Third-party feeds are messier than our own output: namespace prefixes
//! vary, optional elements appear in odd orders, and some publishers omit
//! fields the standard marks required. Parsing therefore runs in two
//! stages: a lightweight element tree is read first, then a declarative
//! schema walk extracts loosely-typed [`AlertData`] from it. Converting
//! that into a Draft [`Alert`] envelope is a separate, stricter step.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

use crate::alert::{Alert, MsgType, Scope, Status};
use crate::area::{Area, NamedValue};
use crate::error::DomainError;
use crate::geometry;
use crate::ids::Reference;
use crate::info::{Info, Resource};
use crate::settings::CapSettings;
use crate::taxonomy::{Category, Certainty, ResponseType, Severity, Urgency};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("the loaded XML is not a valid CAP alert")]
    NotCapAlert,
    #[error("missing required element: {0}")]
    MissingElement(&'static str),
    #[error("could not parse CAP XML: {0}")]
    MalformedXml(String),
    #[error("invalid timestamp: {0}")]
    BadTimestamp(String),
    #[error("{0}")]
    Domain(#[from] DomainError),
}

/// Strict mode rejects documents missing any element CAP marks required;
/// lenient mode accepts them and leaves the gaps for editorial review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Strict,
    Lenient,
}

// ---------------------------------------------------------------------------
// element tree

#[derive(Debug, Clone, Default)]
struct XmlNode {
    name: String,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlNode {
    /// Matches on the bare element name, tolerating a `cap:` prefix.
    fn is_named(&self, name: &str) -> bool {
        self.name == name || self.name.strip_prefix("cap:") == Some(name)
    }

    fn children_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        let name = name.to_string();
        self.children.iter().filter(move |c| c.is_named(&name))
    }

    fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children_named(name).next()
    }

    fn text_of(&self, name: &str) -> Option<String> {
        self.child(name)
            .map(|c| c.text.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    fn texts_of(&self, name: &str) -> Vec<String> {
        self.children_named(name)
            .map(|c| c.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

fn parse_tree(xml: &str) -> Result<XmlNode, ImportError> {
    let mut reader = Reader::from_str(xml);
    let config = reader.config_mut();
    config.trim_text_start = true;
    config.trim_text_end = true;

    let mut root = XmlNode::default();
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| ImportError::MalformedXml(e.to_string()))?;
        match event {
            Event::Start(e) => {
                stack.push(XmlNode {
                    name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    ..XmlNode::default()
                });
            }
            Event::Empty(e) => {
                let node = XmlNode {
                    name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    ..XmlNode::default()
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => root.children.push(node),
                }
            }
            Event::Text(e) => {
                if let Some(node) = stack.last_mut() {
                    let text = e
                        .unescape()
                        .map_err(|err| ImportError::MalformedXml(err.to_string()))?;
                    node.text.push_str(&text);
                }
            }
            Event::CData(e) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(_) => {
                let node = match stack.pop() {
                    Some(node) => node,
                    None => return Err(ImportError::MalformedXml("unbalanced end tag".into())),
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => root.children.push(node),
                }
            }
            Event::Eof => {
                if !stack.is_empty() {
                    return Err(ImportError::MalformedXml(
                        "unexpected end of document".into(),
                    ));
                }
                break;
            }
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
        }
        buf.clear();
    }
    Ok(root)
}

// ---------------------------------------------------------------------------
// declarative schema

/// One element in the CAP schema, mirroring the standard's cardinality and
/// requiredness. Nested tables describe compound elements.
struct ElementSpec {
    name: &'static str,
    required: bool,
    children: &'static [ElementSpec],
}

impl ElementSpec {
    const fn new(name: &'static str, required: bool) -> Self {
        Self {
            name,
            required,
            children: &[],
        }
    }

    const fn nested(name: &'static str, required: bool, children: &'static [ElementSpec]) -> Self {
        Self {
            name,
            required,
            children,
        }
    }
}

static NAMED_VALUE: &[ElementSpec] = &[
    ElementSpec::new("valueName", true),
    ElementSpec::new("value", true),
];

static RESOURCE_ELEMENTS: &[ElementSpec] = &[
    ElementSpec::new("resourceDesc", true),
    ElementSpec::new("mimeType", false),
    ElementSpec::new("size", false),
    ElementSpec::new("uri", false),
    ElementSpec::new("derefUri", false),
    ElementSpec::new("digest", false),
];

static AREA_ELEMENTS: &[ElementSpec] = &[
    ElementSpec::new("areaDesc", true),
    ElementSpec::new("polygon", false),
    ElementSpec::new("circle", false),
    ElementSpec::nested("geocode", false, NAMED_VALUE),
    ElementSpec::new("altitude", false),
    ElementSpec::new("ceiling", false),
];

static INFO_ELEMENTS: &[ElementSpec] = &[
    ElementSpec::new("language", false),
    ElementSpec::new("category", true),
    ElementSpec::new("event", true),
    ElementSpec::new("responseType", false),
    ElementSpec::new("urgency", true),
    ElementSpec::new("severity", true),
    ElementSpec::new("certainty", true),
    ElementSpec::new("audience", false),
    ElementSpec::nested("eventCode", false, NAMED_VALUE),
    ElementSpec::new("effective", false),
    ElementSpec::new("onset", false),
    ElementSpec::new("expires", false),
    ElementSpec::new("senderName", false),
    ElementSpec::new("headline", false),
    ElementSpec::new("description", false),
    ElementSpec::new("instruction", false),
    ElementSpec::new("web", false),
    ElementSpec::new("contact", false),
    ElementSpec::nested("parameter", false, NAMED_VALUE),
    ElementSpec::nested("resource", false, RESOURCE_ELEMENTS),
    ElementSpec::nested("area", true, AREA_ELEMENTS),
];

static ALERT_ELEMENTS: &[ElementSpec] = &[
    ElementSpec::new("identifier", true),
    ElementSpec::new("sender", true),
    ElementSpec::new("sent", true),
    ElementSpec::new("status", true),
    ElementSpec::new("msgType", true),
    ElementSpec::new("source", false),
    ElementSpec::new("scope", true),
    ElementSpec::new("restriction", false),
    ElementSpec::new("addresses", false),
    ElementSpec::new("code", false),
    ElementSpec::new("note", false),
    ElementSpec::new("references", false),
    ElementSpec::new("incidents", false),
    ElementSpec::nested("info", true, INFO_ELEMENTS),
];

fn check_required(node: &XmlNode, schema: &'static [ElementSpec]) -> Result<(), ImportError> {
    for spec in schema {
        let mut matched = node.children_named(spec.name).peekable();
        if spec.required && matched.peek().is_none() {
            return Err(ImportError::MissingElement(spec.name));
        }
        if !spec.children.is_empty() {
            for child in matched {
                check_required(child, spec.children)?;
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// loosely-typed extraction

/// Raw alert content as found in the document, before conversion to a
/// Draft envelope. Singleton elements are coerced to lists where CAP
/// allows repetition.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertData {
    pub identifier: String,
    pub sender: String,
    pub sent: DateTime<Utc>,
    pub status: String,
    pub msg_type: String,
    pub scope: String,
    pub source: Option<String>,
    pub restriction: Option<String>,
    pub addresses: Option<String>,
    pub code: Option<String>,
    pub note: Option<String>,
    pub references: Vec<String>,
    pub incidents: Option<String>,
    pub info: Vec<InfoData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfoData {
    pub language: Option<String>,
    pub category: Vec<String>,
    pub event: String,
    pub response_type: Vec<String>,
    pub urgency: String,
    pub severity: String,
    pub certainty: String,
    pub audience: Option<String>,
    pub event_code: Vec<NamedValue>,
    pub effective: Option<DateTime<Utc>>,
    pub onset: Option<DateTime<Utc>>,
    pub expires: Option<DateTime<Utc>>,
    pub sender_name: Option<String>,
    pub headline: Option<String>,
    pub description: Option<String>,
    pub instruction: Option<String>,
    pub web: Option<String>,
    pub contact: Option<String>,
    pub parameter: Vec<NamedValue>,
    pub resource: Vec<ResourceData>,
    pub area: Vec<AreaData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceData {
    pub resource_desc: String,
    pub mime_type: Option<String>,
    pub size: Option<u64>,
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AreaData {
    pub area_desc: String,
    pub polygon: Vec<String>,
    pub circle: Vec<String>,
    pub geocode: Vec<NamedValue>,
    pub altitude: Option<f64>,
    pub ceiling: Option<f64>,
    /// GeoJSON reconstruction of the polygon (or circle) sub-elements.
    pub geometry: Option<geojson::Geometry>,
}

/// Parses a CAP document into [`AlertData`]. The root element must be a
/// CAP `<alert>`, with or without a namespace prefix. Timestamps carrying
/// no offset are interpreted in `timezone`; everything lands as UTC.
pub fn parse_alert_xml(
    xml: &str,
    mode: ValidationMode,
    timezone: Tz,
) -> Result<AlertData, ImportError> {
    let tree = parse_tree(xml)?;
    let alert = tree
        .children
        .iter()
        .find(|n| n.is_named("alert"))
        .ok_or(ImportError::NotCapAlert)?;

    if mode == ValidationMode::Strict {
        check_required(alert, ALERT_ELEMENTS)?;
    }

    let sent = alert
        .text_of("sent")
        .ok_or(ImportError::MissingElement("sent"))
        .and_then(|s| parse_cap_timestamp(&s, timezone))?;

    let references = alert
        .text_of("references")
        .map(|r| r.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    let mut info = Vec::new();
    for node in alert.children_named("info") {
        info.push(extract_info(node, timezone)?);
    }

    Ok(AlertData {
        identifier: alert.text_of("identifier").unwrap_or_default(),
        sender: alert.text_of("sender").unwrap_or_default(),
        sent,
        status: alert.text_of("status").unwrap_or_default(),
        msg_type: alert.text_of("msgType").unwrap_or_default(),
        scope: alert.text_of("scope").unwrap_or_default(),
        source: alert.text_of("source"),
        restriction: alert.text_of("restriction"),
        addresses: alert.text_of("addresses"),
        code: alert.text_of("code"),
        note: alert.text_of("note"),
        references,
        incidents: alert.text_of("incidents"),
        info,
    })
}

fn extract_info(node: &XmlNode, timezone: Tz) -> Result<InfoData, ImportError> {
    let mut area = Vec::new();
    for area_node in node.children_named("area") {
        area.push(extract_area(area_node)?);
    }

    let mut resource = Vec::new();
    for res in node.children_named("resource") {
        resource.push(ResourceData {
            resource_desc: res.text_of("resourceDesc").unwrap_or_default(),
            mime_type: res.text_of("mimeType"),
            size: res.text_of("size").and_then(|s| s.parse().ok()),
            uri: res.text_of("uri"),
        });
    }

    Ok(InfoData {
        language: node.text_of("language"),
        category: node.texts_of("category"),
        event: node.text_of("event").unwrap_or_default(),
        response_type: node.texts_of("responseType"),
        urgency: node.text_of("urgency").unwrap_or_default(),
        severity: node.text_of("severity").unwrap_or_default(),
        certainty: node.text_of("certainty").unwrap_or_default(),
        audience: node.text_of("audience"),
        event_code: extract_named_values(node, "eventCode"),
        effective: optional_timestamp(node, "effective", timezone)?,
        onset: optional_timestamp(node, "onset", timezone)?,
        expires: optional_timestamp(node, "expires", timezone)?,
        sender_name: node.text_of("senderName"),
        headline: node.text_of("headline"),
        description: node.text_of("description"),
        instruction: node.text_of("instruction"),
        web: node.text_of("web"),
        contact: node.text_of("contact"),
        parameter: extract_named_values(node, "parameter"),
        resource,
        area,
    })
}

fn extract_area(node: &XmlNode) -> Result<AreaData, ImportError> {
    let polygon = node.texts_of("polygon");
    let circle = node.texts_of("circle");

    // Polygon wins when both appear; the circle is kept verbatim either way.
    // Document circles are "lat,lon radius"; the codec wants lon-first.
    let geometry = if !polygon.is_empty() {
        Some(geometry::cap_strings_to_geometry(&polygon)?.0)
    } else if !circle.is_empty() {
        let flipped: Vec<String> = circle
            .iter()
            .map(|c| flip_circle_axes(c).unwrap_or_else(|| c.clone()))
            .collect();
        Some(geometry::cap_circles_to_geometry(&flipped)?.0)
    } else {
        None
    };

    Ok(AreaData {
        area_desc: node.text_of("areaDesc").unwrap_or_default(),
        polygon,
        circle,
        geocode: extract_named_values(node, "geocode"),
        altitude: node.text_of("altitude").and_then(|v| v.parse().ok()),
        ceiling: node.text_of("ceiling").and_then(|v| v.parse().ok()),
        geometry,
    })
}

fn extract_named_values(node: &XmlNode, name: &str) -> Vec<NamedValue> {
    node.children_named(name)
        .filter_map(|nv| {
            let value_name = nv.text_of("valueName")?;
            let value = nv.text_of("value")?;
            Some(NamedValue::new(value_name, value))
        })
        .collect()
}

fn optional_timestamp(
    node: &XmlNode,
    name: &str,
    timezone: Tz,
) -> Result<Option<DateTime<Utc>>, ImportError> {
    node.text_of(name)
        .map(|s| parse_cap_timestamp(&s, timezone))
        .transpose()
}

/// Accepts RFC 3339 offsets (including CAP's `-00:00`) and, from sloppier
/// feeds, naive timestamps which are read as local time in the configured
/// timezone.
fn parse_cap_timestamp(s: &str, timezone: Tz) -> Result<DateTime<Utc>, ImportError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map_err(|_| ImportError::BadTimestamp(s.to_string()))?;
    timezone
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ImportError::BadTimestamp(s.to_string()))
}

// ---------------------------------------------------------------------------
// envelope construction

/// Converts parsed content into a Draft envelope for editorial review.
/// The original identifier and sent timestamp are preserved and protected
/// from re-stamping; status always lands as Draft regardless of what the
/// source document claimed.
pub fn build_draft_alert(
    data: &AlertData,
    settings: &CapSettings,
) -> Result<Alert, ImportError> {
    let mut alert = Alert::new(
        data.sender.clone(),
        data.sent,
        Status::Draft,
        MsgType::parse(&data.msg_type)?,
        Scope::parse(&data.scope)?,
        None,
    );
    alert.identifier = data.identifier.clone().into();
    alert.imported = true;
    alert.source = data.source.clone();
    alert.restriction = data.restriction.clone();
    alert.code = data.code.clone();
    alert.note = data.note.clone();
    for reference in &data.references {
        alert.references.push(Reference::parse(reference)?);
    }

    for info_data in &data.info {
        alert.info.push(build_info(info_data, data, settings)?);
    }
    Ok(alert)
}

fn build_info(
    data: &InfoData,
    alert: &AlertData,
    settings: &CapSettings,
) -> Result<Info, ImportError> {
    let category = match data.category.first() {
        Some(code) => Category::parse(code)?,
        None => Category::Other,
    };
    let expires = data
        .expires
        .ok_or(ImportError::MissingElement("expires"))?;

    let mut info = Info::new(
        category,
        data.event.clone(),
        parse_or_unknown(&data.urgency, Urgency::parse, Urgency::Unknown)?,
        parse_or_unknown(&data.severity, Severity::parse, Severity::Unknown)?,
        parse_or_unknown(&data.certainty, Certainty::parse, Certainty::Unknown)?,
        expires,
    );
    info.language = data
        .language
        .clone()
        .unwrap_or_else(|| settings.default_language.clone());
    for rt in &data.response_type {
        info.response_type.push(ResponseType::parse(rt)?);
    }
    info.audience = data.audience.clone();
    info.event_code = data.event_code.clone();
    // effective stays unset when absent; the serializer falls back to sent
    info.effective = data.effective.filter(|e| *e != alert.sent);
    info.onset = data.onset;
    info.sender_name = data.sender_name.clone();
    // a feed without a headline still needs something to show in lists
    info.headline = data.headline.clone().or_else(|| Some(data.event.clone()));
    info.description = data.description.clone();
    info.instruction = data.instruction.clone();
    info.web = data.web.clone();
    info.contact = data.contact.clone();
    info.parameter = data.parameter.clone();

    for res in &data.resource {
        if let Some(uri) = &res.uri {
            info.resource.push(Resource::External {
                resource_desc: res.resource_desc.clone(),
                uri: uri.clone(),
            });
        }
    }

    for area in &data.area {
        info.area.push(build_area(area));
    }
    Ok(info)
}

fn build_area(data: &AreaData) -> Area {
    if !data.polygon.is_empty() {
        if let Some(geometry) = &data.geometry {
            return Area::Polygon {
                area_desc: data.area_desc.clone(),
                geometry: geometry.clone(),
                geocode: data.geocode.clone(),
                altitude: data.altitude,
                ceiling: data.ceiling,
            };
        }
    }
    if let Some(circle) = data.circle.first() {
        let flipped = flip_circle_axes(circle).unwrap_or_else(|| circle.clone());
        return Area::Circle {
            area_desc: data.area_desc.clone(),
            circle: flipped,
            altitude: data.altitude,
            ceiling: data.ceiling,
        };
    }
    Area::Geocode {
        area_desc: data.area_desc.clone(),
        geocode: data.geocode.clone(),
    }
}

fn flip_circle_axes(circle: &str) -> Option<String> {
    let (center, radius) = circle.split_once(' ')?;
    let (lat, lon) = center.split_once(',')?;
    Some(format!("{},{} {}", lon.trim(), lat.trim(), radius.trim()))
}

/// One-call import path: parse, then build the Draft envelope.
pub fn import_alert(
    xml: &str,
    mode: ValidationMode,
    settings: &CapSettings,
) -> Result<Alert, ImportError> {
    let data = parse_alert_xml(xml, mode, settings.timezone)?;
    build_draft_alert(&data, settings)
}

fn parse_or_unknown<T>(
    code: &str,
    parse: impl Fn(&str) -> Result<T, DomainError>,
    fallback: T,
) -> Result<T, ImportError> {
    if code.is_empty() {
        return Ok(fallback);
    }
    Ok(parse(code)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::serialize_alert;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<cap:alert xmlns:cap="urn:oasis:names:tc:emergency:cap:1.2">
  <cap:identifier>urn:oid:2.49.0.0.404.2024.3.5.9.7.0</cap:identifier>
  <cap:sender>alerts@meteo.example</cap:sender>
  <cap:sent>2024-03-05T09:07:00-00:00</cap:sent>
  <cap:status>Actual</cap:status>
  <cap:msgType>Alert</cap:msgType>
  <cap:scope>Public</cap:scope>
  <cap:info>
    <cap:language>en</cap:language>
    <cap:category>Met</cap:category>
    <cap:event>Flash Flood</cap:event>
    <cap:responseType>Evacuate</cap:responseType>
    <cap:urgency>Immediate</cap:urgency>
    <cap:severity>Extreme</cap:severity>
    <cap:certainty>Observed</cap:certainty>
    <cap:effective>2024-03-05T09:07:00-00:00</cap:effective>
    <cap:expires>2024-03-06T09:07:00-00:00</cap:expires>
    <cap:headline>Flash flooding along the river</cap:headline>
    <cap:description>Rising water levels after sustained rain.</cap:description>
    <cap:area>
      <cap:areaDesc>Riverside district</cap:areaDesc>
      <cap:polygon>0,0 0,1 1,1 1,0 0,0</cap:polygon>
      <cap:geocode>
        <cap:valueName>ISO3166-2</cap:valueName>
        <cap:value>KE-30</cap:value>
      </cap:geocode>
    </cap:area>
  </cap:info>
</cap:alert>"#;

    fn settings() -> CapSettings {
        CapSettings::new("alerts@meteo.example")
    }

    #[test]
    fn sample_document_parses_strictly() {
        let data = parse_alert_xml(SAMPLE, ValidationMode::Strict, Tz::UTC).unwrap();
        assert_eq!(data.sender, "alerts@meteo.example");
        assert_eq!(data.status, "Actual");
        assert_eq!(data.info.len(), 1);
        assert_eq!(data.info[0].event, "Flash Flood");
        assert_eq!(data.info[0].category, vec!["Met".to_string()]);
        assert_eq!(data.info[0].area[0].geocode[0].value, "KE-30");
    }

    #[test]
    fn unprefixed_elements_parse_too() {
        let xml = SAMPLE.replace("<cap:", "<").replace("</cap:", "</");
        let data = parse_alert_xml(&xml, ValidationMode::Strict, Tz::UTC).unwrap();
        assert_eq!(data.info[0].event, "Flash Flood");
    }

    #[test]
    fn polygon_reconstructs_geojson_geometry() {
        let data = parse_alert_xml(SAMPLE, ValidationMode::Strict, Tz::UTC).unwrap();
        let geometry = data.info[0].area[0].geometry.as_ref().unwrap();
        match &geometry.value {
            geojson::Value::Polygon(rings) => {
                assert_eq!(rings.len(), 1);
                // lat,lon in the document becomes lon,lat positions
                assert_eq!(rings[0][1], vec![1.0, 0.0]);
            }
            other => panic!("expected Polygon, got {other:?}"),
        }
    }

    #[test]
    fn missing_required_element_fails_strict_but_not_lenient() {
        let xml = SAMPLE
            .replace("<cap:urgency>Immediate</cap:urgency>", "");
        let strict = parse_alert_xml(&xml, ValidationMode::Strict, Tz::UTC);
        assert!(matches!(strict, Err(ImportError::MissingElement("urgency"))));

        let lenient = parse_alert_xml(&xml, ValidationMode::Lenient, Tz::UTC).unwrap();
        assert_eq!(lenient.info[0].urgency, "");
    }

    #[test]
    fn child_lookup_outlives_the_name_binding() {
        let tree = parse_tree(SAMPLE).unwrap();
        let alert = {
            let name = String::from("alert");
            tree.child(&name)
        }
        .unwrap();
        assert_eq!(alert.text_of("sender").as_deref(), Some("alerts@meteo.example"));
    }

    #[test]
    fn non_cap_root_is_rejected() {
        let result = parse_alert_xml("<feed><entry/></feed>", ValidationMode::Strict, Tz::UTC);
        assert!(matches!(result, Err(ImportError::NotCapAlert)));
    }

    #[test]
    fn truncated_document_is_malformed() {
        let result = parse_alert_xml("<cap:alert><cap:identifier>x", ValidationMode::Lenient, Tz::UTC);
        assert!(matches!(result, Err(ImportError::MalformedXml(_))));
    }

    #[test]
    fn bad_timestamp_is_reported() {
        let xml = SAMPLE.replace("2024-03-05T09:07:00-00:00", "yesterday");
        let result = parse_alert_xml(&xml, ValidationMode::Strict, Tz::UTC);
        assert!(matches!(result, Err(ImportError::BadTimestamp(_))));
    }

    #[test]
    fn naive_timestamps_are_read_in_the_configured_timezone() {
        let xml = SAMPLE.replace("2024-03-05T09:07:00-00:00", "2024-03-05T09:07:00");
        let data =
            parse_alert_xml(&xml, ValidationMode::Strict, chrono_tz::Africa::Nairobi).unwrap();

        // 09:07 Nairobi wall time is 06:07 UTC
        assert_eq!(
            data.sent,
            DateTime::parse_from_rfc3339("2024-03-05T06:07:00Z").unwrap()
        );
    }

    #[test]
    fn draft_envelope_preserves_identity_and_marks_imported() {
        let alert = import_alert(SAMPLE, ValidationMode::Strict, &settings()).unwrap();
        assert!(alert.imported);
        assert_eq!(alert.status, Status::Draft);
        assert_eq!(
            alert.identifier.as_str(),
            "urn:oid:2.49.0.0.404.2024.3.5.9.7.0"
        );

        // re-stamping must not move the original timestamp
        let sent = alert.sent;
        let mut alert = alert;
        alert.stamp_sent(Utc::now(), None);
        assert_eq!(alert.sent, sent);
    }

    #[test]
    fn effective_equal_to_sent_collapses_to_fallback() {
        let alert = import_alert(SAMPLE, ValidationMode::Strict, &settings()).unwrap();
        assert_eq!(alert.info[0].effective, None);
    }

    #[test]
    fn headline_falls_back_to_event() {
        let xml = SAMPLE.replace(
            "<cap:headline>Flash flooding along the river</cap:headline>",
            "",
        );
        let alert = import_alert(&xml, ValidationMode::Strict, &settings()).unwrap();
        assert_eq!(alert.info[0].headline.as_deref(), Some("Flash Flood"));
    }

    #[test]
    fn circle_area_flips_to_internal_axis_order() {
        let xml = SAMPLE.replace(
            "<cap:polygon>0,0 0,1 1,1 1,0 0,0</cap:polygon>",
            "<cap:circle>20,10 5</cap:circle>",
        );
        let alert = import_alert(&xml, ValidationMode::Strict, &settings()).unwrap();
        match &alert.info[0].area[0] {
            Area::Circle { circle, .. } => assert_eq!(circle, "10,20 5"),
            other => panic!("expected circle area, got {other:?}"),
        }
    }

    #[test]
    fn geocode_only_area_survives() {
        let xml = SAMPLE.replace("<cap:polygon>0,0 0,1 1,1 1,0 0,0</cap:polygon>", "");
        let alert = import_alert(&xml, ValidationMode::Strict, &settings()).unwrap();
        match &alert.info[0].area[0] {
            Area::Geocode { geocode, .. } => assert_eq!(geocode[0].value, "KE-30"),
            other => panic!("expected geocode area, got {other:?}"),
        }
    }

    #[test]
    fn serialized_output_parses_back_losslessly() {
        let alert = import_alert(SAMPLE, ValidationMode::Strict, &settings()).unwrap();
        let mut published = alert.clone();
        published.status = Status::Actual;

        let xml = serialize_alert(&published, &settings()).unwrap();
        let data = parse_alert_xml(
            std::str::from_utf8(&xml).unwrap(),
            ValidationMode::Strict,
            Tz::UTC,
        )
        .unwrap();

        assert_eq!(data.identifier, published.identifier.as_str());
        assert_eq!(data.sender, published.sender);
        assert_eq!(data.sent, published.sent);
        assert_eq!(data.status, "Actual");
        assert_eq!(data.msg_type, "Alert");
        assert_eq!(data.scope, "Public");
        assert_eq!(data.info.len(), 1);
        assert_eq!(data.info[0].event, "Flash Flood");
        assert_eq!(data.info[0].severity, "Extreme");
        assert_eq!(data.info[0].expires, Some(published.info[0].expires));
        assert_eq!(data.info[0].area[0].polygon.len(), 1);

        // the area footprint survives the round trip
        let before = parse_alert_xml(SAMPLE, ValidationMode::Strict, Tz::UTC).unwrap();
        let bbox = |d: &AlertData| {
            let geom = geometry::geojson_to_geo(
                d.info[0].area[0].geometry.as_ref().unwrap(),
            )
            .unwrap();
            geometry::bounding_box(&geom).unwrap()
        };
        let (a, b) = (bbox(&before), bbox(&data));
        assert!((a.min().x - b.min().x).abs() < 1e-9);
        assert!((a.max().y - b.max().y).abs() < 1e-9);
    }
}

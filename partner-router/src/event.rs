//! One inbound telemetry event.
//!
//! The payload is kept as an opaque JSON object so that unknown fields pass
//! through untouched. The few fields routing depends on are read once into a
//! typed header when the event is built; derived values (normalized event
//! id, owning partner) are computed at the same time and never change
//! afterwards, even though the payload itself is later mutated by
//! [`Event::update_type`] and by cleaning.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    cleaning::normalize_event_id,
    error::{Result, RouterError},
    partner::{Partner, PartnerRegistry},
};

/// Schema version whose events are never forwarded.
pub const LEGACY_SCHEMA_VERSION: &str = "1.0";

/// Value written into the `type` field of every routed event.
pub const PARTNER_EVENT_TYPE: &str = "partner.events";

const TYPE_FIELD: &str = "type";
const PARTNER_TAG: &str = "partnerid";

/// The payload fields this crate reads.
///
/// Only `eid` is strictly typed. The correlation fields are kept as raw JSON
/// so a value of an unexpected type never fails the message.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
struct EventHeader {
    /// Message id, used for log correlation.
    mid: Option<Value>,
    /// Event kind code, e.g. `ME_FEED`.
    eid: Option<String>,
    /// Event timestamp.
    ts: Option<Value>,
    /// Epoch timestamp, read when `ts` is absent.
    ets: Option<Value>,
    /// Session id.
    sid: Option<Value>,
    /// Schema version.
    ver: Option<Value>,
    /// Telemetry tags; partner ownership is declared here.
    tags: Option<Value>,
}

/// Renders a correlation field: strings as-is, numbers as text, else empty.
fn correlation_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

/// A parsed event together with its mutable payload.
#[derive(Clone, Debug)]
pub struct Event {
    header: EventHeader,
    event_id: String,
    partner: Option<Partner>,
    data: Map<String, Value>,
}

impl Event {
    /// Builds an event from a raw payload.
    ///
    /// Fails with [`RouterError::MalformedInput`] when the payload is not a
    /// JSON object or a header field has the wrong JSON type. Absent fields
    /// are fine.
    pub fn from_payload(payload: Value, partners: &PartnerRegistry) -> Result<Self> {
        let header = EventHeader::deserialize(&payload)?;
        let Value::Object(data) = payload else {
            return Err(RouterError::malformed("event payload is not a JSON object"));
        };

        let event_id = normalize_event_id(header.eid.as_deref().unwrap_or_default());
        let partner = header
            .tags
            .as_ref()
            .and_then(|tags| {
                declared_partner_ids(tags)
                    .into_iter()
                    .find_map(|id| partners.lookup(id))
            })
            .cloned();

        Ok(Self {
            header,
            event_id,
            partner,
            data,
        })
    }

    /// True when the event declares a recognized partner as its owner.
    pub fn partner_membership(&self) -> bool {
        self.partner.is_some()
    }

    pub fn partner(&self) -> Option<&Partner> {
        self.partner.as_ref()
    }

    /// Normalized event kind; empty when the payload has no `eid`.
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    /// Routing segment of the owning partner.
    pub fn route_to(&self) -> Option<&str> {
        self.partner.as_ref().map(Partner::segment)
    }

    /// Marks the payload as a partner event for downstream consumers.
    ///
    /// Called once, for partner events only, before the event is forwarded.
    pub fn update_type(&mut self) {
        self.data.insert(
            TYPE_FIELD.to_string(),
            Value::String(PARTNER_EVENT_TYPE.to_string()),
        );
    }

    /// Message id; empty when absent or not a string or number.
    pub fn id(&self) -> String {
        correlation_text(self.header.mid.as_ref())
    }

    /// Event timestamp as text; `ts` is preferred over `ets`.
    pub fn timestamp(&self) -> String {
        correlation_text(self.header.ts.as_ref().or(self.header.ets.as_ref()))
    }

    pub fn session_id(&self) -> String {
        correlation_text(self.header.sid.as_ref())
    }

    pub fn version(&self) -> Option<&Value> {
        self.header.ver.as_ref()
    }

    /// True when `ver` is the legacy schema version string.
    pub fn is_legacy_version(&self) -> bool {
        matches!(self.version(), Some(Value::String(ver)) if ver == LEGACY_SCHEMA_VERSION)
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.data
    }

    /// Hands the payload over, ending the event's lifetime.
    pub fn into_data(self) -> Map<String, Value> {
        self.data
    }
}

/// Partner ids declared under `partnerid` in the tags, in declaration order.
///
/// Tags are usually an array of objects; a single object is accepted too.
/// `partnerid` may hold a string or an array of strings.
fn declared_partner_ids(tags: &Value) -> Vec<&str> {
    let tag_objects: Vec<&Value> = match tags {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    tag_objects
        .into_iter()
        .filter_map(|tag| tag.get(PARTNER_TAG))
        .flat_map(|declared| match declared {
            Value::String(id) => vec![id.as_str()],
            Value::Array(ids) => ids.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        })
        .collect()
}

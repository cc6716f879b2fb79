//! `slog` adapters for routed events.
//!
//! This module is responsible for:
//! - Deriving a per-event child logger that carries the event id, so every
//!   line the router emits for one message can be correlated.
//! - Emitting a cleaned payload as structured JSON via `slog`'s nested-value
//!   support.
//!
//! Logging is infallible from the router's point of view: a serializer error
//! is answered with a placeholder string, never propagated.

use serde_json::{Map, Value as JsonValue};
use slog::{o, Key, Logger, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::event::Event;

/// Key under which the event id is attached to per-event loggers.
pub const EVENT_ID_KEY: &str = "event_id";

const UNSERIALIZABLE_PAYLOAD: &str = "Failed to serialize cleaned payload";

/// Child of `logger` carrying the event id of `event`.
pub fn event_logger(logger: &Logger, event: &Event) -> Logger {
    logger.new(o!(EVENT_ID_KEY => event.id()))
}

/// A `slog::Value` that emits a cleaned payload as nested JSON.
///
/// Borrows the payload; the JSON tree is only built when a drain actually
/// serializes the record.
pub struct CleanedJson<'a> {
    payload: &'a Map<String, JsonValue>,
}

impl<'a> CleanedJson<'a> {
    pub fn new(payload: &'a Map<String, JsonValue>) -> Self {
        Self { payload }
    }
}

impl SlogValue for CleanedJson<'_> {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let nested = slog::Serde(JsonValue::Object(self.payload.clone()));
        SlogValue::serialize(&nested, record, key, serializer)
            .or_else(|_| serializer.emit_str(key, UNSERIALIZABLE_PAYLOAD))
    }
}

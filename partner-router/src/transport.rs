//! Message transport boundary.
//!
//! The router reads [`IncomingEnvelope`]s and writes [`OutgoingEnvelope`]s to a
//! [`MessageSink`]. Broker clients live outside this crate and implement the
//! sink trait; [`MemorySink`] records envelopes in memory.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, SendError};

/// Transport system name used for every output stream.
pub const OUTPUT_SYSTEM: &str = "kafka";

/// One inbound message: a single JSON event.
#[derive(Clone, Debug, PartialEq)]
pub struct IncomingEnvelope {
    payload: Value,
}

impl IncomingEnvelope {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// Decodes raw message bytes. Bytes that are not JSON are malformed input.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(serde_json::from_slice(bytes)?))
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }
}

impl From<Value> for IncomingEnvelope {
    fn from(payload: Value) -> Self {
        Self::new(payload)
    }
}

/// A named output stream on a transport system.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SystemStream {
    pub system: String,
    pub topic: String,
}

impl SystemStream {
    /// A stream on the [`OUTPUT_SYSTEM`].
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            system: OUTPUT_SYSTEM.to_string(),
            topic: topic.into(),
        }
    }
}

impl fmt::Display for SystemStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.system, self.topic)
    }
}

/// A cleaned event on its way to a partner topic.
///
/// The envelope owns the payload; the event it came from no longer exists.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutgoingEnvelope {
    pub stream: SystemStream,
    pub payload: Map<String, Value>,
}

impl OutgoingEnvelope {
    pub fn new(stream: SystemStream, payload: Map<String, Value>) -> Self {
        Self { stream, payload }
    }

    pub fn topic(&self) -> &str {
        &self.stream.topic
    }

    /// Encodes the payload as JSON for the wire.
    pub fn to_bytes(&self) -> std::result::Result<Vec<u8>, SendError> {
        Ok(serde_json::to_vec(&self.payload)?)
    }
}

/// Destination for outgoing envelopes.
pub trait MessageSink {
    /// Publishes one envelope. Implementations do not retry on behalf of the router.
    fn send(&mut self, envelope: OutgoingEnvelope) -> std::result::Result<(), SendError>;
}

impl<S> MessageSink for &mut S
where
    S: MessageSink + ?Sized,
{
    fn send(&mut self, envelope: OutgoingEnvelope) -> std::result::Result<(), SendError> {
        (**self).send(envelope)
    }
}

/// Sink that keeps every envelope in memory, in send order.
#[derive(Debug, Default)]
pub struct MemorySink {
    sent: Vec<OutgoingEnvelope>,
    closed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects every later send with [`SendError::Closed`].
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn sent(&self) -> &[OutgoingEnvelope] {
        &self.sent
    }
}

impl MessageSink for MemorySink {
    fn send(&mut self, envelope: OutgoingEnvelope) -> std::result::Result<(), SendError> {
        if self.closed {
            return Err(SendError::Closed);
        }
        self.sent.push(envelope);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map};

    use super::{IncomingEnvelope, MemorySink, MessageSink, OutgoingEnvelope, SystemStream};
    use crate::error::{RouterError, SendError};

    #[test]
    fn incoming_from_slice_parses_json() {
        let envelope = IncomingEnvelope::from_slice(br#"{"eid":"ME_FEED"}"#).unwrap();
        assert_eq!(envelope.payload(), &json!({"eid": "ME_FEED"}));
    }

    #[test]
    fn incoming_from_invalid_bytes_is_malformed() {
        let err = IncomingEnvelope::from_slice(b"\x00not json").unwrap_err();
        assert!(matches!(err, RouterError::MalformedInput { .. }));
    }

    #[test]
    fn output_streams_live_on_kafka() {
        let stream = SystemStream::new("partner.akshara");
        assert_eq!(stream.system, "kafka");
        assert_eq!(stream.to_string(), "kafka/partner.akshara");
    }

    #[test]
    fn outgoing_encodes_payload_only() {
        let mut payload = Map::new();
        payload.insert("eid".to_string(), json!("ME_FEED"));
        let envelope = OutgoingEnvelope::new(SystemStream::new("partner.x"), payload);
        assert_eq!(envelope.to_bytes().unwrap(), br#"{"eid":"ME_FEED"}"#);
    }

    #[test]
    fn memory_sink_records_until_closed() {
        let mut sink = MemorySink::new();
        let envelope = OutgoingEnvelope::new(SystemStream::new("partner.x"), Map::new());
        sink.send(envelope.clone()).unwrap();
        sink.close();
        assert!(matches!(sink.send(envelope), Err(SendError::Closed)));
        assert_eq!(sink.sent().len(), 1);
        assert_eq!(sink.sent()[0].topic(), "partner.x");
    }
}

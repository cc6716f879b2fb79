//! Error types for the routing pipeline.
//!
//! Gate failures are not errors; they surface as [`crate::Outcome::Dropped`].

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, RouterError>;

/// Errors that end processing of a single message.
#[derive(Error, Debug)]
pub enum RouterError {
    /// The inbound envelope could not be read as an event object.
    #[error("malformed input: {reason}")]
    MalformedInput {
        /// What was wrong with the envelope.
        reason: String,
    },

    /// Publishing the cleaned event failed.
    #[error("failed to send event to '{topic}': {source}")]
    SendFailure {
        /// Destination topic of the failed send.
        topic: String,
        #[source]
        source: SendError,
    },
}

impl RouterError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for RouterError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(err.to_string())
    }
}

/// Failure reported by a [`crate::MessageSink`].
#[derive(Error, Debug)]
pub enum SendError {
    /// The sink no longer accepts messages.
    #[error("sink is closed")]
    Closed,

    /// The payload could not be encoded for the wire.
    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Transport-specific failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Invalid startup configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A redaction entry names a classification that does not exist.
    #[error("unknown classification '{0}'")]
    UnknownClassification(String),

    /// A field path is blank or has an empty segment.
    #[error("invalid field path '{0}'")]
    InvalidFieldPath(String),

    /// A redaction entry is missing its `:classification` part.
    #[error("invalid redaction entry '{0}', expected 'path:classification'")]
    InvalidRedaction(String),

    /// A partner id or routing segment is blank.
    #[error("invalid partner entry '{0}', expected 'id' or 'id=segment'")]
    InvalidPartner(String),

    /// The output topic prefix is blank.
    #[error("output topic prefix must not be empty")]
    EmptyTopicPrefix,
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, RouterError, SendError};

    #[test]
    fn malformed_input_display() {
        let err = RouterError::malformed("payload is not an object");
        assert_eq!(err.to_string(), "malformed input: payload is not an object");
    }

    #[test]
    fn send_failure_display_includes_topic_and_cause() {
        let err = RouterError::SendFailure {
            topic: "partner.akshara".to_string(),
            source: SendError::Transport("broker unavailable".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("partner.akshara"));
        assert!(msg.contains("broker unavailable"));
    }

    #[test]
    fn from_json_error_is_malformed_input() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: RouterError = json_err.into();
        assert!(matches!(err, RouterError::MalformedInput { .. }));
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidRedaction("uid".to_string());
        assert!(err.to_string().contains("path:classification"));
        assert_eq!(
            ConfigError::EmptyTopicPrefix.to_string(),
            "output topic prefix must not be empty"
        );
    }
}

//! Field rules: which payload fields are removed or redacted.
//!
//! A rule names a field by dotted path (`edata.eks.loc`) and an action. Paths
//! descend through JSON objects; when an intermediate value is an array the
//! remainder of the path is applied to every element. Missing fields are
//! ignored.

use std::{fmt, str::FromStr};

use serde_json::{Map, Number, Value};

use super::policy::TextRedactionPolicy;
use crate::{classification::Classification, error::ConfigError};

/// A dotted path into an event payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Builds a path from already-split segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl FromStr for FieldPath {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.trim().split('.').map(str::trim).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(ConfigError::InvalidFieldPath(s.trim().to_string()));
        }
        Ok(Self::new(segments))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// What a rule does to the field it names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldAction {
    /// Delete the field.
    Remove,
    /// Replace the field's value using the classification's policy.
    Redact(Classification),
}

/// A single cleaning rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldRule {
    path: FieldPath,
    action: FieldAction,
}

impl FieldRule {
    pub fn remove(path: FieldPath) -> Self {
        Self {
            path,
            action: FieldAction::Remove,
        }
    }

    pub fn redact(path: FieldPath, classification: Classification) -> Self {
        Self {
            path,
            action: FieldAction::Redact(classification),
        }
    }

    /// Parses a `path:classification` redaction entry.
    pub fn parse_redaction(entry: &str) -> Result<Self, ConfigError> {
        let (path, class) = entry
            .split_once(':')
            .ok_or_else(|| ConfigError::InvalidRedaction(entry.trim().to_string()))?;
        Ok(Self::redact(path.parse()?, class.parse()?))
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn action(&self) -> FieldAction {
        self.action
    }

    /// Applies the rule to `payload` in place.
    pub(crate) fn apply(&self, payload: &mut Map<String, Value>) {
        self.apply_in_object(payload, self.path.segments());
    }

    fn apply_in_object(&self, object: &mut Map<String, Value>, segments: &[String]) {
        let Some((head, rest)) = segments.split_first() else {
            return;
        };
        if !rest.is_empty() {
            if let Some(child) = object.get_mut(head) {
                self.descend(child, rest);
            }
            return;
        }
        match self.action {
            FieldAction::Remove => {
                object.remove(head);
            }
            FieldAction::Redact(classification) => {
                if let Some(value) = object.get_mut(head) {
                    redact_value(value, &classification.policy());
                }
            }
        }
    }

    fn descend(&self, value: &mut Value, segments: &[String]) {
        match value {
            Value::Object(object) => self.apply_in_object(object, segments),
            Value::Array(items) => {
                for item in items {
                    self.descend(item, segments);
                }
            }
            _ => {}
        }
    }
}

impl fmt::Display for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            FieldAction::Remove => write!(f, "remove {}", self.path),
            FieldAction::Redact(classification) => {
                write!(f, "redact {} as {classification}", self.path)
            }
        }
    }
}

/// Redacts a JSON value in place.
///
/// Strings go through the text policy, numbers become `0`, booleans become
/// `false`, containers are redacted element-wise and `null` is kept.
pub(crate) fn redact_value(value: &mut Value, policy: &TextRedactionPolicy) {
    match value {
        Value::String(text) => *text = policy.apply_to(text),
        Value::Number(number) => *number = Number::from(0_u64),
        Value::Bool(flag) => *flag = false,
        Value::Array(items) => {
            for item in items {
                redact_value(item, policy);
            }
        }
        Value::Object(fields) => {
            for field in fields.values_mut() {
                redact_value(field, policy);
            }
        }
        Value::Null => {}
    }
}

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::rules::{FieldPath, FieldRule};
use crate::classification::Classification;

/// Normalizes an event id for allow/skip comparisons: trimmed and uppercased.
pub fn normalize_event_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn normalized_set<I>(names: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| normalize_event_id(name.as_ref()))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Decides which events may be forwarded and strips what must not leave the pipeline.
///
/// Built once at startup and shared read-only afterwards. Blank names are
/// dropped during normalization, so an allow-list built from an unset config
/// value is empty and therefore unrestricted.
#[derive(Clone, Debug)]
pub struct CleaningPolicy {
    allow: HashSet<String>,
    skip: HashSet<String>,
    rules: Vec<FieldRule>,
}

impl CleaningPolicy {
    /// Builds a policy from allow and skip names with the default field rules.
    pub fn new<A, S>(allow: A, skip: S) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        Self {
            allow: normalized_set(allow),
            skip: normalized_set(skip),
            rules: Self::default_rules(),
        }
    }

    /// Replaces the field rules.
    #[must_use]
    pub fn with_rules(mut self, rules: Vec<FieldRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Rules applied when configuration does not name any.
    pub fn default_rules() -> Vec<FieldRule> {
        vec![
            FieldRule::remove(FieldPath::new(["udata"])),
            FieldRule::remove(FieldPath::new(["edata", "eks", "loc"])),
            FieldRule::remove(FieldPath::new(["dspec"])),
            FieldRule::redact(FieldPath::new(["edata", "eks", "uname"]), Classification::Pii),
        ]
    }

    /// True when the allow-list is empty or contains `eid`.
    pub fn should_allow_event(&self, eid: &str) -> bool {
        self.allow.is_empty() || self.allow.contains(&normalize_event_id(eid))
    }

    /// True when the skip-list contains `eid`.
    pub fn should_skip_event(&self, eid: &str) -> bool {
        self.skip.contains(&normalize_event_id(eid))
    }

    /// Applies every field rule to `payload`, in order.
    pub fn clean(&self, payload: &mut Map<String, Value>) {
        for rule in &self.rules {
            rule.apply(payload);
        }
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn allow_list_len(&self) -> usize {
        self.allow.len()
    }

    pub fn skip_list_len(&self) -> usize {
        self.skip.len()
    }
}

impl Default for CleaningPolicy {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>(), std::iter::empty::<&str>())
    }
}

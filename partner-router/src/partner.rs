//! Recognized partners and their routing segments.

use std::{collections::HashMap, str::FromStr};

use crate::error::ConfigError;

/// Partner identifiers recognized when configuration does not name any.
pub const DEFAULT_PARTNER_IDS: [&str; 4] = [
    "org.ekstep.partner.akshara",
    "org.ekstep.partner.pratham",
    "org.ekstep.partner.enlearn",
    "9e94fb35",
];

/// An external consumer entitled to a routed subset of events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partner {
    id: String,
    segment: String,
}

impl Partner {
    /// A partner whose routing segment is the last `.`-separated part of its id.
    ///
    /// Fails when the id, or the segment derived from it, is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        let segment = id.rsplit('.').next().unwrap_or_default().to_string();
        Self::with_segment(id, segment)
    }

    /// A partner with an explicit routing segment.
    pub fn with_segment(
        id: impl Into<String>,
        segment: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let (id, segment) = (id.into(), segment.into());
        if id.trim().is_empty() || segment.trim().is_empty() {
            return Err(ConfigError::InvalidPartner(id));
        }
        Ok(Self { id, segment })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Topic segment appended to the output prefix for this partner.
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// The built-in partners.
    pub(crate) fn defaults() -> Vec<Self> {
        DEFAULT_PARTNER_IDS
            .into_iter()
            .filter_map(|id| Self::new(id).ok())
            .collect()
    }
}

impl FromStr for Partner {
    type Err = ConfigError;

    /// Parses `id` or `id=segment`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s.split_once('=') {
            Some((id, segment)) => Partner::with_segment(id.trim(), segment.trim()),
            None => Partner::new(s.trim()),
        };
        parsed.map_err(|_| ConfigError::InvalidPartner(s.trim().to_string()))
    }
}

/// Immutable set of recognized partners, looked up by exact id.
#[derive(Clone, Debug)]
pub struct PartnerRegistry {
    partners: HashMap<String, Partner>,
}

impl PartnerRegistry {
    pub fn new<I>(partners: I) -> Self
    where
        I: IntoIterator<Item = Partner>,
    {
        Self {
            partners: partners
                .into_iter()
                .map(|partner| (partner.id.clone(), partner))
                .collect(),
        }
    }

    /// Exact-match lookup; no trimming or case folding.
    pub fn lookup(&self, id: &str) -> Option<&Partner> {
        self.partners.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.partners.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.partners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }
}

impl Default for PartnerRegistry {
    fn default() -> Self {
        Self::new(Partner::defaults())
    }
}

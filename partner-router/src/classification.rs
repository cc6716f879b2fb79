//! Categories for "what kind of sensitive data is this field?"
//!
//! Cleaning rules are loaded from configuration, so classifications are a
//! runtime enum rather than type-level markers. Each classification carries a
//! default text redaction policy.

use std::{fmt, str::FromStr};

use crate::{cleaning::TextRedactionPolicy, error::ConfigError};

/// Classification of a payload field that must be redacted before forwarding.
///
/// Names are parsed case-insensitively in `snake_case` form:
///
/// ```rust
/// use partner_router::Classification;
///
/// let class: Classification = "ip_address".parse().unwrap();
/// assert_eq!(class, Classification::IpAddress);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Account or user identifiers.
    AccountId,
    /// Dates of birth.
    DateOfBirth,
    /// Device identifiers.
    DeviceId,
    /// Email addresses.
    Email,
    /// IP addresses.
    IpAddress,
    /// Phone numbers.
    PhoneNumber,
    /// Personally identifiable information such as names.
    Pii,
    /// Secrets such as passwords or private keys.
    Secret,
    /// Session identifiers.
    SessionId,
    /// Authentication tokens and API keys.
    Token,
}

impl Classification {
    /// All classifications, in name order.
    pub const ALL: [Classification; 10] = [
        Classification::AccountId,
        Classification::DateOfBirth,
        Classification::DeviceId,
        Classification::Email,
        Classification::IpAddress,
        Classification::PhoneNumber,
        Classification::Pii,
        Classification::Secret,
        Classification::SessionId,
        Classification::Token,
    ];

    /// Returns the configuration name of this classification.
    pub fn as_str(self) -> &'static str {
        match self {
            Classification::AccountId => "account_id",
            Classification::DateOfBirth => "date_of_birth",
            Classification::DeviceId => "device_id",
            Classification::Email => "email",
            Classification::IpAddress => "ip_address",
            Classification::PhoneNumber => "phone_number",
            Classification::Pii => "pii",
            Classification::Secret => "secret",
            Classification::SessionId => "session_id",
            Classification::Token => "token",
        }
    }

    /// Returns the redaction policy applied to string values of this classification.
    pub fn policy(self) -> TextRedactionPolicy {
        match self {
            Classification::DateOfBirth | Classification::Secret => {
                TextRedactionPolicy::default_full()
            }
            Classification::Email => TextRedactionPolicy::keep_first(2),
            Classification::PhoneNumber => TextRedactionPolicy::keep_last(2),
            Classification::AccountId
            | Classification::DeviceId
            | Classification::IpAddress
            | Classification::Pii
            | Classification::SessionId
            | Classification::Token => TextRedactionPolicy::keep_last(4),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Classification::ALL
            .into_iter()
            .find(|class| class.as_str() == wanted)
            .ok_or_else(|| ConfigError::UnknownClassification(s.trim().to_string()))
    }
}

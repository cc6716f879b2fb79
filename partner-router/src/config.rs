//! Router configuration, loaded once at startup.
//!
//! Keys use the dotted task-config form (`events.to.allow`). When reading from
//! the environment the key is uppercased with `.` replaced by `_`
//! (`EVENTS_TO_ALLOW`).

use std::collections::HashMap;

use slog::{info, Logger};

use crate::{
    cleaning::{CleaningPolicy, FieldRule},
    error::ConfigError,
    partner::{Partner, PartnerRegistry},
};

pub const KEY_SUCCESS_TOPIC_PREFIX: &str = "output.success.topic.prefix";
pub const KEY_EVENTS_TO_SKIP: &str = "events.to.skip";
pub const KEY_EVENTS_TO_ALLOW: &str = "events.to.allow";
pub const KEY_PARTNERS: &str = "partners";
pub const KEY_REMOVE_FIELDS: &str = "cleaning.fields.remove";
pub const KEY_REDACT_FIELDS: &str = "cleaning.fields.redact";

pub const DEFAULT_SUCCESS_TOPIC_PREFIX: &str = "partner";

/// Splits a comma-separated value, dropping blank entries.
fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|entry| !entry.is_empty())
}

/// Immutable router settings.
#[derive(Clone, Debug)]
pub struct RouterConfig {
    /// Prefix of every output topic.
    pub success_topic_prefix: String,
    /// Event ids to forward; empty forwards every id.
    pub events_to_allow: Vec<String>,
    /// Event ids never forwarded.
    pub events_to_skip: Vec<String>,
    pub partners: Vec<Partner>,
    /// Field rules applied by cleaning, in order.
    pub cleaning_rules: Vec<FieldRule>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            success_topic_prefix: DEFAULT_SUCCESS_TOPIC_PREFIX.to_string(),
            events_to_allow: Vec::new(),
            events_to_skip: Vec::new(),
            partners: Partner::defaults(),
            cleaning_rules: CleaningPolicy::default_rules(),
        }
    }
}

impl RouterConfig {
    /// Builds the configuration from a key lookup.
    ///
    /// Optional (all keys have defaults):
    /// - `output.success.topic.prefix`: topic prefix (default: `"partner"`)
    /// - `events.to.allow`: comma-separated event ids (default: empty, unrestricted)
    /// - `events.to.skip`: comma-separated event ids (default: empty)
    /// - `partners`: comma-separated `id` or `id=segment` (default: built-in partners)
    /// - `cleaning.fields.remove`: comma-separated dotted paths
    /// - `cleaning.fields.redact`: comma-separated `path:classification`
    ///
    /// When neither cleaning key is present the default field rules apply;
    /// setting either one replaces them entirely.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let success_topic_prefix =
            lookup(KEY_SUCCESS_TOPIC_PREFIX).unwrap_or(defaults.success_topic_prefix);
        if success_topic_prefix.trim().is_empty() {
            return Err(ConfigError::EmptyTopicPrefix);
        }

        let list = |key: &str| -> Vec<String> {
            lookup(key)
                .map(|value| split_list(&value).map(str::to_string).collect())
                .unwrap_or_default()
        };
        let events_to_allow = list(KEY_EVENTS_TO_ALLOW);
        let events_to_skip = list(KEY_EVENTS_TO_SKIP);

        let partners = match lookup(KEY_PARTNERS) {
            Some(value) => split_list(&value)
                .map(str::parse::<Partner>)
                .collect::<Result<Vec<Partner>, _>>()?,
            None => defaults.partners,
        };

        let removals = lookup(KEY_REMOVE_FIELDS);
        let redactions = lookup(KEY_REDACT_FIELDS);
        let cleaning_rules = if removals.is_none() && redactions.is_none() {
            defaults.cleaning_rules
        } else {
            let mut rules = Vec::new();
            for path in split_list(removals.as_deref().unwrap_or_default()) {
                rules.push(FieldRule::remove(path.parse()?));
            }
            for entry in split_list(redactions.as_deref().unwrap_or_default()) {
                rules.push(FieldRule::parse_redaction(entry)?);
            }
            rules
        };

        Ok(Self {
            success_topic_prefix,
            events_to_allow,
            events_to_skip,
            partners,
            cleaning_rules,
        })
    }

    /// Builds the configuration from a property map keyed by dotted names.
    pub fn from_properties(properties: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| properties.get(key).cloned())
    }

    /// Builds the configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(Self::env_var_name(key)).ok())
    }

    /// Environment variable holding `key`, e.g. `EVENTS_TO_SKIP`.
    pub fn env_var_name(key: &str) -> String {
        key.to_ascii_uppercase().replace('.', "_")
    }

    /// The allow/skip gate and field rules described by this configuration.
    pub fn cleaning_policy(&self) -> CleaningPolicy {
        CleaningPolicy::new(&self.events_to_allow, &self.events_to_skip)
            .with_rules(self.cleaning_rules.clone())
    }

    pub fn partner_registry(&self) -> PartnerRegistry {
        PartnerRegistry::new(self.partners.iter().cloned())
    }

    /// Logs a one-line summary of the loaded configuration.
    pub fn log_summary(&self, logger: &Logger) {
        let rules: Vec<String> = self.cleaning_rules.iter().map(ToString::to_string).collect();
        info!(logger, "partner router configuration loaded";
            "topic_prefix" => &self.success_topic_prefix,
            "allow" => self.events_to_allow.join(","),
            "skip" => self.events_to_skip.join(","),
            "partner_count" => self.partners.len(),
            "cleaning_rules" => rules.join("; ")
        );
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{RouterConfig, KEY_EVENTS_TO_ALLOW, KEY_EVENTS_TO_SKIP};
    use crate::{
        classification::Classification,
        cleaning::{FieldAction, FieldRule},
        error::ConfigError,
    };

    fn properties(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn load(pairs: &[(&str, &str)]) -> Result<RouterConfig, ConfigError> {
        RouterConfig::from_properties(&properties(pairs))
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.success_topic_prefix, "partner");
        assert!(config.events_to_allow.is_empty());
        assert!(config.events_to_skip.is_empty());
        assert_eq!(config.partners.len(), 4);
        assert_eq!(config.cleaning_rules.len(), 4);
    }

    #[test]
    fn lists_are_split_and_blank_entries_dropped() {
        let config = load(&[
            ("events.to.allow", " me_feed, OE_START ,"),
            ("events.to.skip", ""),
        ])
        .unwrap();
        assert_eq!(config.events_to_allow, ["me_feed", "OE_START"]);
        assert!(config.events_to_skip.is_empty());

        let policy = config.cleaning_policy();
        assert!(policy.should_allow_event("ME_FEED"));
        assert!(!policy.should_allow_event("GE_START"));
    }

    #[test]
    fn empty_topic_prefix_is_rejected() {
        let err = load(&[("output.success.topic.prefix", "  ")]).unwrap_err();
        assert_eq!(err, ConfigError::EmptyTopicPrefix);
    }

    #[test]
    fn partners_can_be_configured() {
        let config = load(&[("partners", "org.example.alpha, org.example.beta=b")]).unwrap();
        let registry = config.partner_registry();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("org.example.alpha").unwrap().segment(), "alpha");
        assert_eq!(registry.lookup("org.example.beta").unwrap().segment(), "b");
        assert!(!registry.contains("9e94fb35"));
    }

    #[test]
    fn empty_partner_list_recognizes_nobody() {
        let registry = load(&[("partners", " , ")]).unwrap().partner_registry();
        assert!(registry.is_empty());
    }

    #[test]
    fn invalid_partner_entry_fails() {
        let err = load(&[("partners", "org.example.alpha,=x")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPartner(_)));
    }

    #[test]
    fn cleaning_keys_replace_default_rules() {
        let config = load(&[
            ("cleaning.fields.remove", "udata"),
            ("cleaning.fields.redact", "did:device_id, edata.eks.ip:ip_address"),
        ])
        .unwrap();
        assert_eq!(config.cleaning_rules.len(), 3);
        assert_eq!(config.cleaning_rules[0].action(), FieldAction::Remove);
        assert_eq!(
            config.cleaning_rules[2],
            FieldRule::redact("edata.eks.ip".parse().unwrap(), Classification::IpAddress)
        );
    }

    #[test]
    fn empty_cleaning_key_disables_cleaning() {
        let config = load(&[("cleaning.fields.remove", "")]).unwrap();
        assert!(config.cleaning_rules.is_empty());
    }

    #[test]
    fn bad_cleaning_entries_fail() {
        assert!(matches!(
            load(&[("cleaning.fields.redact", "uid:nickname")]).unwrap_err(),
            ConfigError::UnknownClassification(_)
        ));
        assert!(matches!(
            load(&[("cleaning.fields.remove", "edata..loc")]).unwrap_err(),
            ConfigError::InvalidFieldPath(_)
        ));
    }

    #[test]
    fn env_var_names_are_derived_from_keys() {
        assert_eq!(
            RouterConfig::env_var_name("output.success.topic.prefix"),
            "OUTPUT_SUCCESS_TOPIC_PREFIX"
        );
        assert_eq!(RouterConfig::env_var_name(KEY_EVENTS_TO_SKIP), "EVENTS_TO_SKIP");
    }

    #[test]
    fn lookup_accepts_env_style_sources() {
        let env = properties(&[("EVENTS_TO_ALLOW", "ME_FEED")]);
        let config =
            RouterConfig::from_lookup(|key| env.get(&RouterConfig::env_var_name(key)).cloned())
                .unwrap();
        assert_eq!(config.events_to_allow, ["ME_FEED"]);
        assert_eq!(RouterConfig::env_var_name(KEY_EVENTS_TO_ALLOW), "EVENTS_TO_ALLOW");
    }
}

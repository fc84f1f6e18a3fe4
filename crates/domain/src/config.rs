//! Configuration structures
//!
//! Loaded by `roombook-infra::config` from the environment or a TOML/JSON
//! file. Only `sis.base_url` and `sis.username` have no default.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EMAIL_ADDRESS_TYPE, DEFAULT_KEYRING_SERVICE, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SECRET_NAME,
};
use crate::impl_domain_status_conversions;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub sis: SisConfig,
    #[serde(default)]
    pub secret: SecretConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

/// Remote SIS connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SisConfig {
    pub base_url: String,
    pub username: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

/// Where the account password comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub source: SecretSource,
    #[serde(default = "default_secret_name")]
    pub name: String,
    /// Keyring service name (keyring source only)
    #[serde(default = "default_keyring_service")]
    pub service: String,
}

impl Default for SecretConfig {
    fn default() -> Self {
        Self {
            source: SecretSource::default(),
            name: default_secret_name(),
            service: default_keyring_service(),
        }
    }
}

/// Batch import behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default)]
    pub mode: ImportMode,
    #[serde(default)]
    pub orphan_policy: OrphanPolicy,
    #[serde(default = "default_true")]
    pub cache_lookups: bool,
    #[serde(default = "default_email_address_type")]
    pub email_address_type: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            mode: ImportMode::default(),
            orphan_policy: OrphanPolicy::default(),
            cache_lookups: true,
            email_address_type: default_email_address_type(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretSource {
    #[default]
    Env,
    Keyring,
}

impl_domain_status_conversions!(SecretSource {
    Env => "env",
    Keyring => "keyring",
});

/// What each input row becomes remotely
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// School event plus optional staff participant
    #[default]
    Events,
    /// Room unavailability block
    Unavailability,
}

impl_domain_status_conversions!(ImportMode {
    Events => "events",
    Unavailability => "unavailability",
});

/// What to do with an event whose participant could not be attached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Leave the event in place
    #[default]
    Keep,
    /// Delete the event again
    Delete,
}

impl_domain_status_conversions!(OrphanPolicy {
    Keep => "keep",
    Delete => "delete",
});

const fn default_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

const fn default_true() -> bool {
    true
}

fn default_secret_name() -> String {
    DEFAULT_SECRET_NAME.to_string()
}

fn default_keyring_service() -> String {
    DEFAULT_KEYRING_SERVICE.to_string()
}

fn default_email_address_type() -> String {
    DEFAULT_EMAIL_ADDRESS_TYPE.to_string()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn minimal_json_fills_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"sis": {"base_url": "https://api.example.sc", "username": "importer"}}"#,
        )
        .unwrap();

        assert_eq!(config.sis.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.secret.source, SecretSource::Env);
        assert_eq!(config.secret.name, DEFAULT_SECRET_NAME);
        assert_eq!(config.import.orphan_policy, OrphanPolicy::Keep);
        assert!(config.import.cache_lookups);
        assert_eq!(config.import.email_address_type, "WORK");
    }

    #[test]
    fn policy_parsing_is_case_insensitive() {
        assert_eq!(OrphanPolicy::from_str("DELETE").unwrap(), OrphanPolicy::Delete);
        assert_eq!(ImportMode::from_str("Unavailability").unwrap(), ImportMode::Unavailability);
        assert!(SecretSource::from_str("vault").is_err());
    }
}

//! Guard configuration.
//!
//! Values come from the environment (`HOMEBID_*`) with the reference defaults
//! when unset.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::roles::Role;

pub const ENV_DENIAL_REDIRECT_MS: &str = "HOMEBID_DENIAL_REDIRECT_MS";
pub const ENV_LOADING_TIMEOUT_MS: &str = "HOMEBID_LOADING_TIMEOUT_MS";
pub const ENV_DEFAULT_SCOPE: &str = "HOMEBID_DEFAULT_SCOPE";
pub const ENV_SIGN_IN_PATH: &str = "HOMEBID_SIGN_IN_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Grace period between showing a denial message and redirecting home.
    #[serde(rename = "denial_redirect_ms", with = "millis")]
    pub denial_redirect_delay: Duration,

    /// How long authentication may stay pending before the shell reloads.
    #[serde(rename = "loading_timeout_ms", with = "millis")]
    pub loading_timeout: Duration,

    /// Home scope for principals whose role claim is not recognized.
    pub default_scope: Role,

    pub sign_in_path: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            denial_redirect_delay: Duration::from_millis(2000),
            loading_timeout: Duration::from_millis(5000),
            default_scope: Role::Homeowner,
            sign_in_path: "/sign-in".to_string(),
        }
    }
}

impl GuardConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_DENIAL_REDIRECT_MS) {
            config.denial_redirect_delay = parse_millis(ENV_DENIAL_REDIRECT_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_LOADING_TIMEOUT_MS) {
            config.loading_timeout = parse_millis(ENV_LOADING_TIMEOUT_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DEFAULT_SCOPE) {
            config.default_scope = raw
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidRole { key: ENV_DEFAULT_SCOPE, source })?;
        }
        if let Some(raw) = lookup(ENV_SIGN_IN_PATH) {
            let path = raw.trim();
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidPath {
                    key: ENV_SIGN_IN_PATH,
                    value: raw,
                });
            }
            config.sign_in_path = path.to_string();
        }

        Ok(config)
    }
}

fn parse_millis(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidMillis {
            key,
            value: raw.to_string(),
        })
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_reference_timings() {
        let config = GuardConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, GuardConfig::default());
        assert_eq!(config.denial_redirect_delay, Duration::from_millis(2000));
        assert_eq!(config.loading_timeout, Duration::from_millis(5000));
        assert_eq!(config.default_scope, Role::Homeowner);
        assert_eq!(config.sign_in_path, "/sign-in");
    }

    #[test]
    fn overrides_are_applied() {
        let config = GuardConfig::from_lookup(lookup(&[
            (ENV_DENIAL_REDIRECT_MS, "250"),
            (ENV_LOADING_TIMEOUT_MS, " 9000 "),
            (ENV_DEFAULT_SCOPE, "contractor"),
            (ENV_SIGN_IN_PATH, "/auth/login"),
        ]))
        .unwrap();

        assert_eq!(config.denial_redirect_delay, Duration::from_millis(250));
        assert_eq!(config.loading_timeout, Duration::from_millis(9000));
        assert_eq!(config.default_scope, Role::Contractor);
        assert_eq!(config.sign_in_path, "/auth/login");
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = GuardConfig::from_lookup(lookup(&[(ENV_DENIAL_REDIRECT_MS, "2s")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidMillis {
                key: ENV_DENIAL_REDIRECT_MS,
                value: "2s".to_string()
            }
        );

        let err = GuardConfig::from_lookup(lookup(&[(ENV_DEFAULT_SCOPE, "guest")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRole { .. }));

        let err = GuardConfig::from_lookup(lookup(&[(ENV_SIGN_IN_PATH, "sign-in")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPath { .. }));
    }

    #[test]
    fn deserializes_partial_documents() {
        let json = r#"{"denial_redirect_ms": 1500, "default_scope": "admin"}"#;
        let config: GuardConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.denial_redirect_delay, Duration::from_millis(1500));
        assert_eq!(config.loading_timeout, Duration::from_millis(5000));
        assert_eq!(config.default_scope, Role::Admin);
    }
}

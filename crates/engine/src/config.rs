//! Engine configuration loaded from environment variables.

use std::str::FromStr;

/// Runtime configuration. Every field has a default so a bare environment
/// still boots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    /// `*` or a comma-separated origin list; `None` disables CORS
    pub cors_allowed_origins: Option<String>,
    pub combat_max_active: usize,
    pub narrative_max_sessions: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".into(),
            server_port: 3000,
            cors_allowed_origins: None,
            combat_max_active: 1000,
            narrative_max_sessions: 1000,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable values fall back to
    /// the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let server_port_raw = get("SERVER_PORT").or_else(|| get("PORT"));

        Self {
            server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_or("SERVER_PORT", server_port_raw, defaults.server_port),
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS"),
            combat_max_active: parse_or(
                "COMBAT_MAX_ACTIVE",
                get("COMBAT_MAX_ACTIVE"),
                defaults.combat_max_active,
            ),
            narrative_max_sessions: parse_or(
                "NARRATIVE_MAX_SESSIONS",
                get("NARRATIVE_MAX_SESSIONS"),
                defaults.narrative_max_sessions,
            ),
        }
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match raw {
        None => default,
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(
                key = key,
                value = %value,
                default = %default,
                "Invalid configuration value, using default"
            );
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(EngineConfig::from_lookup(lookup(&[])), EngineConfig::default());
    }

    #[test]
    fn port_falls_back_to_port_variable() {
        let config = EngineConfig::from_lookup(lookup(&[("PORT", "8080")]));
        assert_eq!(config.server_port, 8080);

        let config =
            EngineConfig::from_lookup(lookup(&[("PORT", "8080"), ("SERVER_PORT", "9090")]));
        assert_eq!(config.server_port, 9090);
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("SERVER_PORT", "not-a-port"),
            ("COMBAT_MAX_ACTIVE", "-3"),
            ("NARRATIVE_MAX_SESSIONS", "25"),
        ]));
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.combat_max_active, 1000);
        assert_eq!(config.narrative_max_sessions, 25);
    }

    #[test]
    fn blank_cors_is_disabled() {
        let config = EngineConfig::from_lookup(lookup(&[("CORS_ALLOWED_ORIGINS", "  ")]));
        assert!(config.cors_allowed_origins.is_none());
    }
}

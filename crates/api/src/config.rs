//! Process configuration from environment variables.

use std::net::SocketAddr;

use tracing::warn;

pub const BIND_ENV: &str = "FRONTDESK_BIND";
pub const PUBLIC_ACTIONS_ENV: &str = "FRONTDESK_PUBLIC_ACTIONS";
pub const PARTNER_DIGESTS_ENV: &str = "FRONTDESK_PARTNER_DIGESTS";

const DEFAULT_BIND: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);
const DEFAULT_PUBLIC_ACTIONS: &[&str] = &["ping"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontdeskConfig {
    pub bind: SocketAddr,
    /// Actions served without partner authorization.
    pub public_actions: Vec<String>,
    /// Digests accepted by the built-in partner backend.
    pub partner_digests: Vec<String>,
}

impl Default for FrontdeskConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(DEFAULT_BIND),
            public_actions: DEFAULT_PUBLIC_ACTIONS.iter().map(|s| s.to_string()).collect(),
            partner_digests: Vec::new(),
        }
    }
}

impl FrontdeskConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or invalid values keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(BIND_ENV) {
            match raw.trim().parse() {
                Ok(bind) => config.bind = bind,
                Err(e) => warn!(value = %raw, error = %e, "invalid {BIND_ENV}; using {}", config.bind),
            }
        }

        if let Some(raw) = lookup(PUBLIC_ACTIONS_ENV) {
            config.public_actions = split_list(&raw);
        }

        if let Some(raw) = lookup(PARTNER_DIGESTS_ENV) {
            config.partner_digests = split_list(&raw);
        }
        if config.partner_digests.is_empty() {
            warn!("{PARTNER_DIGESTS_ENV} not set; only public actions will be authorized");
        }

        config
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_map(pairs: &[(&str, &str)]) -> FrontdeskConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        FrontdeskConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = from_map(&[]);
        assert_eq!(config.bind.to_string(), "0.0.0.0:8080");
        assert_eq!(config.public_actions, vec!["ping".to_string()]);
        assert!(config.partner_digests.is_empty());
    }

    #[test]
    fn reads_lists_and_bind() {
        let config = from_map(&[
            (BIND_ENV, "127.0.0.1:9000"),
            (PUBLIC_ACTIONS_ENV, "ping, status ,,docs"),
            (PARTNER_DIGESTS_ENV, "k1,k2"),
        ]);
        assert_eq!(config.bind.to_string(), "127.0.0.1:9000");
        assert_eq!(config.public_actions, vec!["ping", "status", "docs"]);
        assert_eq!(config.partner_digests, vec!["k1", "k2"]);
    }

    #[test]
    fn invalid_bind_keeps_default() {
        let config = from_map(&[(BIND_ENV, "not-an-addr")]);
        assert_eq!(config.bind.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn empty_public_list_means_nothing_is_public() {
        let config = from_map(&[(PUBLIC_ACTIONS_ENV, "")]);
        assert!(config.public_actions.is_empty());
    }
}

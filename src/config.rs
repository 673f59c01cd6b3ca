use crate::vocab::DEFAULT_DEPARTMENT_ID;
use std::{env, path::PathBuf, time::Duration};

const DEFAULT_DATA_PATH: &str = "data/entries.json";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;

/// Storage settings, read once at startup and handed to `storage::initialize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub local_path: PathBuf,
    pub department_id: String,
    /// Presence selects the remote backend.
    pub remote: Option<RemoteConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let local_path = non_empty(lookup("APP_DATA_PATH"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
        let department_id = non_empty(lookup("DEPARTMENT_ID"))
            .unwrap_or_else(|| DEFAULT_DEPARTMENT_ID.to_string());

        let remote = non_empty(lookup("REMOTE_STORE_URL")).map(|base_url| RemoteConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: non_empty(lookup("REMOTE_STORE_TOKEN")),
            timeout: Duration::from_secs(
                lookup("REMOTE_STORE_TIMEOUT_SECS")
                    .and_then(|value| value.trim().parse().ok())
                    .unwrap_or(DEFAULT_REMOTE_TIMEOUT_SECS),
            ),
        });

        Self {
            local_path,
            department_id,
            remote,
        }
    }

    pub fn local(local_path: impl Into<PathBuf>) -> Self {
        Self {
            local_path: local_path.into(),
            department_id: DEFAULT_DEPARTMENT_ID.to_string(),
            remote: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        Self { port }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_local_backend() {
        let config = StoreConfig::from_lookup(lookup(&[]));
        assert_eq!(config.local_path, PathBuf::from("data/entries.json"));
        assert_eq!(config.department_id, "mapo");
        assert!(config.remote.is_none());
    }

    #[test]
    fn remote_url_enables_remote_backend() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("REMOTE_STORE_URL", "https://store.example/api/"),
            ("REMOTE_STORE_TOKEN", "secret"),
            ("REMOTE_STORE_TIMEOUT_SECS", "3"),
            ("DEPARTMENT_ID", "seoul"),
        ]));
        let remote = config.remote.expect("remote config");
        assert_eq!(remote.base_url, "https://store.example/api");
        assert_eq!(remote.token.as_deref(), Some("secret"));
        assert_eq!(remote.timeout, Duration::from_secs(3));
        assert_eq!(config.department_id, "seoul");
    }

    #[test]
    fn blank_remote_url_is_ignored() {
        let config = StoreConfig::from_lookup(lookup(&[("REMOTE_STORE_URL", "  ")]));
        assert!(config.remote.is_none());
    }

    #[test]
    fn port_falls_back_on_garbage() {
        assert_eq!(ServerConfig::from_lookup(lookup(&[("PORT", "9000")])).port, 9000);
        assert_eq!(ServerConfig::from_lookup(lookup(&[("PORT", "nope")])).port, 8080);
    }
}

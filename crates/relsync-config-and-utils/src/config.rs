//! Configuration management.

use crate::{CoreError, CoreResult, Paths};
use optimistic_toggle_core::{FailurePolicy, SyncPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default server origin (local development server).
pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8000";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

const ENV_LOG_LEVEL: &str = "RELSYNC_LOG_LEVEL";
const ENV_ORIGIN: &str = "RELSYNC_ORIGIN";
const ENV_CSRF_TOKEN: &str = "RELSYNC_CSRF_TOKEN";
const ENV_SESSION_COOKIE: &str = "RELSYNC_SESSION_COOKIE";

/// relsync configuration, stored as JSON in `~/.relsync/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Scheme, host and port of the store of record.
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_likes_path")]
    pub likes_path: String,
    #[serde(default = "default_follows_path")]
    pub follows_path: String,
    #[serde(default = "default_edit_post_path")]
    pub edit_post_path: String,
    /// CSRF token sent as `X-CSRFToken`.
    #[serde(default)]
    pub csrf_token: Option<String>,
    /// Raw session cookie, e.g. `sessionid=...`.
    #[serde(default)]
    pub session_cookie: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Undo the local change when persistence fails.
    #[serde(default)]
    pub rollback_on_failure: bool,
    /// Extra attempts after a failed persist.
    #[serde(default)]
    pub max_retries: u32,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_origin() -> String {
    DEFAULT_ORIGIN.to_string()
}

fn default_likes_path() -> String {
    "/likes".to_string()
}

fn default_follows_path() -> String {
    "/follows".to_string()
}

fn default_edit_post_path() -> String {
    "/edit_post".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            origin: default_origin(),
            likes_path: default_likes_path(),
            follows_path: default_follows_path(),
            edit_post_path: default_edit_post_path(),
            csrf_token: None,
            session_cookie: None,
            request_timeout_secs: default_request_timeout_secs(),
            rollback_on_failure: false,
            max_retries: 0,
        }
    }
}

impl Config {
    /// Load from the config file if present, then apply environment
    /// overrides.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    fn load_from_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply non-empty overrides returned by `lookup`.
    pub(crate) fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(origin) = lookup(ENV_ORIGIN) {
            self.origin = origin;
        }
        if let Some(token) = lookup(ENV_CSRF_TOKEN) {
            self.csrf_token = Some(token);
        }
        if let Some(cookie) = lookup(ENV_SESSION_COOKIE) {
            self.session_cookie = Some(cookie);
        }
    }

    /// The origin as a parsed http(s) URL.
    pub fn origin_url(&self) -> CoreResult<Url> {
        let url = Url::parse(&self.origin)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::Config(format!(
                "origin must use http or https, got {}",
                url.scheme()
            )));
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Persistence policy for synchronizers and editors.
    pub fn sync_policy(&self) -> SyncPolicy {
        SyncPolicy {
            on_failure: if self.rollback_on_failure {
                FailurePolicy::Rollback
            } else {
                FailurePolicy::KeepOptimistic
            },
            max_retries: self.max_retries,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.origin, DEFAULT_ORIGIN);
        assert_eq!(config.likes_path, "/likes");
        assert_eq!(config.follows_path, "/follows");
        assert_eq!(config.edit_post_path, "/edit_post");
        assert!(config.csrf_token.is_none());
        assert!(!config.rollback_on_failure);
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn test_config_load_from_file_fills_missing_fields() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        let config_json = r#"{
            "log_level": "debug",
            "origin": "https://network.example",
            "rollback_on_failure": true
        }"#;
        std::fs::write(&config_path, config_json).unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.origin, "https://network.example");
        assert!(config.rollback_on_failure);
        assert_eq!(config.likes_path, "/likes");
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = Config {
            log_level: "trace".to_string(),
            csrf_token: Some("abc".to_string()),
            max_retries: 3,
            ..Default::default()
        };
        config.save(&paths).unwrap();

        let loaded = Config::load_from_file(&paths.config_file()).unwrap();
        assert_eq!(loaded.log_level, "trace");
        assert_eq!(loaded.csrf_token.as_deref(), Some("abc"));
        assert_eq!(loaded.max_retries, 3);
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = Config::load(&paths).unwrap();
        assert_eq!(config.likes_path, "/likes");
    }

    #[test]
    fn test_overrides_ignore_blank_values() {
        let env: HashMap<&str, &str> = [
            ("RELSYNC_LOG_LEVEL", "warn"),
            ("RELSYNC_CSRF_TOKEN", "from-env"),
            ("RELSYNC_ORIGIN", "   "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.log_level, "warn");
        assert_eq!(config.csrf_token.as_deref(), Some("from-env"));
        assert_eq!(config.origin, DEFAULT_ORIGIN);
    }

    #[test]
    fn test_origin_url_parse() {
        let config = Config::default();
        let url = config.origin_url().unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.port(), Some(8000));
    }

    #[test]
    fn test_origin_url_rejects_other_schemes() {
        let config = Config {
            origin: "ftp://network.example".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.origin_url(), Err(CoreError::Config(_))));

        let config = Config {
            origin: "not a valid url".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.origin_url(), Err(CoreError::InvalidUrl(_))));
    }

    #[test]
    fn test_sync_policy_from_config() {
        let config = Config {
            rollback_on_failure: true,
            max_retries: 2,
            ..Default::default()
        };
        let policy = config.sync_policy();
        assert_eq!(policy.on_failure, FailurePolicy::Rollback);
        assert_eq!(policy.max_retries, 2);

        assert_eq!(
            Config::default().sync_policy().on_failure,
            FailurePolicy::KeepOptimistic
        );
    }
}

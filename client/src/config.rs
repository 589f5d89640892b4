//! # Client Configuration
//!
//! [`ClientConfig`] is built in three layers, later layers winning:
//!
//! 1. Built-in defaults (local development endpoints, production timings)
//! 2. An optional JSON file named by `CATALOG_CONFIG`
//! 3. Environment variables (a `.env` file is loaded first via `dotenvy`)
//!
//! ## Environment Variables
//!
//! - `CATALOG_AUTH_URL`: auth API base (default `http://localhost:8090/api`)
//! - `CATALOG_PRODUCTS_URL`: catalog API base (default `http://localhost:5000`)
//! - `CATALOG_BACKEND`: `http` or `demo`
//! - `CATALOG_REQUEST_TIMEOUT_MS`, `CATALOG_LOGIN_DELAY_MS`,
//!   `CATALOG_REGISTER_DELAY_MS`, `CATALOG_REFETCH_DELAY_MS`
//! - `CATALOG_SESSION_FILE`: session file path (empty string = memory only)
//! - `CATALOG_LOG_DIR`: directory for rotated log files (unset = stderr only)
//! - `RUST_LOG`: log filter

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::core::error::{AppError, Result};

pub const DEFAULT_AUTH_URL: &str = "http://localhost:8090/api";
pub const DEFAULT_CATALOG_URL: &str = "http://localhost:5000";
pub const DEFAULT_LOG_LEVEL: &str = "catalog_client=info,warn";

/// Which service implementations the app is assembled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Real auth and catalog services over HTTP.
    Http,
    /// Offline services with built-in test accounts and a fixture catalog.
    Demo,
}

impl std::str::FromStr for Backend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Backend::Http),
            "demo" => Ok(Backend::Demo),
            other => Err(AppError::Config(format!("unknown backend '{other}' (expected http or demo)"))),
        }
    }
}

/// Fixed delays used by the controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Login success toast stays up this long before the catalog replaces the view.
    pub login_redirect_delay: Duration,
    /// Registration form is cleared this long after success.
    pub register_reset_delay: Duration,
    /// Wait between a successful regeneration request and the re-fetch.
    pub refetch_delay: Duration,
    pub success_toast: Duration,
    pub error_toast: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            login_redirect_delay: Duration::from_millis(2000),
            register_reset_delay: Duration::from_millis(2000),
            refetch_delay: Duration::from_millis(1500),
            success_toast: Duration::from_millis(2000),
            error_toast: Duration::from_millis(5000),
        }
    }
}

impl Timings {
    /// All delays zero. Tests use this to run flows without waiting.
    pub fn immediate() -> Self {
        Self {
            login_redirect_delay: Duration::ZERO,
            register_reset_delay: Duration::ZERO,
            refetch_delay: Duration::ZERO,
            success_toast: Duration::from_secs(60),
            error_toast: Duration::from_secs(60),
        }
    }
}

/// Complete client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub auth_base_url: String,
    pub catalog_base_url: String,
    pub backend: Backend,
    pub request_timeout: Duration,
    pub timings: Timings,
    /// `None` keeps the session in memory only.
    pub session_file: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_base_url: DEFAULT_AUTH_URL.to_string(),
            catalog_base_url: DEFAULT_CATALOG_URL.to_string(),
            backend: Backend::Http,
            request_timeout: Duration::from_secs(10),
            timings: Timings::default(),
            session_file: Some(PathBuf::from("session.json")),
            log_dir: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// On-disk form of the configuration. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    auth_base_url: Option<String>,
    catalog_base_url: Option<String>,
    backend: Option<Backend>,
    request_timeout_ms: Option<u64>,
    login_redirect_delay_ms: Option<u64>,
    register_reset_delay_ms: Option<u64>,
    refetch_delay_ms: Option<u64>,
    success_toast_ms: Option<u64>,
    error_toast_ms: Option<u64>,
    session_file: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    log_level: Option<String>,
}

impl ClientConfig {
    /// Load defaults, then `CATALOG_CONFIG` (if set), then the environment.
    pub fn load() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "No .env file loaded");
        }

        let mut config = Self::default();
        if let Ok(path) = std::env::var("CATALOG_CONFIG") {
            config.apply_file(Path::new(&path))?;
        }
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay a JSON config file.
    pub fn apply_file(&mut self, path: &Path) -> Result<()> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        let file: ConfigFile = serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("invalid config file {}: {e}", path.display())))?;

        if let Some(url) = file.auth_base_url {
            self.auth_base_url = url;
        }
        if let Some(url) = file.catalog_base_url {
            self.catalog_base_url = url;
        }
        if let Some(backend) = file.backend {
            self.backend = backend;
        }
        if let Some(ms) = file.request_timeout_ms {
            self.request_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = file.login_redirect_delay_ms {
            self.timings.login_redirect_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = file.register_reset_delay_ms {
            self.timings.register_reset_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = file.refetch_delay_ms {
            self.timings.refetch_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = file.success_toast_ms {
            self.timings.success_toast = Duration::from_millis(ms);
        }
        if let Some(ms) = file.error_toast_ms {
            self.timings.error_toast = Duration::from_millis(ms);
        }
        if let Some(path) = file.session_file {
            self.session_file = Some(path);
        }
        if let Some(dir) = file.log_dir {
            self.log_dir = Some(dir);
        }
        if let Some(level) = file.log_level {
            self.log_level = level;
        }

        tracing::info!(path = %path.display(), "Loaded configuration file");
        Ok(())
    }

    /// Overlay environment variables read through `lookup`.
    ///
    /// Unparseable numbers are ignored with a warning. An unknown backend name
    /// is an error.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CATALOG_AUTH_URL") {
            self.auth_base_url = url;
        }
        if let Some(url) = lookup("CATALOG_PRODUCTS_URL") {
            self.catalog_base_url = url;
        }
        if let Some(backend) = lookup("CATALOG_BACKEND") {
            self.backend = backend.parse()?;
        }

        let millis = |key: &str| -> Option<Duration> {
            let raw = lookup(key)?;
            match raw.trim().parse::<u64>() {
                Ok(ms) => Some(Duration::from_millis(ms)),
                Err(_) => {
                    tracing::warn!(key, value = %raw, "Ignoring non-numeric duration");
                    None
                }
            }
        };
        if let Some(timeout) = millis("CATALOG_REQUEST_TIMEOUT_MS") {
            self.request_timeout = timeout;
        }
        if let Some(delay) = millis("CATALOG_LOGIN_DELAY_MS") {
            self.timings.login_redirect_delay = delay;
        }
        if let Some(delay) = millis("CATALOG_REGISTER_DELAY_MS") {
            self.timings.register_reset_delay = delay;
        }
        if let Some(delay) = millis("CATALOG_REFETCH_DELAY_MS") {
            self.timings.refetch_delay = delay;
        }

        if let Some(path) = lookup("CATALOG_SESSION_FILE") {
            self.session_file = if path.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }
        if let Some(dir) = lookup("CATALOG_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(level) = lookup("RUST_LOG") {
            self.log_level = level;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_endpoints_and_timings() {
        let config = ClientConfig::default();
        assert_eq!(config.auth_base_url, DEFAULT_AUTH_URL);
        assert_eq!(config.catalog_base_url, DEFAULT_CATALOG_URL);
        assert_eq!(config.backend, Backend::Http);
        assert_eq!(config.timings.login_redirect_delay, Duration::from_millis(2000));
        assert_eq!(config.timings.refetch_delay, Duration::from_millis(1500));
        assert_eq!(config.timings.error_toast, Duration::from_millis(5000));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ClientConfig::default();
        config
            .apply_env(env(&[
                ("CATALOG_BACKEND", "Demo"),
                ("CATALOG_REFETCH_DELAY_MS", "250"),
                ("CATALOG_LOGIN_DELAY_MS", "soon"),
                ("CATALOG_SESSION_FILE", ""),
            ]))
            .unwrap();

        assert_eq!(config.backend, Backend::Demo);
        assert_eq!(config.timings.refetch_delay, Duration::from_millis(250));
        // Garbage is ignored, default kept.
        assert_eq!(config.timings.login_redirect_delay, Duration::from_millis(2000));
        assert_eq!(config.session_file, None);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let mut config = ClientConfig::default();
        let err = config.apply_env(env(&[("CATALOG_BACKEND", "grpc")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_config_file_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.json");
        std::fs::write(
            &path,
            r#"{ "catalog_base_url": "http://catalog.internal", "backend": "demo", "refetch_delay_ms": 10 }"#,
        )
        .unwrap();

        let mut config = ClientConfig::default();
        config.apply_file(&path).unwrap();

        assert_eq!(config.catalog_base_url, "http://catalog.internal");
        assert_eq!(config.auth_base_url, DEFAULT_AUTH_URL);
        assert_eq!(config.backend, Backend::Demo);
        assert_eq!(config.timings.refetch_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let mut config = ClientConfig::default();
        let err = config.apply_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}

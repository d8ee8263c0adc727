//! Client configuration from built-in defaults and `BOOK_API__*` environment
//! variables.

use std::time::Duration;

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::ApiError;

const ENV_PREFIX: &str = "BOOK_API";
const BASE_URL_KEY: &str = "base_url";
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8888";

/// Settings for `ReqwestDispatcher`.
///
/// Loaded from built-in defaults overridden by `BOOK_API__*` environment
/// variables, e.g. `BOOK_API__BASE_URL`, `BOOK_API__TOKEN`,
/// `BOOK_API__TIMEOUT_MS`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Backend root, without the `/book/...` endpoint path.
    pub base_url: String,
    /// Sent as the `x-token` header when present.
    #[serde(default)]
    pub token: Option<String>,
    /// Whole-request timeout in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout_ms: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if a variable cannot be converted to its
    /// field type.
    pub fn load() -> Result<Self, ApiError> {
        Self::load_from(environment())
    }

    fn load_from(environment: Environment) -> Result<Self, ApiError> {
        Ok(Config::builder()
            .set_default(BASE_URL_KEY, DEFAULT_BASE_URL)?
            .add_source(environment)
            .build()?
            .try_deserialize()?)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ClientConfig, ApiError> {
        let source = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<config::Map<String, String>>();
        ClientConfig::load_from(environment().source(Some(source)))
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = load(&[]).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = load(&[
            ("BOOK_API__BASE_URL", "https://admin.example.com/api"),
            ("BOOK_API__TOKEN", "secret"),
            ("BOOK_API__TIMEOUT_MS", "30000"),
        ])
        .unwrap();
        assert_eq!(config.base_url, "https://admin.example.com/api");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn unrelated_variables_are_ignored() {
        let config = load(&[("OTHER__BASE_URL", "http://elsewhere")]).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let err = load(&[("BOOK_API__TIMEOUT_MS", "soon")]).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn builder_helpers() {
        let config = ClientConfig::new("http://localhost:1")
            .with_token("t")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.token.as_deref(), Some("t"));
        assert_eq!(config.timeout_ms, Some(5000));
    }

    #[test]
    fn sub_second_timeout_is_kept() {
        let config = ClientConfig::default().with_timeout(Duration::from_millis(500));
        assert_eq!(config.timeout_ms, Some(500));
        assert_eq!(config.timeout(), Some(Duration::from_millis(500)));
    }
}

//! Client configuration record.

use serde::{Deserialize, Serialize};

/// Root of the production API.
pub const DEFAULT_ROOT_URI: &str = "https://api.balancedpayments.com";

/// API revision requested when none is configured.
pub const DEFAULT_API_VERSION: &str = "1";

/// Connection settings for the Balanced API.
///
/// Only `api_key_secret` is expected to change once a process is running;
/// the other fields are set up front and read on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Secret used as the basic-auth username. `None` sends no credentials.
    #[serde(default)]
    pub api_key_secret: Option<String>,
    #[serde(default = "default_root_uri")]
    pub root_uri: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key_secret: None,
            root_uri: default_root_uri(),
            api_version: default_api_version(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Creates a configuration with the default endpoint and no key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key secret.
    pub fn with_api_key_secret(mut self, key: impl Into<String>) -> Self {
        self.api_key_secret = Some(key.into());
        self
    }

    /// Sets the root URI (scheme and host, no version segment).
    pub fn with_root_uri(mut self, root_uri: impl Into<String>) -> Self {
        self.root_uri = root_uri.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the API version number, e.g. `"1"`.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Version path segment, e.g. `"v1"`.
    pub fn version(&self) -> String {
        format!("v{}", self.api_version)
    }

    /// Versioned base URI every relative path is resolved against.
    pub fn uri(&self) -> String {
        format!("{}/{}", self.root_uri.trim_end_matches('/'), self.version())
    }

    /// Value of the `Accept` header pinning the API revision.
    pub fn accept(&self) -> String {
        format!("application/vnd.api+json;revision={}", self.api_version)
    }
}

fn default_root_uri() -> String {
    DEFAULT_ROOT_URI.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_user_agent() -> String {
    format!("balanced-rust/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.root_uri, "https://api.balancedpayments.com");
        assert_eq!(config.api_version, "1");
        assert!(config.api_key_secret.is_none());
        assert_eq!(config.uri(), "https://api.balancedpayments.com/v1");
        assert_eq!(config.version(), "v1");
    }

    #[test]
    fn test_derived_values_follow_fields() {
        let config = Config::new()
            .with_root_uri("http://localhost:5000/")
            .with_api_version("1.1");
        assert_eq!(config.version(), "v1.1");
        assert_eq!(config.uri(), "http://localhost:5000/v1.1");
        assert_eq!(config.accept(), "application/vnd.api+json;revision=1.1");
    }

    #[test]
    fn test_uri_ignores_trailing_slash() {
        let config: Config = serde_json::from_str(r#"{"root_uri": "https://x/"}"#).unwrap();
        assert_eq!(config.uri(), "https://x/v1");

        let config = Config {
            root_uri: "https://x//".to_string(),
            ..Config::default()
        };
        assert_eq!(config.uri(), "https://x/v1");
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"api_key_secret": "ak-test"}"#).unwrap();
        assert_eq!(config.api_key_secret.as_deref(), Some("ak-test"));
        assert_eq!(config.root_uri, DEFAULT_ROOT_URI);
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
    }
}

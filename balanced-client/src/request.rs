//! Per-request options.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

/// Everything about an outgoing call except its method and URL.
///
/// Hooks receive this mutably and may change any field before dispatch.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub json: Option<Value>,
    /// Basic-auth username. Filled from the configured key when left `None`.
    pub api_key: Option<String>,
    pub timeout: Option<Duration>,
    /// Map failing statuses to [`crate::Error::Http`] before returning.
    pub auto_raise: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            headers: HeaderMap::new(),
            query: Vec::new(),
            json: None,
            api_key: None,
            timeout: None,
            auto_raise: true,
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends `body` as the JSON request body.
    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Appends a query string pair.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Authenticates this call with `api_key` instead of the configured key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns failing responses as-is instead of raising a mapped error.
    pub fn without_auto_raise(mut self) -> Self {
        self.auto_raise = false;
        self
    }
}

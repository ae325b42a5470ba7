//! Shared, mutable client configuration.

use std::env;
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;
use balanced_types::Config;

use crate::key_switch::KeySwitch;

static GLOBAL: OnceLock<SharedConfig> = OnceLock::new();

/// Handle to a [`Config`] shared by reference.
///
/// Clones point at the same store, so a write through any handle is seen by
/// every client holding one. Writes replace the whole record atomically;
/// reading two fields through separate accessors may straddle a write, use
/// [`SharedConfig::snapshot`] for a consistent view.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    inner: Arc<ArcSwap<Config>>,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::from_config(Config::default())
    }
}

impl SharedConfig {
    /// Creates a new store with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing configuration record.
    pub fn from_config(config: Config) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    /// Loads configuration from `BALANCED_API_KEY_SECRET`,
    /// `BALANCED_ROOT_URI` and `BALANCED_API_VERSION`.
    ///
    /// Unset variables keep their defaults; an empty key means no key.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`SharedConfig::from_env`] with variables read through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(key) = lookup("BALANCED_API_KEY_SECRET") {
            config.api_key_secret = non_empty(Some(key));
        }
        if let Some(root_uri) = lookup("BALANCED_ROOT_URI") {
            config = config.with_root_uri(root_uri);
        }
        if let Some(api_version) = lookup("BALANCED_API_VERSION") {
            config.api_version = api_version;
        }
        Self::from_config(config)
    }

    /// The process-wide store, created with defaults on first use.
    pub fn global() -> SharedConfig {
        GLOBAL.get_or_init(SharedConfig::new).clone()
    }

    /// Sets the API key secret. `None` or an empty string clears it.
    pub fn configure(&self, api_key_secret: Option<impl Into<String>>) {
        self.set_api_key_secret(api_key_secret.map(Into::into));
    }

    pub fn api_key_secret(&self) -> Option<String> {
        self.inner.load().api_key_secret.clone()
    }

    pub fn set_api_key_secret(&self, api_key_secret: Option<String>) {
        let key = non_empty(api_key_secret);
        self.update(|config| config.api_key_secret = key.clone());
    }

    pub fn root_uri(&self) -> String {
        self.inner.load().root_uri.clone()
    }

    pub fn set_root_uri(&self, root_uri: impl Into<String>) {
        let root_uri = root_uri.into().trim_end_matches('/').to_string();
        self.update(|config| config.root_uri = root_uri.clone());
    }

    pub fn api_version(&self) -> String {
        self.inner.load().api_version.clone()
    }

    pub fn set_api_version(&self, api_version: impl Into<String>) {
        let api_version = api_version.into();
        self.update(|config| config.api_version = api_version.clone());
    }

    /// Version path segment, e.g. `"v1"`.
    pub fn version(&self) -> String {
        self.inner.load().version()
    }

    /// Versioned base URI, e.g. `"https://api.balancedpayments.com/v1"`.
    pub fn uri(&self) -> String {
        self.inner.load().uri()
    }

    /// Copy of the current record, consistent across all fields.
    pub fn snapshot(&self) -> Config {
        Config::clone(&self.inner.load())
    }

    /// Puts every field back to its default in place.
    ///
    /// Handles stay attached to this store and see the reset.
    pub fn reset(&self) {
        self.inner.store(Arc::new(Config::default()));
    }

    /// Overrides the API key until the returned guard is dropped.
    pub fn with_key(&self, api_key_secret: impl Into<String>) -> KeySwitch {
        KeySwitch::new(self.clone(), api_key_secret.into())
    }

    /// Returns true when both handles point at the same store.
    pub fn ptr_eq(&self, other: &SharedConfig) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // Copy-on-write; concurrent writers to different fields do not lose
    // each other's change.
    fn update(&self, apply: impl Fn(&mut Config)) {
        self.inner.rcu(|current| {
            let mut next = Config::clone(current);
            apply(&mut next);
            next
        });
    }
}

impl From<Config> for SharedConfig {
    fn from(config: Config) -> Self {
        Self::from_config(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

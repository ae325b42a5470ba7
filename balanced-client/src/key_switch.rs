//! Scoped override of the API key.

use crate::config::SharedConfig;

/// Guard returned by [`SharedConfig::with_key`].
///
/// Holds the key that was active when the guard was created and writes it
/// back when dropped, including during unwinding. Nested guards each restore
/// their own remembered value.
#[must_use = "the previous key is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct KeySwitch {
    config: SharedConfig,
    previous: Option<String>,
    restored: bool,
}

impl KeySwitch {
    pub(crate) fn new(config: SharedConfig, api_key_secret: String) -> Self {
        let previous = config.api_key_secret();
        tracing::debug!("switching API key for scoped block");
        config.set_api_key_secret(Some(api_key_secret));
        Self {
            config,
            previous,
            restored: false,
        }
    }

    /// The key that will be restored.
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Restores the previous key now instead of at end of scope.
    pub fn restore(mut self) {
        self.put_back();
    }

    fn put_back(&mut self) {
        if !self.restored {
            self.config.set_api_key_secret(self.previous.take());
            self.restored = true;
        }
    }
}

impl Drop for KeySwitch {
    fn drop(&mut self) {
        self.put_back();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    #[test]
    fn test_key_switch_restores() {
        let config = SharedConfig::new();
        config.configure(Some("k0"));
        {
            let _guard = config.with_key("new_key");
            assert_eq!(config.api_key_secret().as_deref(), Some("new_key"));
        }
        assert_eq!(config.api_key_secret().as_deref(), Some("k0"));
    }

    #[test]
    fn test_key_switch_restores_none() {
        let config = SharedConfig::new();
        let guard = config.with_key("new_key");
        assert_eq!(guard.previous(), None);
        drop(guard);
        assert_eq!(config.api_key_secret(), None);
    }

    #[test]
    fn test_nested_switches_restore_their_own_value() {
        let config = SharedConfig::new();
        config.configure(Some("k0"));
        {
            let _outer = config.with_key("k1");
            {
                let _inner = config.with_key("k2");
                assert_eq!(config.api_key_secret().as_deref(), Some("k2"));
            }
            assert_eq!(config.api_key_secret().as_deref(), Some("k1"));
        }
        assert_eq!(config.api_key_secret().as_deref(), Some("k0"));
    }

    #[test]
    fn test_key_switch_restores_on_panic() {
        let config = SharedConfig::new();
        config.configure(Some("k0"));
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _guard = config.with_key("k1");
            assert_eq!(config.api_key_secret().as_deref(), Some("k1"));
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(config.api_key_secret().as_deref(), Some("k0"));
    }

    #[test]
    fn test_key_switch_restores_on_error_return() {
        fn step() -> Result<(), String> {
            Err("failed".to_string())
        }

        fn failing(config: &SharedConfig) -> Result<(), String> {
            let _guard = config.with_key("k1");
            step()?;
            Ok(())
        }

        let config = SharedConfig::new();
        config.configure(Some("k0"));
        assert!(failing(&config).is_err());
        assert_eq!(config.api_key_secret().as_deref(), Some("k0"));
    }

    #[test]
    fn test_explicit_restore() {
        let config = SharedConfig::new();
        let guard = config.with_key("k1");
        guard.restore();
        assert_eq!(config.api_key_secret(), None);
    }
}

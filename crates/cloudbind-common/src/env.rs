//! System-level environment access behind an injectable seam.
//!
//! Hosting platforms can deny environment reads outright. That denial is a
//! recoverable condition by contract: consumers in this workspace map it to
//! "absent" with a warning rather than propagating a failure.

use std::collections::BTreeMap;

use thiserror::Error;

/// An environment read was denied by the host sandbox.
#[derive(Debug, Clone, Error)]
#[error("environment access denied for key {key}")]
pub struct EnvAccessDenied {
    /// Key whose lookup was denied.
    pub key: String,
}

/// Read access to system-level key/value configuration.
///
/// Implementors must be pure lookups: no caching, no mutation, no I/O
/// beyond the read itself.
pub trait EnvironmentAccessor: Send + Sync {
    /// Returns the current value for `key`, or `None` when unset.
    ///
    /// # Errors
    ///
    /// Returns [`EnvAccessDenied`] when the host denies the read.
    fn var(&self, key: &str) -> Result<Option<String>, EnvAccessDenied>;
}

/// Accessor backed by the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnvironment;

impl EnvironmentAccessor for StdEnvironment {
    fn var(&self, key: &str) -> Result<Option<String>, EnvAccessDenied> {
        match std::env::var(key) {
            Ok(value) => Ok(Some(value)),
            // A non-unicode value is unusable as a path or identifier;
            // treat it the same as unset.
            Err(std::env::VarError::NotPresent | std::env::VarError::NotUnicode(_)) => Ok(None),
        }
    }
}

/// Accessor backed by a fixed map, for hermetic resolution and tests.
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: BTreeMap<String, String>,
}

impl MapEnvironment {
    /// Creates an empty map-backed accessor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a key to a value, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let _ = self.vars.insert(key.into(), value.into());
    }
}

impl EnvironmentAccessor for MapEnvironment {
    fn var(&self, key: &str) -> Result<Option<String>, EnvAccessDenied> {
        Ok(self.vars.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_environment_returns_none_for_unset_key() {
        let env = StdEnvironment;
        let value = env
            .var("CLOUDBIND_TEST_KEY_THAT_IS_NEVER_SET")
            .expect("read should not be denied");
        assert_eq!(value, None);
    }

    #[test]
    fn map_environment_roundtrip() {
        let mut env = MapEnvironment::new();
        env.set("KEY", "value");
        assert_eq!(env.var("KEY").expect("not denied").as_deref(), Some("value"));
        assert_eq!(env.var("OTHER").expect("not denied"), None);
    }
}

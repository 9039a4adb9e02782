//! Driver selection for relational connectors.
//!
//! An explicit system-level override always wins; otherwise a fixed,
//! ordered candidate list is scanned for the first identifier locatable in
//! the current environment. Neither yielding a driver is fatal: it
//! indicates a missing runtime dependency, so no retry happens.

use cloudbind_common::env::EnvironmentAccessor;
use cloudbind_common::error::{CloudbindError, Result};
use cloudbind_common::types::ServiceId;

/// Probe deciding whether a driver identifier is locatable.
pub type DriverProbe = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Resolves the driver identifier for one service family.
pub struct DriverResolver {
    override_key: &'static str,
    candidates: &'static [&'static str],
    env: Box<dyn EnvironmentAccessor>,
    probe: DriverProbe,
}

impl DriverResolver {
    /// Creates a resolver probing candidate identifiers as executables on
    /// the search path.
    #[must_use]
    pub fn new(
        override_key: &'static str,
        candidates: &'static [&'static str],
        env: Box<dyn EnvironmentAccessor>,
    ) -> Self {
        Self {
            override_key,
            candidates,
            env,
            probe: Box::new(|candidate| which::which(candidate).is_ok()),
        }
    }

    /// Replaces the locatability probe.
    #[must_use]
    pub fn with_probe(mut self, probe: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    /// Resolves the driver for the given service.
    ///
    /// # Errors
    ///
    /// Returns [`CloudbindError::NoSuitableDriver`] naming the service when
    /// neither the override nor any candidate yields a usable driver.
    pub fn resolve(&self, service_id: &ServiceId) -> Result<String> {
        match self.env.var(self.override_key) {
            Ok(Some(driver)) if !driver.is_empty() => {
                tracing::info!(driver = %driver, "driver taken from system override");
                return Ok(driver);
            }
            Ok(_) => {}
            Err(denied) => {
                tracing::warn!(key = self.override_key, %denied, "environment read denied, treating override as unset");
            }
        }

        for &candidate in self.candidates {
            if (self.probe)(candidate) {
                tracing::debug!(driver = candidate, "driver selected from candidate scan");
                return Ok(candidate.to_string());
            }
        }

        Err(CloudbindError::NoSuitableDriver {
            service_id: service_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudbind_common::env::MapEnvironment;

    const OVERRIDE_KEY: &str = "CLOUDBIND_TEST_DRIVER";
    const CANDIDATES: &[&str] = &["driver-a", "driver-b"];

    fn service() -> ServiceId {
        ServiceId::new("customerDb")
    }

    #[test]
    fn override_takes_absolute_precedence() {
        let mut env = MapEnvironment::new();
        env.set(OVERRIDE_KEY, "custom-driver");
        let resolver =
            DriverResolver::new(OVERRIDE_KEY, CANDIDATES, Box::new(env)).with_probe(|_| true);
        assert_eq!(
            resolver.resolve(&service()).expect("override wins"),
            "custom-driver"
        );
    }

    #[test]
    fn scan_picks_first_locatable_candidate() {
        let resolver = DriverResolver::new(OVERRIDE_KEY, CANDIDATES, Box::new(MapEnvironment::new()))
            .with_probe(|candidate| candidate == "driver-b");
        assert_eq!(resolver.resolve(&service()).expect("b is locatable"), "driver-b");
    }

    #[test]
    fn candidate_order_is_respected() {
        let resolver = DriverResolver::new(OVERRIDE_KEY, CANDIDATES, Box::new(MapEnvironment::new()))
            .with_probe(|_| true);
        assert_eq!(resolver.resolve(&service()).expect("all locatable"), "driver-a");
    }

    #[test]
    fn no_driver_is_fatal_and_names_the_service() {
        let resolver = DriverResolver::new(OVERRIDE_KEY, CANDIDATES, Box::new(MapEnvironment::new()))
            .with_probe(|_| false);
        let err = resolver.resolve(&service()).expect_err("nothing is locatable");
        let msg = err.to_string();
        assert!(msg.contains("customerDb"), "got: {msg}");
        assert!(msg.contains("no suitable driver"), "got: {msg}");
    }

    #[test]
    fn denied_override_read_falls_back_to_scan() {
        use cloudbind_common::env::EnvAccessDenied;

        struct DenyingEnvironment;

        impl EnvironmentAccessor for DenyingEnvironment {
            fn var(&self, key: &str) -> std::result::Result<Option<String>, EnvAccessDenied> {
                Err(EnvAccessDenied { key: key.to_string() })
            }
        }

        let resolver = DriverResolver::new(OVERRIDE_KEY, CANDIDATES, Box::new(DenyingEnvironment))
            .with_probe(|candidate| candidate == "driver-a");
        assert_eq!(resolver.resolve(&service()).expect("scan still runs"), "driver-a");
    }

    #[test]
    fn empty_override_value_is_ignored() {
        let mut env = MapEnvironment::new();
        env.set(OVERRIDE_KEY, "");
        let resolver = DriverResolver::new(OVERRIDE_KEY, CANDIDATES, Box::new(env))
            .with_probe(|candidate| candidate == "driver-a");
        assert_eq!(resolver.resolve(&service()).expect("scan runs"), "driver-a");
    }
}

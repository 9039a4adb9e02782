//! Application instance information exposed alongside service properties.

use cloudbind_common::constants::{APP_NAME_ENV_KEY, INSTANCE_ID_ENV_KEY, UNKNOWN_APP_ID};
use cloudbind_common::env::EnvironmentAccessor;
use serde::Serialize;
use serde_json::Value;

/// Identity and platform properties of the running application instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationInstanceInfo {
    app_id: String,
    instance_id: String,
    properties: Vec<(String, Value)>,
}

impl ApplicationInstanceInfo {
    /// Creates instance info with no extra properties.
    #[must_use]
    pub fn new(app_id: impl Into<String>, instance_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            instance_id: instance_id.into(),
            properties: Vec::new(),
        }
    }

    /// Returns the application id.
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Returns the instance id.
    #[must_use]
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Returns the ordered extra platform properties.
    #[must_use]
    pub fn properties(&self) -> &[(String, Value)] {
        &self.properties
    }
}

/// Builds [`ApplicationInstanceInfo`] from system-level configuration.
///
/// The app name comes from `CLOUDBIND_APP_NAME`; when unset (or the read is
/// denied) the info degrades to `<unknown>` with a warning. The instance id
/// comes from `CLOUDBIND_INSTANCE_ID`, falling back to a generated UUID so
/// the projected namespace always carries one.
pub struct ApplicationInstanceInfoBuilder<'a> {
    env: &'a dyn EnvironmentAccessor,
    properties: Vec<(String, Value)>,
}

impl<'a> ApplicationInstanceInfoBuilder<'a> {
    /// Creates a builder reading from the given environment accessor.
    #[must_use]
    pub fn new(env: &'a dyn EnvironmentAccessor) -> Self {
        Self {
            env,
            properties: Vec::new(),
        }
    }

    /// Attaches an extra platform property.
    #[must_use]
    pub fn property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.push((key.into(), value));
        self
    }

    /// Builds the instance info.
    #[must_use]
    pub fn build(self) -> ApplicationInstanceInfo {
        let app_id = self.lookup(APP_NAME_ENV_KEY).unwrap_or_else(|| {
            tracing::warn!(
                key = APP_NAME_ENV_KEY,
                "application name not set, using {UNKNOWN_APP_ID}"
            );
            UNKNOWN_APP_ID.to_string()
        });
        let instance_id = self
            .lookup(INSTANCE_ID_ENV_KEY)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        ApplicationInstanceInfo {
            app_id,
            instance_id,
            properties: self.properties,
        }
    }

    fn lookup(&self, key: &str) -> Option<String> {
        match self.env.var(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(denied) => {
                tracing::warn!(key, %denied, "environment read denied, treating as unset");
                None
            }
        }
    }
}

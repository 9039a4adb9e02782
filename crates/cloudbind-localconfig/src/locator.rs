//! Precedence-ordered discovery of the external properties file path.

use std::path::{Path, PathBuf};

use cloudbind_common::constants::{
    CONFIG_PATH_ENV_KEY, CONFIG_PATH_KEY, CONFIG_PATH_TEMPLATE_KEY, DEFAULT_CONFIG_RESOURCE,
};
use cloudbind_common::env::EnvironmentAccessor;

use crate::loader::ResourceLoader;
use crate::properties::{PropertySet, expand_template};

/// A successfully resolved configuration file path.
///
/// Immutable once constructed; only the locator produces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfigPath(PathBuf);

impl ResolvedConfigPath {
    /// Returns the resolved path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Consumes the resolution into its path.
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl std::fmt::Display for ResolvedConfigPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Locates the external properties file, first success wins:
///
/// 1. The `CLOUDBIND_CONFIG_PATH` override key; its value IS the path. A
///    denied read degrades to "not set".
/// 2. The `config.path` key of the designated resource.
/// 3. The `config.path.template` key of the same resource, with every
///    `${var}` placeholder substituted; any unresolved placeholder makes
///    the whole template absent.
///
/// The locator never merges sources; callers combine it with other
/// configuration layers as they see fit.
pub struct ConfigFileLocator {
    env: Box<dyn EnvironmentAccessor>,
    loader: Box<dyn ResourceLoader>,
    resource_name: String,
}

impl ConfigFileLocator {
    /// Creates a locator probing the default resource name.
    #[must_use]
    pub fn new(env: Box<dyn EnvironmentAccessor>, loader: Box<dyn ResourceLoader>) -> Self {
        Self {
            env,
            loader,
            resource_name: DEFAULT_CONFIG_RESOURCE.to_string(),
        }
    }

    /// Overrides the designated resource name.
    #[must_use]
    pub fn with_resource_name(mut self, name: impl Into<String>) -> Self {
        self.resource_name = name.into();
        self
    }

    /// Resolves the configuration file path, or absent when no source
    /// yields one.
    #[must_use]
    pub fn locate(&self) -> Option<ResolvedConfigPath> {
        self.from_system().or_else(|| self.from_resource())
    }

    /// Step 1: the system-level override key.
    #[must_use]
    pub fn from_system(&self) -> Option<ResolvedConfigPath> {
        let value = match self.env.var(CONFIG_PATH_ENV_KEY) {
            Ok(value) => value,
            Err(denied) => {
                tracing::warn!(key = CONFIG_PATH_ENV_KEY, %denied, "environment read denied, treating override as unset");
                None
            }
        };
        let path = value.filter(|v| !v.is_empty())?;
        tracing::info!(path = %path, "configuration file path taken from system override");
        Some(ResolvedConfigPath(PathBuf::from(path)))
    }

    /// Steps 2 and 3: the designated resource's literal key, then its
    /// template key.
    #[must_use]
    pub fn from_resource(&self) -> Option<ResolvedConfigPath> {
        let content = self.loader.load(&self.resource_name)?;
        let properties = match PropertySet::parse(&content) {
            Ok(properties) => properties,
            Err(error) => {
                tracing::warn!(resource = %self.resource_name, %error, "unparseable configuration resource, treating as absent");
                return None;
            }
        };

        if let Some(literal) = properties.get(CONFIG_PATH_KEY).filter(|v| !v.is_empty()) {
            tracing::info!(path = literal, "configuration file path taken from literal resource key");
            return Some(ResolvedConfigPath(PathBuf::from(literal)));
        }

        let template = properties
            .get(CONFIG_PATH_TEMPLATE_KEY)
            .filter(|v| !v.is_empty())?;
        let expanded = expand_template(template, self.env.as_ref())?;
        tracing::info!(path = %expanded, "configuration file path expanded from template resource key");
        Some(ResolvedConfigPath(PathBuf::from(expanded)))
    }
}

//! Ordered fallback chain of connection-pooling providers.
//!
//! Each provider attempt is independent: an unavailable provider returns
//! `None` and the chain proceeds to the next candidate. When every attempt
//! is absent the chain itself is absent; callers fall back to an unpooled
//! connector and surface a diagnostic.

use cloudbind_core::descriptor::LeafDescriptor;
use cloudbind_core::registry::ConnectorConfig;
use serde_json::Value;

use crate::datasource::DataSource;

/// Driver selection handed to pooling providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverHint {
    /// Resolved driver identifier.
    pub driver: String,
    /// Query used to validate pooled connections, if the family has one.
    pub validation_query: Option<String>,
}

/// One alternative pooling implementation.
pub trait PooledDataSourceProvider: Send + Sync {
    /// Registered provider name, used only for allow-list filtering.
    fn name(&self) -> &'static str;

    /// Attempts to build a pooled data source, returning `None` when this
    /// provider is unavailable in the running environment.
    fn try_create(
        &self,
        descriptor: &LeafDescriptor,
        config: &ConnectorConfig,
        hint: &DriverHint,
    ) -> Option<DataSource>;
}

/// A named, ordered registration of one pooling provider.
pub struct PooledProviderEntry {
    name: &'static str,
    provider: Box<dyn PooledDataSourceProvider>,
}

impl PooledProviderEntry {
    /// Returns the registered provider name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

/// Ordered, fixed set of alternative pooling providers.
#[derive(Default)]
pub struct PooledCreationChain {
    entries: Vec<PooledProviderEntry>,
}

impl PooledCreationChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chain with the built-in providers in their fixed order.
    #[must_use]
    pub fn with_default_providers() -> Self {
        let mut chain = Self::new();
        chain.register(Box::new(ThroughputPooledProvider));
        chain.register(Box::new(FairQueuePooledProvider));
        chain.register(Box::new(BasicPooledProvider));
        chain
    }

    /// Appends a provider under its own name.
    pub fn register(&mut self, provider: Box<dyn PooledDataSourceProvider>) {
        self.entries.push(PooledProviderEntry {
            name: provider.name(),
            provider,
        });
    }

    /// Attempts eligible providers in registration order; the first
    /// successful build wins.
    ///
    /// When the config carries an allow-list, only providers whose name
    /// contains one of the listed substrings are attempted. An allow-list
    /// matching nothing attempts no provider at all.
    #[must_use]
    pub fn create(
        &self,
        descriptor: &LeafDescriptor,
        config: &ConnectorConfig,
        hint: &DriverHint,
    ) -> Option<DataSource> {
        for entry in self.eligible(config) {
            tracing::trace!(provider = entry.name, "attempting pooling provider");
            if let Some(data_source) = entry.provider.try_create(descriptor, config, hint) {
                tracing::info!(
                    provider = entry.name,
                    service = %descriptor.id(),
                    "pooled data source created"
                );
                return Some(data_source);
            }
        }
        None
    }

    /// Returns the providers eligible under the config's allow-list, in
    /// registration order.
    fn eligible(&self, config: &ConnectorConfig) -> Vec<&PooledProviderEntry> {
        match &config.pooled_provider_names {
            Some(names) => self
                .entries
                .iter()
                .filter(|entry| names.iter().any(|name| entry.name.contains(name.as_str())))
                .collect(),
            None => self.entries.iter().collect(),
        }
    }
}

fn descriptor_url(descriptor: &LeafDescriptor) -> Option<String> {
    descriptor
        .property_value("uri")
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

/// Default provider tuned for request throughput.
pub struct ThroughputPooledProvider;

impl PooledDataSourceProvider for ThroughputPooledProvider {
    fn name(&self) -> &'static str {
        "throughput-pool"
    }

    fn try_create(
        &self,
        descriptor: &LeafDescriptor,
        _config: &ConnectorConfig,
        hint: &DriverHint,
    ) -> Option<DataSource> {
        Some(DataSource::Pooled {
            provider: self.name().to_string(),
            url: descriptor_url(descriptor)?,
            driver: hint.driver.clone(),
            validation_query: hint.validation_query.clone(),
            max_size: 20,
        })
    }
}

/// Provider that trades throughput for fair connection hand-out.
pub struct FairQueuePooledProvider;

impl PooledDataSourceProvider for FairQueuePooledProvider {
    fn name(&self) -> &'static str {
        "fair-queue-pool"
    }

    fn try_create(
        &self,
        descriptor: &LeafDescriptor,
        _config: &ConnectorConfig,
        hint: &DriverHint,
    ) -> Option<DataSource> {
        Some(DataSource::Pooled {
            provider: self.name().to_string(),
            url: descriptor_url(descriptor)?,
            driver: hint.driver.clone(),
            validation_query: hint.validation_query.clone(),
            max_size: 10,
        })
    }
}

/// Minimal provider kept last as the least capable fallback.
pub struct BasicPooledProvider;

impl PooledDataSourceProvider for BasicPooledProvider {
    fn name(&self) -> &'static str {
        "basic-pool"
    }

    fn try_create(
        &self,
        descriptor: &LeafDescriptor,
        _config: &ConnectorConfig,
        hint: &DriverHint,
    ) -> Option<DataSource> {
        Some(DataSource::Pooled {
            provider: self.name().to_string(),
            url: descriptor_url(descriptor)?,
            driver: hint.driver.clone(),
            validation_query: hint.validation_query.clone(),
            max_size: 8,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::descriptor::{ConnectionSettings, MYSQL, relational_descriptor};

    fn descriptor() -> LeafDescriptor {
        relational_descriptor(
            "customerDb",
            MYSQL,
            &ConnectionSettings {
                hostname: "db.example.com".into(),
                port: 3306,
                username: None,
                password: None,
                database: "customers".into(),
            },
        )
    }

    fn hint() -> DriverHint {
        DriverHint {
            driver: "mysql".into(),
            validation_query: Some("/* ping */ SELECT 1".into()),
        }
    }

    struct CountingProvider {
        name: &'static str,
        available: bool,
        attempts: AtomicUsize,
    }

    impl PooledDataSourceProvider for &'static CountingProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn try_create(
            &self,
            descriptor: &LeafDescriptor,
            _config: &ConnectorConfig,
            hint: &DriverHint,
        ) -> Option<DataSource> {
            let _ = self.attempts.fetch_add(1, Ordering::SeqCst);
            if !self.available {
                return None;
            }
            Some(DataSource::Pooled {
                provider: self.name.to_string(),
                url: descriptor_url(descriptor)?,
                driver: hint.driver.clone(),
                validation_query: None,
                max_size: 1,
            })
        }
    }

    fn provider_of(data_source: &DataSource) -> &str {
        match data_source {
            DataSource::Pooled { provider, .. } => provider,
            DataSource::Unpooled { .. } => "unpooled",
        }
    }

    #[test]
    fn first_registered_provider_wins() {
        let chain = PooledCreationChain::with_default_providers();
        let built = chain
            .create(&descriptor(), &ConnectorConfig::new(), &hint())
            .expect("default providers are available");
        assert_eq!(provider_of(&built), "throughput-pool");
    }

    #[test]
    fn allow_list_filters_by_substring() {
        let chain = PooledCreationChain::with_default_providers();
        let config = ConnectorConfig::new().with_pooled_provider_names(["fair"]);
        let built = chain
            .create(&descriptor(), &config, &hint())
            .expect("fair-queue-pool matches");
        assert_eq!(provider_of(&built), "fair-queue-pool");
    }

    #[test]
    fn allow_list_order_does_not_reorder_attempts() {
        // "basic" is listed before "throughput", but registration order
        // still decides which eligible provider is attempted first.
        let chain = PooledCreationChain::with_default_providers();
        let config = ConnectorConfig::new().with_pooled_provider_names(["basic", "throughput"]);
        let built = chain
            .create(&descriptor(), &config, &hint())
            .expect("both match");
        assert_eq!(provider_of(&built), "throughput-pool");
    }

    #[test]
    fn allow_list_matching_nothing_attempts_no_provider() {
        static PROVIDER: CountingProvider = CountingProvider {
            name: "throughput-pool",
            available: true,
            attempts: AtomicUsize::new(0),
        };

        let mut chain = PooledCreationChain::new();
        chain.register(Box::new(&PROVIDER));
        let config = ConnectorConfig::new().with_pooled_provider_names(["no-such-provider"]);

        assert!(chain.create(&descriptor(), &config, &hint()).is_none());
        assert_eq!(PROVIDER.attempts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unavailable_provider_falls_through_to_next() {
        static FIRST: CountingProvider = CountingProvider {
            name: "first-pool",
            available: false,
            attempts: AtomicUsize::new(0),
        };
        static SECOND: CountingProvider = CountingProvider {
            name: "second-pool",
            available: true,
            attempts: AtomicUsize::new(0),
        };

        let mut chain = PooledCreationChain::new();
        chain.register(Box::new(&FIRST));
        chain.register(Box::new(&SECOND));

        let built = chain
            .create(&descriptor(), &ConnectorConfig::new(), &hint())
            .expect("second provider is available");
        assert_eq!(provider_of(&built), "second-pool");
        assert_eq!(FIRST.attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn all_unavailable_yields_absent() {
        static ONLY: CountingProvider = CountingProvider {
            name: "only-pool",
            available: false,
            attempts: AtomicUsize::new(0),
        };

        let mut chain = PooledCreationChain::new();
        chain.register(Box::new(&ONLY));
        assert!(chain.create(&descriptor(), &ConnectorConfig::new(), &hint()).is_none());
    }

    #[test]
    fn empty_chain_is_absent() {
        let chain = PooledCreationChain::new();
        assert!(chain.create(&descriptor(), &ConnectorConfig::new(), &hint()).is_none());
    }

    #[test]
    fn provider_without_uri_property_is_unavailable() {
        let chain = PooledCreationChain::with_default_providers();
        let bare = LeafDescriptor::new("bare", MYSQL);
        assert!(chain.create(&bare, &ConnectorConfig::new(), &hint()).is_none());
    }
}

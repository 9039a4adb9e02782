//! The data-source connector product and its connector type.

use cloudbind_core::registry::ConnectorType;
use serde::Serialize;

/// Connector type produced by the relational creators.
pub const DATA_SOURCE: ConnectorType = ConnectorType::new("data-source", &[]);

/// A database handle configuration produced by a data-source creator.
///
/// Inert by contract: constructing one opens no connection and validates
/// no connectivity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DataSource {
    /// Connection-pooled configuration built by one pooling provider.
    Pooled {
        /// Name of the pooling provider that built this configuration.
        provider: String,
        /// Connection URL.
        url: String,
        /// Resolved driver identifier.
        driver: String,
        /// Query used to validate pooled connections.
        validation_query: Option<String>,
        /// Maximum pool size.
        max_size: u32,
    },
    /// Direct configuration used when no pooling provider is available.
    Unpooled {
        /// Connection URL.
        url: String,
        /// Resolved driver identifier.
        driver: String,
    },
}

impl DataSource {
    /// Returns the connection URL.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Pooled { url, .. } | Self::Unpooled { url, .. } => url,
        }
    }

    /// Returns the resolved driver identifier.
    #[must_use]
    pub fn driver(&self) -> &str {
        match self {
            Self::Pooled { driver, .. } | Self::Unpooled { driver, .. } => driver,
        }
    }

    /// Returns whether this configuration is pooled.
    #[must_use]
    pub const fn is_pooled(&self) -> bool {
        matches!(self, Self::Pooled { .. })
    }
}

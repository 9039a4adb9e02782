//! Unified error types for the cloudbind workspace.
//!
//! Every error kind here is a caller-visible, non-retryable resolution or
//! configuration failure. Recoverable conditions (a denied environment read)
//! are modeled separately in [`crate::env`] and are swallowed into "absent"
//! at the consuming layer instead of surfacing through this enum.

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum CloudbindError {
    /// A required resource was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// A singleton-expecting query matched zero or more than one candidate.
    #[error("no unique {expected} found: expected 1, found {count}")]
    NotUnique {
        /// Description of the expected type.
        expected: String,
        /// Number of candidates that actually matched.
        count: usize,
    },

    /// No registered creator matched a (connector type, descriptor) pair.
    #[error(
        "no suitable connector creator: service id={service_id}, \
         descriptor kind={descriptor_kind}, connector type={connector_type}"
    )]
    NoSuitableCreator {
        /// Requested connector type name.
        connector_type: String,
        /// Identity of the descriptor that failed to match.
        service_id: String,
        /// Runtime kind of the descriptor that failed to match.
        descriptor_kind: String,
    },

    /// No usable driver identifier could be resolved.
    #[error("no suitable driver found for service {service_id}")]
    NoSuitableDriver {
        /// Identity of the service whose driver resolution failed.
        service_id: String,
    },

    /// A registered creator failed during connector construction.
    #[error("failed to create connector for service {service_id}: {source}")]
    CreationFailed {
        /// Identity of the service whose connector construction failed.
        service_id: String,
        /// Original cause of the failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A composite descriptor references itself, directly or transitively.
    #[error("cyclic composite descriptor detected: {id}")]
    CompositeCycle {
        /// Identifier of the composite at which the cycle was detected.
        id: String,
    },

    /// A configuration value or resource is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, CloudbindError>;

//! Capability-based matching of connector creators to descriptors.
//!
//! The registry is the central extension point of the pipeline: new
//! connector kinds are added purely by registering new creators, never by
//! modifying the matching logic.

use std::any::Any;

use serde::Serialize;

use cloudbind_common::error::{CloudbindError, Result};

use crate::descriptor::{DescriptorKind, LeafDescriptor};

/// The opaque product of a connector creator.
///
/// Callers downcast to the concrete connector type they requested.
pub type Connector = Box<dyn Any + Send + Sync>;

/// Identifies a connector abstraction produced by a creator.
///
/// Like [`DescriptorKind`], connector types are first-class values: a
/// produced type also satisfies every abstraction it declares, so a request
/// for the abstraction matches a creator producing the concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectorType {
    name: &'static str,
    abstractions: &'static [&'static str],
}

impl ConnectorType {
    /// Declares a connector type with the given name and abstraction names.
    #[must_use]
    pub const fn new(name: &'static str, abstractions: &'static [&'static str]) -> Self {
        Self { name, abstractions }
    }

    /// Returns the connector type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns whether a connector of this type satisfies `requested`.
    #[must_use]
    pub fn satisfies(&self, requested: &ConnectorType) -> bool {
        self.name == requested.name || self.abstractions.contains(&requested.name)
    }
}

/// Options applied when creating a connector.
#[derive(Debug, Clone, Default)]
pub struct ConnectorConfig {
    /// Ordered allow-list of pooling-provider name substrings. When absent,
    /// every registered provider is eligible.
    pub pooled_provider_names: Option<Vec<String>>,
}

impl ConnectorConfig {
    /// Creates a config with no options set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts pooling providers to those whose name contains one of the
    /// given substrings.
    #[must_use]
    pub fn with_pooled_provider_names(
        mut self,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.pooled_provider_names = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

/// A stateless factory producing one connector abstraction from one
/// descriptor kind.
pub trait ConnectorCreator: Send + Sync {
    /// The connector type this creator produces.
    fn connector_type(&self) -> ConnectorType;

    /// The descriptor kind this creator accepts, covariantly: any descriptor
    /// whose kind is assignable to the accepted kind matches.
    fn accepted_kind(&self) -> DescriptorKind;

    /// Builds the connector for an accepted descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if construction fails; the registry never retries.
    fn create(&self, descriptor: &LeafDescriptor, config: &ConnectorConfig) -> Result<Connector>;
}

/// Ordered registry of connector creators.
#[derive(Default)]
pub struct CreatorRegistry {
    creators: Vec<Box<dyn ConnectorCreator>>,
}

impl CreatorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a creator; earlier registrations win ties.
    pub fn register(&mut self, creator: Box<dyn ConnectorCreator>) {
        self.creators.push(creator);
    }

    /// Returns the first registered creator matching the query.
    ///
    /// A creator matches when the requested connector type is absent or
    /// satisfied by the creator's produced type, and the descriptor is
    /// absent or its runtime kind is assignable to the creator's accepted
    /// kind. Registration order is the explicit tie-break.
    #[must_use]
    pub fn find(
        &self,
        connector_type: Option<&ConnectorType>,
        descriptor: Option<&LeafDescriptor>,
    ) -> Option<&dyn ConnectorCreator> {
        self.creators
            .iter()
            .map(AsRef::as_ref)
            .find(|creator| Self::accepts(*creator, connector_type, descriptor))
    }

    /// Returns the first matching creator or a diagnostic error.
    ///
    /// # Errors
    ///
    /// Returns [`CloudbindError::NoSuitableCreator`] naming the requested
    /// connector type and the descriptor's identity when nothing matches.
    pub fn require(
        &self,
        connector_type: &ConnectorType,
        descriptor: &LeafDescriptor,
    ) -> Result<&dyn ConnectorCreator> {
        self.find(Some(connector_type), Some(descriptor)).ok_or_else(|| {
            CloudbindError::NoSuitableCreator {
                connector_type: connector_type.name().to_string(),
                service_id: descriptor.id().to_string(),
                descriptor_kind: descriptor.kind().name().to_string(),
            }
        })
    }

    /// Returns whether any registered creator matches, without side effects.
    #[must_use]
    pub fn can_create(
        &self,
        connector_type: Option<&ConnectorType>,
        descriptor: Option<&LeafDescriptor>,
    ) -> bool {
        self.find(connector_type, descriptor).is_some()
    }

    fn accepts(
        creator: &dyn ConnectorCreator,
        connector_type: Option<&ConnectorType>,
        descriptor: Option<&LeafDescriptor>,
    ) -> bool {
        let type_accept =
            connector_type.is_none_or(|requested| creator.connector_type().satisfies(requested));
        let kind_accept =
            descriptor.is_none_or(|d| creator.accepted_kind().is_assignable_from(d.kind()));
        type_accept && kind_accept
    }
}

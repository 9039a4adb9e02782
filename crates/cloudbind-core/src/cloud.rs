//! User-level access to the application and its bound services.
//!
//! [`Cloud`] connects the application with the underlying platform: it
//! resolves and flattens the platform's raw service descriptors, translates
//! them into runtime connectors through the creator registry, and exposes
//! the projected `cloud.*` namespace.

use std::collections::BTreeMap;

use serde_json::Value;

use cloudbind_common::error::{CloudbindError, Result};

use crate::app::ApplicationInstanceInfo;
use crate::descriptor::{DescriptorKind, LeafDescriptor, RawServiceDescriptor};
use crate::flatten::flatten;
use crate::projector::project;
use crate::registry::{Connector, ConnectorConfig, ConnectorType, CreatorRegistry};
use crate::resolver::ServiceResolver;

/// Platform-discovery seam.
///
/// Implementors translate one hosting platform's environment into raw
/// service descriptors and application instance info; the raw format itself
/// stays out of this crate.
pub trait CloudConnector: Send + Sync {
    /// Returns whether this connector's platform is the one the process is
    /// actually running in.
    fn is_in_matching_cloud(&self) -> bool;

    /// Returns information about the running application instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot describe the instance.
    fn application_instance_info(&self) -> Result<ApplicationInstanceInfo>;

    /// Returns the raw descriptors for every bound service.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot enumerate its bindings.
    fn raw_service_descriptors(&self) -> Result<Vec<RawServiceDescriptor>>;
}

/// The main user-level API over one resolved platform.
///
/// Construction happens once at startup via [`CloudFactory`]; afterwards
/// every operation is a pure read over the frozen registries.
pub struct Cloud {
    connector: Box<dyn CloudConnector>,
    resolver: ServiceResolver,
    registry: CreatorRegistry,
}

impl Cloud {
    /// Creates a cloud over an already-selected connector and frozen
    /// registries.
    #[must_use]
    pub fn new(
        connector: Box<dyn CloudConnector>,
        resolver: ServiceResolver,
        registry: CreatorRegistry,
    ) -> Self {
        Self {
            connector,
            resolver,
            registry,
        }
    }

    /// Returns information about the running application instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot describe the instance.
    pub fn application_instance_info(&self) -> Result<ApplicationInstanceInfo> {
        self.connector.application_instance_info()
    }

    /// Resolves and flattens every bound service into leaf descriptors.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot enumerate its bindings or a
    /// composite descriptor is cyclic.
    pub fn service_descriptors(&self) -> Result<Vec<LeafDescriptor>> {
        let raws = self.connector.raw_service_descriptors()?;
        let resolved = self.resolver.resolve_all(&raws);
        flatten(&resolved)
    }

    /// Returns the descriptor with the given service id.
    ///
    /// # Errors
    ///
    /// Returns [`CloudbindError::NotFound`] when no bound service carries
    /// the id.
    pub fn service_descriptor(&self, service_id: &str) -> Result<LeafDescriptor> {
        self.service_descriptors()?
            .into_iter()
            .find(|d| d.id().as_str() == service_id)
            .ok_or_else(|| CloudbindError::NotFound {
                kind: "service",
                id: service_id.to_string(),
            })
    }

    /// Returns the descriptors that could be translated into the given
    /// connector type by some registered creator.
    ///
    /// # Errors
    ///
    /// Returns an error if descriptor resolution fails.
    pub fn service_descriptors_for_connector(
        &self,
        connector_type: &ConnectorType,
    ) -> Result<Vec<LeafDescriptor>> {
        Ok(self
            .service_descriptors()?
            .into_iter()
            .filter(|d| self.registry.can_create(Some(connector_type), Some(d)))
            .collect())
    }

    /// Returns the descriptors whose runtime kind is assignable to the
    /// given kind.
    ///
    /// # Errors
    ///
    /// Returns an error if descriptor resolution fails.
    pub fn service_descriptors_of_kind(
        &self,
        kind: &DescriptorKind,
    ) -> Result<Vec<LeafDescriptor>> {
        Ok(self
            .service_descriptors()?
            .into_iter()
            .filter(|d| kind.is_assignable_from(d.kind()))
            .collect())
    }

    /// Returns the single descriptor of the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`CloudbindError::NotUnique`] when zero or several
    /// descriptors match.
    pub fn singleton_descriptor_of_kind(&self, kind: &DescriptorKind) -> Result<LeafDescriptor> {
        let mut matching = self.service_descriptors_of_kind(kind)?;
        if matching.len() != 1 {
            return Err(CloudbindError::NotUnique {
                expected: format!("{} descriptor", kind.name()),
                count: matching.len(),
            });
        }
        Ok(matching.remove(0))
    }

    /// Creates a connector of the given type for the identified service.
    ///
    /// # Errors
    ///
    /// Returns an error when the service is unknown, no creator matches, or
    /// construction fails.
    pub fn service_connector(
        &self,
        service_id: &str,
        connector_type: &ConnectorType,
        config: &ConnectorConfig,
    ) -> Result<Connector> {
        let descriptor = self.service_descriptor(service_id)?;
        self.connector_for_descriptor(&descriptor, connector_type, config)
    }

    /// Creates the connector for the single service matching the given
    /// connector type.
    ///
    /// # Errors
    ///
    /// Returns [`CloudbindError::NotUnique`] when zero or several services
    /// could produce the type, and creation errors otherwise.
    pub fn singleton_service_connector(
        &self,
        connector_type: &ConnectorType,
        config: &ConnectorConfig,
    ) -> Result<Connector> {
        let mut matching = self.service_descriptors_for_connector(connector_type)?;
        if matching.len() != 1 {
            return Err(CloudbindError::NotUnique {
                expected: format!("service matching connector type {}", connector_type.name()),
                count: matching.len(),
            });
        }
        let descriptor = matching.remove(0);
        self.connector_for_descriptor(&descriptor, connector_type, config)
    }

    /// Projects application info and every bound service into the flattened
    /// `cloud.*` namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if descriptor resolution fails.
    pub fn cloud_properties(&self) -> Result<BTreeMap<String, Value>> {
        let app = self.application_instance_info()?;
        let services = self.service_descriptors()?;
        Ok(project(&app, &services))
    }

    /// Creates a connector of the given type for an already-resolved
    /// descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error when no creator matches or construction fails.
    pub fn connector_for_descriptor(
        &self,
        descriptor: &LeafDescriptor,
        connector_type: &ConnectorType,
        config: &ConnectorConfig,
    ) -> Result<Connector> {
        let creator = self.registry.require(connector_type, descriptor)?;
        tracing::info!(
            service = %descriptor.id(),
            connector_type = connector_type.name(),
            "creating service connector"
        );
        creator.create(descriptor, config)
    }
}

/// Assembles a [`Cloud`] from explicit registrations.
///
/// No ambient discovery happens here: platform connectors, recognizers, and
/// creators are registered explicitly during startup, then [`build`]
/// selects the first connector whose platform matches the running
/// environment and freezes the registries.
///
/// [`build`]: CloudFactory::build
#[derive(Default)]
pub struct CloudFactory {
    connectors: Vec<Box<dyn CloudConnector>>,
    resolver: ServiceResolver,
    registry: CreatorRegistry,
}

impl CloudFactory {
    /// Creates an empty factory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a platform connector; earlier registrations are probed
    /// first.
    pub fn register_connector(&mut self, connector: Box<dyn CloudConnector>) {
        self.connectors.push(connector);
    }

    /// Registers a service recognizer.
    pub fn register_recognizer(&mut self, recognizer: Box<dyn crate::resolver::ServiceRecognizer>) {
        self.resolver.register(recognizer);
    }

    /// Registers a connector creator.
    pub fn register_creator(&mut self, creator: Box<dyn crate::registry::ConnectorCreator>) {
        self.registry.register(creator);
    }

    /// Selects the first matching platform connector and builds the cloud.
    ///
    /// # Errors
    ///
    /// Returns an error when no registered connector matches the running
    /// environment.
    pub fn build(self) -> Result<Cloud> {
        let Self {
            connectors,
            resolver,
            registry,
        } = self;

        connectors
            .into_iter()
            .find(|connector| connector.is_in_matching_cloud())
            .map_or_else(
                || {
                    Err(CloudbindError::Config {
                        message: "no registered cloud connector matches the current environment"
                            .into(),
                    })
                },
                |connector| Ok(Cloud::new(connector, resolver, registry)),
            )
    }
}

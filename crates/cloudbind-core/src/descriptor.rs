//! Raw and resolved service descriptor shapes flowing through the pipeline.

use cloudbind_common::types::ServiceId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind every descriptor carries when no recognizer typed it further.
pub const GENERIC: DescriptorKind = DescriptorKind::new("service", &[]);

/// A platform-supplied, opaque-shaped record identifying a bound service.
///
/// The `data` payload is whatever the platform handed over; recognizer
/// predicates inspect `tag` and `data` to decide whether they understand the
/// shape. A raw descriptor with constituents describes a composite binding
/// (e.g. a cluster presented as one service).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawServiceDescriptor {
    /// Identifier of the bound service, unique within a resolution batch.
    pub id: String,
    /// Optional platform hint about the service kind.
    pub tag: Option<String>,
    /// Arbitrary platform payload.
    #[serde(default)]
    pub data: Value,
    /// Nested raw descriptors for composite bindings.
    #[serde(default)]
    pub constituents: Vec<RawServiceDescriptor>,
}

impl RawServiceDescriptor {
    /// Creates a raw descriptor with only an id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: None,
            data: Value::Null,
            constituents: Vec::new(),
        }
    }

    /// Sets the platform tag hint.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Sets the opaque platform payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Appends a nested raw descriptor, making this a composite.
    #[must_use]
    pub fn with_constituent(mut self, constituent: RawServiceDescriptor) -> Self {
        self.constituents.push(constituent);
        self
    }
}

/// Identifies where a descriptor sits in the service-kind hierarchy.
///
/// Kinds are first-class values declared at registration time: each carries
/// its own name and the names of every ancestor kind. Assignability is a
/// plain list lookup, with no runtime type introspection involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DescriptorKind {
    name: &'static str,
    ancestors: &'static [&'static str],
}

impl DescriptorKind {
    /// Declares a kind with the given name and ancestor names.
    #[must_use]
    pub const fn new(name: &'static str, ancestors: &'static [&'static str]) -> Self {
        Self { name, ancestors }
    }

    /// Returns the kind name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns whether a value of `candidate` kind is acceptable where this
    /// kind is expected: the names match, or this kind is an ancestor of the
    /// candidate.
    #[must_use]
    pub fn is_assignable_from(&self, candidate: &DescriptorKind) -> bool {
        self.name == candidate.name || candidate.ancestors.contains(&self.name)
    }
}

/// One declared property of a resolved descriptor.
///
/// The projected key segment is `name` when present, otherwise the
/// lowercased `accessor`. Properties with a `None` value are never
/// projected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclaredProperty {
    /// Optional grouping segment (e.g. `connection`).
    pub category: Option<String>,
    /// Optional explicit key segment overriding the accessor name.
    pub name: Option<String>,
    /// Canonical accessor name for this property.
    pub accessor: String,
    /// Property value; `None` values are skipped by projection.
    pub value: Option<Value>,
}

impl DeclaredProperty {
    /// Declares an uncategorized property.
    #[must_use]
    pub fn new(accessor: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            category: None,
            name: None,
            accessor: accessor.into(),
            value,
        }
    }

    /// Declares a property under a category segment.
    #[must_use]
    pub fn in_category(
        category: impl Into<String>,
        accessor: impl Into<String>,
        value: Option<Value>,
    ) -> Self {
        Self {
            category: Some(category.into()),
            name: None,
            accessor: accessor.into(),
            value,
        }
    }

    /// Overrides the projected key segment.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A resolved, non-composite service descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafDescriptor {
    id: ServiceId,
    label: Option<String>,
    kind: DescriptorKind,
    properties: Vec<DeclaredProperty>,
}

impl LeafDescriptor {
    /// Creates a leaf descriptor with no label and no properties.
    #[must_use]
    pub fn new(id: impl Into<ServiceId>, kind: DescriptorKind) -> Self {
        Self {
            id: id.into(),
            label: None,
            kind,
            properties: Vec::new(),
        }
    }

    /// Sets the label shared by all descriptors of the same service type.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Appends a declared property.
    #[must_use]
    pub fn with_property(mut self, property: DeclaredProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Appends several declared properties, preserving order.
    #[must_use]
    pub fn with_properties(mut self, properties: impl IntoIterator<Item = DeclaredProperty>) -> Self {
        self.properties.extend(properties);
        self
    }

    /// Returns the service id.
    #[must_use]
    pub fn id(&self) -> &ServiceId {
        &self.id
    }

    /// Returns the service-type label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the descriptor kind.
    #[must_use]
    pub const fn kind(&self) -> &DescriptorKind {
        &self.kind
    }

    /// Returns the ordered declared properties.
    #[must_use]
    pub fn properties(&self) -> &[DeclaredProperty] {
        &self.properties
    }

    /// Returns the value of the property with the given accessor, if any.
    #[must_use]
    pub fn property_value(&self, accessor: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|p| p.accessor == accessor)
            .and_then(|p| p.value.as_ref())
    }
}

/// A resolved descriptor grouping several constituent descriptors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeDescriptor {
    /// Identifier of the composite binding.
    pub id: ServiceId,
    /// Optional service-type label for the group.
    pub label: Option<String>,
    /// Ordered constituent descriptors.
    pub constituents: Vec<ServiceDescriptor>,
}

/// A resolved description of one bound service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ServiceDescriptor {
    /// A single service instance.
    Leaf(LeafDescriptor),
    /// A group of constituent services presented as one binding.
    Composite(CompositeDescriptor),
}

impl ServiceDescriptor {
    /// Returns the service id of either variant.
    #[must_use]
    pub fn id(&self) -> &ServiceId {
        match self {
            Self::Leaf(leaf) => leaf.id(),
            Self::Composite(composite) => &composite.id,
        }
    }
}

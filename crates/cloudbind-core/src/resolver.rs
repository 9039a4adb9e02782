//! Conversion of raw platform descriptors into typed service descriptors.
//!
//! Recognizers run in registration order; the first whose predicate accepts
//! a raw descriptor builds the typed shape. A built-in fallback guarantees
//! that every raw descriptor maps to exactly one resolved descriptor, so
//! resolution never fails outright; it degrades to a generic leaf.

use crate::descriptor::{
    CompositeDescriptor, GENERIC, LeafDescriptor, RawServiceDescriptor, ServiceDescriptor,
};
use cloudbind_common::types::ServiceId;

/// A registered recognizer for one platform descriptor shape.
///
/// `accept` must be a pure predicate: no side effects and no mutation of
/// the raw descriptor.
pub trait ServiceRecognizer: Send + Sync {
    /// Returns whether this recognizer understands the raw descriptor's shape.
    fn accept(&self, raw: &RawServiceDescriptor) -> bool;

    /// Builds the typed descriptor for an accepted raw descriptor.
    fn resolve(&self, raw: &RawServiceDescriptor) -> ServiceDescriptor;
}

/// Ordered set of recognizers with a guaranteed generic fallback.
#[derive(Default)]
pub struct ServiceResolver {
    recognizers: Vec<Box<dyn ServiceRecognizer>>,
}

impl ServiceResolver {
    /// Creates a resolver with no recognizers beyond the built-in fallback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a recognizer; earlier registrations are consulted first.
    pub fn register(&mut self, recognizer: Box<dyn ServiceRecognizer>) {
        self.recognizers.push(recognizer);
    }

    /// Resolves one descriptor per raw descriptor, preserving input order.
    #[must_use]
    pub fn resolve_all(&self, raws: &[RawServiceDescriptor]) -> Vec<ServiceDescriptor> {
        raws.iter().map(|raw| self.resolve(raw)).collect()
    }

    /// Resolves a single raw descriptor.
    ///
    /// The first accepting recognizer wins. Unrecognized composites resolve
    /// structurally with their constituents resolved recursively;
    /// unrecognized non-composites degrade to a generic leaf carrying the id.
    #[must_use]
    pub fn resolve(&self, raw: &RawServiceDescriptor) -> ServiceDescriptor {
        for recognizer in &self.recognizers {
            if recognizer.accept(raw) {
                return recognizer.resolve(raw);
            }
        }
        self.fallback(raw)
    }

    fn fallback(&self, raw: &RawServiceDescriptor) -> ServiceDescriptor {
        if raw.constituents.is_empty() {
            tracing::debug!(id = %raw.id, "no recognizer accepted descriptor, using generic fallback");
            ServiceDescriptor::Leaf(LeafDescriptor::new(ServiceId::new(&raw.id), GENERIC))
        } else {
            ServiceDescriptor::Composite(CompositeDescriptor {
                id: ServiceId::new(&raw.id),
                label: raw.tag.clone(),
                constituents: self.resolve_all(&raw.constituents),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DeclaredProperty, DescriptorKind};

    const TEST_KIND: DescriptorKind = DescriptorKind::new("test", &["service"]);

    struct TagRecognizer {
        tag: &'static str,
    }

    impl ServiceRecognizer for TagRecognizer {
        fn accept(&self, raw: &RawServiceDescriptor) -> bool {
            raw.tag.as_deref() == Some(self.tag)
        }

        fn resolve(&self, raw: &RawServiceDescriptor) -> ServiceDescriptor {
            ServiceDescriptor::Leaf(
                LeafDescriptor::new(ServiceId::new(&raw.id), TEST_KIND)
                    .with_label(self.tag)
                    .with_property(DeclaredProperty::new("tag", Some(self.tag.into()))),
            )
        }
    }

    #[test]
    fn first_accepting_recognizer_wins() {
        let mut resolver = ServiceResolver::new();
        resolver.register(Box::new(TagRecognizer { tag: "test-tag" }));

        let raw = RawServiceDescriptor::new("my-service1").with_tag("test-tag");
        let resolved = resolver.resolve(&raw);
        match resolved {
            ServiceDescriptor::Leaf(leaf) => {
                assert_eq!(leaf.id().as_str(), "my-service1");
                assert_eq!(leaf.label(), Some("test-tag"));
            }
            ServiceDescriptor::Composite(_) => panic!("expected a leaf"),
        }
    }

    #[test]
    fn unrecognized_descriptor_falls_back_to_generic_leaf() {
        let mut resolver = ServiceResolver::new();
        resolver.register(Box::new(TagRecognizer { tag: "test-tag" }));

        let raw = RawServiceDescriptor::new("my-service2").with_tag("unknown-tag");
        match resolver.resolve(&raw) {
            ServiceDescriptor::Leaf(leaf) => {
                assert_eq!(leaf.id().as_str(), "my-service2");
                assert_eq!(leaf.label(), None);
                assert_eq!(leaf.kind().name(), "service");
                assert!(leaf.properties().is_empty());
            }
            ServiceDescriptor::Composite(_) => panic!("expected a leaf"),
        }
    }

    #[test]
    fn resolution_preserves_input_order_and_count() {
        let mut resolver = ServiceResolver::new();
        resolver.register(Box::new(TagRecognizer { tag: "test-tag" }));

        let raws = vec![
            RawServiceDescriptor::new("a").with_tag("test-tag"),
            RawServiceDescriptor::new("b"),
            RawServiceDescriptor::new("c").with_tag("test-tag"),
        ];
        let resolved = resolver.resolve_all(&raws);
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0].id().as_str(), "a");
        assert_eq!(resolved[1].id().as_str(), "b");
        assert_eq!(resolved[2].id().as_str(), "c");
    }

    #[test]
    fn composite_raw_resolves_constituents_recursively() {
        let mut resolver = ServiceResolver::new();
        resolver.register(Box::new(TagRecognizer { tag: "test-tag" }));

        let raw = RawServiceDescriptor::new("cluster")
            .with_tag("mysql-cluster")
            .with_constituent(RawServiceDescriptor::new("node-0").with_tag("test-tag"))
            .with_constituent(RawServiceDescriptor::new("node-1"));

        match resolver.resolve(&raw) {
            ServiceDescriptor::Composite(composite) => {
                assert_eq!(composite.id.as_str(), "cluster");
                assert_eq!(composite.label.as_deref(), Some("mysql-cluster"));
                assert_eq!(composite.constituents.len(), 2);
                assert!(matches!(composite.constituents[0], ServiceDescriptor::Leaf(_)));
            }
            ServiceDescriptor::Leaf(_) => panic!("expected a composite"),
        }
    }
}

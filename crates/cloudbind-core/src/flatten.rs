//! Expansion of composite descriptors into a flat sequence of leaves.

use std::collections::HashSet;

use cloudbind_common::error::{CloudbindError, Result};
use cloudbind_common::types::ServiceId;

use crate::descriptor::{LeafDescriptor, ServiceDescriptor};

/// Flattens a descriptor sequence into leaves only.
///
/// Traversal is depth-first and pre-order: a composite contributes its
/// recursively flattened constituents in declared order and never appears in
/// the output itself. The relative order of the input sequence is preserved.
///
/// # Errors
///
/// Returns [`CloudbindError::CompositeCycle`] when a composite id repeats
/// along a descent path, which indicates a broken external producer.
pub fn flatten(descriptors: &[ServiceDescriptor]) -> Result<Vec<LeafDescriptor>> {
    let mut flat = Vec::new();
    let mut path = HashSet::new();
    for descriptor in descriptors {
        flatten_into(descriptor, &mut path, &mut flat)?;
    }
    Ok(flat)
}

fn flatten_into(
    descriptor: &ServiceDescriptor,
    path: &mut HashSet<ServiceId>,
    flat: &mut Vec<LeafDescriptor>,
) -> Result<()> {
    match descriptor {
        ServiceDescriptor::Leaf(leaf) => flat.push(leaf.clone()),
        ServiceDescriptor::Composite(composite) => {
            if !path.insert(composite.id.clone()) {
                return Err(CloudbindError::CompositeCycle {
                    id: composite.id.to_string(),
                });
            }
            for constituent in &composite.constituents {
                flatten_into(constituent, path, flat)?;
            }
            let _ = path.remove(&composite.id);
        }
    }
    Ok(())
}

//! Projection of resolved descriptors into the flattened `cloud.*` namespace.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use cloudbind_common::constants::{
    APP_ID_PROPERTY, APPLICATION_KEY_PREFIX, INSTANCE_ID_PROPERTY, SERVICES_KEY_PREFIX,
};

use crate::app::ApplicationInstanceInfo;
use crate::descriptor::LeafDescriptor;

/// Projects application info and flattened descriptors into an ordered
/// key/value namespace.
///
/// Every descriptor emits one property group under
/// `cloud.services.<id>`. When a label group has exactly one member, the
/// same properties are emitted again under `cloud.services.<label>`; groups
/// with several members never receive the alias, since that ambiguity must
/// not be silently resolved. Unlabeled descriptors are never aliased.
#[must_use]
pub fn project(
    app: &ApplicationInstanceInfo,
    services: &[LeafDescriptor],
) -> BTreeMap<String, Value> {
    let mut properties = BTreeMap::new();

    project_application(app, &mut properties);

    let mut label_counts: HashMap<&str, usize> = HashMap::new();
    for service in services {
        if let Some(label) = service.label() {
            *label_counts.entry(label).or_insert(0) += 1;
        }
    }

    for service in services {
        let id_prefix = format!("{SERVICES_KEY_PREFIX}{}", service.id());
        project_service(&id_prefix, service, &mut properties);

        if let Some(label) = service.label() {
            if label_counts.get(label) == Some(&1) {
                let label_prefix = format!("{SERVICES_KEY_PREFIX}{label}");
                project_service(&label_prefix, service, &mut properties);
            }
        }
    }

    properties
}

fn project_application(app: &ApplicationInstanceInfo, properties: &mut BTreeMap<String, Value>) {
    let _ = properties.insert(
        format!("{APPLICATION_KEY_PREFIX}{APP_ID_PROPERTY}"),
        Value::from(app.app_id()),
    );
    let _ = properties.insert(
        format!("{APPLICATION_KEY_PREFIX}{INSTANCE_ID_PROPERTY}"),
        Value::from(app.instance_id()),
    );
    for (key, value) in app.properties() {
        if !value.is_null() {
            let _ = properties.insert(format!("{APPLICATION_KEY_PREFIX}{key}"), value.clone());
        }
    }
}

fn project_service(prefix: &str, service: &LeafDescriptor, properties: &mut BTreeMap<String, Value>) {
    for property in service.properties() {
        let Some(value) = &property.value else {
            continue;
        };
        let mut key = prefix.to_string();
        if let Some(category) = &property.category {
            key.push('.');
            key.push_str(category);
        }
        key.push('.');
        match &property.name {
            Some(name) => key.push_str(name),
            None => key.push_str(&property.accessor.to_lowercase()),
        }
        let _ = properties.insert(key, value.clone());
    }
}

//! The `using` block of a generated builder.

use crate::config::ConfigurationPlan;
use crate::resolver::EntityShape;

/// Namespace of the `NullBox<T>` helper referenced by generated fields.
pub const HELPERS_NAMESPACE: &str = "Buildsmith.Abstraction.Helpers";

/// Namespaces every builder imports.
pub const BASE_NAMESPACES: [&str; 3] = ["System", "System.Linq", HELPERS_NAMESPACE];

/// Namespaces to import, first-seen order, duplicates removed
/// case-sensitively.
#[must_use]
pub fn using_namespaces(entity: &EntityShape, config: &ConfigurationPlan) -> Vec<String> {
    let entity_namespace = (!entity.namespace.is_empty()).then_some(entity.namespace.as_str());
    let candidates = BASE_NAMESPACES
        .into_iter()
        .chain(entity_namespace)
        .chain(entity.constraint_namespaces.iter().map(String::as_str))
        .chain(config.mocking.additional_namespaces.iter().map(String::as_str))
        .chain(config.fixture.additional_namespaces.iter().map(String::as_str));
    let mut namespaces: Vec<String> = Vec::new();
    for namespace in candidates {
        if !namespaces.iter().any(|seen| seen == namespace) {
            namespaces.push(namespace.to_owned());
        }
    }
    namespaces
}

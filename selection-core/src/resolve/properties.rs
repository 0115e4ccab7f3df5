//! Property Resolver
//!
//! Reads the lazy properties of one live object into plain data. Only
//! properties that survive the exclusion policy and the allow-list are ever
//! read, so unrequested properties cost nothing.

use tracing::trace;

use super::options::Selector;
use super::serialized::{serialize_property, ResolvedProperties};
use super::ResolveError;
use crate::graph::{schema, LiveObject};

/// Resolve the schema properties of `object` selected by `allow`.
///
/// `type` and `id` are not part of the result; callers attach them. A host
/// read fault aborts the whole object.
pub fn resolve_properties<O>(object: &O, allow: &Selector) -> Result<ResolvedProperties, ResolveError>
where
    O: LiveObject + ?Sized,
{
    let parent_type = object.parent_type();
    let mut resolved = ResolvedProperties::new();

    for &key in schema::properties_for(object.kind()) {
        if schema::is_excluded(key, parent_type) || !allow.includes(key) {
            continue;
        }

        let value = object
            .read_property(key)
            .map_err(|source| ResolveError::HostRead {
                id: object.id().clone(),
                property: key.to_string(),
                source,
            })?;

        match value {
            Some(value) => {
                resolved.insert(key.to_string(), serialize_property(value));
            }
            None => trace!(id = %object.id(), property = key, "property not exposed"),
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{LiveNode, MemoryNode, MemoryVariable, NodeType};
    use crate::resolve::FIGMA_MIXED;
    use serde_json::json;

    fn text_node() -> MemoryNode {
        MemoryNode::new("1:2", NodeType::Text)
            .with_property("name", json!("Heading"))
            .with_property("characters", json!("Hello"))
            .with_mixed("fontSize")
            .with_property("width", json!(120))
    }

    #[test]
    fn resolves_all_exposed_properties_in_schema_order() {
        let resolved = resolve_properties(&text_node(), &Selector::All).unwrap();
        let keys: Vec<&str> = resolved.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "visible", "width", "characters", "fontSize"]);
    }

    #[test]
    fn allow_list_limits_reads() {
        let node = text_node();
        let resolved = resolve_properties(&node, &Selector::only(["characters", "doesNotExist"])).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved["characters"], json!("Hello"));
        assert_eq!(node.read_count(), 1);
    }

    #[test]
    fn empty_allow_list_reads_nothing() {
        let node = text_node();
        let resolved = resolve_properties(&node, &Selector::none()).unwrap();
        assert!(resolved.is_empty());
        assert_eq!(node.read_count(), 0);
    }

    #[test]
    fn mixed_values_become_the_sentinel() {
        let resolved = resolve_properties(&text_node(), &Selector::All).unwrap();
        assert_eq!(resolved["fontSize"], json!(FIGMA_MIXED));
    }

    #[test]
    fn exclusion_policy_applies_even_when_requested() {
        let frame = MemoryNode::new("1:1", NodeType::Frame)
            .with_property("horizontalPadding", json!(8))
            .with_property("paddingLeft", json!(8));
        let resolved =
            resolve_properties(&frame, &Selector::only(["horizontalPadding", "paddingLeft"])).unwrap();
        assert!(!resolved.contains_key("horizontalPadding"));
        assert_eq!(resolved["paddingLeft"], json!(8));
    }

    #[test]
    fn component_definitions_skipped_inside_component_sets() {
        let set = MemoryNode::new("2:1", NodeType::ComponentSet)
            .with_property("componentPropertyDefinitions", json!({}))
            .with_child(
                MemoryNode::new("2:2", NodeType::Component)
                    .with_fault("componentPropertyDefinitions", "variant cannot read definitions"),
            );
        let set_props = resolve_properties(&set, &Selector::All).unwrap();
        assert!(set_props.contains_key("componentPropertyDefinitions"));

        let variants = set.children().unwrap();
        let variant_props = resolve_properties(variants[0], &Selector::All).unwrap();
        assert!(!variant_props.contains_key("componentPropertyDefinitions"));
    }

    #[test]
    fn host_faults_propagate() {
        let node = text_node().with_fault("characters", "font not loaded");
        let error = resolve_properties(&node, &Selector::All).unwrap_err();
        match error {
            ResolveError::HostRead { id, property, .. } => {
                assert_eq!(id.as_str(), "1:2");
                assert_eq!(property, "characters");
            }
        }
    }

    #[test]
    fn variables_use_their_own_schema() {
        let variable = MemoryVariable::new("VariableID:1")
            .with_property("name", json!("spacing/md"))
            .with_property("resolvedType", json!("FLOAT"));
        let resolved = resolve_properties(&variable, &Selector::All).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved["resolvedType"], json!("FLOAT"));
    }
}

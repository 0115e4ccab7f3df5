//! Auxiliary data extraction from a node's plugin-data stores.

use indexmap::IndexMap;

use crate::graph::LiveNode;

/// Extract the requested private keys. `None` when nothing was requested.
pub fn extract_plugin_data<N>(node: &N, keys: &[String]) -> Option<IndexMap<String, String>>
where
    N: LiveNode + ?Sized,
{
    if keys.is_empty() {
        return None;
    }
    Some(
        keys.iter()
            .filter_map(|key| node.plugin_data(key).map(|value| (key.clone(), value)))
            .collect(),
    )
}

/// Extract the requested shared keys, grouped by namespace. Every requested
/// namespace appears in the output, even if none of its keys were present.
pub fn extract_shared_plugin_data<N>(
    node: &N,
    keys: &IndexMap<String, Vec<String>>,
) -> Option<IndexMap<String, IndexMap<String, String>>>
where
    N: LiveNode + ?Sized,
{
    if keys.is_empty() {
        return None;
    }
    Some(
        keys.iter()
            .map(|(namespace, keys)| {
                let values = keys
                    .iter()
                    .filter_map(|key| {
                        node.shared_plugin_data(namespace, key)
                            .map(|value| (key.clone(), value))
                    })
                    .collect();
                (namespace.clone(), values)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{MemoryNode, NodeType};

    fn node() -> MemoryNode {
        MemoryNode::new("1:1", NodeType::Rectangle)
            .with_plugin_data("token", "brand.primary")
            .with_shared_plugin_data("tokens", "color", "#ff0000")
    }

    #[test]
    fn private_keys() {
        assert!(extract_plugin_data(&node(), &[]).is_none());

        let data = extract_plugin_data(&node(), &["token".into(), "missing".into()]).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data["token"], "brand.primary");
    }

    #[test]
    fn shared_keys() {
        assert!(extract_shared_plugin_data(&node(), &IndexMap::new()).is_none());

        let mut request = IndexMap::new();
        request.insert("tokens".to_string(), vec!["color".to_string(), "size".to_string()]);
        request.insert("other".to_string(), vec!["x".to_string()]);

        let data = extract_shared_plugin_data(&node(), &request).unwrap();
        assert_eq!(data["tokens"].len(), 1);
        assert_eq!(data["tokens"]["color"], "#ff0000");
        assert!(data["other"].is_empty());
    }
}

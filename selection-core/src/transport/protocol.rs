//! Message types carried across the boundary.

use serde::{Deserialize, Serialize};

use crate::graph::BareNode;
use crate::resolve::{ResolverOptions, SerializedNode};

/// Requests sent from the observing side to the resolving side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PluginRequest {
    RegisterForSelectionChange(ResolverOptions),
    DeregisterForSelectionChange,
    SetSelection(Vec<BareNode>),
}

/// Messages sent from the resolving side to the observing side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UiMessage {
    SelectionChangeStart,
    SelectionChangeFinish(Vec<SerializedNode>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeType;
    use crate::resolve::{ResolvedProperties, Selector, FIGMA_MIXED};
    use crate::transport::{decode, encode};
    use serde_json::json;

    #[test]
    fn snapshot_survives_the_boundary() {
        let mut properties = ResolvedProperties::new();
        properties.insert("characters".into(), json!("Hello"));
        properties.insert("fontSize".into(), json!(FIGMA_MIXED));
        let child = SerializedNode::builder(NodeType::Text, "1:2".into())
            .properties(properties)
            .ancestors_visible(true)
            .build();
        let frame = SerializedNode::builder(NodeType::Frame, "1:1".into())
            .children(vec![child])
            .build();

        let message = UiMessage::SelectionChangeFinish(vec![frame]);
        let decoded: UiMessage = decode(&encode(&message).unwrap()).unwrap();
        assert_eq!(decoded, message);

        let UiMessage::SelectionChangeFinish(nodes) = decoded else {
            panic!("expected a finish message");
        };
        let text = &nodes[0].children.as_ref().unwrap()[0];
        assert!(text.is_mixed("fontSize"));
    }

    #[test]
    fn options_survive_the_boundary() {
        let options = ResolverOptions::default()
            .with_node_types([NodeType::Text])
            .with_variables(Selector::only(["fills"]))
            .with_shared_plugin_data_keys("tokens", ["color"]);
        let request = PluginRequest::RegisterForSelectionChange(options);

        let decoded: PluginRequest = decode(&encode(&request).unwrap()).unwrap();
        assert_eq!(decoded, request);
    }
}

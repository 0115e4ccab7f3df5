//! Serialized Nodes
//!
//! The immutable, plain-data records a resolution pass produces. They never
//! hold a live handle and are safe to send across the privilege boundary.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::graph::{BareNode, NodeId, NodeType, PropertyValue};

/// Stands in for the host's mixed-value marker once a value is serialized.
///
/// Consumers must treat it as opaque; [`deserialize_property`] turns it back
/// into [`PropertyValue::Mixed`].
pub const FIGMA_MIXED: &str = "mixed-57999e63-7384-42a1-acf8-d80b9f6c36a7";

/// Resolved properties of one object, in schema order.
pub type ResolvedProperties = IndexMap<String, Value>;

/// Convert a live property value to plain data.
pub fn serialize_property(value: PropertyValue) -> Value {
    match value {
        PropertyValue::Mixed => Value::String(FIGMA_MIXED.to_string()),
        PropertyValue::Value(value) => value,
    }
}

/// Convert plain data back to a property value, restoring the mixed marker.
pub fn deserialize_property(value: &Value) -> PropertyValue {
    match value {
        Value::String(s) if s == FIGMA_MIXED => PropertyValue::Mixed,
        other => PropertyValue::Value(other.clone()),
    }
}

/// A dereferenced reference group. Mirrors the shape of the reference.
///
/// Variant order matters for deserialization: a single target always
/// carries a string `id`, which no map of targets can.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolvedBinding {
    List(Vec<ResolvedProperties>),
    Map(IndexMap<String, ResolvedProperties>),
    Single(ResolvedProperties),
}

/// A resolved scene node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedNode {
    #[serde(rename = "type")]
    pub node_type: NodeType,

    pub id: NodeId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestors_visible: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound_variable_instances: Option<IndexMap<String, ResolvedBinding>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_data: Option<IndexMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_plugin_data: Option<IndexMap<String, IndexMap<String, String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SerializedNode>>,

    #[serde(flatten)]
    pub properties: ResolvedProperties,
}

impl SerializedNode {
    pub fn builder(node_type: NodeType, id: NodeId) -> SerializedNodeBuilder {
        SerializedNodeBuilder::new(node_type, id)
    }

    /// Read a resolved property, restoring the mixed marker.
    pub fn property(&self, key: &str) -> Option<PropertyValue> {
        self.properties.get(key).map(deserialize_property)
    }

    /// Whether the property resolved to the mixed marker.
    pub fn is_mixed(&self, key: &str) -> bool {
        matches!(self.property(key), Some(PropertyValue::Mixed))
    }

    /// The node reduced to its identity.
    pub fn bare(&self) -> BareNode {
        BareNode::new(self.id.clone())
    }
}

/// Assembles a [`SerializedNode`] from exactly the requested fields.
#[derive(Debug)]
pub struct SerializedNodeBuilder {
    node: SerializedNode,
}

impl SerializedNodeBuilder {
    pub fn new(node_type: NodeType, id: NodeId) -> Self {
        Self {
            node: SerializedNode {
                node_type,
                id,
                ancestors_visible: None,
                bound_variable_instances: None,
                plugin_data: None,
                shared_plugin_data: None,
                children: None,
                properties: ResolvedProperties::new(),
            },
        }
    }

    pub fn properties(mut self, properties: ResolvedProperties) -> Self {
        self.node.properties = properties;
        self
    }

    pub fn ancestors_visible(mut self, visible: bool) -> Self {
        self.node.ancestors_visible = Some(visible);
        self
    }

    pub fn bound_variable_instances(mut self, instances: Option<IndexMap<String, ResolvedBinding>>) -> Self {
        self.node.bound_variable_instances = instances;
        self
    }

    pub fn plugin_data(mut self, data: Option<IndexMap<String, String>>) -> Self {
        self.node.plugin_data = data;
        self
    }

    pub fn shared_plugin_data(mut self, data: Option<IndexMap<String, IndexMap<String, String>>>) -> Self {
        self.node.shared_plugin_data = data;
        self
    }

    pub fn children(mut self, children: Vec<SerializedNode>) -> Self {
        self.node.children = Some(children);
        self
    }

    pub fn build(self) -> SerializedNode {
        self.node
    }
}

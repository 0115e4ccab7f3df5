//! Live Nodes
//!
//! This module defines how the core sees the host's scene graph: identities,
//! node discriminants, lazily read property values, bound references, and the
//! traits a host implements to expose its objects.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of an object in the host graph.
///
/// Nodes and variables share the same identity space; the host guarantees
/// uniqueness within a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create an identity from its raw host representation.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identity of a page. Pages own the node-change event stream.
pub type PageId = NodeId;

/// The discriminant of a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    BooleanOperation,
    CodeBlock,
    Component,
    ComponentSet,
    Connector,
    Ellipse,
    Embed,
    Frame,
    Group,
    Highlight,
    Instance,
    Line,
    LinkUnfurl,
    Media,
    Polygon,
    Rectangle,
    Section,
    ShapeWithText,
    Slice,
    Stamp,
    Star,
    Sticky,
    Table,
    Text,
    Vector,
    WashiTape,
    Widget,
}

impl NodeType {
    /// Every node type, in declaration order.
    pub const ALL: [NodeType; 27] = [
        NodeType::BooleanOperation,
        NodeType::CodeBlock,
        NodeType::Component,
        NodeType::ComponentSet,
        NodeType::Connector,
        NodeType::Ellipse,
        NodeType::Embed,
        NodeType::Frame,
        NodeType::Group,
        NodeType::Highlight,
        NodeType::Instance,
        NodeType::Line,
        NodeType::LinkUnfurl,
        NodeType::Media,
        NodeType::Polygon,
        NodeType::Rectangle,
        NodeType::Section,
        NodeType::ShapeWithText,
        NodeType::Slice,
        NodeType::Stamp,
        NodeType::Star,
        NodeType::Sticky,
        NodeType::Table,
        NodeType::Text,
        NodeType::Vector,
        NodeType::WashiTape,
        NodeType::Widget,
    ];

    /// The host's wire name for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::BooleanOperation => "BOOLEAN_OPERATION",
            NodeType::CodeBlock => "CODE_BLOCK",
            NodeType::Component => "COMPONENT",
            NodeType::ComponentSet => "COMPONENT_SET",
            NodeType::Connector => "CONNECTOR",
            NodeType::Ellipse => "ELLIPSE",
            NodeType::Embed => "EMBED",
            NodeType::Frame => "FRAME",
            NodeType::Group => "GROUP",
            NodeType::Highlight => "HIGHLIGHT",
            NodeType::Instance => "INSTANCE",
            NodeType::Line => "LINE",
            NodeType::LinkUnfurl => "LINK_UNFURL",
            NodeType::Media => "MEDIA",
            NodeType::Polygon => "POLYGON",
            NodeType::Rectangle => "RECTANGLE",
            NodeType::Section => "SECTION",
            NodeType::ShapeWithText => "SHAPE_WITH_TEXT",
            NodeType::Slice => "SLICE",
            NodeType::Stamp => "STAMP",
            NodeType::Star => "STAR",
            NodeType::Sticky => "STICKY",
            NodeType::Table => "TABLE",
            NodeType::Text => "TEXT",
            NodeType::Vector => "VECTOR",
            NodeType::WashiTape => "WASHI_TAPE",
            NodeType::Widget => "WIDGET",
        }
    }

    /// Whether nodes of this type carry a children list.
    pub fn can_have_children(&self) -> bool {
        matches!(
            self,
            NodeType::BooleanOperation
                | NodeType::Component
                | NodeType::ComponentSet
                | NodeType::Frame
                | NodeType::Group
                | NodeType::Instance
                | NodeType::Section
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of live object a handle points at.
///
/// The kind selects the property schema used when resolving the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// A scene node of the given type.
    Node(NodeType),
    /// A variable, the target of a bound reference.
    Variable,
}

/// A value produced by reading a lazy property on a live object.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// The host's "indeterminate across a mixed set" marker.
    Mixed,
    /// A plain value.
    Value(serde_json::Value),
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        PropertyValue::Value(value)
    }
}

/// A pointer to a variable by identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableAlias {
    pub id: NodeId,
}

impl VariableAlias {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self { id: id.into() }
    }
}

/// One entry of a node's reference map.
///
/// The shape is all the resolver looks at; group names are never special-cased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoundReference {
    /// A single alias, e.g. `width`.
    Alias(VariableAlias),
    /// An ordered list of aliases, e.g. `fills`.
    List(Vec<VariableAlias>),
    /// Aliases keyed by sub-property, e.g. `componentProperties`.
    Map(IndexMap<String, VariableAlias>),
}

/// A node's reference map, keyed by reference-group name.
pub type BoundVariables = IndexMap<String, BoundReference>;

/// A node reduced to its identity, as used by the "replace selection" command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BareNode {
    pub id: NodeId,
}

impl BareNode {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self { id: id.into() }
    }
}

/// Faults raised by the host while reading a live object.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    /// A property getter threw because the object is in an invalid state.
    #[error("property `{property}` could not be read: {message}")]
    PropertyRead { property: String, message: String },

    /// The object was removed from the document while being read.
    #[error("object was removed from the document")]
    Removed,
}

/// Any object the host can hand to the property resolver.
pub trait LiveObject {
    /// Identity of the object.
    fn id(&self) -> &NodeId;

    /// Kind of the object, which selects its property schema.
    fn kind(&self) -> ObjectKind;

    /// Type of the parent node, if the object is a node with a parent.
    fn parent_type(&self) -> Option<NodeType> {
        None
    }

    /// Read one lazy property.
    ///
    /// `Ok(None)` means the object does not expose the property. Nothing is
    /// computed for properties that are never read.
    fn read_property(&self, key: &str) -> Result<Option<PropertyValue>, HostError>;
}

/// A live scene node.
pub trait LiveNode: LiveObject {
    /// The node's discriminant.
    fn node_type(&self) -> NodeType;

    /// The node's own visibility flag.
    fn visible(&self) -> bool;

    /// Ordered children, or `None` if the node cannot have children.
    fn children(&self) -> Option<Vec<&dyn LiveNode>>;

    /// The node's reference map, if it has any bound references.
    fn bound_variables(&self) -> Option<BoundVariables>;

    /// Read a key from the node's private plugin-data store.
    fn plugin_data(&self, key: &str) -> Option<String>;

    /// Read a key from one namespace of the node's shared plugin-data store.
    fn shared_plugin_data(&self, namespace: &str, key: &str) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn node_type_wire_names_match_serde() {
        for node_type in NodeType::ALL {
            let encoded = serde_json::to_value(node_type).unwrap();
            assert_eq!(encoded, json!(node_type.as_str()));
        }
    }

    #[test]
    fn only_containers_have_children() {
        assert!(NodeType::Frame.can_have_children());
        assert!(NodeType::ComponentSet.can_have_children());
        assert!(!NodeType::Text.can_have_children());
        assert!(!NodeType::Rectangle.can_have_children());
    }

    #[test]
    fn bound_reference_shape_is_structural() {
        let single: BoundReference = serde_json::from_value(json!({ "id": "VariableID:1" })).unwrap();
        assert!(matches!(single, BoundReference::Alias(_)));

        let list: BoundReference =
            serde_json::from_value(json!([{ "id": "VariableID:1" }, { "id": "VariableID:2" }])).unwrap();
        assert!(matches!(list, BoundReference::List(ref aliases) if aliases.len() == 2));

        let map: BoundReference =
            serde_json::from_value(json!({ "label": { "id": "VariableID:3" } })).unwrap();
        assert!(matches!(map, BoundReference::Map(ref aliases) if aliases.contains_key("label")));
    }
}

//! In-Memory Host
//!
//! A complete [`SceneGraph`] implementation that keeps the whole document in
//! memory. It stands in for the real host in tests and benchmarks, and for
//! embedders that drive the resolver from their own data.
//!
//! Nodes are owned as a tree per page. Lookups by identity walk the tree,
//! which mirrors how the host itself answers them.

use std::cell::Cell;
use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::warn;

use super::event::{HostEventKind, SceneGraph};
use super::node::{
    BareNode, BoundReference, BoundVariables, HostError, LiveNode, LiveObject, NodeId, NodeType,
    ObjectKind, PageId, PropertyValue,
};

/// A scene node held by [`MemoryGraph`].
#[derive(Debug, Clone)]
pub struct MemoryNode {
    id: NodeId,
    node_type: NodeType,
    visible: bool,
    parent_type: Option<NodeType>,
    children: Option<Vec<MemoryNode>>,
    properties: IndexMap<String, PropertyValue>,
    faults: HashMap<String, String>,
    bound_variables: BoundVariables,
    plugin_data: HashMap<String, String>,
    shared_plugin_data: HashMap<String, HashMap<String, String>>,
    reads: Cell<usize>,
}

impl MemoryNode {
    /// Create a visible node. Container types start with an empty child list.
    pub fn new(id: impl Into<NodeId>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            node_type,
            visible: true,
            parent_type: None,
            children: node_type.can_have_children().then(Vec::new),
            properties: IndexMap::new(),
            faults: HashMap::new(),
            bound_variables: BoundVariables::new(),
            plugin_data: HashMap::new(),
            shared_plugin_data: HashMap::new(),
            reads: Cell::new(0),
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), PropertyValue::Value(value));
        self
    }

    /// Give a property the host's mixed-value marker.
    pub fn with_mixed(mut self, key: impl Into<String>) -> Self {
        self.properties.insert(key.into(), PropertyValue::Mixed);
        self
    }

    /// Make reading a property fail, as a getter on an invalid node would.
    pub fn with_fault(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.faults.insert(key.into(), message.into());
        self
    }

    /// Append a child. Ignored for types that cannot have children.
    pub fn with_child(mut self, mut child: MemoryNode) -> Self {
        if let Some(children) = self.children.as_mut() {
            child.parent_type = Some(self.node_type);
            children.push(child);
        } else {
            warn!(parent = %self.id, child = %child.id, "node type {} cannot have children", self.node_type);
        }
        self
    }

    pub fn with_children(self, children: impl IntoIterator<Item = MemoryNode>) -> Self {
        children.into_iter().fold(self, MemoryNode::with_child)
    }

    pub fn with_binding(mut self, group: impl Into<String>, reference: BoundReference) -> Self {
        self.bound_variables.insert(group.into(), reference);
        self
    }

    pub fn with_plugin_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.plugin_data.insert(key.into(), value.into());
        self
    }

    pub fn with_shared_plugin_data(
        mut self,
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.shared_plugin_data
            .entry(namespace.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// Overwrite a property in place.
    pub fn set_property(&mut self, key: impl Into<String>, value: PropertyValue) {
        self.properties.insert(key.into(), value);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Number of property reads served so far.
    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    fn find(&self, id: &NodeId) -> Option<&MemoryNode> {
        if &self.id == id {
            return Some(self);
        }
        self.children
            .as_deref()
            .and_then(|children| children.iter().find_map(|child| child.find(id)))
    }

    fn find_mut(&mut self, id: &NodeId) -> Option<&mut MemoryNode> {
        if &self.id == id {
            return Some(self);
        }
        self.children
            .as_deref_mut()
            .and_then(|children| children.iter_mut().find_map(|child| child.find_mut(id)))
    }
}

impl LiveObject for MemoryNode {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Node(self.node_type)
    }

    fn parent_type(&self) -> Option<NodeType> {
        self.parent_type
    }

    fn read_property(&self, key: &str) -> Result<Option<PropertyValue>, HostError> {
        self.reads.set(self.reads.get() + 1);
        if let Some(message) = self.faults.get(key) {
            return Err(HostError::PropertyRead {
                property: key.to_string(),
                message: message.clone(),
            });
        }
        if key == "visible" {
            return Ok(Some(PropertyValue::Value(self.visible.into())));
        }
        Ok(self.properties.get(key).cloned())
    }
}

impl LiveNode for MemoryNode {
    fn node_type(&self) -> NodeType {
        self.node_type
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn children(&self) -> Option<Vec<&dyn LiveNode>> {
        self.children
            .as_ref()
            .map(|children| children.iter().map(|child| child as &dyn LiveNode).collect())
    }

    fn bound_variables(&self) -> Option<BoundVariables> {
        (!self.bound_variables.is_empty()).then(|| self.bound_variables.clone())
    }

    fn plugin_data(&self, key: &str) -> Option<String> {
        self.plugin_data.get(key).cloned()
    }

    fn shared_plugin_data(&self, namespace: &str, key: &str) -> Option<String> {
        self.shared_plugin_data
            .get(namespace)
            .and_then(|store| store.get(key))
            .cloned()
    }
}

/// A variable held by [`MemoryGraph`].
#[derive(Debug, Clone)]
pub struct MemoryVariable {
    id: NodeId,
    properties: IndexMap<String, PropertyValue>,
}

impl MemoryVariable {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            properties: IndexMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), PropertyValue::Value(value));
        self
    }
}

impl LiveObject for MemoryVariable {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Variable
    }

    fn read_property(&self, key: &str) -> Result<Option<PropertyValue>, HostError> {
        Ok(self.properties.get(key).cloned())
    }
}

/// A change to the host's event registrations, recorded in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionChange {
    Subscribed(HostEventKind),
    Unsubscribed(HostEventKind),
}

/// An in-memory document: pages of node trees, a variable table, the current
/// selection, and the set of event streams the core has registered for.
#[derive(Debug, Clone)]
pub struct MemoryGraph {
    pages: IndexMap<PageId, Vec<MemoryNode>>,
    current_page: PageId,
    selection: Vec<NodeId>,
    variables: HashMap<NodeId, MemoryVariable>,
    subscriptions: Vec<HostEventKind>,
    subscription_log: Vec<SubscriptionChange>,
}

impl MemoryGraph {
    /// Create a document with a single empty page.
    pub fn new(page: impl Into<PageId>) -> Self {
        let page = page.into();
        let mut pages = IndexMap::new();
        pages.insert(page.clone(), Vec::new());
        Self {
            pages,
            current_page: page,
            selection: Vec::new(),
            variables: HashMap::new(),
            subscriptions: Vec::new(),
            subscription_log: Vec::new(),
        }
    }

    /// Add a top-level node to the current page.
    pub fn insert(&mut self, node: MemoryNode) {
        self.pages.entry(self.current_page.clone()).or_default().push(node);
    }

    pub fn insert_variable(&mut self, variable: MemoryVariable) {
        self.variables.insert(variable.id.clone(), variable);
    }

    pub fn remove_variable(&mut self, id: &NodeId) -> Option<MemoryVariable> {
        self.variables.remove(id)
    }

    /// Switch pages. Selection is per page, so it is cleared.
    pub fn set_current_page(&mut self, page: impl Into<PageId>) {
        let page = page.into();
        self.pages.entry(page.clone()).or_default();
        self.current_page = page;
        self.selection.clear();
    }

    /// Select nodes on the current page by identity.
    pub fn select<I, T>(&mut self, ids: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeId>,
    {
        let nodes: Vec<BareNode> = ids.into_iter().map(BareNode::new).collect();
        self.set_selection(&nodes);
    }

    /// Identities of the current selection.
    pub fn selected_ids(&self) -> &[NodeId] {
        &self.selection
    }

    /// Find a node on the current page.
    pub fn node(&self, id: &NodeId) -> Option<&MemoryNode> {
        self.pages
            .get(&self.current_page)
            .and_then(|roots| roots.iter().find_map(|root| root.find(id)))
    }

    /// Find a node on the current page for mutation.
    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut MemoryNode> {
        self.pages
            .get_mut(&self.current_page)
            .and_then(|roots| roots.iter_mut().find_map(|root| root.find_mut(id)))
    }

    /// Event streams currently registered.
    pub fn subscriptions(&self) -> &[HostEventKind] {
        &self.subscriptions
    }

    /// Every registration change, in order.
    pub fn subscription_log(&self) -> &[SubscriptionChange] {
        &self.subscription_log
    }

    /// How many times `kind` was registered.
    pub fn subscribe_count(&self, kind: &HostEventKind) -> usize {
        self.subscription_log
            .iter()
            .filter(|change| matches!(change, SubscriptionChange::Subscribed(k) if k == kind))
            .count()
    }

    /// How many times `kind` was deregistered.
    pub fn unsubscribe_count(&self, kind: &HostEventKind) -> usize {
        self.subscription_log
            .iter()
            .filter(|change| matches!(change, SubscriptionChange::Unsubscribed(k) if k == kind))
            .count()
    }
}

impl SceneGraph for MemoryGraph {
    fn selection(&self) -> Vec<&dyn LiveNode> {
        self.selection
            .iter()
            .filter_map(|id| self.node(id))
            .map(|node| node as &dyn LiveNode)
            .collect()
    }

    fn current_page(&self) -> PageId {
        self.current_page.clone()
    }

    fn variable_by_id(&self, id: &NodeId) -> Option<&dyn LiveObject> {
        self.variables.get(id).map(|variable| variable as &dyn LiveObject)
    }

    fn set_selection(&mut self, nodes: &[BareNode]) {
        let mut selection = Vec::with_capacity(nodes.len());
        for bare in nodes {
            if self.node(&bare.id).is_some() {
                if !selection.contains(&bare.id) {
                    selection.push(bare.id.clone());
                }
            } else {
                warn!(id = %bare.id, page = %self.current_page, "cannot select a node outside the current page");
            }
        }
        self.selection = selection;
    }

    fn subscribe(&mut self, kind: HostEventKind) {
        if !self.subscriptions.contains(&kind) {
            self.subscriptions.push(kind.clone());
        }
        self.subscription_log.push(SubscriptionChange::Subscribed(kind));
    }

    fn unsubscribe(&mut self, kind: HostEventKind) {
        self.subscriptions.retain(|existing| existing != &kind);
        self.subscription_log.push(SubscriptionChange::Unsubscribed(kind));
    }
}

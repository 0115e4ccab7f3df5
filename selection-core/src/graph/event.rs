//! Host Events
//!
//! Events the host emits and the subscriptions the core registers for them.

use serde::{Deserialize, Serialize};

use super::node::{BareNode, LiveNode, LiveObject, NodeId, PageId};

/// An event stream the core can register for with the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostEventKind {
    /// The document-wide "selection changed" stream.
    SelectionChange,
    /// The "nodes mutated" stream of one page.
    NodeChange { page: PageId },
}

/// A mutation event: the identities of every node that changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeChangeEvent {
    pub changes: Vec<NodeId>,
}

impl NodeChangeEvent {
    pub fn new<I, T>(changes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeId>,
    {
        Self {
            changes: changes.into_iter().map(Into::into).collect(),
        }
    }
}

/// An event delivered by the host to the resolving side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    SelectionChanged,
    NodesChanged(NodeChangeEvent),
    CurrentPageChanged,
    Close,
}

/// The host platform that owns the live node graph.
pub trait SceneGraph {
    /// The current selection, in selection order.
    fn selection(&self) -> Vec<&dyn LiveNode>;

    /// The page whose node-change stream is currently relevant.
    fn current_page(&self) -> PageId;

    /// Look up a bound-reference target by identity.
    fn variable_by_id(&self, id: &NodeId) -> Option<&dyn LiveObject>;

    /// Replace the current selection.
    fn set_selection(&mut self, nodes: &[BareNode]);

    /// Start delivering an event stream.
    fn subscribe(&mut self, kind: HostEventKind);

    /// Stop delivering an event stream.
    fn unsubscribe(&mut self, kind: HostEventKind);
}

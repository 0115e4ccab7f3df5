//! Change Detector
//!
//! Decides whether a mutation event touches the current selection or any of
//! its descendants. It gates re-resolution, so it only has to be cheaper than
//! a full pass, not exact about what changed.
//!
//! The host graph is a tree, so no cycle guard is kept. The walk is
//! iterative and stops descending past [`MAX_CHANGE_DEPTH`].

use std::collections::HashSet;

use smallvec::SmallVec;
use tracing::warn;

use crate::graph::{LiveNode, NodeChangeEvent, NodeId};

/// Nodes deeper than this below a selected node are not inspected.
pub const MAX_CHANGE_DEPTH: usize = 1024;

/// Whether any changed identity is a selected node or one of its descendants.
pub fn changes_apply_to_selection(event: &NodeChangeEvent, selection: &[&dyn LiveNode]) -> bool {
    if event.changes.is_empty() || selection.is_empty() {
        return false;
    }

    let changed: HashSet<&NodeId> = event.changes.iter().collect();
    let mut stack: SmallVec<[(&dyn LiveNode, usize); 32]> =
        selection.iter().rev().map(|&node| (node, 0)).collect();

    while let Some((node, depth)) = stack.pop() {
        if changed.contains(node.id()) {
            return true;
        }
        let Some(children) = node.children() else {
            continue;
        };
        if depth >= MAX_CHANGE_DEPTH {
            warn!(id = %node.id(), depth, "selection is too deep to inspect further");
            continue;
        }
        stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
    }

    false
}

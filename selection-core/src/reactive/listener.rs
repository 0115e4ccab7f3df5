//! Listener types for the selection stream.
//!
//! A Listener is one observer of the shared resolution stream. It is called
//! twice per pass: once when resolution starts and once with the snapshot.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::resolve::SerializedNode;

static NEXT_LISTENER: AtomicU64 = AtomicU64::new(1);

/// Identity of a listener within this process.
///
/// Issued in increasing order starting at 1. The registry de-duplicates by
/// this value, so subscribing a listener (or a clone of it) twice is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Take the next identity.
    pub fn next() -> Self {
        Self(NEXT_LISTENER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// One phase of a resolution pass, as seen by listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    /// A pass started. Useful for driving a loading indicator.
    Started,
    /// A pass finished with this snapshot.
    Finished(Arc<Vec<SerializedNode>>),
}

impl SelectionEvent {
    /// The snapshot, if this is a finish event.
    pub fn snapshot(&self) -> Option<&[SerializedNode]> {
        match self {
            SelectionEvent::Started => None,
            SelectionEvent::Finished(nodes) => Some(nodes.as_slice()),
        }
    }
}

/// An observer of the selection stream.
///
/// Cloning shares the callback and keeps the ID, so a clone is the same
/// listener as far as the registry is concerned.
#[derive(Clone)]
pub struct Listener {
    id: ListenerId,
    callback: Arc<dyn Fn(&SelectionEvent) + Send + Sync>,
}

impl Listener {
    /// Create a new listener with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&SelectionEvent) + Send + Sync + 'static,
    {
        Self {
            id: ListenerId::next(),
            callback: Arc::new(callback),
        }
    }

    /// Get the listener's unique ID.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Deliver one event.
    pub fn notify(&self, event: &SelectionEvent) {
        (self.callback)(event);
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").field("id", &self.id).finish_non_exhaustive()
    }
}

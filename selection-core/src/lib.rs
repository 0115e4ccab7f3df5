//! Selection Core
//!
//! This crate turns the live selection of a design tool's scene graph into
//! plain, transferable snapshots and keeps a set of observers up to date as
//! the selection or the selected nodes change.
//!
//! It implements:
//!
//! - Property resolution against a static per-type schema
//! - Bound-reference (variable) dereferencing
//! - Plugin-data extraction
//! - Tree traversal with type filtering and descendant flattening
//! - Change detection and a shared, reference-counted selection stream
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: The host graph interface, the property schema and an in-memory graph
//! - `resolve`: Options, snapshot types and the resolution passes
//! - `transport`: Boundary messages and MessagePack framing
//! - `reactive`: The resolving-side service and the observing-side listener registry
//!
//! # Example
//!
//! ```rust,ignore
//! use selection_core::graph::{MemoryGraph, MemoryNode, NodeType};
//! use selection_core::reactive::{Listener, ListenerRegistry, SelectionService};
//! use selection_core::resolve::ResolverOptions;
//! use selection_core::transport::channel;
//!
//! let mut graph = MemoryGraph::new("0:1");
//! graph.insert(MemoryNode::new("1:1", NodeType::Text));
//! graph.select(["1:1"]);
//!
//! let (to_service, requests) = channel();
//! let (to_registry, inbound) = channel();
//! let service = SelectionService::new(graph, to_registry);
//! let registry = ListenerRegistry::new(to_service);
//!
//! registry.subscribe(
//!     Listener::new(|event| println!("{event:?}")),
//!     ResolverOptions::default().with_node_types([NodeType::Text]),
//! )?;
//! ```

pub mod graph;
pub mod reactive;
pub mod resolve;
pub mod transport;

pub use graph::{LiveNode, LiveObject, NodeId, NodeType, SceneGraph};
pub use reactive::{Listener, ListenerRegistry, SelectionEvent, SelectionService};
pub use resolve::{resolve_selection, ResolveError, ResolverOptions, SerializedNode};

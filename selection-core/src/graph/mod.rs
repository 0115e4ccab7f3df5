//! Host Graph
//!
//! This module describes the live scene graph the resolver reads from. The
//! host owns every node; the core only borrows them for the duration of one
//! resolution pass.
//!
//! # Overview
//!
//! - [`LiveObject`] is anything with an identity and lazy properties.
//! - [`LiveNode`] adds the scene-node structure: type, visibility, children,
//!   bound references, and plugin-data stores.
//! - [`SceneGraph`] is the host itself: current selection, variable lookup,
//!   the "replace selection" command, and event registration.
//!
//! # Design Decisions
//!
//! 1. Properties are enumerated from an explicit per-type table
//!    ([`schema`]) instead of reflecting over the host object, so the set of
//!    properties a type can yield is known up front.
//!
//! 2. Reading a property is a fallible call. Faults are the host's; the core
//!    never swallows them.
//!
//! 3. [`MemoryGraph`] implements the whole host interface in memory.

mod event;
mod memory;
mod node;
pub mod schema;

pub use event::{HostEvent, HostEventKind, NodeChangeEvent, SceneGraph};
pub use memory::{MemoryGraph, MemoryNode, MemoryVariable, SubscriptionChange};
pub use node::{
    BareNode, BoundReference, BoundVariables, HostError, LiveNode, LiveObject, NodeId, NodeType,
    ObjectKind, PageId, PropertyValue, VariableAlias,
};

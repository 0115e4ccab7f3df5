//! Selection Resolver
//!
//! This module turns live nodes into [`SerializedNode`] snapshots under a
//! [`ResolverOptions`] configuration.
//!
//! # Components
//!
//! - `properties`: reads the lazy properties of one object.
//! - `variables`: dereferences bound references, one level deep.
//! - `plugin_data`: extracts requested keys from plugin-data stores.
//! - `traversal`: walks the selection, applying type filtering, descendant
//!   flattening, and ancestor-visibility propagation.
//!
//! A pass is a pure read of the host graph. It either produces a complete
//! snapshot or fails on the first host fault; partial snapshots are never
//! returned.

mod options;
mod plugin_data;
mod properties;
mod serialized;
mod traversal;
mod variables;

use thiserror::Error;

use crate::graph::{HostError, NodeId};

pub use options::{OptionsError, ResolverOptions, Selector};
pub use plugin_data::{extract_plugin_data, extract_shared_plugin_data};
pub use properties::resolve_properties;
pub use serialized::{
    deserialize_property, serialize_property, ResolvedBinding, ResolvedProperties, SerializedNode,
    SerializedNodeBuilder, FIGMA_MIXED,
};
pub use traversal::{resolve_nodes, resolve_selection};
pub use variables::resolve_bound_variables;

/// Errors that abort a resolution pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("failed to read `{property}` on {id}: {source}")]
    HostRead {
        id: NodeId,
        property: String,
        source: HostError,
    },
}

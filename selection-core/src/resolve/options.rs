//! Resolver Options
//!
//! The declarative configuration that decides what a resolution pass
//! materializes. Options are captured once per subscription and never
//! changed in place.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::NodeType;

/// Errors raised while loading options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid resolver options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Either every name, or an explicit list of names.
///
/// On the wire this is the keyword `"all"` or a list of strings. Booleans
/// are accepted too: `true` means all, `false` means none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selector {
    #[default]
    All,
    Only(Vec<String>),
}

impl Selector {
    /// The empty selection.
    pub fn none() -> Self {
        Selector::Only(Vec::new())
    }

    pub fn only<I, T>(names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Selector::Only(names.into_iter().map(Into::into).collect())
    }

    /// Whether `name` is selected.
    pub fn includes(&self, name: &str) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(names) => names.iter().any(|n| n == name),
        }
    }

    /// Whether nothing at all is selected.
    pub fn is_empty(&self) -> bool {
        matches!(self, Selector::Only(names) if names.is_empty())
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Selector::All => serializer.serialize_str("all"),
            Selector::Only(names) => names.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SelectorRepr {
    Flag(bool),
    Keyword(String),
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match SelectorRepr::deserialize(deserializer)? {
            SelectorRepr::Flag(true) => Ok(Selector::All),
            SelectorRepr::Flag(false) => Ok(Selector::none()),
            SelectorRepr::Keyword(keyword) if keyword == "all" => Ok(Selector::All),
            SelectorRepr::Keyword(other) => Err(de::Error::invalid_value(
                de::Unexpected::Str(&other),
                &"\"all\" or a list of names",
            )),
            SelectorRepr::List(names) => Ok(Selector::Only(names)),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => f.write_str("all"),
            Selector::Only(names) => write!(f, "[{}]", names.join(", ")),
        }
    }
}

/// What a resolution pass includes.
///
/// The defaults resolve every property of every selected node, with no
/// children, references, visibility flag, or plugin data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverOptions {
    /// Node types to emit. `None` matches every type.
    pub node_types: Option<Vec<NodeType>>,

    /// Properties to resolve on every emitted node.
    pub resolve_properties: Selector,

    /// Flatten non-matching containers into their descendants and attach
    /// resolved `children` to emitted containers.
    pub resolve_children: bool,

    /// Reference groups to dereference. Empty disables reference resolution.
    pub resolve_variables: Selector,

    /// Attach the derived `ancestorsVisible` flag.
    pub add_ancestors_visible_property: bool,

    /// Private plugin-data keys to extract.
    pub plugin_data_keys: Vec<String>,

    /// Shared plugin-data keys to extract, grouped by namespace.
    pub shared_plugin_data_keys: IndexMap<String, Vec<String>>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            node_types: None,
            resolve_properties: Selector::All,
            resolve_children: false,
            resolve_variables: Selector::none(),
            add_ancestors_visible_property: false,
            plugin_data_keys: Vec::new(),
            shared_plugin_data_keys: IndexMap::new(),
        }
    }
}

impl ResolverOptions {
    /// Load options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_node_types(mut self, node_types: impl IntoIterator<Item = NodeType>) -> Self {
        self.node_types = Some(node_types.into_iter().collect());
        self
    }

    pub fn with_properties(mut self, properties: Selector) -> Self {
        self.resolve_properties = properties;
        self
    }

    pub fn with_children(mut self, resolve_children: bool) -> Self {
        self.resolve_children = resolve_children;
        self
    }

    pub fn with_variables(mut self, variables: Selector) -> Self {
        self.resolve_variables = variables;
        self
    }

    pub fn with_ancestors_visible(mut self, enabled: bool) -> Self {
        self.add_ancestors_visible_property = enabled;
        self
    }

    pub fn with_plugin_data_keys<I, T>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.plugin_data_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_shared_plugin_data_keys<I, T>(mut self, namespace: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.shared_plugin_data_keys
            .insert(namespace.into(), keys.into_iter().map(Into::into).collect());
        self
    }

    /// Whether a node of this type is emitted.
    pub fn matches(&self, node_type: NodeType) -> bool {
        self.node_types
            .as_ref()
            .map_or(true, |types| types.contains(&node_type))
    }
}

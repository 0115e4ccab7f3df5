//! Tree Traversal Engine
//!
//! Walks a forest of live nodes and assembles one [`SerializedNode`] per
//! emitted node.
//!
//! # Algorithm
//!
//! For every node, in pre-order:
//!
//! 1. If the node's type is filtered out, it is never emitted. When
//!    `resolve_children` is set and the node has children, those children
//!    are walked at the *current* level instead (descendant flattening).
//! 2. Otherwise the node is resolved: properties, references, the
//!    ancestor-visibility flag, plugin data. When `resolve_children` is set
//!    and the node has children, they are walked and attached as `children`.
//!
//! Children of a node are only looked at when `resolve_children` is set.
//! The visibility passed down is `inherited && node.visible`, so a node's own
//! flag only reflects its strict ancestors.
//!
//! # Implementation Notes
//!
//! The walk keeps its own stack instead of recursing, so nesting depth is
//! bounded by memory rather than by the thread's stack. Emitted nodes go to
//! one output buffer; a resolved container remembers where its children
//! start in that buffer and collects them once they are all done.

use tracing::debug;

use super::options::ResolverOptions;
use super::plugin_data::{extract_plugin_data, extract_shared_plugin_data};
use super::properties::resolve_properties;
use super::serialized::{SerializedNode, SerializedNodeBuilder};
use super::variables::resolve_bound_variables;
use super::ResolveError;
use crate::graph::{LiveNode, SceneGraph};

/// Resolve the host's current selection.
pub fn resolve_selection<G>(graph: &G, options: &ResolverOptions) -> Result<Vec<SerializedNode>, ResolveError>
where
    G: SceneGraph + ?Sized,
{
    let selection = graph.selection();
    let resolved = resolve_nodes(graph, &selection, options, true)?;
    debug!(selected = selection.len(), resolved = resolved.len(), "resolved selection");
    Ok(resolved)
}

/// One pending unit of work.
enum Step<'a> {
    /// Resolve or flatten a node.
    Visit { node: &'a dyn LiveNode, ancestors_visible: bool },
    /// All children of a resolved container are in the output from `start` on.
    Close { builder: SerializedNodeBuilder, start: usize },
}

/// Resolve an ordered list of sibling nodes whose strict ancestors'
/// visibility is `ancestors_visible`.
pub fn resolve_nodes<'a, G>(
    graph: &G,
    nodes: &[&'a dyn LiveNode],
    options: &ResolverOptions,
    ancestors_visible: bool,
) -> Result<Vec<SerializedNode>, ResolveError>
where
    G: SceneGraph + ?Sized,
{
    let mut out = Vec::with_capacity(nodes.len());
    let mut stack: Vec<Step<'a>> = nodes
        .iter()
        .rev()
        .map(|&node| Step::Visit { node, ancestors_visible })
        .collect();

    while let Some(step) = stack.pop() {
        match step {
            Step::Visit { node, ancestors_visible } => {
                let children = if options.resolve_children { node.children() } else { None };
                let inherited = ancestors_visible && node.visible();

                if !options.matches(node.node_type()) {
                    if let Some(children) = children {
                        push_children(&mut stack, children, inherited);
                    }
                    continue;
                }

                let builder = resolve_node(graph, node, options, ancestors_visible)?;
                match children {
                    Some(children) => {
                        stack.push(Step::Close { builder, start: out.len() });
                        push_children(&mut stack, children, inherited);
                    }
                    None => out.push(builder.build()),
                }
            }
            Step::Close { builder, start } => {
                let children = out.split_off(start);
                out.push(builder.children(children).build());
            }
        }
    }

    Ok(out)
}

fn push_children<'a>(stack: &mut Vec<Step<'a>>, children: Vec<&'a dyn LiveNode>, ancestors_visible: bool) {
    stack.extend(
        children
            .into_iter()
            .rev()
            .map(|node| Step::Visit { node, ancestors_visible }),
    );
}

/// Everything about one emitted node except its children.
fn resolve_node<G>(
    graph: &G,
    node: &dyn LiveNode,
    options: &ResolverOptions,
    ancestors_visible: bool,
) -> Result<SerializedNodeBuilder, ResolveError>
where
    G: SceneGraph + ?Sized,
{
    let mut builder = SerializedNode::builder(node.node_type(), node.id().clone())
        .properties(resolve_properties(node, &options.resolve_properties)?);

    if options.add_ancestors_visible_property {
        builder = builder.ancestors_visible(ancestors_visible);
    }

    if !options.resolve_variables.is_empty() {
        if let Some(bindings) = node.bound_variables() {
            builder = builder.bound_variable_instances(resolve_bound_variables(
                graph,
                &bindings,
                &options.resolve_variables,
            )?);
        }
    }

    Ok(builder
        .plugin_data(extract_plugin_data(node, &options.plugin_data_keys))
        .shared_plugin_data(extract_shared_plugin_data(node, &options.shared_plugin_data_keys)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{MemoryGraph, MemoryNode, NodeType};
    use crate::reactive::MAX_CHANGE_DEPTH;
    use crate::resolve::Selector;
    use serde_json::json;

    fn ids(nodes: &[SerializedNode]) -> Vec<&str> {
        nodes.iter().map(|node| node.id.as_str()).collect()
    }

    fn document() -> MemoryGraph {
        let mut graph = MemoryGraph::new("0:1");
        graph.insert(
            MemoryNode::new("1:1", NodeType::Frame)
                .with_property("name", json!("Card"))
                .with_child(MemoryNode::new("1:2", NodeType::Text).with_property("characters", json!("Title")))
                .with_child(
                    MemoryNode::new("1:3", NodeType::Group)
                        .hidden()
                        .with_child(MemoryNode::new("1:4", NodeType::Text).with_property("characters", json!("Body")))
                        .with_child(MemoryNode::new("1:5", NodeType::Rectangle)),
                )
                .with_child(MemoryNode::new("1:6", NodeType::Text).hidden()),
        );
        graph.insert(MemoryNode::new("2:1", NodeType::Ellipse));
        graph
    }

    #[test]
    fn siblings_resolve_in_input_order() {
        let mut graph = document();
        graph.select(["2:1", "1:1"]);
        let options = ResolverOptions::default().with_properties(Selector::none());

        let resolved = resolve_selection(&graph, &options).unwrap();
        assert_eq!(ids(&resolved), vec!["2:1", "1:1"]);
        assert!(resolved.iter().all(|node| node.properties.is_empty() && node.children.is_none()));
    }

    #[test]
    fn type_filter_flattens_descendants_in_pre_order() {
        let mut graph = document();
        graph.select(["1:1"]);
        let options = ResolverOptions::default()
            .with_node_types([NodeType::Text])
            .with_children(true);

        let resolved = resolve_selection(&graph, &options).unwrap();
        assert_eq!(ids(&resolved), vec!["1:2", "1:4", "1:6"]);
    }

    #[test]
    fn type_filter_without_children_skips_containers() {
        let mut graph = document();
        graph.select(["1:1", "2:1"]);
        let options = ResolverOptions::default().with_node_types([NodeType::Text, NodeType::Ellipse]);

        let resolved = resolve_selection(&graph, &options).unwrap();
        assert_eq!(ids(&resolved), vec!["2:1"]);
    }

    #[test]
    fn matched_container_without_children_option_is_not_inspected() {
        let mut graph = document();
        graph.select(["1:1"]);
        let options = ResolverOptions::default().with_node_types([NodeType::Frame]);

        let resolved = resolve_selection(&graph, &options).unwrap();
        assert_eq!(ids(&resolved), vec!["1:1"]);
        assert!(resolved[0].children.is_none());
        assert_eq!(graph.node(&"1:2".into()).unwrap().read_count(), 0);
    }

    #[test]
    fn matched_container_carries_filtered_children() {
        let mut graph = document();
        graph.select(["1:1"]);
        let options = ResolverOptions::default()
            .with_node_types([NodeType::Frame, NodeType::Text])
            .with_children(true);

        let resolved = resolve_selection(&graph, &options).unwrap();
        assert_eq!(ids(&resolved), vec!["1:1"]);
        let children = resolved[0].children.as_deref().unwrap();
        assert_eq!(ids(children), vec!["1:2", "1:4", "1:6"]);
    }

    #[test]
    fn unfiltered_children_are_nested() {
        let mut graph = document();
        graph.select(["1:1"]);
        let options = ResolverOptions::default().with_children(true);

        let resolved = resolve_selection(&graph, &options).unwrap();
        assert_eq!(ids(&resolved), vec!["1:1"]);
        let children = resolved[0].children.as_deref().unwrap();
        assert_eq!(ids(children), vec!["1:2", "1:3", "1:6"]);
        let group_children = children[1].children.as_deref().unwrap();
        assert_eq!(ids(group_children), vec!["1:4", "1:5"]);
        assert!(children[0].children.is_none());
    }

    #[test]
    fn ancestors_visible_ignores_own_visibility() {
        let mut graph = document();
        graph.select(["1:1"]);
        let options = ResolverOptions::default()
            .with_children(true)
            .with_ancestors_visible(true)
            .with_properties(Selector::none());

        let resolved = resolve_selection(&graph, &options).unwrap();
        let frame = &resolved[0];
        assert_eq!(frame.ancestors_visible, Some(true));

        let children = frame.children.as_deref().unwrap();
        let hidden_group = &children[1];
        assert_eq!(hidden_group.ancestors_visible, Some(true));
        assert_eq!(children[2].ancestors_visible, Some(true));

        for grandchild in hidden_group.children.as_deref().unwrap() {
            assert_eq!(grandchild.ancestors_visible, Some(false));
        }
    }

    #[test]
    fn ancestors_visible_propagates_through_flattened_containers() {
        let mut graph = document();
        graph.select(["1:1"]);
        let options = ResolverOptions::default()
            .with_node_types([NodeType::Text])
            .with_children(true)
            .with_ancestors_visible(true);

        let resolved = resolve_selection(&graph, &options).unwrap();
        let flags: Vec<Option<bool>> = resolved.iter().map(|node| node.ancestors_visible).collect();
        assert_eq!(flags, vec![Some(true), Some(false), Some(true)]);
    }

    #[test]
    fn optional_fields_are_absent_by_default() {
        let mut graph = document();
        graph.select(["2:1"]);

        let resolved = resolve_selection(&graph, &ResolverOptions::default()).unwrap();
        let node = &resolved[0];
        assert!(node.ancestors_visible.is_none());
        assert!(node.bound_variable_instances.is_none());
        assert!(node.plugin_data.is_none());
        assert!(node.shared_plugin_data.is_none());
    }

    #[test]
    fn a_fault_aborts_the_pass() {
        let mut graph = document();
        graph.insert(MemoryNode::new("3:1", NodeType::Text).with_fault("characters", "font not loaded"));
        graph.select(["2:1", "3:1"]);

        let error = resolve_selection(&graph, &ResolverOptions::default()).unwrap_err();
        assert!(error.to_string().contains("3:1"));
    }

    #[test]
    fn plugin_data_is_attached_to_emitted_nodes_only() {
        let mut graph = MemoryGraph::new("0:1");
        graph.insert(
            MemoryNode::new("1:1", NodeType::Frame)
                .with_plugin_data("token", "card")
                .with_child(
                    MemoryNode::new("1:2", NodeType::Text)
                        .with_plugin_data("token", "title")
                        .with_shared_plugin_data("tokens", "color", "#111111"),
                ),
        );
        graph.select(["1:1"]);
        let options = ResolverOptions::default()
            .with_node_types([NodeType::Text])
            .with_children(true)
            .with_plugin_data_keys(["token"])
            .with_shared_plugin_data_keys("tokens", ["color"]);

        let resolved = resolve_selection(&graph, &options).unwrap();
        assert_eq!(ids(&resolved), vec!["1:2"]);
        let plugin_data = resolved[0].plugin_data.as_ref().unwrap();
        assert_eq!(plugin_data.get("token").map(String::as_str), Some("title"));
        let shared = resolved[0].shared_plugin_data.as_ref().unwrap();
        assert_eq!(shared["tokens"].get("color").map(String::as_str), Some("#111111"));
    }

    #[test]
    fn deep_chains_resolve_on_a_default_stack() {
        let depth = MAX_CHANGE_DEPTH + 1;
        let mut node = MemoryNode::new("leaf", NodeType::Text);
        for level in 0..depth {
            node = MemoryNode::new(format!("g:{level}"), NodeType::Group).with_child(node);
        }
        let mut graph = MemoryGraph::new("0:1");
        graph.insert(node);
        graph.select([format!("g:{}", depth - 1)]);

        let flattened = ResolverOptions::default()
            .with_node_types([NodeType::Text])
            .with_children(true)
            .with_properties(Selector::none());
        assert_eq!(ids(&resolve_selection(&graph, &flattened).unwrap()), vec!["leaf"]);

        let nested = ResolverOptions::default()
            .with_children(true)
            .with_properties(Selector::none());
        let resolved = resolve_selection(&graph, &nested).unwrap();
        let mut current = &resolved[0];
        let mut levels = 0;
        while let Some(children) = current.children.as_deref() {
            assert_eq!(children.len(), 1);
            current = &children[0];
            levels += 1;
        }
        assert_eq!(levels, depth);
        assert_eq!(current.id.as_str(), "leaf");
    }
}

//! Reference Resolver
//!
//! Dereferences a node's bound references against the host and resolves each
//! target's own properties. Resolution is exactly one level deep: a target's
//! own references are never followed.
//!
//! Groups are handled by shape alone, so groups the resolver has never heard
//! of work the same as `fills` or `width`.

use indexmap::IndexMap;
use tracing::debug;

use super::options::Selector;
use super::properties::resolve_properties;
use super::serialized::{ResolvedBinding, ResolvedProperties};
use super::ResolveError;
use crate::graph::{BoundReference, BoundVariables, SceneGraph, VariableAlias};

/// Resolve the selected groups of `bindings`.
///
/// Returns `None` when nothing resolved, so the caller can omit the field.
pub fn resolve_bound_variables<G>(
    graph: &G,
    bindings: &BoundVariables,
    selector: &Selector,
) -> Result<Option<IndexMap<String, ResolvedBinding>>, ResolveError>
where
    G: SceneGraph + ?Sized,
{
    let mut instances = IndexMap::new();

    for (group, reference) in bindings {
        if !selector.includes(group) {
            continue;
        }
        if let Some(binding) = resolve_reference(graph, reference)? {
            instances.insert(group.clone(), binding);
        }
    }

    Ok((!instances.is_empty()).then_some(instances))
}

fn resolve_reference<G>(graph: &G, reference: &BoundReference) -> Result<Option<ResolvedBinding>, ResolveError>
where
    G: SceneGraph + ?Sized,
{
    let binding = match reference {
        BoundReference::Alias(alias) => resolve_alias(graph, alias)?.map(ResolvedBinding::Single),
        BoundReference::List(aliases) => {
            let mut targets = Vec::with_capacity(aliases.len());
            for alias in aliases {
                if let Some(target) = resolve_alias(graph, alias)? {
                    targets.push(target);
                }
            }
            (!targets.is_empty()).then_some(ResolvedBinding::List(targets))
        }
        BoundReference::Map(aliases) => {
            let mut targets = IndexMap::with_capacity(aliases.len());
            for (key, alias) in aliases {
                if let Some(target) = resolve_alias(graph, alias)? {
                    targets.insert(key.clone(), target);
                }
            }
            (!targets.is_empty()).then_some(ResolvedBinding::Map(targets))
        }
    };
    Ok(binding)
}

fn resolve_alias<G>(graph: &G, alias: &VariableAlias) -> Result<Option<ResolvedProperties>, ResolveError>
where
    G: SceneGraph + ?Sized,
{
    let Some(target) = graph.variable_by_id(&alias.id) else {
        debug!(id = %alias.id, "dropping reference to a missing variable");
        return Ok(None);
    };

    let mut resolved = ResolvedProperties::new();
    resolved.insert("id".to_string(), target.id().as_str().into());
    resolved.extend(resolve_properties(target, &Selector::All)?);
    Ok(Some(resolved))
}

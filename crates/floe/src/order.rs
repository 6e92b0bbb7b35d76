//! Dependency ordering for object creation.
//!
//! A model object can only be created once its parent exists, so objects
//! are created in topological order of the declared `parentRef` edges.
//! This handles arbitrary nesting depth; a `parentRef` cycle is a
//! structural plan error.
//!
//! The order is deterministic: objects are grouped by nesting depth
//! (parents always in an earlier group than their children) and keep plan
//! declaration order within each group.

use indexmap::IndexMap;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use floe_core::plan::{PlanError, PlanObject};

/// Compute the creation order for the plan's objects.
///
/// A `parentRef` naming a ref that is not declared in the plan does not
/// constrain the order; such an object is created in the first group and
/// its parent is resolved (or falls back to the landscape root) at
/// creation time.
///
/// # Errors
///
/// Returns [`PlanError::ParentCycle`] when the parent edges contain a
/// cycle, naming one of the objects involved.
pub fn creation_order(objects: &[PlanObject]) -> Result<Vec<&PlanObject>, PlanError> {
    let index_of: IndexMap<&str, usize> = objects
        .iter()
        .enumerate()
        .map(|(index, object)| (object.ref_name(), index))
        .collect();

    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(objects.len(), objects.len());
    let nodes: Vec<NodeIndex> = (0..objects.len()).map(|i| graph.add_node(i)).collect();

    for (index, object) in objects.iter().enumerate() {
        if let Some(parent_ref) = &object.parent_ref {
            if let Some(&parent) = index_of.get(parent_ref.as_str()) {
                graph.add_edge(nodes[parent], nodes[index], ());
            }
        }
    }

    let topo = toposort(&graph, None).map_err(|cycle| PlanError::ParentCycle {
        ref_name: objects[graph[cycle.node_id()]].ref_name().to_string(),
    })?;

    // Parents appear before children in topo order, so one pass assigns
    // each object a nesting depth.
    let mut depth = vec![0usize; objects.len()];
    for node in topo {
        let index = graph[node];
        if let Some(parent_ref) = &objects[index].parent_ref {
            if let Some(&parent) = index_of.get(parent_ref.as_str()) {
                depth[index] = depth[parent] + 1;
            }
        }
    }

    let mut order: Vec<usize> = (0..objects.len()).collect();
    order.sort_by_key(|&index| depth[index]);

    Ok(order.into_iter().map(|index| &objects[index]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use floe_core::plan::ObjectType;

    fn object(ref_name: &str, parent_ref: Option<&str>) -> PlanObject {
        PlanObject {
            object_ref: Some(ref_name.to_string()),
            name: ref_name.to_string(),
            object_type: ObjectType::App,
            parent_ref: parent_ref.map(str::to_string),
            external: false,
            status: None,
            caption: None,
            description: None,
            technology_ids: Vec::new(),
            team_ids: Vec::new(),
            domain_id: None,
            labels: None,
        }
    }

    fn refs(order: &[&PlanObject]) -> Vec<String> {
        order.iter().map(|o| o.ref_name().to_string()).collect()
    }

    #[test]
    fn test_roots_before_children() {
        let objects = vec![
            object("child", Some("root")),
            object("root", None),
            object("other", None),
        ];

        let order = creation_order(&objects).expect("acyclic plan orders");
        assert_eq!(refs(&order), ["root", "other", "child"]);
    }

    #[test]
    fn test_grandchildren_after_children() {
        // Declared deepest-first; ordering must still put each parent
        // ahead of its child.
        let objects = vec![
            object("grandchild", Some("child")),
            object("child", Some("root")),
            object("root", None),
        ];

        let order = creation_order(&objects).expect("acyclic plan orders");
        assert_eq!(refs(&order), ["root", "child", "grandchild"]);
    }

    #[test]
    fn test_declaration_order_stable_within_depth() {
        let objects = vec![
            object("b", None),
            object("a", None),
            object("b1", Some("b")),
            object("a1", Some("a")),
        ];

        let order = creation_order(&objects).expect("acyclic plan orders");
        assert_eq!(refs(&order), ["b", "a", "b1", "a1"]);
    }

    #[test]
    fn test_unknown_parent_does_not_constrain() {
        let objects = vec![object("orphan", Some("created-last-run"))];

        let order = creation_order(&objects).expect("unknown parent is allowed");
        assert_eq!(refs(&order), ["orphan"]);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let objects = vec![object("a", Some("b")), object("b", Some("a"))];

        let err = creation_order(&objects).expect_err("cycle must fail");
        assert!(matches!(err, PlanError::ParentCycle { .. }));
    }

    #[test]
    fn test_self_parent_is_a_cycle() {
        let objects = vec![object("a", Some("a"))];

        assert!(matches!(
            creation_order(&objects),
            Err(PlanError::ParentCycle { ref_name }) if ref_name == "a"
        ));
    }
}

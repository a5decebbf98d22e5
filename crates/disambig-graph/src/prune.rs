//! Frontier pruning
//!
//! Keeps everything from the roots up to and including the next decision and
//! discards what lies beyond it.

use crate::error::GraphResult;
use crate::graph::{ActionGraph, NodeId, TraversalDirection};
use std::collections::HashSet;

/// Computes reachability closures and prunes copies of a graph
#[derive(Debug, Clone, Copy)]
pub struct GraphPruner<'g> {
    graph: &'g ActionGraph,
}

impl<'g> GraphPruner<'g> {
    /// Prune `graph`
    #[must_use]
    pub const fn new(graph: &'g ActionGraph) -> Self {
        Self { graph }
    }

    /// Nodes reachable from `source` in `direction`, never entering `exclude`
    ///
    /// `source` itself is only included if it is reachable from itself.
    ///
    /// # Errors
    /// Propagates adjacency lookup failures
    pub fn reachable_closure(
        &self,
        source: &NodeId,
        exclude: &HashSet<NodeId>,
        direction: TraversalDirection,
    ) -> GraphResult<HashSet<NodeId>> {
        let mut reached = HashSet::new();
        if self.graph.is_empty() {
            return Ok(reached);
        }
        let mut layer = vec![source.clone()];
        while !layer.is_empty() {
            let mut next = Vec::new();
            for node in &layer {
                for edge in self.graph.edges_directed(node, direction)? {
                    let target = edge.next(direction);
                    if !exclude.contains(target) && reached.insert(target.clone()) {
                        next.push(target.clone());
                    }
                }
            }
            layer = next;
        }
        Ok(reached)
    }

    /// Union of the closures of every frontier node, protecting `traversed ∪ frontier`
    ///
    /// # Errors
    /// Propagates adjacency lookup failures
    pub fn nodes_to_remove(
        &self,
        frontier: &HashSet<NodeId>,
        traversed: &HashSet<NodeId>,
        direction: TraversalDirection,
    ) -> GraphResult<HashSet<NodeId>> {
        let mut remove = HashSet::new();
        if self.graph.is_empty() {
            return Ok(remove);
        }
        let protected: HashSet<NodeId> = traversed.union(frontier).cloned().collect();
        for start in frontier {
            remove.extend(self.reachable_closure(start, &protected, direction)?);
        }
        Ok(remove)
    }

    /// Copy of the graph without everything beyond `frontier`
    ///
    /// # Errors
    /// Propagates adjacency lookup failures
    pub fn prune_beyond(
        &self,
        frontier: &HashSet<NodeId>,
        traversed: &HashSet<NodeId>,
        direction: TraversalDirection,
    ) -> GraphResult<ActionGraph> {
        if self.graph.is_empty() {
            return Ok(self.graph.clone());
        }
        let remove = self.nodes_to_remove(frontier, traversed, direction)?;
        Ok(self.graph.without_nodes(&remove))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use disambig_plan::Plan;

    fn set(nodes: &[&str]) -> HashSet<NodeId> {
        nodes.iter().map(|n| NodeId::from(*n)).collect()
    }

    fn graph() -> ActionGraph {
        ActionGraph::from_plans(&[
            Plan::from_actions(["a", "x", "p", "r"], 4).unwrap(),
            Plan::from_actions(["a", "y", "q"], 3).unwrap(),
        ])
    }

    #[test]
    fn closure_excludes_protected_nodes() {
        let g = graph();
        let pruner = GraphPruner::new(&g);
        let closure = pruner
            .reachable_closure(&"node1".into(), &set(&["node2"]), TraversalDirection::Forward)
            .unwrap();
        assert_eq!(closure, set(&["node5", "node6"]));
    }

    #[test]
    fn prune_keeps_up_to_frontier() {
        let g = graph();
        let pruner = GraphPruner::new(&g);
        let pruned = pruner
            .prune_beyond(
                &set(&["node2", "node5"]),
                &set(&["node0", "node1"]),
                TraversalDirection::Forward,
            )
            .unwrap();
        let kept: HashSet<NodeId> = pruned.nodes().cloned().collect();
        assert_eq!(kept, set(&["node0", "node1", "node2", "node5"]));
        assert_eq!(pruned.edge_count(), 3);
        assert_eq!(g.node_count(), 7);
    }

    #[test]
    fn prune_backward() {
        let g = graph();
        let pruner = GraphPruner::new(&g);
        let remove = pruner
            .nodes_to_remove(&set(&["node1"]), &set(&["node4", "node3", "node2"]), TraversalDirection::Backward)
            .unwrap();
        assert_eq!(remove, set(&["node0"]));
    }

    #[test]
    fn empty_graph_prunes_to_empty() {
        let g = ActionGraph::new();
        let pruned = GraphPruner::new(&g)
            .prune_beyond(&set(&["x"]), &HashSet::new(), TraversalDirection::Forward)
            .unwrap();
        assert!(pruned.is_empty());
    }
}

//! Layered BFS distances from the roots or the terminals

use crate::error::GraphResult;
use crate::graph::{ActionGraph, NodeId, TraversalDirection};
use disambig_plan::ActionLabel;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Distance reported for nodes that cannot be reached
pub const UNBOUNDED_DISTANCE: usize = usize::MAX;

/// Per-node BFS distances in one direction, plus the label→anchor-node index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistanceIndex {
    direction: Option<TraversalDirection>,
    distances: HashMap<NodeId, usize>,
    label_to_nodes: HashMap<ActionLabel, BTreeSet<NodeId>>,
}

impl DistanceIndex {
    /// BFS from every root in lock-step; a node's distance is fixed on first visit
    ///
    /// # Errors
    /// Propagates adjacency lookup failures
    pub fn compute(graph: &ActionGraph, direction: TraversalDirection) -> GraphResult<Self> {
        let mut index = Self {
            direction: Some(direction),
            ..Self::default()
        };
        if graph.is_empty() {
            return Ok(index);
        }

        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut layer: Vec<NodeId> = graph
            .root_nodes(direction)
            .into_iter()
            .filter(|n| seen.insert(n.clone()))
            .collect();
        let mut depth = 0usize;

        while !layer.is_empty() {
            let mut next = Vec::new();
            for node in &layer {
                index.distances.entry(node.clone()).or_insert(depth);
                for edge in graph.edges_directed(node, direction)? {
                    index
                        .label_to_nodes
                        .entry(edge.label.clone())
                        .or_default()
                        .insert(node.clone());
                    let target = edge.next(direction);
                    if seen.insert(target.clone()) {
                        next.push(target.clone());
                    }
                }
            }
            depth += 1;
            layer = next;
        }
        Ok(index)
    }

    /// Direction this index was computed in
    #[must_use]
    pub const fn direction(&self) -> Option<TraversalDirection> {
        self.direction
    }

    /// Distance of `node`, if reached
    #[must_use]
    pub fn get(&self, node: &NodeId) -> Option<usize> {
        self.distances.get(node).copied()
    }

    /// Minimum distance over `nodes`; [`UNBOUNDED_DISTANCE`] if none was reached
    pub fn min_over<'a>(&self, nodes: impl IntoIterator<Item = &'a NodeId>) -> usize {
        nodes
            .into_iter()
            .filter_map(|n| self.get(n))
            .min()
            .unwrap_or(UNBOUNDED_DISTANCE)
    }

    /// Minimum distance over the anchor nodes of every edge labelled `label`
    #[must_use]
    pub fn label_distance(&self, label: &ActionLabel) -> usize {
        self.label_to_nodes
            .get(label)
            .map_or(UNBOUNDED_DISTANCE, |nodes| self.min_over(nodes))
    }

    /// Anchor nodes of edges labelled `label`
    #[must_use]
    pub fn nodes_for_label(&self, label: &ActionLabel) -> Option<&BTreeSet<NodeId>> {
        self.label_to_nodes.get(label)
    }

    /// Label → anchor nodes
    #[must_use]
    pub fn label_to_nodes(&self) -> &HashMap<ActionLabel, BTreeSet<NodeId>> {
        &self.label_to_nodes
    }

    /// Node → distance
    #[must_use]
    pub fn distances(&self) -> &HashMap<NodeId, usize> {
        &self.distances
    }

    /// Number of nodes with a distance
    #[must_use]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// True if no node was reached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(s: &str) -> ActionLabel {
        ActionLabel::normalize(s).unwrap()
    }

    fn shortcut_graph() -> ActionGraph {
        // s -> a -> b -> t plus shortcut s -> t
        let mut g = ActionGraph::new();
        g.add_edge("s".into(), "a".into(), label("one"));
        g.add_edge("a".into(), "b".into(), label("two"));
        g.add_edge("b".into(), "t".into(), label("three"));
        g.add_edge("s".into(), "t".into(), label("jump"));
        g
    }

    #[test]
    fn forward_distances_are_shortest() {
        let d = DistanceIndex::compute(&shortcut_graph(), TraversalDirection::Forward).unwrap();
        assert_eq!(d.get(&"s".into()), Some(0));
        assert_eq!(d.get(&"a".into()), Some(1));
        assert_eq!(d.get(&"b".into()), Some(2));
        assert_eq!(d.get(&"t".into()), Some(1));
    }

    #[test]
    fn backward_distances_from_goal() {
        let d = DistanceIndex::compute(&shortcut_graph(), TraversalDirection::Backward).unwrap();
        assert_eq!(d.get(&"t".into()), Some(0));
        assert_eq!(d.get(&"s".into()), Some(1));
        assert_eq!(d.get(&"a".into()), Some(2));
    }

    #[test]
    fn label_index_anchors_expanded_node() {
        let d = DistanceIndex::compute(&shortcut_graph(), TraversalDirection::Forward).unwrap();
        let nodes = d.nodes_for_label(&label("two")).unwrap();
        assert_eq!(nodes.iter().collect::<Vec<_>>(), vec![&NodeId::from("a")]);
        assert_eq!(d.label_distance(&label("two")), 1);
        assert_eq!(d.label_distance(&label("missing")), UNBOUNDED_DISTANCE);
    }

    #[test]
    fn multiple_roots_in_lock_step() {
        let mut g = ActionGraph::new();
        g.add_edge("r1".into(), "x".into(), label("a"));
        g.add_edge("r2".into(), "y".into(), label("b"));
        g.add_edge("y".into(), "x".into(), label("c"));
        let d = DistanceIndex::compute(&g, TraversalDirection::Forward).unwrap();
        assert_eq!(d.get(&"r1".into()), Some(0));
        assert_eq!(d.get(&"r2".into()), Some(0));
        assert_eq!(d.get(&"x".into()), Some(1));
    }

    #[test]
    fn empty_graph_has_no_distances() {
        let d = DistanceIndex::compute(&ActionGraph::new(), TraversalDirection::Forward).unwrap();
        assert!(d.is_empty());
        assert_eq!(d.min_over(&[NodeId::from("x")]), UNBOUNDED_DISTANCE);
    }
}

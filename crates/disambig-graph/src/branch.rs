//! Branch-point search
//!
//! Lock-step BFS from every root (or terminal) that stops at the first nodes
//! where plans diverge. All simultaneous branch points are returned, one per
//! independent frontier.

use crate::error::GraphResult;
use crate::graph::{ActionGraph, Edge, NodeId, TraversalDirection};
use disambig_plan::ActionLabel;
use std::collections::HashSet;

/// A node where plans diverge
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BranchPoint {
    /// Node with more than one outgoing edge
    pub node: NodeId,
    /// Its diverging edges, in insertion order
    pub edges: Vec<Edge>,
    /// Labels walked from the root to reach it
    pub path: Vec<ActionLabel>,
}

impl BranchPoint {
    /// Nodes reached through the diverging edges in `direction`
    #[must_use]
    pub fn frontier(&self, direction: TraversalDirection) -> Vec<NodeId> {
        self.edges.iter().map(|e| e.next(direction).clone()).collect()
    }
}

/// Result of a branch-point search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchSearch {
    /// First branch points met, in discovery order
    pub branch_points: Vec<BranchPoint>,
    /// Every node dequeued and processed
    pub visited: HashSet<NodeId>,
}

/// Finds the first branch points of a graph
#[derive(Debug, Clone, Copy)]
pub struct BranchPointFinder<'g> {
    graph: &'g ActionGraph,
}

impl<'g> BranchPointFinder<'g> {
    /// Search over `graph`
    #[must_use]
    pub const fn new(graph: &'g ActionGraph) -> Self {
        Self { graph }
    }

    /// Walk single-successor chains from every start node
    ///
    /// Forward: a node with several out-edges is a branch point; one out-edge
    /// is followed; none is a dead end. Backward: branching is still decided
    /// by out-degree (the converging side); otherwise all in-edges are
    /// followed, and a node without in-edges is a dead end.
    ///
    /// # Errors
    /// Propagates adjacency lookup failures
    pub fn find(&self, direction: TraversalDirection) -> GraphResult<BranchSearch> {
        let mut search = BranchSearch::default();
        if self.graph.is_empty() {
            return Ok(search);
        }

        let mut queue: Vec<(NodeId, Vec<ActionLabel>)> = self
            .graph
            .root_nodes(direction)
            .into_iter()
            .map(|root| (root, Vec::new()))
            .collect();

        while !queue.is_empty() {
            let mut next = Vec::new();
            for (node, path) in queue {
                if search.visited.contains(&node) {
                    continue;
                }
                let out = self.graph.out_edges(&node)?;
                match direction {
                    TraversalDirection::Forward => match out.len() {
                        0 => {}
                        1 => enqueue(&out, &path, direction, &mut next),
                        _ => search.branch_points.push(BranchPoint {
                            node: node.clone(),
                            edges: out,
                            path,
                        }),
                    },
                    TraversalDirection::Backward => {
                        if out.len() > 1 {
                            search.branch_points.push(BranchPoint {
                                node: node.clone(),
                                edges: out,
                                path,
                            });
                        } else {
                            let incoming = self.graph.in_edges(&node)?;
                            enqueue(&incoming, &path, direction, &mut next);
                        }
                    }
                }
                search.visited.insert(node);
            }
            queue = next;
        }
        Ok(search)
    }
}

fn enqueue(
    edges: &[Edge],
    path: &[ActionLabel],
    direction: TraversalDirection,
    queue: &mut Vec<(NodeId, Vec<ActionLabel>)>,
) {
    for edge in edges {
        let mut extended = path.to_vec();
        extended.push(edge.label.clone());
        queue.push((edge.next(direction).clone(), extended));
    }
}

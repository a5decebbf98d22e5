//! Action graph model
//!
//! A directed multigraph over opaque node identifiers whose edges carry
//! normalized action labels. A graph is built once per disambiguation step
//! from the retained plan set and is never mutated afterwards: pruning
//! produces a filtered copy.

use crate::error::{GraphError, GraphResult};
use disambig_plan::{ActionLabel, Plan};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::{self, Display, Formatter};

/// Opaque node identifier, as named by the graph description
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Traversal direction
///
/// `Forward` starts at the roots (no incoming edges) and follows out-edges;
/// `Backward` starts at the terminals (no outgoing edges) and follows in-edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalDirection {
    /// From the initial state towards the goal
    Forward,
    /// From the goal towards the initial state
    Backward,
}

impl TraversalDirection {
    /// Whether this is `Forward`
    #[inline]
    #[must_use]
    pub const fn is_forward(self) -> bool {
        matches!(self, Self::Forward)
    }

    /// Adjacency followed in this direction
    #[must_use]
    pub const fn petgraph(self) -> Direction {
        match self {
            Self::Forward => Direction::Outgoing,
            Self::Backward => Direction::Incoming,
        }
    }
}

/// A labelled edge, identified by its endpoints and label
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Edge {
    /// Tail node
    pub source: NodeId,
    /// Head node
    pub target: NodeId,
    /// Normalized action label
    pub label: ActionLabel,
}

impl Edge {
    /// Node reached by following this edge in `direction`
    #[must_use]
    pub fn next(&self, direction: TraversalDirection) -> &NodeId {
        match direction {
            TraversalDirection::Forward => &self.target,
            TraversalDirection::Backward => &self.source,
        }
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.source, self.label, self.target)
    }
}

/// Directed multigraph of action-labelled edges
#[derive(Debug, Clone, Default)]
pub struct ActionGraph {
    graph: DiGraph<NodeId, ActionLabel>,
    index: HashMap<NodeId, NodeIndex>,
}

impl ActionGraph {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge plans into a prefix tree rooted at `node0`
    ///
    /// Plans sharing an action prefix share the corresponding path. Nodes are
    /// numbered in first-seen order. No plans yields the empty graph.
    #[must_use]
    pub fn from_plans(plans: &[Plan]) -> Self {
        let mut graph = Self::new();
        if plans.is_empty() {
            return graph;
        }
        let root = NodeId::new("node0");
        graph.add_node(root.clone());
        let mut next_id = 1usize;

        for plan in plans {
            let mut current = root.clone();
            for action in plan.actions() {
                let existing = graph
                    .out_edges(&current)
                    .ok()
                    .and_then(|edges| edges.into_iter().find(|e| &e.label == action));
                current = match existing {
                    Some(edge) => edge.target,
                    None => {
                        let node = NodeId::new(format!("node{next_id}"));
                        next_id += 1;
                        graph.add_edge(current, node.clone(), action.clone());
                        node
                    }
                };
            }
        }
        graph
    }

    /// Add a node; adding an existing node is a no-op
    pub fn add_node(&mut self, id: NodeId) {
        self.ensure_node(id);
    }

    /// Add an edge, creating missing endpoints
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, label: ActionLabel) {
        let a = self.ensure_node(from);
        let b = self.ensure_node(to);
        self.graph.add_edge(a, b, label);
    }

    fn ensure_node(&mut self, id: NodeId) -> NodeIndex {
        if let Some(idx) = self.index.get(&id) {
            return *idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.index.insert(id, idx);
        idx
    }

    fn node_index(&self, id: &NodeId) -> GraphResult<NodeIndex> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::NoSuchNode(id.clone()))
    }

    fn edge_at(&self, id: EdgeIndex) -> Option<Edge> {
        let (a, b) = self.graph.edge_endpoints(id)?;
        Some(Edge {
            source: self.graph[a].clone(),
            target: self.graph[b].clone(),
            label: self.graph.edge_weight(id)?.clone(),
        })
    }

    /// True when the graph has no nodes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether `id` is a node of this graph
    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Edges in insertion order
    #[must_use]
    pub fn edges(&self) -> Vec<Edge> {
        self.graph
            .edge_indices()
            .filter_map(|id| self.edge_at(id))
            .collect()
    }

    /// Distinct action labels carried by edges
    #[must_use]
    pub fn action_labels(&self) -> BTreeSet<ActionLabel> {
        self.graph.edge_weights().cloned().collect()
    }

    /// Label of the first edge from `from` to `to`
    ///
    /// # Errors
    /// [`GraphError::NoSuchNode`] for unknown endpoints, [`GraphError::NoSuchEdge`]
    /// if they are not connected
    pub fn edge_label(&self, from: &NodeId, to: &NodeId) -> GraphResult<&ActionLabel> {
        let a = self.node_index(from)?;
        let b = self.node_index(to)?;
        self.graph
            .edges_connecting(a, b)
            .map(|e| e.id())
            .min()
            .and_then(|id| self.graph.edge_weight(id))
            .ok_or_else(|| GraphError::NoSuchEdge {
                from: from.clone(),
                to: to.clone(),
            })
    }

    /// Edges leaving (forward) or entering (backward) `node`, in insertion order
    ///
    /// # Errors
    /// [`GraphError::NoSuchNode`] if `node` is not in the graph
    pub fn edges_directed(&self, node: &NodeId, direction: TraversalDirection) -> GraphResult<Vec<Edge>> {
        let idx = self.node_index(node)?;
        let mut ids: Vec<EdgeIndex> = self
            .graph
            .edges_directed(idx, direction.petgraph())
            .map(|e| e.id())
            .collect();
        // petgraph yields adjacency newest-first
        ids.sort_unstable();
        Ok(ids.into_iter().filter_map(|id| self.edge_at(id)).collect())
    }

    /// Outgoing edges of `node`, in insertion order
    ///
    /// # Errors
    /// [`GraphError::NoSuchNode`] if `node` is not in the graph
    pub fn out_edges(&self, node: &NodeId) -> GraphResult<Vec<Edge>> {
        self.edges_directed(node, TraversalDirection::Forward)
    }

    /// Incoming edges of `node`, in insertion order
    ///
    /// # Errors
    /// [`GraphError::NoSuchNode`] if `node` is not in the graph
    pub fn in_edges(&self, node: &NodeId) -> GraphResult<Vec<Edge>> {
        self.edges_directed(node, TraversalDirection::Backward)
    }

    /// Number of outgoing edges
    ///
    /// # Errors
    /// [`GraphError::NoSuchNode`] if `node` is not in the graph
    pub fn out_degree(&self, node: &NodeId) -> GraphResult<usize> {
        let idx = self.node_index(node)?;
        Ok(self.graph.edges_directed(idx, Direction::Outgoing).count())
    }

    /// Number of incoming edges
    ///
    /// # Errors
    /// [`GraphError::NoSuchNode`] if `node` is not in the graph
    pub fn in_degree(&self, node: &NodeId) -> GraphResult<usize> {
        let idx = self.node_index(node)?;
        Ok(self.graph.edges_directed(idx, Direction::Incoming).count())
    }

    /// Traversal start nodes: zero in-degree (forward) or zero out-degree (backward)
    ///
    /// More than one root appears once a graph has been pruned into remnants.
    #[must_use]
    pub fn root_nodes(&self, direction: TraversalDirection) -> Vec<NodeId> {
        let against = direction.petgraph().opposite();
        self.graph
            .node_indices()
            .filter(|idx| self.graph.edges_directed(*idx, against).next().is_none())
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    /// Copy of this graph without `remove` and their incident edges
    #[must_use]
    pub fn without_nodes(&self, remove: &HashSet<NodeId>) -> Self {
        if remove.is_empty() {
            return self.clone();
        }
        let graph = self.graph.filter_map(
            |_, node| (!remove.contains(node)).then(|| node.clone()),
            |_, label| Some(label.clone()),
        );
        let index = graph
            .node_indices()
            .map(|idx| (graph[idx].clone(), idx))
            .collect();
        Self { graph, index }
    }
}

//! Node-link snapshot of a graph annotated with plan counts

use crate::graph::{ActionGraph, NodeId};
use disambig_plan::{ActionLabel, PlanHash};
use std::collections::{BTreeSet, HashMap};

/// A node with the plans passing through it
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SnapshotNode {
    /// Node identifier
    pub id: NodeId,
    /// Number of plans through this node
    pub num_plans: usize,
    /// Those plans
    pub plan_hashes: Vec<PlanHash>,
}

/// A labelled link
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SnapshotLink {
    /// Tail node
    pub source: NodeId,
    /// Head node
    pub target: NodeId,
    /// Action label
    pub label: ActionLabel,
}

/// Serializable node-link view of an [`ActionGraph`]
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GraphSnapshot {
    /// Always true
    pub directed: bool,
    /// Parallel edges may be present
    pub multigraph: bool,
    /// Nodes in insertion order
    pub nodes: Vec<SnapshotNode>,
    /// Links in insertion order
    pub links: Vec<SnapshotLink>,
}

impl GraphSnapshot {
    /// Snapshot `graph`, attaching plan hashes per node (empty when unknown)
    #[must_use]
    pub fn build(graph: &ActionGraph, node_plans: &HashMap<NodeId, BTreeSet<PlanHash>>) -> Self {
        let nodes = graph
            .nodes()
            .map(|id| {
                let plan_hashes: Vec<PlanHash> = node_plans
                    .get(id)
                    .map(|set| set.iter().copied().collect())
                    .unwrap_or_default();
                SnapshotNode {
                    id: id.clone(),
                    num_plans: plan_hashes.len(),
                    plan_hashes,
                }
            })
            .collect();
        let links = graph
            .edges()
            .into_iter()
            .map(|e| SnapshotLink {
                source: e.source,
                target: e.target,
                label: e.label,
            })
            .collect();
        Self {
            directed: true,
            multigraph: true,
            nodes,
            links,
        }
    }

    /// Plan count of `id`, if present
    #[must_use]
    pub fn num_plans(&self, id: &NodeId) -> Option<usize> {
        self.nodes.iter().find(|n| &n.id == id).map(|n| n.num_plans)
    }
}

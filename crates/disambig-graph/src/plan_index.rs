//! Plan replay: which plans pass through which nodes and edges
//!
//! Each plan is walked from every root along edges labelled with its next
//! action (its next action from the end when walking backward). Only walks
//! that consume the whole plan are recorded, so where paths reconverge a
//! plan is never credited to a branch it did not take.

use crate::error::GraphResult;
use crate::graph::{ActionGraph, Edge, NodeId, TraversalDirection};
use disambig_plan::{ActionLabel, Plan, PlanHash};
use std::collections::{BTreeSet, HashMap};

/// Node, edge and label indices of the plans passing through a graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanIndex {
    node_plans: HashMap<NodeId, BTreeSet<PlanHash>>,
    edge_plans: HashMap<Edge, BTreeSet<PlanHash>>,
    label_to_nodes: HashMap<ActionLabel, BTreeSet<NodeId>>,
}

impl PlanIndex {
    /// Replay `plans` over `graph`
    ///
    /// Every node gets an entry, possibly empty.
    ///
    /// # Errors
    /// Propagates adjacency lookup failures
    pub fn build(graph: &ActionGraph, plans: &[Plan], direction: TraversalDirection) -> GraphResult<Self> {
        let mut index = Self::default();
        for node in graph.nodes() {
            index.node_plans.entry(node.clone()).or_default();
            for edge in graph.edges_directed(node, direction)? {
                index
                    .label_to_nodes
                    .entry(edge.label)
                    .or_default()
                    .insert(node.clone());
            }
        }

        let roots = graph.root_nodes(direction);
        for plan in plans {
            let mut actions: Vec<&ActionLabel> = plan.actions().iter().collect();
            if !direction.is_forward() {
                actions.reverse();
            }
            let mut path = Vec::new();
            for root in &roots {
                index.replay(graph, plan.hash(), &actions, root, direction, &mut path)?;
            }
        }
        Ok(index)
    }

    fn replay(
        &mut self,
        graph: &ActionGraph,
        hash: PlanHash,
        remaining: &[&ActionLabel],
        node: &NodeId,
        direction: TraversalDirection,
        path: &mut Vec<Edge>,
    ) -> GraphResult<()> {
        let Some((action, rest)) = remaining.split_first() else {
            self.node_plans.entry(node.clone()).or_default().insert(hash);
            for edge in &*path {
                self.edge_plans.entry(edge.clone()).or_default().insert(hash);
                for end in [&edge.source, &edge.target] {
                    self.node_plans.entry(end.clone()).or_default().insert(hash);
                }
            }
            return Ok(());
        };

        for edge in graph.edges_directed(node, direction)? {
            if &edge.label != *action {
                continue;
            }
            let next = edge.next(direction).clone();
            path.push(edge);
            self.replay(graph, hash, rest, &next, direction, path)?;
            path.pop();
        }
        Ok(())
    }

    /// Plans passing through `node`
    #[must_use]
    pub fn plans_at(&self, node: &NodeId) -> Option<&BTreeSet<PlanHash>> {
        self.node_plans.get(node)
    }

    /// Plans taking `edge`
    #[must_use]
    pub fn plans_on(&self, edge: &Edge) -> Option<&BTreeSet<PlanHash>> {
        self.edge_plans.get(edge)
    }

    /// Node → plans
    #[must_use]
    pub fn node_plans(&self) -> &HashMap<NodeId, BTreeSet<PlanHash>> {
        &self.node_plans
    }

    /// Edge → plans
    #[must_use]
    pub fn edge_plans(&self) -> &HashMap<Edge, BTreeSet<PlanHash>> {
        &self.edge_plans
    }

    /// Label → nodes anchoring an edge with that label
    #[must_use]
    pub fn label_to_nodes(&self) -> &HashMap<ActionLabel, BTreeSet<NodeId>> {
        &self.label_to_nodes
    }

    /// Edges in a stable order with their plans
    #[must_use]
    pub fn sorted_edges(&self) -> Vec<(&Edge, &BTreeSet<PlanHash>)> {
        let mut edges: Vec<_> = self.edge_plans.iter().collect();
        edges.sort_by(|a, b| a.0.cmp(b.0));
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plans() -> Vec<Plan> {
        vec![
            Plan::from_actions(["a", "x", "p"], 3).unwrap(),
            Plan::from_actions(["a", "x", "q"], 3).unwrap(),
            Plan::from_actions(["a", "y", "p"], 3).unwrap(),
        ]
    }

    fn edge(g: &ActionGraph, from: &str, to: &str) -> Edge {
        Edge {
            source: from.into(),
            target: to.into(),
            label: g.edge_label(&from.into(), &to.into()).unwrap().clone(),
        }
    }

    #[test]
    fn forward_replay_tags_nodes_and_edges() {
        let plans = plans();
        let g = ActionGraph::from_plans(&plans);
        let index = PlanIndex::build(&g, &plans, TraversalDirection::Forward).unwrap();

        assert_eq!(index.plans_at(&"node0".into()).unwrap().len(), 3);
        assert_eq!(index.plans_at(&"node1".into()).unwrap().len(), 3);
        // node2 follows x
        assert_eq!(index.plans_at(&"node2".into()).unwrap().len(), 2);

        let x = edge(&g, "node1", "node2");
        let expected: BTreeSet<_> = [plans[0].hash(), plans[1].hash()].into_iter().collect();
        assert_eq!(index.plans_on(&x), Some(&expected));

        // the p after y is not confused with the p after x
        let yp = edge(&g, "node5", "node6");
        let only_third: BTreeSet<_> = [plans[2].hash()].into_iter().collect();
        assert_eq!(index.plans_on(&yp), Some(&only_third));
    }

    #[test]
    fn leaves_record_ending_plans() {
        let plans = plans();
        let g = ActionGraph::from_plans(&plans);
        let index = PlanIndex::build(&g, &plans, TraversalDirection::Forward).unwrap();
        let leaf = index.plans_at(&"node3".into()).unwrap();
        assert_eq!(leaf.iter().collect::<Vec<_>>(), vec![&plans[0].hash()]);
    }

    #[test]
    fn backward_replay_from_terminals() {
        let plans = plans();
        let g = ActionGraph::from_plans(&plans);
        let index = PlanIndex::build(&g, &plans, TraversalDirection::Backward).unwrap();
        let a = edge(&g, "node0", "node1");
        assert_eq!(index.plans_on(&a).unwrap().len(), 3);
    }

    #[test]
    fn backward_replay_does_not_cross_reconverging_paths() {
        let plans = plans();
        let g = ActionGraph::from_plans(&plans);
        let index = PlanIndex::build(&g, &plans, TraversalDirection::Backward).unwrap();

        // both leaves are entered by a p edge, but only one plan took each
        let xp = edge(&g, "node2", "node3");
        let only_first: BTreeSet<_> = [plans[0].hash()].into_iter().collect();
        assert_eq!(index.plans_on(&xp), Some(&only_first));
        assert_eq!(index.plans_at(&"node3".into()), Some(&only_first));

        let forward = PlanIndex::build(&g, &plans, TraversalDirection::Forward).unwrap();
        assert_eq!(index.edge_plans(), forward.edge_plans());
    }

    #[test]
    fn label_index_covers_all_edges() {
        let plans = plans();
        let g = ActionGraph::from_plans(&plans);
        let index = PlanIndex::build(&g, &plans, TraversalDirection::Forward).unwrap();
        let p = ActionLabel::normalize("p").unwrap();
        assert_eq!(index.label_to_nodes()[&p].len(), 2);
    }

    #[test]
    fn empty_graph_empty_index() {
        let index = PlanIndex::build(&ActionGraph::new(), &plans(), TraversalDirection::Forward).unwrap();
        assert!(index.node_plans().is_empty());
        assert!(index.edge_plans().is_empty());
    }
}

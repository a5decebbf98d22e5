use disambig_graph::{
    ActionGraph, BranchPointFinder, DistanceIndex, GraphPruner, NodeId, PlanIndex, TraversalDirection,
};
use disambig_plan::{ActionLabel, Plan};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashSet;

fn label(s: &str) -> ActionLabel {
    ActionLabel::normalize(s).unwrap()
}

/// A shared stem `stem0 .. stem{k}` fanning out into `chains` linear chains
fn fan_out(stem: usize, chains: usize, chain_len: usize) -> ActionGraph {
    let mut g = ActionGraph::new();
    for i in 0..stem {
        g.add_edge(
            NodeId::new(format!("stem{i}")),
            NodeId::new(format!("stem{}", i + 1)),
            label(&format!("step {i}")),
        );
    }
    let hub = NodeId::new(format!("stem{stem}"));
    g.add_node(hub.clone());
    for c in 0..chains {
        let mut prev = hub.clone();
        for j in 0..chain_len {
            let node = NodeId::new(format!("c{c}n{j}"));
            g.add_edge(prev, node.clone(), label(&format!("chain {c} {j}")));
            prev = node;
        }
    }
    g
}

/// Random DAG over `n` nodes: edges only go from lower to higher index
fn random_dag(n: usize, edges: &[(usize, usize, u8)]) -> ActionGraph {
    let mut g = ActionGraph::new();
    for i in 0..n {
        g.add_node(NodeId::new(format!("n{i}")));
    }
    for (a, b, l) in edges {
        let (a, b) = (a % n, b % n);
        if a < b {
            g.add_edge(
                NodeId::new(format!("n{a}")),
                NodeId::new(format!("n{b}")),
                label(&format!("act{l}")),
            );
        }
    }
    g
}

proptest! {
    #[test]
    fn prop_fan_out_yields_single_branch_point(
        stem in 0..5usize,
        chains in 2..7usize,
        chain_len in 1..4usize,
    ) {
        let g = fan_out(stem, chains, chain_len);
        let search = BranchPointFinder::new(&g).find(TraversalDirection::Forward).unwrap();

        // Invariant: exactly one branch point whose edge count equals the number of chains
        prop_assert_eq!(search.branch_points.len(), 1);
        prop_assert_eq!(search.branch_points[0].edges.len(), chains);
        prop_assert_eq!(search.branch_points[0].path.len(), stem);
    }

    #[test]
    fn prop_distances_monotone_along_edges(
        n in 1..12usize,
        edges in proptest::collection::vec((0..12usize, 0..12usize, 0..4u8), 0..30),
    ) {
        let g = random_dag(n, &edges);
        for direction in [TraversalDirection::Forward, TraversalDirection::Backward] {
            let d = DistanceIndex::compute(&g, direction).unwrap();
            // every node of a DAG is reachable from some root
            prop_assert_eq!(d.len(), g.node_count());
            for edge in g.edges() {
                let (from, to) = match direction {
                    TraversalDirection::Forward => (&edge.source, &edge.target),
                    TraversalDirection::Backward => (&edge.target, &edge.source),
                };
                let (df, dt) = (d.get(from).unwrap(), d.get(to).unwrap());
                // Invariant: BFS distance grows by at most one along an edge
                prop_assert!(dt <= df + 1);
            }
            for root in g.root_nodes(direction) {
                prop_assert_eq!(d.get(&root), Some(0));
            }
        }
    }

    #[test]
    fn prop_pruner_never_removes_protected_nodes(
        n in 1..12usize,
        edges in proptest::collection::vec((0..12usize, 0..12usize, 0..4u8), 0..30),
        frontier in proptest::collection::hash_set(0..12usize, 0..4),
        traversed in proptest::collection::hash_set(0..12usize, 0..4),
        forward in any::<bool>(),
    ) {
        let g = random_dag(n, &edges);
        let to_ids = |s: &HashSet<usize>| -> HashSet<NodeId> {
            s.iter().filter(|i| **i < n).map(|i| NodeId::new(format!("n{i}"))).collect()
        };
        let (frontier, traversed) = (to_ids(&frontier), to_ids(&traversed));
        let direction = if forward { TraversalDirection::Forward } else { TraversalDirection::Backward };

        let pruned = GraphPruner::new(&g).prune_beyond(&frontier, &traversed, direction).unwrap();
        for node in frontier.iter().chain(traversed.iter()) {
            prop_assert!(pruned.contains_node(node));
        }
        prop_assert!(pruned.node_count() <= g.node_count());
    }
}

#[test]
fn test_select_fixture_branch_and_plan_groups() {
    // node0 -a-> node1, then x / y with three plans each
    let mut plans = Vec::new();
    for (branch, tails) in [("x", ["p", "q", "r"]), ("y", ["s", "t", "u"])] {
        for tail in tails {
            plans.push(Plan::from_actions(["a", branch, tail], 3).unwrap());
        }
    }
    let g = ActionGraph::from_plans(&plans);
    let search = BranchPointFinder::new(&g).find(TraversalDirection::Forward).unwrap();
    assert_eq!(search.branch_points.len(), 1);
    let bp = &search.branch_points[0];
    assert_eq!(bp.node, NodeId::from("node1"));

    let index = PlanIndex::build(&g, &plans, TraversalDirection::Forward).unwrap();
    let groups: Vec<usize> = bp.edges.iter().map(|e| index.plans_on(e).unwrap().len()).collect();
    assert_eq!(groups, vec![3, 3]);
}

#[test]
fn test_dot_graph_matches_prefix_tree() {
    let plans = vec![
        Plan::from_actions(["a", "x"], 2).unwrap(),
        Plan::from_actions(["a", "y"], 2).unwrap(),
    ];
    let tree = ActionGraph::from_plans(&plans);
    let parsed = ActionGraph::from_dot(&tree.to_dot()).unwrap();
    assert_eq!(tree.edges(), parsed.edges());
    assert_eq!(
        tree.nodes().cloned().collect::<Vec<_>>(),
        parsed.nodes().cloned().collect::<Vec<_>>()
    );
}

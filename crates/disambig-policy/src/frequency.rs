//! Frequency-based edge selection
//!
//! Actions are ranked by how many edges of the live graph carry their label.
//! Only labels with at least one discriminating edge compete.

use crate::policy::{EdgeSelection, EdgeSelectionPolicy, EdgeSelectionType, PolicyContext, SelectionOutcome};
use disambig_graph::Edge;
use disambig_plan::{ActionLabel, PlanHash};
use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::RngCore;
use std::collections::{BTreeSet, HashMap};

/// Which end of the frequency ranking to draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyTier {
    /// Labels carried by the most edges
    Most,
    /// Labels carried by the fewest edges
    Least,
}

/// Uniform over the labels in the extreme frequency tier, then over their edges
#[derive(Debug, Clone, Copy)]
pub struct FrequencyPolicy {
    tier: FrequencyTier,
}

impl FrequencyPolicy {
    /// Draw from `tier`
    #[must_use]
    pub const fn new(tier: FrequencyTier) -> Self {
        Self { tier }
    }

    /// Most frequent labels first
    #[must_use]
    pub const fn most() -> Self {
        Self::new(FrequencyTier::Most)
    }

    /// Least frequent labels first
    #[must_use]
    pub const fn least() -> Self {
        Self::new(FrequencyTier::Least)
    }
}

type EdgeGroup<'a> = Vec<(&'a Edge, &'a BTreeSet<PlanHash>)>;

impl EdgeSelectionPolicy for FrequencyPolicy {
    fn select(&self, ctx: &PolicyContext<'_>, rng: &mut dyn RngCore) -> SelectionOutcome {
        let mut frequency: HashMap<&ActionLabel, usize> = HashMap::new();
        for edge in ctx.plan_index().edge_plans().keys() {
            *frequency.entry(&edge.label).or_default() += 1;
        }

        let mut by_label: IndexMap<&ActionLabel, EdgeGroup<'_>> = IndexMap::new();
        for (edge, plans) in ctx.discriminating_edges() {
            by_label.entry(&edge.label).or_default().push((edge, plans));
        }

        let count = |label: &ActionLabel| frequency.get(label).copied().unwrap_or(0);
        let target = match self.tier {
            FrequencyTier::Most => by_label.keys().map(|l| count(*l)).max(),
            FrequencyTier::Least => by_label.keys().map(|l| count(*l)).min(),
        };
        let tier: Vec<&EdgeGroup<'_>> = by_label
            .iter()
            .filter(|(label, _)| Some(count(**label)) == target)
            .map(|(_, edges)| edges)
            .collect();

        let pick = tier
            .choose(rng)
            .and_then(|edges| edges.choose(rng))
            .map(|(edge, plans)| EdgeSelection {
                action: edge.label.clone(),
                plan_hashes: plans.iter().copied().collect(),
                landmark: None,
            });
        SelectionOutcome::from_pick(self.kind(), pick)
    }

    fn kind(&self) -> EdgeSelectionType {
        match self.tier {
            FrequencyTier::Most => EdgeSelectionType::FrequencyActionMost,
            FrequencyTier::Least => EdgeSelectionType::FrequencyActionLeast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use disambig_graph::{ActionGraph, PlanIndex, TraversalDirection};
    use disambig_plan::Plan;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // "b" follows both "x" and "y"; "p" and "q" appear once each
    fn plans() -> Vec<Plan> {
        vec![
            Plan::from_actions(["a", "x", "b", "p"], 4).unwrap(),
            Plan::from_actions(["a", "x", "b", "q"], 4).unwrap(),
            Plan::from_actions(["a", "y", "b"], 3).unwrap(),
        ]
    }

    fn run(policy: FrequencyPolicy, seed: u64) -> EdgeSelection {
        let p = plans();
        let graph = ActionGraph::from_plans(&p);
        let index = PlanIndex::build(&graph, &p, TraversalDirection::Forward).unwrap();
        let ctx = PolicyContext::new(&[], &p, &index, &[]);
        policy
            .select(&ctx, &mut StdRng::seed_from_u64(seed))
            .into_selection()
            .unwrap()
    }

    #[test]
    fn most_frequent_label_wins() {
        for seed in 0..8 {
            let selection = run(FrequencyPolicy::most(), seed);
            assert_eq!(selection.action.as_str(), "b");
            assert!(selection.plan_hashes.len() < 3);
        }
    }

    #[test]
    fn least_frequent_tier_excludes_repeated_labels() {
        for seed in 0..8 {
            let selection = run(FrequencyPolicy::least(), seed);
            assert_ne!(selection.action.as_str(), "b");
            assert_ne!(selection.action.as_str(), "a");
        }
    }
}

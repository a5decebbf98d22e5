//! Presentable decision points

use disambig_graph::{DistanceIndex, NodeId, UNBOUNDED_DISTANCE};
use disambig_plan::{ActionLabel, Landmark, PlanHash};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// One decision point offered to the user or a policy
///
/// Recomputed every step; never carried across steps.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChoiceInfo {
    /// Landmark this choice came from, if any
    pub landmark: Option<Landmark>,
    /// Discriminating action → plans using it
    #[serde(rename = "action_name_plan_hash_map")]
    pub action_plan_hashes: IndexMap<ActionLabel, Vec<PlanHash>>,
    /// Largest group size
    pub max_group_size: usize,
    /// Graph nodes where this choice manifests
    pub nodes: BTreeSet<NodeId>,
    /// False when fewer than two groups remain
    pub is_available_for_choice: bool,
    /// Minimum distance of `nodes` from the roots
    pub distance_to_start: usize,
    /// Minimum distance of `nodes` from the terminals
    pub distance_to_end: usize,
}

impl ChoiceInfo {
    /// Choice from action groups; empty groups are dropped
    #[must_use]
    pub fn from_groups(landmark: Option<Landmark>, groups: IndexMap<ActionLabel, Vec<PlanHash>>) -> Self {
        let action_plan_hashes: IndexMap<_, _> = groups.into_iter().filter(|(_, g)| !g.is_empty()).collect();
        let max_group_size = action_plan_hashes.values().map(Vec::len).max().unwrap_or(0);
        let is_available_for_choice = action_plan_hashes.len() >= 2;
        Self {
            landmark,
            action_plan_hashes,
            max_group_size,
            nodes: BTreeSet::new(),
            is_available_for_choice,
            distance_to_start: UNBOUNDED_DISTANCE,
            distance_to_end: UNBOUNDED_DISTANCE,
        }
    }

    /// A landmark that can no longer be chosen
    #[must_use]
    pub fn unavailable(landmark: Landmark) -> Self {
        Self {
            is_available_for_choice: false,
            ..Self::from_groups(Some(landmark), IndexMap::new())
        }
    }

    /// Attach the nodes where the choice manifests
    #[must_use]
    pub fn with_nodes(mut self, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    /// Fill `distance_to_start` / `distance_to_end` from the node set
    #[must_use]
    pub fn with_distances(mut self, from_start: &DistanceIndex, from_goal: &DistanceIndex) -> Self {
        self.distance_to_start = from_start.min_over(&self.nodes);
        self.distance_to_end = from_goal.min_over(&self.nodes);
        self
    }

    /// Whether this choice came from a landmark
    #[inline]
    #[must_use]
    pub fn is_from_landmark(&self) -> bool {
        self.landmark.is_some()
    }

    /// Sum of group sizes
    #[must_use]
    pub fn total_plans(&self) -> usize {
        self.action_plan_hashes.values().map(Vec::len).sum()
    }

    /// Discriminating actions in group order
    pub fn actions(&self) -> impl Iterator<Item = &ActionLabel> + '_ {
        self.action_plan_hashes.keys()
    }

    /// Plans using `action`
    #[must_use]
    pub fn plans_for(&self, action: &ActionLabel) -> Option<&[PlanHash]> {
        self.action_plan_hashes.get(action).map(Vec::as_slice)
    }
}

//! Landmark actions nearest the initial state or the goal

use crate::policy::{minimal_by_key, EdgeSelectionPolicy, EdgeSelectionType, PolicyContext, SelectionOutcome};
use disambig_graph::{TraversalDirection, UNBOUNDED_DISTANCE};
use disambig_plan::{ActionLabel, Plan};
use rand::seq::SliceRandom;
use rand::RngCore;

/// Uniform among the landmark actions with the smallest occurrence index
///
/// Forward measures the first occurrence from the start of each live plan;
/// backward measures the last occurrence from the end. Branch-point choices
/// are never considered.
#[derive(Debug, Clone, Copy)]
pub struct ClosestLandmarkPolicy {
    direction: TraversalDirection,
}

impl ClosestLandmarkPolicy {
    /// Measure in `direction`
    #[must_use]
    pub const fn new(direction: TraversalDirection) -> Self {
        Self { direction }
    }

    /// Closest to the initial state
    #[must_use]
    pub const fn toward_initial() -> Self {
        Self::new(TraversalDirection::Forward)
    }

    /// Closest to the goal
    #[must_use]
    pub const fn toward_goal() -> Self {
        Self::new(TraversalDirection::Backward)
    }

    fn distance(&self, plans: &[Plan], action: &ActionLabel) -> usize {
        plans
            .iter()
            .filter_map(|p| match self.direction {
                TraversalDirection::Forward => p.first_position(action),
                TraversalDirection::Backward => p.last_position_from_end(action),
            })
            .min()
            .unwrap_or(UNBOUNDED_DISTANCE)
    }
}

impl EdgeSelectionPolicy for ClosestLandmarkPolicy {
    fn select(&self, ctx: &PolicyContext<'_>, rng: &mut dyn RngCore) -> SelectionOutcome {
        let candidates = ctx.choice_candidates(true).into_iter().flatten();
        let closest = minimal_by_key(candidates, |c| self.distance(ctx.plans(), c.action));
        let pick = closest.choose(rng).map(|c| c.to_selection());
        SelectionOutcome::from_pick(self.kind(), pick)
    }

    fn kind(&self) -> EdgeSelectionType {
        if self.direction.is_forward() {
            EdgeSelectionType::LandmarkClosestToInitial
        } else {
            EdgeSelectionType::LandmarkClosestToGoal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use disambig_core::ChoiceInfo;
    use disambig_graph::PlanIndex;
    use disambig_plan::Landmark;
    use indexmap::IndexMap;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // "early" is second in its plan, "late" is last in its plan
    fn plans() -> Vec<Plan> {
        vec![
            Plan::from_actions(["a", "early", "b", "c"], 4).unwrap(),
            Plan::from_actions(["a", "b", "c", "late"], 4).unwrap(),
            Plan::from_actions(["a", "b", "c", "d"], 4).unwrap(),
        ]
    }

    fn landmark_choice(plans: &[Plan]) -> ChoiceInfo {
        let landmark = Landmark::new(vec!["g".into()], true, ["early", "late"]).unwrap();
        let groups: IndexMap<_, _> = landmark
            .first_achievers
            .iter()
            .map(|a| (a.clone(), plans.iter().filter(|p| p.contains(a)).map(Plan::hash).collect()))
            .collect();
        ChoiceInfo::from_groups(Some(landmark), groups)
    }

    fn pick(policy: ClosestLandmarkPolicy) -> SelectionOutcome {
        let p = plans();
        let choices = vec![landmark_choice(&p)];
        let index = PlanIndex::default();
        let ctx = PolicyContext::new(&choices, &p, &index, &[]);
        policy.select(&ctx, &mut StdRng::seed_from_u64(5))
    }

    #[test]
    fn initial_prefers_early_action() {
        let selection = pick(ClosestLandmarkPolicy::toward_initial()).into_selection().unwrap();
        assert_eq!(selection.action.as_str(), "early");
        assert!(selection.is_from_landmark());
    }

    #[test]
    fn goal_prefers_late_action() {
        let selection = pick(ClosestLandmarkPolicy::toward_goal()).into_selection().unwrap();
        assert_eq!(selection.action.as_str(), "late");
    }

    #[test]
    fn no_landmarks_is_exhausted() {
        let p = plans();
        let index = PlanIndex::default();
        let ctx = PolicyContext::new(&[], &p, &index, &[]);
        let outcome = ClosestLandmarkPolicy::toward_goal().select(&ctx, &mut StdRng::seed_from_u64(0));
        assert!(outcome.is_exhausted());
    }
}

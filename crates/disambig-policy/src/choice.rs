//! Policies drawing from the step's choices
//!
//! Landmark-backed choices are preferred; branch-point choices are the
//! fallback when no landmark offers an eligible action.

use crate::policy::{
    minimal_by_key, pick_nested, Candidate, EdgeSelectionPolicy, EdgeSelectionType, PolicyContext,
    SelectionOutcome,
};
use rand::seq::SliceRandom;
use rand::RngCore;

/// Uniform over choices, then over the chosen choice's actions
#[derive(Debug, Clone, Copy)]
pub struct ChoicePolicy {
    kind: EdgeSelectionType,
}

impl ChoicePolicy {
    /// Registered as `choice_info`
    #[must_use]
    pub const fn choice_info() -> Self {
        Self {
            kind: EdgeSelectionType::ChoiceInfo,
        }
    }

    /// Registered as `landmark`
    #[must_use]
    pub const fn landmark() -> Self {
        Self {
            kind: EdgeSelectionType::Landmark,
        }
    }
}

impl Default for ChoicePolicy {
    fn default() -> Self {
        Self::choice_info()
    }
}

impl EdgeSelectionPolicy for ChoicePolicy {
    fn select(&self, ctx: &PolicyContext<'_>, rng: &mut dyn RngCore) -> SelectionOutcome {
        let pick = uniform_landmark_first(ctx, rng).map(|c| c.to_selection());
        SelectionOutcome::from_pick(self.kind, pick)
    }

    fn kind(&self) -> EdgeSelectionType {
        self.kind
    }
}

/// Greedy min-regret over disjunctive landmarks
///
/// Picks the action with the globally smallest plan group, ties broken
/// uniformly. Without any disjunctive landmark candidate it behaves like
/// [`ChoicePolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LandmarkGreedyPolicy;

impl LandmarkGreedyPolicy {
    /// Create new greedy policy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EdgeSelectionPolicy for LandmarkGreedyPolicy {
    fn select(&self, ctx: &PolicyContext<'_>, rng: &mut dyn RngCore) -> SelectionOutcome {
        let disjunctive = ctx
            .choice_candidates(true)
            .into_iter()
            .flatten()
            .filter(|c| c.landmark.is_some_and(|l| l.disjunctive));
        let smallest = minimal_by_key(disjunctive, |c| c.plan_hashes.len());

        let pick = match smallest.choose(rng) {
            Some(candidate) => Some(*candidate),
            None => uniform_landmark_first(ctx, rng),
        };
        SelectionOutcome::from_pick(self.kind(), pick.map(|c| c.to_selection()))
    }

    fn kind(&self) -> EdgeSelectionType {
        EdgeSelectionType::LandmarkGreedy
    }
}

fn uniform_landmark_first<'a>(ctx: &PolicyContext<'a>, rng: &mut dyn RngCore) -> Option<Candidate<'a>> {
    let landmark_choices = ctx.choice_candidates(true);
    if landmark_choices.is_empty() {
        pick_nested(&ctx.choice_candidates(false), rng)
    } else {
        pick_nested(&landmark_choices, rng)
    }
}

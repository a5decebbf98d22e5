//! Uniform edge selection

use crate::policy::{EdgeSelection, EdgeSelectionPolicy, EdgeSelectionType, PolicyContext, SelectionOutcome};
use rand::seq::SliceRandom;
use rand::RngCore;

/// Uniform over the discriminating edges of the live graph
///
/// The retained plans are those replayed through the chosen edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomEdgePolicy;

impl RandomEdgePolicy {
    /// Create new random policy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EdgeSelectionPolicy for RandomEdgePolicy {
    fn select(&self, ctx: &PolicyContext<'_>, rng: &mut dyn RngCore) -> SelectionOutcome {
        let edges = ctx.discriminating_edges();
        let pick = edges.choose(rng).map(|(edge, plans)| EdgeSelection {
            action: edge.label.clone(),
            plan_hashes: plans.iter().copied().collect(),
            landmark: None,
        });
        SelectionOutcome::from_pick(self.kind(), pick)
    }

    fn kind(&self) -> EdgeSelectionType {
        EdgeSelectionType::Random
    }
}

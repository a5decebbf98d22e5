//! Replicated automated disambiguation
//!
//! Each replicate starts from the full plan set with an empty history and
//! alternates engine steps with policy picks until one plan remains, the
//! policy is exhausted, or the step cap is hit. Replicates share nothing
//! mutable and run on the rayon pool.

use crate::config::SimulationInput;
use crate::error::SimulationResult;
use crate::telemetry::{SimulationOutput, StepRecord};
use disambig_core::{
    DisambiguationEngine, GraphRenderer, LandmarkSource, PlanSource, SelectionInfo, StepRequest,
};
use disambig_plan::{Landmark, Plan};
use disambig_policy::{policy_for, EdgeSelectionPolicy, PolicyContext, SelectionOutcome};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

/// Seed of replicate `index` under base `seed`
#[must_use]
pub fn replicate_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_add((index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Runs simulations against a plan source, a landmark source and a renderer
#[derive(Debug, Clone)]
pub struct SimulationRunner<P, L, R> {
    plan_source: P,
    landmark_source: L,
    engine: DisambiguationEngine<R>,
}

impl<P, L, R> SimulationRunner<P, L, R>
where
    P: PlanSource,
    L: LandmarkSource,
    R: GraphRenderer,
{
    /// Runner over the given collaborators
    pub fn new(plan_source: P, landmark_source: L, renderer: R) -> Self {
        Self {
            plan_source,
            landmark_source,
            engine: DisambiguationEngine::new(renderer),
        }
    }

    /// Run every replicate of `input`
    ///
    /// Plans and landmarks are fetched once and shared read-only.
    ///
    /// # Errors
    /// [`crate::SimulationError`] if the input is invalid, a collaborator
    /// fails, or any step fails
    pub fn run(&self, input: &SimulationInput) -> SimulationResult<SimulationOutput> {
        input.validate()?;
        let plans = self
            .plan_source
            .get_plans(&input.task, input.max_plans, input.quality_bound)?;
        let landmarks = self
            .landmark_source
            .get_landmarks(&input.task, input.landmark_category)?;
        tracing::info!(
            setting = %input.name(),
            plans = plans.len(),
            landmarks = landmarks.len(),
            replicates = input.num_replicates,
            "starting simulation"
        );

        let policy = policy_for(input.edge_selection);
        let simulation_results = (0..input.num_replicates)
            .into_par_iter()
            .map(|index| self.run_replicate(input, &plans, &landmarks, policy.as_ref(), index))
            .collect::<SimulationResult<Vec<_>>>()?;

        Ok(SimulationOutput {
            simulation_input: input.clone(),
            simulation_results,
        })
    }

    /// Run replicate `index` to completion
    ///
    /// # Errors
    /// [`crate::SimulationError::Step`] if a step fails
    pub fn run_replicate(
        &self,
        input: &SimulationInput,
        plans: &[Plan],
        landmarks: &[Landmark],
        policy: &dyn EdgeSelectionPolicy,
        index: usize,
    ) -> SimulationResult<Vec<StepRecord>> {
        let mut rng = StdRng::seed_from_u64(replicate_seed(input.seed, index));
        let mut history: Vec<SelectionInfo> = Vec::new();
        let mut records = Vec::new();

        loop {
            let request = StepRequest {
                task: &input.task,
                plans,
                landmarks,
                history: &history,
                options: input.step_options(),
            };
            let output = self.engine.step(&request, &mut rng)?;

            if output.is_done() {
                records.push(StepRecord::done(&output));
                break;
            }
            if history.len() >= input.max_steps {
                tracing::warn!(replicate = index, steps = history.len(), "step cap reached");
                break;
            }

            let ctx = PolicyContext::from_step(&output, &history);
            match policy.select(&ctx, &mut rng) {
                SelectionOutcome::Selected(selection) => {
                    records.push(StepRecord::selected(&output, &selection));
                    history.push(selection.to_selection_info());
                }
                SelectionOutcome::Exhausted => {
                    records.push(StepRecord::exhausted(&output));
                    break;
                }
            }
        }

        let done = records.last().is_some_and(|r| r.is_disambiguation_done);
        tracing::info!(replicate = index, steps = records.len(), done, "replicate finished");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replicate_seeds_differ() {
        assert_eq!(replicate_seed(42, 0), 42);
        assert_ne!(replicate_seed(42, 1), replicate_seed(42, 2));
        assert_ne!(replicate_seed(42, 1), replicate_seed(43, 1));
    }
}

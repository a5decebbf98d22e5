//! Automated edge selection
//!
//! Pluggable policies that pick one action per disambiguation step, used by
//! the simulator to drive sessions without a user.
//!
//! # Core Concepts
//!
//! - [`EdgeSelectionPolicy`]: picks an action or reports exhaustion
//! - [`PolicyContext`]: the step's choices, live plans, edge index and consumed actions
//! - [`RandomEdgePolicy`]: uniform over discriminating edges
//! - [`ChoicePolicy`] / [`LandmarkGreedyPolicy`]: draw from the step's choices
//! - [`FrequencyPolicy`]: rank actions by how many edges carry them
//! - [`ClosestLandmarkPolicy`]: landmark actions nearest the initial state or goal
//! - [`PolicyRegistry`]: lookup by name
//!
//! # Example
//!
//! ```rust
//! use disambig_core::{DisambiguationEngine, PrefixTreeRenderer, StepOptions, StepRequest};
//! use disambig_plan::{Plan, PlanningTask};
//! use disambig_policy::{PolicyContext, PolicyRegistry};
//! use rand::SeedableRng;
//!
//! let plans = vec![
//!     Plan::from_actions(["a", "x"], 2).unwrap(),
//!     Plan::from_actions(["a", "y"], 2).unwrap(),
//! ];
//! let task = PlanningTask::default();
//! let request = StepRequest {
//!     task: &task,
//!     plans: &plans,
//!     landmarks: &[],
//!     history: &[],
//!     options: StepOptions::new(),
//! };
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let output = DisambiguationEngine::new(PrefixTreeRenderer).step(&request, &mut rng).unwrap();
//!
//! let registry = PolicyRegistry::with_defaults();
//! let policy = registry.resolve("random").unwrap();
//! let outcome = policy.select(&PolicyContext::from_step(&output, &[]), &mut rng);
//! assert_eq!(outcome.selection().unwrap().plan_hashes.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod choice;
mod closest;
mod frequency;
mod policy;
mod random;
mod registry;

pub use choice::{ChoicePolicy, LandmarkGreedyPolicy};
pub use closest::ClosestLandmarkPolicy;
pub use frequency::{FrequencyPolicy, FrequencyTier};
pub use policy::{
    Candidate, EdgeSelection, EdgeSelectionPolicy, EdgeSelectionType, PolicyContext, SelectionOutcome, UnknownPolicy,
};
pub use random::RandomEdgePolicy;
pub use registry::{policy_for, PolicyRegistry};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

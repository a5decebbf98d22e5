//! Plan disambiguation sessions
//!
//! A session narrows a plan set by repeated choices. Each call to
//! [`DisambiguationEngine::step`] takes the selection history so far and
//! returns the retained plans, the next [`ChoiceInfo`]s and the graph to show.
//!
//! Plans, landmarks and graph renderings come from [`PlanSource`],
//! [`LandmarkSource`] and [`GraphRenderer`] implementations.
//!
//! # Example
//!
//! ```rust
//! use disambig_core::{DisambiguationEngine, PrefixTreeRenderer, StepOptions, StepRequest};
//! use disambig_plan::{Plan, PlanningTask};
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
//! assert_eq!(output.choice_infos.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod choice;
mod collaborators;
mod engine;
mod error;
mod session;
mod splitter;

pub use choice::ChoiceInfo;
pub use collaborators::{
    GraphDescription, GraphRenderer, InMemoryLandmarkSource, InMemoryPlanSource, LandmarkSource, PlanSource,
    PrefixTreeRenderer,
};
pub use engine::{
    DisambiguationEngine, DisambiguationMode, SelectionPriority, StepOptions, StepOutput, StepReport, StepRequest,
    UnknownName,
};
pub use error::{DisambiguationError, ExternalToolError};
pub use session::{consumed_actions, retained_plans, SelectionInfo};
pub use splitter::LandmarkSplitter;

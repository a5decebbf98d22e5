//! Plan disambiguation simulator
//!
//! Drives disambiguation sessions with an automated edge selection policy
//! instead of a user, over independent seeded replicates, and collects
//! per-step telemetry and per-replicate metrics.
//!
//! # Example
//!
//! ```rust
//! use disambig_core::{InMemoryLandmarkSource, InMemoryPlanSource, PrefixTreeRenderer};
//! use disambig_plan::Plan;
//! use disambig_simulator::{SimulationInput, SimulationRunner};
//!
//! let plans = vec![
//!     Plan::from_actions(["a", "x"], 2).unwrap(),
//!     Plan::from_actions(["a", "y"], 2).unwrap(),
//! ];
//! let runner = SimulationRunner::new(
//!     InMemoryPlanSource::new(plans),
//!     InMemoryLandmarkSource::default(),
//!     PrefixTreeRenderer,
//! );
//! let output = runner.run(&SimulationInput::default().with_replicates(2)).unwrap();
//! assert!(output.metrics().iter().all(|m| m.is_disambiguation_done));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod error;
mod fixture;
mod runner;
mod telemetry;

pub use config::SimulationInput;
pub use error::{SimulationError, SimulationResult};
pub use fixture::SimulationFixture;
pub use runner::{replicate_seed, SimulationRunner};
pub use telemetry::{ReplicateMetrics, SimulationOutput, SimulationSummary, StepRecord};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

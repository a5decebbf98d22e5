//! Offline plan and landmark sets
//!
//! A fixture stands in for the external planner and landmark extractor: the
//! CLI loads one from JSON and serves it through the in-memory sources.

use crate::error::SimulationResult;
use disambig_core::{InMemoryLandmarkSource, InMemoryPlanSource};
use disambig_plan::{Landmark, Plan, PlanningTask};

/// Plans and landmarks for one task
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SimulationFixture {
    /// Task the sets belong to
    #[serde(default)]
    pub task: PlanningTask,
    /// Candidate plans
    pub plans: Vec<Plan>,
    /// Landmarks over the plans
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
}

impl SimulationFixture {
    /// Parse a JSON fixture
    ///
    /// # Errors
    /// [`crate::SimulationError::Fixture`] on malformed JSON or invalid actions
    pub fn from_json_str(text: &str) -> SimulationResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Sources serving this fixture
    #[must_use]
    pub fn sources(&self) -> (InMemoryPlanSource, InMemoryLandmarkSource) {
        (
            InMemoryPlanSource::new(self.plans.clone()),
            InMemoryLandmarkSource::new(self.landmarks.clone()),
        )
    }
}

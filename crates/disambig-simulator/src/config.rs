//! Simulation configuration

use crate::error::{SimulationError, SimulationResult};
use disambig_core::{DisambiguationMode, SelectionPriority, StepOptions};
use disambig_plan::{LandmarkCategory, PlanningTask};
use disambig_policy::EdgeSelectionType;

/// One simulation setting
///
/// Every field has a default, so a TOML file only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SimulationInput {
    /// Label prefixed to output names
    pub setting_name: String,
    /// Step mode
    pub view: DisambiguationMode,
    /// Choice ordering in Select mode
    pub priority: SelectionPriority,
    /// Landmark extraction method
    pub landmark_category: LandmarkCategory,
    /// Automated choice maker
    pub edge_selection: EdgeSelectionType,
    /// Independent runs
    pub num_replicates: usize,
    /// Base seed; replicate `i` derives its own stream from it
    pub seed: u64,
    /// Plans requested from the plan source
    pub max_plans: usize,
    /// Cost bound relative to the best plan
    pub quality_bound: f64,
    /// Selections after which a replicate stops as incomplete
    pub max_steps: usize,
    /// Task handed to the collaborators
    pub task: PlanningTask,
}

impl Default for SimulationInput {
    fn default() -> Self {
        Self {
            setting_name: "test".to_string(),
            view: DisambiguationMode::Select,
            priority: SelectionPriority::MaxPlans,
            landmark_category: LandmarkCategory::Rhw,
            edge_selection: EdgeSelectionType::Random,
            num_replicates: 1,
            seed: 42,
            max_plans: 6,
            quality_bound: 1.0,
            max_steps: 256,
            task: PlanningTask::default(),
        }
    }
}

impl SimulationInput {
    /// Defaults for `task`
    #[must_use]
    pub fn new(task: PlanningTask) -> Self {
        Self {
            task,
            ..Self::default()
        }
    }

    /// Parse a TOML setting
    ///
    /// # Errors
    /// [`SimulationError::Config`] on malformed TOML or unknown names
    pub fn from_toml_str(text: &str) -> SimulationResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// `setting_view_category_policy`
    #[must_use]
    pub fn name(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.setting_name, self.view, self.landmark_category, self.edge_selection
        )
    }

    /// Step options for every step of a replicate
    #[must_use]
    pub fn step_options(&self) -> StepOptions {
        StepOptions::new().with_mode(self.view).with_priority(self.priority)
    }

    /// Reject settings that cannot run
    ///
    /// # Errors
    /// [`SimulationError::InvalidInput`] naming the first bad field
    pub fn validate(&self) -> SimulationResult<()> {
        if self.num_replicates == 0 {
            return Err(SimulationError::invalid("num_replicates", "must be at least 1"));
        }
        if self.max_plans == 0 {
            return Err(SimulationError::invalid("max_plans", "must be at least 1"));
        }
        if self.max_steps == 0 {
            return Err(SimulationError::invalid("max_steps", "must be at least 1"));
        }
        if !self.quality_bound.is_finite() || self.quality_bound < 1.0 {
            return Err(SimulationError::invalid(
                "quality_bound",
                format!("must be a finite number >= 1.0, got {}", self.quality_bound),
            ));
        }
        Ok(())
    }

    /// Set the setting name
    #[must_use]
    pub fn with_setting_name(mut self, name: impl Into<String>) -> Self {
        self.setting_name = name.into();
        self
    }

    /// Set the step mode
    #[must_use]
    pub fn with_view(mut self, view: DisambiguationMode) -> Self {
        self.view = view;
        self
    }

    /// Set the Select-mode ordering
    #[must_use]
    pub fn with_priority(mut self, priority: SelectionPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the landmark category
    #[must_use]
    pub fn with_landmark_category(mut self, category: LandmarkCategory) -> Self {
        self.landmark_category = category;
        self
    }

    /// Set the edge selection policy
    #[must_use]
    pub fn with_edge_selection(mut self, edge_selection: EdgeSelectionType) -> Self {
        self.edge_selection = edge_selection;
        self
    }

    /// Set the replicate count
    #[must_use]
    pub fn with_replicates(mut self, num_replicates: usize) -> Self {
        self.num_replicates = num_replicates;
        self
    }

    /// Set the base seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the plan request bounds
    #[must_use]
    pub fn with_plan_bounds(mut self, max_plans: usize, quality_bound: f64) -> Self {
        self.max_plans = max_plans;
        self.quality_bound = quality_bound;
        self
    }

    /// Set the step cap
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let input = SimulationInput::default();
        assert_eq!(input.num_replicates, 1);
        assert_eq!(input.seed, 42);
        assert_eq!(input.edge_selection, EdgeSelectionType::Random);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn name_joins_setting_parts() {
        let input = SimulationInput::default()
            .with_setting_name("gripper")
            .with_view(DisambiguationMode::BuildForward)
            .with_edge_selection(EdgeSelectionType::LandmarkGreedy);
        assert_eq!(input.name(), "gripper_build_forward_rhw_landmark_greedy");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let input = SimulationInput::from_toml_str(
            r#"
            setting_name = "blocks"
            view = "build_backward"
            edge_selection = "frequency_most"
            num_replicates = 4

            [task]
            domain = "(define (domain blocks))"
            "#,
        )
        .unwrap();
        assert_eq!(input.view, DisambiguationMode::BuildBackward);
        assert_eq!(input.edge_selection, EdgeSelectionType::FrequencyActionMost);
        assert_eq!(input.num_replicates, 4);
        assert_eq!(input.max_steps, 256);
        assert!(input.task.problem.is_empty());
    }

    #[test]
    fn unknown_names_rejected() {
        assert!(SimulationInput::from_toml_str("view = \"sideways\"").is_err());
        assert!(SimulationInput::from_toml_str("priority = \"max_plans\"").is_err());
    }

    #[test]
    fn validate_rejects_unrunnable_settings() {
        let err = SimulationInput::default().with_replicates(0).validate().unwrap_err();
        assert!(matches!(err, SimulationError::InvalidInput { field: "num_replicates", .. }));
        assert!(SimulationInput::default().with_plan_bounds(6, 0.5).validate().is_err());
        assert!(SimulationInput::default().with_plan_bounds(6, f64::NAN).validate().is_err());
        assert!(SimulationInput::default().with_max_steps(0).validate().is_err());
    }
}

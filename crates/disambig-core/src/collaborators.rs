//! External collaborators
//!
//! Plans, landmarks and graph renderings come from tools outside this crate.
//! Calls are blocking and fallible; retries and timeouts belong to the
//! implementation or its caller. In-memory implementations are provided for
//! tests, fixtures and the simulator CLI.

use crate::error::ExternalToolError;
use disambig_graph::ActionGraph;
use disambig_plan::{Landmark, LandmarkCategory, Plan, PlanningTask};

/// Directed-graph text description (DOT) produced by a renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphDescription(pub String);

impl GraphDescription {
    /// Description text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Source of candidate plans
pub trait PlanSource: Send + Sync {
    /// Up to `max_plans` plans whose cost is within `quality_bound` of the best
    ///
    /// # Errors
    /// [`ExternalToolError`] if the planner fails
    fn get_plans(
        &self,
        task: &PlanningTask,
        max_plans: usize,
        quality_bound: f64,
    ) -> Result<Vec<Plan>, ExternalToolError>;
}

/// Source of landmarks
pub trait LandmarkSource: Send + Sync {
    /// Landmarks of `task` computed with `category`
    ///
    /// # Errors
    /// [`ExternalToolError`] if extraction fails
    fn get_landmarks(
        &self,
        task: &PlanningTask,
        category: LandmarkCategory,
    ) -> Result<Vec<Landmark>, ExternalToolError>;
}

/// Renders a plan set into a merged graph description
pub trait GraphRenderer: Send + Sync {
    /// Graph whose structure is the merge of `plans`
    ///
    /// # Errors
    /// [`ExternalToolError`] if rendering fails
    fn render(&self, task: &PlanningTask, plans: &[Plan]) -> Result<GraphDescription, ExternalToolError>;
}

impl<T: GraphRenderer + ?Sized> GraphRenderer for &T {
    fn render(&self, task: &PlanningTask, plans: &[Plan]) -> Result<GraphDescription, ExternalToolError> {
        (**self).render(task, plans)
    }
}

/// Fixed plan set
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlanSource {
    plans: Vec<Plan>,
}

impl InMemoryPlanSource {
    /// Serve `plans`
    #[must_use]
    pub fn new(plans: Vec<Plan>) -> Self {
        Self { plans }
    }
}

impl PlanSource for InMemoryPlanSource {
    fn get_plans(
        &self,
        _task: &PlanningTask,
        max_plans: usize,
        quality_bound: f64,
    ) -> Result<Vec<Plan>, ExternalToolError> {
        let Some(best) = self.plans.iter().map(Plan::cost).min() else {
            return Ok(Vec::new());
        };
        #[allow(clippy::cast_precision_loss)]
        let bound = best as f64 * quality_bound.max(1.0);
        #[allow(clippy::cast_precision_loss)]
        let plans = self
            .plans
            .iter()
            .filter(|p| p.cost() as f64 <= bound)
            .take(max_plans)
            .cloned()
            .collect();
        Ok(plans)
    }
}

/// Fixed landmark set, whatever the category
#[derive(Debug, Clone, Default)]
pub struct InMemoryLandmarkSource {
    landmarks: Vec<Landmark>,
}

impl InMemoryLandmarkSource {
    /// Serve `landmarks`
    #[must_use]
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }
}

impl LandmarkSource for InMemoryLandmarkSource {
    fn get_landmarks(
        &self,
        _task: &PlanningTask,
        _category: LandmarkCategory,
    ) -> Result<Vec<Landmark>, ExternalToolError> {
        Ok(self.landmarks.clone())
    }
}

/// Renders the common-prefix merge of the plans as DOT
///
/// Root is `node0`; nodes are numbered in first-seen order.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixTreeRenderer;

impl GraphRenderer for PrefixTreeRenderer {
    fn render(&self, _task: &PlanningTask, plans: &[Plan]) -> Result<GraphDescription, ExternalToolError> {
        Ok(GraphDescription(ActionGraph::from_plans(plans).to_dot()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_source_applies_bounds() {
        let source = InMemoryPlanSource::new(vec![
            Plan::from_actions(["a"], 1).unwrap(),
            Plan::from_actions(["b", "c"], 2).unwrap(),
            Plan::from_actions(["d"], 1).unwrap(),
        ]);
        let task = PlanningTask::default();
        assert_eq!(source.get_plans(&task, 10, 1.0).unwrap().len(), 2);
        assert_eq!(source.get_plans(&task, 10, 2.0).unwrap().len(), 3);
        assert_eq!(source.get_plans(&task, 1, 2.0).unwrap().len(), 1);
    }

    #[test]
    fn prefix_renderer_output_parses() {
        let plans = vec![
            Plan::from_actions(["a", "x"], 2).unwrap(),
            Plan::from_actions(["a", "y"], 2).unwrap(),
        ];
        let dot = PrefixTreeRenderer.render(&PlanningTask::default(), &plans).unwrap();
        let graph = ActionGraph::from_dot(dot.as_str()).unwrap();
        assert_eq!(graph.node_count(), 4);
    }

    #[test]
    fn prefix_renderer_handles_no_plans() {
        let dot = PrefixTreeRenderer.render(&PlanningTask::default(), &[]).unwrap();
        assert!(ActionGraph::from_dot(dot.as_str()).unwrap().is_empty());
    }
}

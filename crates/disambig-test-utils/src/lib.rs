//! Testing utilities for the plan disambiguation workspace
//!
//! Shared plan sets, landmarks and collaborators that fail on demand.

#![allow(missing_docs)]

use disambig_core::{
    ExternalToolError, GraphDescription, GraphRenderer, LandmarkSource, PlanSource,
};
use disambig_plan::{Landmark, LandmarkCategory, Plan, PlanHash, PlanningTask};

/// Branch action taken by the first three plans of [`six_branching_plans`]
pub const BRANCH_X: &str = "move rooma roomb";
/// Branch action taken by the last three plans of [`six_branching_plans`]
pub const BRANCH_Y: &str = "move rooma roomc";

/// What an external renderer emits for [`six_branching_plans`]
pub const SIX_PLANS_DOT: &str = r#"digraph plans {
    node0 [shape=circle, label="0"];
    node0 -> node1 [label="(pick ball1 rooma left)"];
    node1 -> node16 [label="(move rooma roomb)"];
    node1 -> node2 [label="(move rooma roomc)"];
    node16 -> node17 [label="(drop ball1 roomb left)"];
    node16 -> node18 [label="(drop ball1 roomb right) (1)"];
    node16 -> node19 [label="(move roomb roomc)"];
    node2 -> node3 [label="(drop ball1 roomc left)"];
    node2 -> node4 [label="(drop ball1 roomc right)"];
    node2 -> node5 [label="(move roomc roomb)"];
}
"#;

pub fn plan(actions: &[&str]) -> Plan {
    Plan::from_actions(actions.iter().copied(), actions.len() as u64).unwrap()
}

/// Six plans sharing a first action, then splitting three ways on each branch
pub fn six_branching_plans() -> Vec<Plan> {
    let pick = "pick ball1 rooma left";
    vec![
        plan(&[pick, BRANCH_X, "drop ball1 roomb left"]),
        plan(&[pick, BRANCH_X, "drop ball1 roomb right"]),
        plan(&[pick, BRANCH_X, "move roomb roomc"]),
        plan(&[pick, BRANCH_Y, "drop ball1 roomc left"]),
        plan(&[pick, BRANCH_Y, "drop ball1 roomc right"]),
        plan(&[pick, BRANCH_Y, "move roomc roomb"]),
    ]
}

/// Two plans with exactly one binary branch point
pub fn binary_plans() -> Vec<Plan> {
    vec![
        plan(&["pick ball1 rooma left", BRANCH_X]),
        plan(&["pick ball1 rooma left", BRANCH_Y]),
    ]
}

/// Hashes of the plans using `action`
pub fn hashes_using(plans: &[Plan], action: &str) -> Vec<PlanHash> {
    let label = disambig_plan::ActionLabel::normalize(action).unwrap();
    plans.iter().filter(|p| p.contains(&label)).map(Plan::hash).collect()
}

/// Landmarks over [`six_branching_plans`]
///
/// - `at robby roomb | at robby roomc`: split three / three
/// - `at ball1 roomb`: achieved by dropping left or right, one plan each
/// - `carry ball1 left`: achieved by every plan, never discriminating
/// - `at ball1 roomd`: achievers absent from every plan
pub fn gripper_landmarks() -> Vec<Landmark> {
    vec![
        Landmark::new(
            vec!["at robby roomb".into(), "at robby roomc".into()],
            true,
            [BRANCH_X, BRANCH_Y],
        )
        .unwrap(),
        Landmark::new(
            vec!["at ball1 roomb".into()],
            true,
            ["drop ball1 roomb left", "drop ball1 roomb right"],
        )
        .unwrap(),
        Landmark::new(vec!["carry ball1 left".into()], false, ["pick ball1 rooma left"]).unwrap(),
        Landmark::new(
            vec!["at ball1 roomd".into()],
            true,
            ["drop ball1 roomd left", "drop ball1 roomd right"],
        )
        .unwrap(),
    ]
}

/// Renders the same description whatever the plans
#[derive(Debug, Clone)]
pub struct StaticRenderer(pub String);

impl GraphRenderer for StaticRenderer {
    fn render(&self, _task: &PlanningTask, _plans: &[Plan]) -> Result<GraphDescription, ExternalToolError> {
        Ok(GraphDescription(self.0.clone()))
    }
}

/// Collaborator that always fails with the given error
#[derive(Debug, Clone)]
pub struct FailingTool(pub ExternalToolError);

impl FailingTool {
    pub fn timeout(tool: &str) -> Self {
        Self(ExternalToolError::Timeout {
            tool: tool.to_string(),
            seconds: 60,
        })
    }

    pub fn invalid(tool: &str) -> Self {
        Self(ExternalToolError::InvalidOutput {
            tool: tool.to_string(),
            reason: "garbage".to_string(),
        })
    }
}

impl GraphRenderer for FailingTool {
    fn render(&self, _task: &PlanningTask, _plans: &[Plan]) -> Result<GraphDescription, ExternalToolError> {
        Err(self.0.clone())
    }
}

impl PlanSource for FailingTool {
    fn get_plans(&self, _task: &PlanningTask, _max: usize, _bound: f64) -> Result<Vec<Plan>, ExternalToolError> {
        Err(self.0.clone())
    }
}

impl LandmarkSource for FailingTool {
    fn get_landmarks(
        &self,
        _task: &PlanningTask,
        _category: LandmarkCategory,
    ) -> Result<Vec<Landmark>, ExternalToolError> {
        Err(self.0.clone())
    }
}

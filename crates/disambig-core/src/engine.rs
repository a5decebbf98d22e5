//! One interactive narrowing step
//!
//! Each step renders the retained plans, indexes the resulting graph and
//! packages the next decision points:
//!
//! - **Select**: every discriminating landmark, falling back to the graph's
//!   first branch points when no landmark can be chosen
//! - **Build forward / backward**: only the first branch points met from the
//!   initial state (or the goal), with the graph pruned just past them

use crate::choice::ChoiceInfo;
use crate::collaborators::GraphRenderer;
use crate::error::DisambiguationError;
use crate::session::{consumed_actions, retained_plans, SelectionInfo};
use crate::splitter::LandmarkSplitter;
use disambig_graph::{
    ActionGraph, BranchPoint, BranchPointFinder, DistanceIndex, GraphPruner, GraphSnapshot, NodeId,
    PlanIndex, TraversalDirection,
};
use disambig_plan::{ActionLabel, Landmark, Plan, PlanHash, PlanningTask};
use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::RngCore;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// How a step looks for decision points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisambiguationMode {
    /// Landmark choices, with branch points as fallback
    #[default]
    Select,
    /// First branch points from the initial state
    BuildForward,
    /// First branch points from the goal
    BuildBackward,
}

impl DisambiguationMode {
    /// All modes
    pub const ALL: [Self; 3] = [Self::Select, Self::BuildForward, Self::BuildBackward];

    /// Snake-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::BuildForward => "build_forward",
            Self::BuildBackward => "build_backward",
        }
    }
}

impl Display for DisambiguationMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisambiguationMode {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == lower)
            .ok_or_else(|| UnknownName::new("disambiguation mode", s))
    }
}

/// Ordering of available choices in Select mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionPriority {
    /// Smallest total grouped-plan count first
    #[default]
    MaxPlans,
    /// Largest total grouped-plan count first
    MinPlans,
    /// Shuffled
    Random,
    /// Closest to the initial state first
    InitForward,
    /// Closest to the goal first
    GoalBackward,
}

impl SelectionPriority {
    /// All priorities
    pub const ALL: [Self; 5] = [
        Self::MaxPlans,
        Self::MinPlans,
        Self::Random,
        Self::InitForward,
        Self::GoalBackward,
    ];

    /// Upper-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MaxPlans => "MAX_PLANS",
            Self::MinPlans => "MIN_PLANS",
            Self::Random => "RANDOM",
            Self::InitForward => "INIT_FORWARD",
            Self::GoalBackward => "GOAL_BACKWARD",
        }
    }
}

impl Display for SelectionPriority {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionPriority {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s.trim())
            .ok_or_else(|| UnknownName::new("selection priority", s))
    }
}

/// Unrecognized mode or priority name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {name}")]
pub struct UnknownName {
    /// What was being parsed
    pub kind: &'static str,
    /// The rejected input
    pub name: String,
}

impl UnknownName {
    fn new(kind: &'static str, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
        }
    }
}

/// Step options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StepOptions {
    /// Search mode
    #[serde(default)]
    pub mode: DisambiguationMode,
    /// Choice ordering (Select mode)
    #[serde(default)]
    pub priority: SelectionPriority,
}

impl StepOptions {
    /// Select mode, `MAX_PLANS` ordering
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mode
    #[must_use]
    pub fn with_mode(mut self, mode: DisambiguationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the priority
    #[must_use]
    pub fn with_priority(mut self, priority: SelectionPriority) -> Self {
        self.priority = priority;
        self
    }
}

/// Inputs of one step
#[derive(Debug, Clone, Copy)]
pub struct StepRequest<'a> {
    /// Task handed to the renderer
    pub task: &'a PlanningTask,
    /// Full plan set of the session
    pub plans: &'a [Plan],
    /// Session landmarks
    pub landmarks: &'a [Landmark],
    /// Selections so far
    pub history: &'a [SelectionInfo],
    /// Mode and ordering
    pub options: StepOptions,
}

/// Everything a step produces
#[derive(Debug, Clone)]
pub struct StepOutput {
    /// Plans consistent with the history
    pub retained_plans: Vec<Plan>,
    /// Decision points, available ones first
    pub choice_infos: Vec<ChoiceInfo>,
    /// Graph to display (pruned in Build modes)
    pub graph: ActionGraph,
    /// Node-link view of `graph` with plan counts
    pub snapshot: GraphSnapshot,
    /// Forward plan replay over the unpruned graph
    pub plan_index: PlanIndex,
    /// Distances from the roots
    pub from_start: DistanceIndex,
    /// Distances from the terminals
    pub from_goal: DistanceIndex,
}

impl StepOutput {
    /// At most one plan left
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.retained_plans.len() <= 1
    }

    /// Choices that can be selected
    pub fn available_choices(&self) -> impl Iterator<Item = &ChoiceInfo> + '_ {
        self.choice_infos.iter().filter(|c| c.is_available_for_choice)
    }

    /// Serializable summary
    #[must_use]
    pub fn report(&self) -> StepReport {
        let node_plan_hashes = self
            .plan_index
            .node_plans()
            .iter()
            .map(|(node, hashes)| (node.clone(), hashes.iter().copied().collect()))
            .collect();
        let edge_plan_hashes = self
            .plan_index
            .edge_plans()
            .iter()
            .map(|(edge, hashes)| {
                (
                    format!("{}_{}", edge.source, edge.target),
                    hashes.iter().copied().collect(),
                )
            })
            .collect();
        StepReport {
            plans: self.retained_plans.clone(),
            choice_infos: self.choice_infos.clone(),
            graph: self.snapshot.clone(),
            dot: self.graph.to_dot(),
            node_plan_hashes,
            edge_plan_hashes,
        }
    }
}

/// Wire-friendly view of a [`StepOutput`]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StepReport {
    /// Retained plans
    pub plans: Vec<Plan>,
    /// Decision points
    pub choice_infos: Vec<ChoiceInfo>,
    /// Node-link graph
    pub graph: GraphSnapshot,
    /// DOT rendering of the displayed graph
    pub dot: String,
    /// Node → plans
    pub node_plan_hashes: BTreeMap<NodeId, Vec<PlanHash>>,
    /// `source_target` → plans
    pub edge_plan_hashes: BTreeMap<String, Vec<PlanHash>>,
}

/// Runs disambiguation steps against a graph renderer
#[derive(Debug, Clone, Default)]
pub struct DisambiguationEngine<R> {
    renderer: R,
}

impl<R: GraphRenderer> DisambiguationEngine<R> {
    /// Engine rendering through `renderer`
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    /// The renderer
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Run one step
    ///
    /// `rng` is only consulted by the `RANDOM` priority.
    ///
    /// # Errors
    /// [`DisambiguationError::ExternalTool`] if rendering fails,
    /// [`DisambiguationError::Graph`] if the rendering is malformed
    pub fn step(&self, request: &StepRequest<'_>, rng: &mut dyn RngCore) -> Result<StepOutput, DisambiguationError> {
        let retained = retained_plans(request.history, request.plans);
        tracing::debug!(
            mode = %request.options.mode,
            selections = request.history.len(),
            retained = retained.len(),
            "disambiguation step"
        );

        let description = self.renderer.render(request.task, &retained)?;
        let graph = ActionGraph::from_dot(description.as_str())?;
        let from_start = DistanceIndex::compute(&graph, TraversalDirection::Forward)?;
        let from_goal = DistanceIndex::compute(&graph, TraversalDirection::Backward)?;
        let plan_index = PlanIndex::build(&graph, &retained, TraversalDirection::Forward)?;

        let indices = Indices {
            plan_index: &plan_index,
            from_start: &from_start,
            from_goal: &from_goal,
        };

        let (choice_infos, shown) = if retained.len() <= 1 {
            (Vec::new(), graph)
        } else {
            match request.options.mode {
                DisambiguationMode::Select => {
                    let choices = select_choices(request, &retained, &graph, &indices, rng)?;
                    (choices, graph)
                }
                DisambiguationMode::BuildForward => build_choices(&graph, &indices, TraversalDirection::Forward)?,
                DisambiguationMode::BuildBackward => build_choices(&graph, &indices, TraversalDirection::Backward)?,
            }
        };

        let snapshot = GraphSnapshot::build(&shown, plan_index.node_plans());
        tracing::debug!(
            choices = choice_infos.len(),
            nodes = shown.node_count(),
            edges = shown.edge_count(),
            "step finished"
        );

        Ok(StepOutput {
            retained_plans: retained,
            choice_infos,
            graph: shown,
            snapshot,
            plan_index,
            from_start,
            from_goal,
        })
    }
}

struct Indices<'a> {
    plan_index: &'a PlanIndex,
    from_start: &'a DistanceIndex,
    from_goal: &'a DistanceIndex,
}

fn select_choices(
    request: &StepRequest<'_>,
    retained: &[Plan],
    graph: &ActionGraph,
    indices: &Indices<'_>,
    rng: &mut dyn RngCore,
) -> Result<Vec<ChoiceInfo>, DisambiguationError> {
    let consumed = consumed_actions(request.history);
    let splitter = LandmarkSplitter::new(request.landmarks);
    let emitted = splitter.split(retained, &consumed);
    let silent = splitter.not_available(&emitted);

    let label_nodes = indices.plan_index.label_to_nodes();
    let (mut available, mut unavailable): (Vec<ChoiceInfo>, Vec<ChoiceInfo>) = emitted
        .into_iter()
        .map(|choice| {
            let nodes: Vec<NodeId> = choice
                .actions()
                .filter_map(|a| label_nodes.get(a))
                .flatten()
                .cloned()
                .collect();
            choice.with_nodes(nodes)
        })
        .partition(|c| c.is_available_for_choice);

    if available.is_empty() {
        tracing::debug!("no landmark choice available; falling back to branch points");
        let search = BranchPointFinder::new(graph).find(TraversalDirection::Forward)?;
        let (branch_available, branch_unavailable): (Vec<_>, Vec<_>) = search
            .branch_points
            .iter()
            .map(|bp| branch_choice(bp, indices.plan_index))
            .partition(|c| c.is_available_for_choice);
        available = branch_available;
        unavailable = branch_unavailable.into_iter().chain(unavailable).collect();
    }

    let mut unavailable: Vec<ChoiceInfo> = unavailable.into_iter().chain(silent).collect();
    order_by_priority(&mut available, request.options.priority, indices, rng);
    order_by_priority(&mut unavailable, request.options.priority, indices, rng);

    Ok(available
        .into_iter()
        .chain(unavailable)
        .map(|c| c.with_distances(indices.from_start, indices.from_goal))
        .collect())
}

fn build_choices(
    graph: &ActionGraph,
    indices: &Indices<'_>,
    direction: TraversalDirection,
) -> Result<(Vec<ChoiceInfo>, ActionGraph), DisambiguationError> {
    let search = BranchPointFinder::new(graph).find(direction)?;
    if search.branch_points.is_empty() {
        return Ok((Vec::new(), graph.clone()));
    }

    let frontier: HashSet<NodeId> = match direction {
        TraversalDirection::Forward => search
            .branch_points
            .iter()
            .flat_map(|bp| bp.frontier(direction))
            .collect(),
        TraversalDirection::Backward => search.branch_points.iter().map(|bp| bp.node.clone()).collect(),
    };
    let pruned = GraphPruner::new(graph).prune_beyond(&frontier, &search.visited, direction)?;

    let distances = if direction.is_forward() {
        indices.from_start
    } else {
        indices.from_goal
    };
    let mut choices: Vec<ChoiceInfo> = search
        .branch_points
        .iter()
        .map(|bp| branch_choice(bp, indices.plan_index))
        .collect();
    choices.sort_by_key(|c| distances.min_over(&c.nodes));

    let choices = choices
        .into_iter()
        .map(|c| c.with_distances(indices.from_start, indices.from_goal))
        .collect();
    Ok((choices, pruned))
}

/// Landmark-less choice: plans through the branch node, grouped by diverging edge
fn branch_choice(bp: &BranchPoint, plan_index: &PlanIndex) -> ChoiceInfo {
    let through: BTreeSet<PlanHash> = plan_index.plans_at(&bp.node).cloned().unwrap_or_default();
    let mut groups: IndexMap<ActionLabel, Vec<PlanHash>> = IndexMap::new();
    for edge in &bp.edges {
        let Some(on_edge) = plan_index.plans_on(edge) else { continue };
        let group = groups.entry(edge.label.clone()).or_default();
        for hash in on_edge.intersection(&through) {
            if !group.contains(hash) {
                group.push(*hash);
            }
        }
    }
    ChoiceInfo::from_groups(None, groups).with_nodes([bp.node.clone()])
}

fn order_by_priority(
    choices: &mut [ChoiceInfo],
    priority: SelectionPriority,
    indices: &Indices<'_>,
    rng: &mut dyn RngCore,
) {
    let label_distance = |choice: &ChoiceInfo, distances: &DistanceIndex| {
        choice
            .actions()
            .map(|a| distances.label_distance(a))
            .min()
            .unwrap_or(disambig_graph::UNBOUNDED_DISTANCE)
    };
    match priority {
        SelectionPriority::MaxPlans => choices.sort_by_key(ChoiceInfo::total_plans),
        SelectionPriority::MinPlans => choices.sort_by_key(|c| std::cmp::Reverse(c.total_plans())),
        SelectionPriority::Random => choices.shuffle(rng),
        SelectionPriority::InitForward => choices.sort_by_key(|c| label_distance(c, indices.from_start)),
        SelectionPriority::GoalBackward => choices.sort_by_key(|c| label_distance(c, indices.from_goal)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::PrefixTreeRenderer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn plans() -> Vec<Plan> {
        let mut plans = Vec::new();
        for (branch, tails) in [("x", ["p", "q", "r"]), ("y", ["s", "t", "u"])] {
            for tail in tails {
                plans.push(Plan::from_actions(["a", branch, tail], 3).unwrap());
            }
        }
        plans
    }

    fn step(
        plans: &[Plan],
        landmarks: &[Landmark],
        history: &[SelectionInfo],
        options: StepOptions,
    ) -> StepOutput {
        let task = PlanningTask::default();
        let request = StepRequest {
            task: &task,
            plans,
            landmarks,
            history,
            options,
        };
        let mut rng = StdRng::seed_from_u64(7);
        DisambiguationEngine::new(PrefixTreeRenderer)
            .step(&request, &mut rng)
            .unwrap()
    }

    #[test]
    fn mode_and_priority_names() {
        assert_eq!("build_forward".parse::<DisambiguationMode>().unwrap(), DisambiguationMode::BuildForward);
        assert_eq!("MIN_PLANS".parse::<SelectionPriority>().unwrap(), SelectionPriority::MinPlans);
        assert!("max_plans".parse::<SelectionPriority>().is_err());
        assert_eq!(SelectionPriority::default(), SelectionPriority::MaxPlans);
    }

    #[test]
    fn select_falls_back_to_branch_points() {
        let out = step(&plans(), &[], &[], StepOptions::new());
        assert_eq!(out.choice_infos.len(), 1);
        let choice = &out.choice_infos[0];
        assert!(choice.landmark.is_none());
        assert_eq!(choice.action_plan_hashes.len(), 2);
        assert!(choice.action_plan_hashes.values().all(|g| g.len() == 3));
        assert_eq!(choice.distance_to_start, 1);
        assert_eq!(choice.distance_to_end, 2);
    }

    #[test]
    fn single_plan_has_no_choices() {
        let p = plans();
        let out = step(&p[..1], &[], &[], StepOptions::new());
        assert!(out.is_done());
        assert!(out.choice_infos.is_empty());
    }

    #[test]
    fn build_forward_prunes_past_branch() {
        let out = step(
            &plans(),
            &[],
            &[],
            StepOptions::new().with_mode(DisambiguationMode::BuildForward),
        );
        assert_eq!(out.choice_infos.len(), 1);
        // root, the shared node and the two branch targets
        assert_eq!(out.graph.node_count(), 4);
        assert_eq!(out.snapshot.nodes.len(), 4);
    }

    #[test]
    fn build_backward_reports_diverging_node() {
        let out = step(
            &plans(),
            &[],
            &[],
            StepOptions::new().with_mode(DisambiguationMode::BuildBackward),
        );
        assert!(!out.choice_infos.is_empty());
        assert!(out.choice_infos.iter().all(|c| c.landmark.is_none()));
        assert!(out.graph.node_count() < ActionGraph::from_plans(&plans()).node_count());
    }

    #[test]
    fn landmark_choices_ordered_by_priority() {
        let landmarks = vec![
            Landmark::new(vec!["branch".into()], true, ["x", "y"]).unwrap(),
            Landmark::new(vec!["tail".into()], true, ["p", "s"]).unwrap(),
        ];
        // branch groups six plans, tail two
        let max = step(&plans(), &landmarks, &[], StepOptions::new());
        assert_eq!(max.choice_infos[0].landmark.as_ref().unwrap().facts[0], "tail");

        let min = step(
            &plans(),
            &landmarks,
            &[],
            StepOptions::new().with_priority(SelectionPriority::MinPlans),
        );
        assert_eq!(min.choice_infos[0].landmark.as_ref().unwrap().facts[0], "branch");

        let goal = step(
            &plans(),
            &landmarks,
            &[],
            StepOptions::new().with_priority(SelectionPriority::GoalBackward),
        );
        assert_eq!(goal.choice_infos[0].landmark.as_ref().unwrap().facts[0], "tail");
    }

    #[test]
    fn unavailable_choices_follow_the_same_priority() {
        let landmarks = vec![
            Landmark::new(vec!["only x".into()], true, ["x", "zz"]).unwrap(),
            Landmark::new(vec!["only p".into()], true, ["p", "zz"]).unwrap(),
        ];
        let facts = |out: &StepOutput| -> Vec<(Option<String>, bool)> {
            out.choice_infos
                .iter()
                .map(|c| (c.landmark.as_ref().map(|l| l.facts[0].clone()), c.is_available_for_choice))
                .collect()
        };

        let default = step(&plans(), &landmarks, &[], StepOptions::new());
        assert_eq!(
            facts(&default),
            vec![
                (None, true),
                (Some("only p".to_string()), false),
                (Some("only x".to_string()), false),
            ]
        );

        let min = step(
            &plans(),
            &landmarks,
            &[],
            StepOptions::new().with_priority(SelectionPriority::MinPlans),
        );
        assert_eq!(
            facts(&min),
            vec![
                (None, true),
                (Some("only x".to_string()), false),
                (Some("only p".to_string()), false),
            ]
        );
    }

    #[test]
    fn report_keys_edges_by_endpoints() {
        let out = step(&plans(), &[], &[], StepOptions::new());
        let report = out.report();
        assert_eq!(report.edge_plan_hashes["node0_node1"].len(), 6);
        assert_eq!(report.plans.len(), 6);
        assert!(report.dot.starts_with("digraph"));
    }
}

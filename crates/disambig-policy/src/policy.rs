//! Edge selection policy trait and core types
//!
//! Provides the [`EdgeSelectionPolicy`] trait for automated choice making and
//! the [`PolicyContext`] every policy reads from.

use disambig_core::{consumed_actions, ChoiceInfo, SelectionInfo, StepOutput};
use disambig_graph::{Edge, PlanIndex};
use disambig_plan::{ActionLabel, Landmark, Plan, PlanHash};
use rand::seq::SliceRandom;
use rand::RngCore;
use std::collections::{BTreeSet, HashSet};
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

/// Automated choice maker
///
/// A call moves from pending to either [`SelectionOutcome::Selected`] or
/// [`SelectionOutcome::Exhausted`]. Implementations never return an action
/// consumed by the session history, and every selection strictly narrows the
/// live plan set.
pub trait EdgeSelectionPolicy: Send + Sync + Debug {
    /// Pick one action, or report that none is eligible
    fn select(&self, ctx: &PolicyContext<'_>, rng: &mut dyn RngCore) -> SelectionOutcome;

    /// Policy tag
    fn kind(&self) -> EdgeSelectionType;

    /// Policy name (for registry lookup and reports)
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// Built-in policy tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeSelectionType {
    /// Uniform over discriminating edges of the live graph
    #[default]
    Random,
    /// Uniform over choices, landmark-backed first
    ChoiceInfo,
    /// Same as [`Self::ChoiceInfo`]
    Landmark,
    /// Smallest group among disjunctive landmarks
    LandmarkGreedy,
    /// Action carried by the most edges
    #[serde(alias = "frequency_most")]
    FrequencyActionMost,
    /// Action carried by the fewest edges
    #[serde(alias = "frequency_least")]
    FrequencyActionLeast,
    /// Landmark action occurring earliest in some plan
    #[serde(alias = "distance_initial")]
    LandmarkClosestToInitial,
    /// Landmark action occurring latest in some plan
    #[serde(alias = "distance_goal")]
    LandmarkClosestToGoal,
}

impl EdgeSelectionType {
    /// All policy tags
    pub const ALL: [Self; 8] = [
        Self::Random,
        Self::ChoiceInfo,
        Self::Landmark,
        Self::LandmarkGreedy,
        Self::FrequencyActionMost,
        Self::FrequencyActionLeast,
        Self::LandmarkClosestToInitial,
        Self::LandmarkClosestToGoal,
    ];

    /// Snake-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::ChoiceInfo => "choice_info",
            Self::Landmark => "landmark",
            Self::LandmarkGreedy => "landmark_greedy",
            Self::FrequencyActionMost => "frequency_action_most",
            Self::FrequencyActionLeast => "frequency_action_least",
            Self::LandmarkClosestToInitial => "landmark_closest_to_initial",
            Self::LandmarkClosestToGoal => "landmark_closest_to_goal",
        }
    }

    const fn alias(self) -> Option<&'static str> {
        match self {
            Self::FrequencyActionMost => Some("frequency_most"),
            Self::FrequencyActionLeast => Some("frequency_least"),
            Self::LandmarkClosestToInitial => Some("distance_initial"),
            Self::LandmarkClosestToGoal => Some("distance_goal"),
            _ => None,
        }
    }
}

impl Display for EdgeSelectionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeSelectionType {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == lower || t.alias() == Some(lower.as_str()))
            .ok_or_else(|| UnknownPolicy(s.to_string()))
    }
}

/// Unrecognized policy name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown edge selection policy: {0}")]
pub struct UnknownPolicy(pub String);

/// The committed pick of a policy
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EdgeSelection {
    /// Chosen action
    pub action: ActionLabel,
    /// Plans retained by the choice
    pub plan_hashes: Vec<PlanHash>,
    /// Landmark the action achieves, if the pick came from one
    pub landmark: Option<Landmark>,
}

impl EdgeSelection {
    /// Whether the pick came from a landmark
    #[inline]
    #[must_use]
    pub fn is_from_landmark(&self) -> bool {
        self.landmark.is_some()
    }

    /// History entry recording this pick
    #[must_use]
    pub fn to_selection_info(&self) -> SelectionInfo {
        SelectionInfo::new(self.action.clone(), self.plan_hashes.iter().copied())
    }
}

/// Result of a policy call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// An action was picked
    Selected(EdgeSelection),
    /// Nothing eligible; disambiguation cannot proceed automatically
    Exhausted,
}

impl SelectionOutcome {
    /// True when no action could be picked
    #[inline]
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// The pick, if any
    #[must_use]
    pub fn selection(&self) -> Option<&EdgeSelection> {
        match self {
            Self::Selected(selection) => Some(selection),
            Self::Exhausted => None,
        }
    }

    /// Consume into the pick, if any
    #[must_use]
    pub fn into_selection(self) -> Option<EdgeSelection> {
        match self {
            Self::Selected(selection) => Some(selection),
            Self::Exhausted => None,
        }
    }

    pub(crate) fn from_pick(kind: EdgeSelectionType, pick: Option<EdgeSelection>) -> Self {
        match pick {
            Some(selection) => {
                tracing::debug!(policy = %kind, action = %selection.action, plans = selection.plan_hashes.len(), "edge selected");
                Self::Selected(selection)
            }
            None => {
                tracing::debug!(policy = %kind, "edge selection exhausted");
                Self::Exhausted
            }
        }
    }
}

/// One eligible action of a choice
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// The action
    pub action: &'a ActionLabel,
    /// Plans using it
    pub plan_hashes: &'a [PlanHash],
    /// Owning landmark, if any
    pub landmark: Option<&'a Landmark>,
}

impl Candidate<'_> {
    /// Commit to this candidate
    #[must_use]
    pub fn to_selection(&self) -> EdgeSelection {
        EdgeSelection {
            action: self.action.clone(),
            plan_hashes: self.plan_hashes.to_vec(),
            landmark: self.landmark.cloned(),
        }
    }
}

/// Everything a policy may look at for one step
#[derive(Debug, Clone)]
pub struct PolicyContext<'a> {
    choice_infos: &'a [ChoiceInfo],
    plans: &'a [Plan],
    plan_index: &'a PlanIndex,
    consumed: HashSet<ActionLabel>,
}

impl<'a> PolicyContext<'a> {
    /// Context from the parts of a step
    #[must_use]
    pub fn new(
        choice_infos: &'a [ChoiceInfo],
        plans: &'a [Plan],
        plan_index: &'a PlanIndex,
        history: &[SelectionInfo],
    ) -> Self {
        Self {
            choice_infos,
            plans,
            plan_index,
            consumed: consumed_actions(history),
        }
    }

    /// Context for the step that produced `output`
    #[must_use]
    pub fn from_step(output: &'a StepOutput, history: &[SelectionInfo]) -> Self {
        Self::new(&output.choice_infos, &output.retained_plans, &output.plan_index, history)
    }

    /// Choices of the step
    #[must_use]
    pub fn choice_infos(&self) -> &'a [ChoiceInfo] {
        self.choice_infos
    }

    /// Live plans
    #[must_use]
    pub fn plans(&self) -> &'a [Plan] {
        self.plans
    }

    /// Edge → plans index of the live graph
    #[must_use]
    pub fn plan_index(&self) -> &'a PlanIndex {
        self.plan_index
    }

    /// Whether `action` was chosen earlier in the session
    #[must_use]
    pub fn is_consumed(&self, action: &ActionLabel) -> bool {
        self.consumed.contains(action)
    }

    /// Plans strictly narrowing the live set
    fn narrows(&self, group_len: usize) -> bool {
        group_len > 0 && group_len < self.plans.len()
    }

    /// Live-graph edges whose plans strictly narrow the live set, unconsumed
    /// labels only, in stable edge order
    #[must_use]
    pub fn discriminating_edges(&self) -> Vec<(&'a Edge, &'a BTreeSet<PlanHash>)> {
        self.plan_index
            .sorted_edges()
            .into_iter()
            .filter(|(edge, plans)| self.narrows(plans.len()) && !self.is_consumed(&edge.label))
            .collect()
    }

    /// Eligible candidates per choice, landmark-backed or not; choices with no
    /// eligible action are skipped
    #[must_use]
    pub fn choice_candidates(&self, landmark_backed: bool) -> Vec<Vec<Candidate<'a>>> {
        self.choice_infos
            .iter()
            .filter(|c| c.is_from_landmark() == landmark_backed)
            .map(|c| self.candidates_of(c))
            .filter(|candidates| !candidates.is_empty())
            .collect()
    }

    /// Eligible actions of one choice
    #[must_use]
    pub fn candidates_of(&self, choice: &'a ChoiceInfo) -> Vec<Candidate<'a>> {
        choice
            .action_plan_hashes
            .iter()
            .filter(|(action, group)| self.narrows(group.len()) && !self.is_consumed(action))
            .map(|(action, group)| Candidate {
                action,
                plan_hashes: group,
                landmark: choice.landmark.as_ref(),
            })
            .collect()
    }
}

/// Uniform pick of a choice, then of one of its candidates
pub(crate) fn pick_nested<'a>(
    choices: &[Vec<Candidate<'a>>],
    rng: &mut dyn RngCore,
) -> Option<Candidate<'a>> {
    let choice = choices.choose(rng)?;
    choice.choose(rng).copied()
}

/// Candidates minimizing `key`, in input order
pub(crate) fn minimal_by_key<'a, K: Ord>(
    candidates: impl IntoIterator<Item = Candidate<'a>>,
    key: impl Fn(&Candidate<'a>) -> K,
) -> Vec<Candidate<'a>> {
    let mut best: Option<K> = None;
    let mut tier = Vec::new();
    for candidate in candidates {
        let k = key(&candidate);
        match best.as_ref().map(|b| k.cmp(b)) {
            Some(std::cmp::Ordering::Greater) => {}
            Some(std::cmp::Ordering::Equal) => tier.push(candidate),
            _ => {
                best = Some(k);
                tier = vec![candidate];
            }
        }
    }
    tier
}

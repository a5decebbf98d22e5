//! Candidate plans

use crate::hash::PlanHash;
use crate::label::{ActionLabel, LabelError};
use std::fmt::{self, Display, Formatter};

/// An immutable action sequence with its cost and content hash
///
/// The hash is always derived from the actions; it is recomputed on
/// deserialization rather than trusted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "RawPlan")]
pub struct Plan {
    actions: Vec<ActionLabel>,
    cost: u64,
    hash: PlanHash,
}

#[derive(serde::Deserialize)]
struct RawPlan {
    actions: Vec<ActionLabel>,
    #[serde(default)]
    cost: Option<u64>,
}

impl From<RawPlan> for Plan {
    fn from(raw: RawPlan) -> Self {
        let cost = raw.cost.unwrap_or(raw.actions.len() as u64);
        Self::new(raw.actions, cost)
    }
}

impl Plan {
    /// Build a plan from already-normalized actions
    #[must_use]
    pub fn new(actions: Vec<ActionLabel>, cost: u64) -> Self {
        let hash = PlanHash::of_actions(&actions);
        Self {
            actions,
            cost,
            hash,
        }
    }

    /// Build a plan from raw action names, normalizing each
    ///
    /// # Errors
    /// Returns [`LabelError`] if any action normalizes to nothing
    pub fn from_actions<I, S>(actions: I, cost: u64) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let actions = actions
            .into_iter()
            .map(|a| ActionLabel::normalize(a.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(actions, cost))
    }

    /// Ordered actions
    #[inline]
    #[must_use]
    pub fn actions(&self) -> &[ActionLabel] {
        &self.actions
    }

    /// Total plan cost
    #[inline]
    #[must_use]
    pub const fn cost(&self) -> u64 {
        self.cost
    }

    /// Content hash of the action sequence
    #[inline]
    #[must_use]
    pub const fn hash(&self) -> PlanHash {
        self.hash
    }

    /// Number of actions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True for the empty plan (goal already satisfied)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Whether the plan uses `action` anywhere
    #[must_use]
    pub fn contains(&self, action: &ActionLabel) -> bool {
        self.actions.contains(action)
    }

    /// Index of the first occurrence of `action`
    #[must_use]
    pub fn first_position(&self, action: &ActionLabel) -> Option<usize> {
        self.actions.iter().position(|a| a == action)
    }

    /// Index of the last occurrence of `action`, counted from the end of the plan
    #[must_use]
    pub fn last_position_from_end(&self, action: &ActionLabel) -> Option<usize> {
        self.actions.iter().rev().position(|a| a == action)
    }

    /// True when every action costs one
    #[must_use]
    pub fn is_unit_cost(&self) -> bool {
        self.cost == self.actions.len() as u64
    }
}

impl Display for Plan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for action in &self.actions {
            writeln!(f, "({action})")?;
        }
        let kind = if self.is_unit_cost() {
            "unit cost"
        } else {
            "general cost"
        };
        write!(f, "; cost = {} ({kind})", self.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_actions_normalizes() {
        let plan = Plan::from_actions(["(Pick Ball1  RoomA)", "move rooma roomb (1)"], 2).unwrap();
        assert_eq!(plan.actions()[0].as_str(), "pick ball1 rooma");
        assert_eq!(plan.actions()[1].as_str(), "move rooma roomb");
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn equal_actions_equal_hash() {
        let a = Plan::from_actions(["a", "b"], 2).unwrap();
        let b = Plan::from_actions(["A", "(b)"], 7).unwrap();
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn positions() {
        let plan = Plan::from_actions(["a", "b", "a", "c"], 4).unwrap();
        let a = ActionLabel::normalize("a").unwrap();
        let z = ActionLabel::normalize("z").unwrap();
        assert_eq!(plan.first_position(&a), Some(0));
        assert_eq!(plan.last_position_from_end(&a), Some(1));
        assert_eq!(plan.first_position(&z), None);
        assert!(plan.contains(&a));
    }

    #[test]
    fn display_unit_cost() {
        let plan = Plan::from_actions(["a b", "c"], 2).unwrap();
        assert_eq!(plan.to_string(), "(a b)\n(c)\n; cost = 2 (unit cost)");
    }

    #[test]
    fn display_general_cost() {
        let plan = Plan::from_actions(["a"], 5).unwrap();
        assert!(plan.to_string().ends_with("; cost = 5 (general cost)"));
    }

    #[test]
    fn deserialize_recomputes_hash() {
        let plan: Plan = serde_json::from_str(r#"{"actions": ["(A)", "b"], "cost": 2}"#).unwrap();
        assert_eq!(plan.hash(), PlanHash::of_actions(plan.actions()));

        let json = serde_json::to_string(&plan).unwrap();
        let again: Plan = serde_json::from_str(&json).unwrap();
        assert_eq!(plan, again);
    }

    #[test]
    fn missing_cost_defaults_to_length() {
        let plan: Plan = serde_json::from_str(r#"{"actions": ["a", "b", "c"]}"#).unwrap();
        assert_eq!(plan.cost(), 3);
        assert!(plan.is_unit_cost());
    }
}

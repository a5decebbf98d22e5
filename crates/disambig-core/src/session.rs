//! Selection history
//!
//! A session is an append-only list of [`SelectionInfo`]; the live plan set
//! of the next step is derived from it and nothing else carries over.

use disambig_plan::{ActionLabel, Plan, PlanHash};
use std::collections::{BTreeSet, HashSet};

/// One committed decision
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SelectionInfo {
    /// Chosen first achiever or edge label
    #[serde(default)]
    pub selected_action: Option<ActionLabel>,
    /// Plans consistent with the choice
    #[serde(default)]
    pub selected_plan_hashes: BTreeSet<PlanHash>,
}

impl SelectionInfo {
    /// Selection of `action`, retaining `plan_hashes`
    pub fn new(action: ActionLabel, plan_hashes: impl IntoIterator<Item = PlanHash>) -> Self {
        Self {
            selected_action: Some(action),
            selected_plan_hashes: plan_hashes.into_iter().collect(),
        }
    }

    /// Selection that only restricts the plan set
    pub fn plans_only(plan_hashes: impl IntoIterator<Item = PlanHash>) -> Self {
        Self {
            selected_action: None,
            selected_plan_hashes: plan_hashes.into_iter().collect(),
        }
    }
}

/// Plans retained after applying `history`
///
/// Non-empty selections are intersected; empty ones are ignored. An empty
/// intersection keeps every plan.
#[must_use]
pub fn retained_plans(history: &[SelectionInfo], plans: &[Plan]) -> Vec<Plan> {
    let mut filter: Option<BTreeSet<PlanHash>> = None;
    for selection in history.iter().filter(|s| !s.selected_plan_hashes.is_empty()) {
        filter = Some(match filter {
            None => selection.selected_plan_hashes.clone(),
            Some(current) => current
                .intersection(&selection.selected_plan_hashes)
                .copied()
                .collect(),
        });
    }

    let Some(filter) = filter else {
        return plans.to_vec();
    };
    let retained: Vec<Plan> = plans
        .iter()
        .filter(|p| filter.contains(&p.hash()))
        .cloned()
        .collect();
    if retained.is_empty() {
        tracing::warn!(
            selections = history.len(),
            plans = plans.len(),
            "selection history intersects to nothing; keeping all plans"
        );
        return plans.to_vec();
    }
    retained
}

/// Actions already chosen in `history`
#[must_use]
pub fn consumed_actions(history: &[SelectionInfo]) -> HashSet<ActionLabel> {
    history
        .iter()
        .filter_map(|s| s.selected_action.clone())
        .collect()
}

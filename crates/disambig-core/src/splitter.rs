//! Landmark-based plan partitioning

use crate::choice::ChoiceInfo;
use disambig_plan::{ActionLabel, Landmark, Plan, PlanHash};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Partitions live plans by landmark first achievers
#[derive(Debug, Clone, Copy)]
pub struct LandmarkSplitter<'a> {
    landmarks: &'a [Landmark],
}

impl<'a> LandmarkSplitter<'a> {
    /// Split by `landmarks`
    #[must_use]
    pub const fn new(landmarks: &'a [Landmark]) -> Self {
        Self { landmarks }
    }

    /// One [`ChoiceInfo`] per landmark with at least one discriminating achiever
    ///
    /// An achiever used by every live plan, or already consumed, is dropped.
    /// Sorted ascending by largest group (most discriminating first); ties keep
    /// landmark order.
    #[must_use]
    pub fn split(&self, plans: &[Plan], consumed: &HashSet<ActionLabel>) -> Vec<ChoiceInfo> {
        let mut choices: Vec<ChoiceInfo> = self
            .landmarks
            .iter()
            .filter_map(|landmark| {
                let groups = group_by_achiever(landmark, plans, consumed);
                (!groups.is_empty()).then(|| ChoiceInfo::from_groups(Some(landmark.clone()), groups))
            })
            .collect();
        choices.sort_by_key(|c| c.max_group_size);
        choices
    }

    /// Landmarks with two or more achievers that produced no choice at all
    #[must_use]
    pub fn not_available(&self, emitted: &[ChoiceInfo]) -> Vec<ChoiceInfo> {
        let seen: HashSet<&[String]> = emitted
            .iter()
            .filter_map(|c| c.landmark.as_ref())
            .map(|l| l.facts.as_slice())
            .collect();
        self.landmarks
            .iter()
            .filter(|l| l.first_achievers.len() >= 2 && !seen.contains(l.facts.as_slice()))
            .cloned()
            .map(ChoiceInfo::unavailable)
            .collect()
    }
}

fn group_by_achiever(
    landmark: &Landmark,
    plans: &[Plan],
    consumed: &HashSet<ActionLabel>,
) -> IndexMap<ActionLabel, Vec<PlanHash>> {
    let mut groups = IndexMap::new();
    for achiever in landmark.first_achievers.iter().filter(|a| !consumed.contains(*a)) {
        let group: Vec<PlanHash> = plans
            .iter()
            .filter(|p| p.contains(achiever))
            .map(Plan::hash)
            .collect();
        if !group.is_empty() && group.len() < plans.len() {
            groups.insert(achiever.clone(), group);
        }
    }
    groups
}

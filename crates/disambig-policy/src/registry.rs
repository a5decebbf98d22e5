//! Policy registry
//!
//! Provides [`PolicyRegistry`] for looking policies up by name.

use crate::choice::{ChoicePolicy, LandmarkGreedyPolicy};
use crate::closest::ClosestLandmarkPolicy;
use crate::frequency::FrequencyPolicy;
use crate::policy::{EdgeSelectionPolicy, EdgeSelectionType, UnknownPolicy};
use crate::random::RandomEdgePolicy;
use std::collections::BTreeMap;

/// Built-in policy for `kind`
#[must_use]
pub fn policy_for(kind: EdgeSelectionType) -> Box<dyn EdgeSelectionPolicy> {
    match kind {
        EdgeSelectionType::Random => Box::new(RandomEdgePolicy::new()),
        EdgeSelectionType::ChoiceInfo => Box::new(ChoicePolicy::choice_info()),
        EdgeSelectionType::Landmark => Box::new(ChoicePolicy::landmark()),
        EdgeSelectionType::LandmarkGreedy => Box::new(LandmarkGreedyPolicy::new()),
        EdgeSelectionType::FrequencyActionMost => Box::new(FrequencyPolicy::most()),
        EdgeSelectionType::FrequencyActionLeast => Box::new(FrequencyPolicy::least()),
        EdgeSelectionType::LandmarkClosestToInitial => Box::new(ClosestLandmarkPolicy::toward_initial()),
        EdgeSelectionType::LandmarkClosestToGoal => Box::new(ClosestLandmarkPolicy::toward_goal()),
    }
}

/// Named edge selection policies
#[derive(Debug, Default)]
pub struct PolicyRegistry {
    policies: BTreeMap<&'static str, Box<dyn EdgeSelectionPolicy>>,
}

impl PolicyRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in policy
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for kind in EdgeSelectionType::ALL {
            registry.register(policy_for(kind));
        }
        registry
    }

    /// Register a policy under its name, replacing any previous one
    pub fn register(&mut self, policy: Box<dyn EdgeSelectionPolicy>) {
        self.policies.insert(policy.name(), policy);
    }

    /// Policy registered as `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn EdgeSelectionPolicy> {
        self.policies.get(name).map(AsRef::as_ref)
    }

    /// Policy for `name`, accepting aliases and any casing
    ///
    /// # Errors
    /// [`UnknownPolicy`] if no registered policy matches
    pub fn resolve(&self, name: &str) -> Result<&dyn EdgeSelectionPolicy, UnknownPolicy> {
        if let Some(policy) = self.get(name) {
            return Ok(policy);
        }
        let kind: EdgeSelectionType = name.parse()?;
        self.get(kind.as_str()).ok_or_else(|| UnknownPolicy(name.to_string()))
    }

    /// Check if a policy is registered as `name`
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.policies.contains_key(name)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.policies.keys().copied().collect()
    }

    /// Number of registered policies
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

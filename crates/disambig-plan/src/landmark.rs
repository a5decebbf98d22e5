//! Landmarks and landmark-extraction categories

use crate::label::{ActionLabel, LabelError};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A fact set every valid plan must achieve, with the actions that can first achieve it
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Landmark {
    /// Logical facts
    pub facts: Vec<String>,
    /// Whether any one fact suffices
    #[serde(default)]
    pub disjunctive: bool,
    /// Actions that can first establish the landmark
    pub first_achievers: Vec<ActionLabel>,
}

impl Landmark {
    /// Build a landmark from raw achiever names; duplicates are dropped in order
    ///
    /// # Errors
    /// Returns [`LabelError`] if an achiever normalizes to nothing
    pub fn new<I, S>(facts: Vec<String>, disjunctive: bool, achievers: I) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut first_achievers: Vec<ActionLabel> = Vec::new();
        for raw in achievers {
            let label = ActionLabel::normalize(raw.as_ref())?;
            if !first_achievers.contains(&label) {
                first_achievers.push(label);
            }
        }
        Ok(Self {
            facts,
            disjunctive,
            first_achievers,
        })
    }

    /// True if `action` is one of the first achievers
    #[must_use]
    pub fn is_achieved_by(&self, action: &ActionLabel) -> bool {
        self.first_achievers.contains(action)
    }
}

/// Landmark extraction method requested from the landmark source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandmarkCategory {
    /// Exhaustive
    Exhaust,
    /// h^1
    H1,
    /// h^2
    H2,
    /// Richter, Helmert and Westphal
    #[default]
    Rhw,
    /// Zhu and Givan
    Zg,
}

impl LandmarkCategory {
    /// All categories in declaration order
    pub const ALL: [Self; 5] = [Self::Exhaust, Self::H1, Self::H2, Self::Rhw, Self::Zg];

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exhaust => "exhaust",
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::Rhw => "rhw",
            Self::Zg => "zg",
        }
    }
}

impl Display for LandmarkCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LandmarkCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Unrecognized landmark category name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown landmark category: {0}")]
pub struct UnknownCategory(pub String);

//! Planning task handed to external collaborators

/// Domain and problem text, passed through to plan sources, landmark
/// sources and graph renderers without interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlanningTask {
    /// Domain description
    #[serde(default)]
    pub domain: String,
    /// Problem description
    #[serde(default)]
    pub problem: String,
}

impl PlanningTask {
    /// Create a task
    pub fn new(domain: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            problem: problem.into(),
        }
    }
}

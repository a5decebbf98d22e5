//! Error types for disambiguation steps
//!
//! An empty graph, an empty history intersection and an exhausted policy are
//! not errors; only collaborator failures and structural contract violations
//! surface here.

use disambig_graph::GraphError;

/// External collaborator failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExternalToolError {
    /// Tool could not be reached or refused the request
    #[error("{tool} unavailable: {reason}")]
    Unavailable {
        /// Collaborator name
        tool: String,
        /// Failure detail
        reason: String,
    },

    /// Tool did not answer in time
    #[error("{tool} timed out after {seconds}s")]
    Timeout {
        /// Collaborator name
        tool: String,
        /// Elapsed seconds
        seconds: u64,
    },

    /// Tool answered with something unusable
    #[error("{tool} returned invalid output: {reason}")]
    InvalidOutput {
        /// Collaborator name
        tool: String,
        /// What was wrong
        reason: String,
    },
}

impl ExternalToolError {
    /// Whether retrying the same call might succeed
    ///
    /// Retries are the caller's decision; nothing here retries.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout { .. })
    }

    /// Name of the failing collaborator
    #[must_use]
    pub fn tool(&self) -> &str {
        match self {
            Self::Unavailable { tool, .. } | Self::Timeout { tool, .. } | Self::InvalidOutput { tool, .. } => tool,
        }
    }
}

/// Disambiguation step error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisambiguationError {
    /// A plan, landmark or render call failed; no partial output is produced
    #[error("external tool failed: {0}")]
    ExternalTool(#[from] ExternalToolError),

    /// The rendered graph violated its contract
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
}

impl DisambiguationError {
    /// Whether retrying the step might succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ExternalTool(e) => e.is_retryable(),
            Self::Graph(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        let timeout = ExternalToolError::Timeout {
            tool: "planner".into(),
            seconds: 30,
        };
        let invalid = ExternalToolError::InvalidOutput {
            tool: "renderer".into(),
            reason: "not dot".into(),
        };
        assert!(timeout.is_retryable());
        assert!(!invalid.is_retryable());
        assert_eq!(invalid.tool(), "renderer");

        let err: DisambiguationError = timeout.into();
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "external tool failed: planner timed out after 30s");
    }

    #[test]
    fn graph_errors_are_not_retryable() {
        let err: DisambiguationError = GraphError::NoSuchNode("n".into()).into();
        assert!(!err.is_retryable());
    }
}

//! Simulation errors

use disambig_core::{DisambiguationError, ExternalToolError};

/// Simulation failure
///
/// Exhausted policies and step caps are outcomes, not errors.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// Plan or landmark retrieval failed
    #[error("collaborator failed: {0}")]
    Source(#[from] ExternalToolError),

    /// A disambiguation step failed
    #[error("disambiguation step failed: {0}")]
    Step(#[from] DisambiguationError),

    /// Input rejected before running
    #[error("invalid simulation input: {field} {reason}")]
    InvalidInput {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// Configuration text could not be parsed
    #[error("invalid simulation config: {0}")]
    Config(#[from] toml::de::Error),

    /// Fixture text could not be parsed
    #[error("invalid fixture: {0}")]
    Fixture(#[from] serde_json::Error),
}

impl SimulationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Whether rerunning might succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Source(e) => e.is_retryable(),
            Self::Step(e) => e.is_retryable(),
            Self::InvalidInput { .. } | Self::Config(_) | Self::Fixture(_) => false,
        }
    }
}

/// Result alias for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;

//! Error types for graph construction and traversal
//!
//! Every variant identifies the offending node or edge; these indicate a
//! contract violation by whoever produced the graph description, never a
//! normal "nothing to do" state (an empty graph is valid).

use crate::graph::NodeId;

/// Graph error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Node not present in the graph
    #[error("no such node: {0}")]
    NoSuchNode(NodeId),

    /// No edge between the two nodes
    #[error("no edge from {from} to {to}")]
    NoSuchEdge {
        /// Source node
        from: NodeId,
        /// Target node
        to: NodeId,
    },

    /// Graph description could not be read
    #[error("malformed graph description at line {line}: {reason}")]
    MalformedDescription {
        /// 1-based line number
        line: usize,
        /// What was wrong
        reason: String,
    },
}

impl GraphError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedDescription {
            line,
            reason: reason.into(),
        }
    }
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

//! Merged plan graphs
//!
//! An [`ActionGraph`] is the merge of a plan set's action sequences. This
//! crate reads and writes such graphs and runs the traversals a
//! disambiguation step needs:
//!
//! - [`DistanceIndex`]: layered BFS distances from the roots or terminals
//! - [`PlanIndex`]: which plans pass through each node and edge
//! - [`BranchPointFinder`]: the first simultaneous nodes where plans diverge
//! - [`GraphPruner`]: drop everything beyond a frontier
//!
//! An empty graph is a valid value; every traversal returns empty results
//! for it.
//!
//! # Example
//!
//! ```rust
//! use disambig_graph::{ActionGraph, BranchPointFinder, TraversalDirection};
//! use disambig_plan::Plan;
//!
//! let plans = vec![
//!     Plan::from_actions(["a", "x"], 2).unwrap(),
//!     Plan::from_actions(["a", "y"], 2).unwrap(),
//! ];
//! let graph = ActionGraph::from_plans(&plans);
//! let search = BranchPointFinder::new(&graph).find(TraversalDirection::Forward).unwrap();
//! assert_eq!(search.branch_points.len(), 1);
//! assert_eq!(search.branch_points[0].edges.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod branch;
mod distance;
mod dot;
mod error;
mod graph;
mod plan_index;
mod prune;
mod snapshot;

pub use branch::{BranchPoint, BranchPointFinder, BranchSearch};
pub use distance::{DistanceIndex, UNBOUNDED_DISTANCE};
pub use error::{GraphError, GraphResult};
pub use graph::{ActionGraph, Edge, NodeId, TraversalDirection};
pub use plan_index::PlanIndex;
pub use prune::GraphPruner;
pub use snapshot::{GraphSnapshot, SnapshotLink, SnapshotNode};

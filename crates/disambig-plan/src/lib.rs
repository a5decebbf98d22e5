//! Plan Disambiguation value types
//!
//! Immutable inputs shared by every stage of a disambiguation session.
//!
//! # Core Concepts
//!
//! - [`ActionLabel`]: canonical action name (quotes, annotations and casing normalized)
//! - [`PlanHash`]: order-sensitive content identifier of an action sequence
//! - [`Plan`]: action sequence, cost and hash
//! - [`Landmark`]: facts plus the first-achiever actions that can establish them
//! - [`PlanningTask`]: the domain/problem pair handed to external tools
//!
//! # Example
//!
//! ```rust
//! use disambig_plan::Plan;
//!
//! let a = Plan::from_actions(["pick ball1 rooma left", "move rooma roomb"], 2).unwrap();
//! let b = Plan::from_actions(["move rooma roomb", "pick ball1 rooma left"], 2).unwrap();
//! assert_ne!(a.hash(), b.hash());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod hash;
mod label;
mod landmark;
mod plan;
mod task;

pub use hash::{HashError, PlanHash};
pub use label::{ActionLabel, LabelError};
pub use landmark::{Landmark, LandmarkCategory, UnknownCategory};
pub use plan::Plan;
pub use task::PlanningTask;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

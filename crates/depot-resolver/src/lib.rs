//! Bounded backtracking transaction solver (§4.7): queue in, changeset out.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod changeset;
pub mod queue;
pub mod solver;

pub use changeset::{ChangeOp, Changeset};
pub use queue::{Queue, QueueOp};
pub use solver::{solve, solve_with_budget, Priorities, DEFAULT_BUDGET};

//! Assignment solver.
//!
//! Provides the backtracking search that fills shift slots under hard
//! constraints while minimizing soft cost, plus its outcome types.
//!
//! # Algorithm
//!
//! Slots are ordered by eligible-member scarcity, then start time,
//! then ID; within a slot, candidates are ordered by soft score, then
//! member ID. The search walks an explicit stack of decision frames
//! (one per seat), backtracking on dead ends and recording the best
//! partial solution found, bounded by an iteration/wall-clock budget.
//! Seats that cannot be filled are reported with a reason rather than
//! failing the run.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review"

mod search;

pub use search::AssignmentSolver;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Assignment;

/// Why a slot kept open seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnfilledReason {
    /// Fewer members qualify for the slot than its headcount.
    NoEligibleMember,
    /// Enough members qualify, but every arrangement tried conflicted
    /// with other assignments.
    HardConflict,
    /// The search budget expired before the seat was explored.
    BudgetExceeded,
}

impl fmt::Display for UnfilledReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::NoEligibleMember => "no-eligible-member",
            Self::HardConflict => "hard-conflict",
            Self::BudgetExceeded => "budget-exceeded",
        };
        f.write_str(reason)
    }
}

/// An under-filled slot in a solver outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnfilledSlot {
    /// Slot ID.
    pub slot_id: String,
    /// Number of open seats.
    pub missing: i32,
    /// Dominant reason the seats stayed open.
    pub reason: UnfilledReason,
}

/// Raw result of a solve run.
///
/// Classification into Complete/Partial/Infeasible/Aborted is the
/// orchestrator's job.
#[derive(Debug, Clone)]
pub struct SolverOutcome {
    /// Produced assignments.
    pub assignments: Vec<Assignment>,
    /// Raw soft score of each assignment, parallel to `assignments`.
    pub raw_scores: Vec<f64>,
    /// Slots with open seats, in snapshot slot order.
    pub unfilled: Vec<UnfilledSlot>,
    /// Search steps consumed.
    pub iterations: u64,
    /// Whether the iteration or wall-clock budget expired.
    pub budget_exhausted: bool,
}

impl SolverOutcome {
    /// Total reported soft cost: per-assignment raw scores clamped at
    /// zero, summed.
    pub fn total_soft_cost(&self) -> f64 {
        self.raw_scores.iter().map(|r| r.max(0.0)).sum()
    }

    /// Whether every seat was filled.
    pub fn is_complete(&self) -> bool {
        self.unfilled.is_empty()
    }
}

//! Constraint evaluation for candidate assignments.
//!
//! Splits the rules a schedule must satisfy into hard constraints
//! (admissibility — a violation makes the candidate inadmissible
//! regardless of cost) and soft constraints (a non-negative penalty
//! traded off during search).
//!
//! All evaluation is pure: functions read the candidate, the current
//! partial schedule, and the snapshot, and touch nothing else. The
//! candidate evaluations within one slot are independent of each other
//! and could run in parallel; the solver's final deterministic re-sort
//! would make the result identical either way.

pub mod hard;
pub mod soft;

pub use hard::{check_hard, HardViolation};
pub use soft::{raw_score, CostWeights};

use crate::models::Assignment;
use crate::snapshot::Snapshot;

/// Outcome of evaluating one candidate assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintResult {
    /// The candidate is inadmissible. Never chosen.
    HardViolation(HardViolation),
    /// Admissible at a positive soft cost (lower is better).
    SoftCost(f64),
    /// Admissible at zero cost.
    Ok,
}

/// Evaluates a candidate assignment against the current partial
/// schedule.
///
/// Hard constraints are checked first; an admissible candidate is then
/// priced by the weighted soft-cost policy. The reported cost is
/// clamped at zero — a honored preference can rank a candidate ahead
/// of its peers (see [`soft::raw_score`]) but never produces a
/// negative cost.
pub fn evaluate(
    candidate: &Assignment,
    partial: &[Assignment],
    snapshot: &Snapshot,
    weights: &CostWeights,
) -> ConstraintResult {
    if let Some(violation) = hard::check_hard(candidate, partial, snapshot) {
        return ConstraintResult::HardViolation(violation);
    }
    let cost = soft::clamp_cost(soft::raw_score(candidate, partial, snapshot, weights));
    if cost == 0.0 {
        ConstraintResult::Ok
    } else {
        ConstraintResult::SoftCost(cost)
    }
}

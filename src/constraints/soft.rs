//! Soft constraints: the weighted cost policy.
//!
//! Admissible candidates are priced by a configurable weighted sum of
//! penalty terms; the solver prefers lower scores. Terms:
//!
//! - **avoid**: assigning against an `Avoid` request. The default
//!   weight is large enough that leaving a seat unfilled is cheaper
//!   than overriding an avoid wish.
//! - **prefer**: honoring a `Prefer` request *reduces* the raw score,
//!   so a preferring member outranks an indifferent peer.
//! - **fairness**: the member's load (hours) above the lightest-loaded
//!   roster member, measured before the candidate is applied and
//!   divided by the member's seniority weight. The least-loaded
//!   candidate pays nothing, so selection rotates through the roster
//!   and a balanced schedule reports zero fairness cost.
//! - **fragmentation**: starting a same-role slot that an already
//!   assigned member could have continued seamlessly.
//!
//! The raw score may be negative (prefer discount); reported costs are
//! clamped at zero so the schedule's total soft cost stays
//! non-negative.

use serde::{Deserialize, Serialize};

use crate::models::{Assignment, RequestKind};
use crate::snapshot::Snapshot;

use super::hard;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Weights of the soft-cost terms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CostWeights {
    /// Penalty per unit weight for assigning against an `Avoid` request.
    pub avoid_weight: f64,
    /// Discount per unit weight for honoring a `Prefer` request.
    pub prefer_weight: f64,
    /// Penalty per hour of load above the lightest-loaded member.
    pub fairness_weight: f64,
    /// Penalty for breaking a feasible same-role continuation.
    pub fragmentation_weight: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            avoid_weight: 10.0,
            prefer_weight: 1.0,
            fairness_weight: 1.0,
            fragmentation_weight: 0.5,
        }
    }
}

/// Computes the raw (unclamped) soft score of an admissible candidate.
///
/// Used by the solver to rank candidates; may be negative when a
/// `Prefer` request is honored. Pure over its inputs.
pub fn raw_score(
    candidate: &Assignment,
    partial: &[Assignment],
    snapshot: &Snapshot,
    weights: &CostWeights,
) -> f64 {
    let (Some(member), Some(slot)) = (
        snapshot.member(&candidate.member_id),
        snapshot.slot(&candidate.slot_id),
    ) else {
        return 0.0;
    };

    let mut score = 0.0;

    for request in snapshot.requests_for(&member.id) {
        if !request.applies_to(slot) {
            continue;
        }
        match request.kind {
            RequestKind::Prefer => score -= weights.prefer_weight * request.weight,
            RequestKind::Avoid => score += weights.avoid_weight * request.weight,
            RequestKind::MandatoryOff => {} // hard constraint, not priced
        }
    }

    // Fairness: hours above the lightest-loaded roster member,
    // discounted by seniority weight. Degenerate zero weights fall
    // back to the baseline instead of dividing by zero.
    let load_ms = member_load_ms(&member.id, partial);
    let min_load_ms = snapshot
        .members()
        .map(|m| member_load_ms(&m.id, partial))
        .min()
        .unwrap_or(0);
    let above_hours = (load_ms - min_load_ms).max(0) as f64 / MS_PER_HOUR;
    let seniority = if member.weight > 0.0 { member.weight } else { 1.0 };
    score += weights.fairness_weight * above_hours / seniority;

    if breaks_continuation(candidate, partial, snapshot) {
        score += weights.fragmentation_weight;
    }

    score
}

/// Clamps a raw score to the reported non-negative cost.
#[inline]
pub fn clamp_cost(raw: f64) -> f64 {
    raw.max(0.0)
}

/// Total assigned time of one member in a partial schedule (ms).
fn member_load_ms(member_id: &str, partial: &[Assignment]) -> i64 {
    partial
        .iter()
        .filter(|a| a.member_id == member_id)
        .map(|a| a.duration_ms())
        .sum()
}

/// Whether the candidate starts a same-role slot that a member already
/// on the adjacent preceding slot could have continued instead.
///
/// The continuation must actually be feasible for the incumbent —
/// an incumbent barred by rest, load, or any other hard constraint
/// does not make the candidate fragmenting.
fn breaks_continuation(candidate: &Assignment, partial: &[Assignment], snapshot: &Snapshot) -> bool {
    let Some(slot) = snapshot.slot(&candidate.slot_id) else {
        return false;
    };

    let predecessors: Vec<_> = snapshot
        .slots()
        .iter()
        .filter(|p| {
            p.id != slot.id
                && p.required_role == slot.required_role
                && p.window.end_ms == slot.window.start_ms
        })
        .collect();
    if predecessors.is_empty() {
        return false;
    }

    let mut incumbent_could_continue = false;
    for predecessor in predecessors {
        for held in partial.iter().filter(|a| a.slot_id == predecessor.id) {
            if held.member_id == candidate.member_id {
                return false; // the candidate is the continuation
            }
            let continuation = Assignment::new(held.member_id.clone(), slot.id.clone(), slot.window);
            if hard::check_hard(&continuation, partial, snapshot).is_none() {
                incumbent_could_continue = true;
            }
        }
    }
    incumbent_could_continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Member, ShiftRequest, ShiftSlot, TimeWindow};
    use crate::snapshot::GenerationRequest;

    const HOUR: i64 = 3_600_000;

    fn candidate(member_id: &str, slot_id: &str, start: i64, end: i64) -> Assignment {
        Assignment::new(member_id, slot_id, TimeWindow::new(start, end))
    }

    #[test]
    fn test_neutral_candidate_scores_zero() {
        let snapshot = Snapshot::build(
            GenerationRequest::new(0, 24 * HOUR)
                .with_member(Member::new("m1"))
                .with_member(Member::new("m2"))
                .with_slot(ShiftSlot::new("s1", 0, 8 * HOUR)),
        );
        let score = raw_score(
            &candidate("m1", "s1", 0, 8 * HOUR),
            &[],
            &snapshot,
            &CostWeights::default(),
        );
        assert!((score - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_prefer_discount() {
        let snapshot = Snapshot::build(
            GenerationRequest::new(0, 24 * HOUR)
                .with_member(Member::new("m1"))
                .with_member(Member::new("m2"))
                .with_slot(ShiftSlot::new("s1", 0, 8 * HOUR))
                .with_request(ShiftRequest::prefer_slot("m1", "s1").with_weight(2.0)),
        );
        let score = raw_score(
            &candidate("m1", "s1", 0, 8 * HOUR),
            &[],
            &snapshot,
            &CostWeights::default(),
        );
        assert!((score - (-2.0)).abs() < 1e-10);
        assert!((clamp_cost(score) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_avoid_penalty() {
        let snapshot = Snapshot::build(
            GenerationRequest::new(0, 24 * HOUR)
                .with_member(Member::new("m1"))
                .with_member(Member::new("m2"))
                .with_slot(ShiftSlot::new("s1", 0, 8 * HOUR))
                .with_request(ShiftRequest::avoid_slot("m1", "s1")),
        );
        let score = raw_score(
            &candidate("m1", "s1", 0, 8 * HOUR),
            &[],
            &snapshot,
            &CostWeights::default(),
        );
        assert!((score - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_fairness_charges_load_above_minimum() {
        let snapshot = Snapshot::build(
            GenerationRequest::new(0, 48 * HOUR)
                .with_member(Member::new("m1"))
                .with_member(Member::new("m2"))
                .with_slot(ShiftSlot::new("s1", 0, 8 * HOUR))
                .with_slot(ShiftSlot::new("s2", 8 * HOUR, 16 * HOUR))
                .with_slot(ShiftSlot::new("s3", 20 * HOUR, 28 * HOUR)),
        );
        let partial = vec![
            candidate("m1", "s1", 0, 8 * HOUR),
            candidate("m1", "s2", 8 * HOUR, 16 * HOUR),
        ];
        // m1 sits 16h above the idle m2
        let score = raw_score(
            &candidate("m1", "s3", 20 * HOUR, 28 * HOUR),
            &partial,
            &snapshot,
            &CostWeights::default(),
        );
        assert!((score - 16.0).abs() < 1e-10);

        // m2 is the lightest-loaded member and pays nothing
        let score = raw_score(
            &candidate("m2", "s3", 20 * HOUR, 28 * HOUR),
            &partial,
            &snapshot,
            &CostWeights::default(),
        );
        assert!((score - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_seniority_weight_discounts_fairness() {
        // m1 carries weight 2.0: the 16h above-minimum charge halves.
        let snapshot = Snapshot::build(
            GenerationRequest::new(0, 48 * HOUR)
                .with_member(Member::new("m1").with_weight(2.0))
                .with_member(Member::new("m2"))
                .with_slot(ShiftSlot::new("s1", 0, 8 * HOUR))
                .with_slot(ShiftSlot::new("s2", 8 * HOUR, 16 * HOUR))
                .with_slot(ShiftSlot::new("s3", 20 * HOUR, 28 * HOUR)),
        );
        let partial = vec![
            candidate("m1", "s1", 0, 8 * HOUR),
            candidate("m1", "s2", 8 * HOUR, 16 * HOUR),
        ];
        let score = raw_score(
            &candidate("m1", "s3", 20 * HOUR, 28 * HOUR),
            &partial,
            &snapshot,
            &CostWeights::default(),
        );
        assert!((score - 8.0).abs() < 1e-10);
    }

    #[test]
    fn test_fragmentation_penalty() {
        // s2 continues s1 (same role, adjacent). m1 holds s1 and could
        // continue; m2 taking s2 breaks the continuation.
        let snapshot = Snapshot::build(
            GenerationRequest::new(0, 48 * HOUR)
                .with_member(Member::new("m1").with_role("cashier"))
                .with_member(Member::new("m2").with_role("cashier"))
                .with_slot(ShiftSlot::new("s1", 0, 4 * HOUR).with_role("cashier"))
                .with_slot(ShiftSlot::new("s2", 4 * HOUR, 8 * HOUR).with_role("cashier")),
        );
        let partial = vec![candidate("m1", "s1", 0, 4 * HOUR)];

        let intruder = raw_score(
            &candidate("m2", "s2", 4 * HOUR, 8 * HOUR),
            &partial,
            &snapshot,
            &CostWeights::default(),
        );
        assert!((intruder - 0.5).abs() < 1e-10);

        // The incumbent pays fairness for the 4h they already hold,
        // but no fragmentation term.
        let continuation = raw_score(
            &candidate("m1", "s2", 4 * HOUR, 8 * HOUR),
            &partial,
            &snapshot,
            &CostWeights::default(),
        );
        assert!((continuation - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_no_fragmentation_when_incumbent_blocked() {
        // The s1 incumbent needs 8h rest, so they cannot continue into
        // s2; m2 taking s2 is not fragmenting.
        let snapshot = Snapshot::build(
            GenerationRequest::new(0, 48 * HOUR)
                .with_member(Member::new("m1").with_role("cashier").with_min_rest(8 * HOUR))
                .with_member(Member::new("m2").with_role("cashier"))
                .with_slot(ShiftSlot::new("s1", 0, 4 * HOUR).with_role("cashier"))
                .with_slot(ShiftSlot::new("s2", 4 * HOUR, 8 * HOUR).with_role("cashier")),
        );
        let partial = vec![candidate("m1", "s1", 0, 4 * HOUR)];
        let score = raw_score(
            &candidate("m2", "s2", 4 * HOUR, 8 * HOUR),
            &partial,
            &snapshot,
            &CostWeights::default(),
        );
        assert!((score - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_avoid_outweighs_fairness_rotation() {
        // Golden check of the default weight ordering: one avoided
        // assignment (10.0) costs more than several hours of load
        // excess (1.0/h), matching the policy that unfilled beats
        // forcing an avoid.
        let w = CostWeights::default();
        assert!(w.avoid_weight > 4.0 * w.fairness_weight);
        assert!(w.fragmentation_weight < w.prefer_weight);
    }
}

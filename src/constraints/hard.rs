//! Hard constraints.
//!
//! Any violation makes a candidate inadmissible; the solver never
//! chooses it and no cost can buy it back. Checks run in a fixed
//! order, so the reported violation is deterministic.

use std::fmt;

use crate::models::{Assignment, Member, RequestKind, ShiftSlot};
use crate::snapshot::Snapshot;

/// A hard-constraint violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardViolation {
    /// Candidate references a member or slot absent from the snapshot.
    DanglingReference,
    /// Member lacks the slot's required role.
    RoleMismatch,
    /// The member's availability does not cover the slot window.
    Unavailable,
    /// A mandatory-off request covers the slot.
    MandatoryOff,
    /// The slot already holds its required headcount.
    SlotSaturated,
    /// The window overlaps one of the member's assignments.
    OverlapsAssignment,
    /// The gap to an adjacent assignment is below the member's
    /// minimum rest.
    InsufficientRest,
    /// Projected load exceeds the member's cap without an overtime
    /// flag.
    LoadExceeded,
    /// Taking this candidate would leave fewer open seats than unmet
    /// tag-quota minima.
    QuotaUnsatisfiable,
}

impl fmt::Display for HardViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::DanglingReference => "dangling reference",
            Self::RoleMismatch => "role mismatch",
            Self::Unavailable => "member unavailable",
            Self::MandatoryOff => "mandatory off",
            Self::SlotSaturated => "slot saturated",
            Self::OverlapsAssignment => "overlapping assignment",
            Self::InsufficientRest => "insufficient rest",
            Self::LoadExceeded => "load cap exceeded",
            Self::QuotaUnsatisfiable => "tag quota unsatisfiable",
        };
        f.write_str(reason)
    }
}

/// Checks a candidate against all hard constraints.
///
/// Returns the first violation in check order, or `None` when the
/// candidate is admissible. Pure over its inputs.
pub fn check_hard(
    candidate: &Assignment,
    partial: &[Assignment],
    snapshot: &Snapshot,
) -> Option<HardViolation> {
    let (Some(member), Some(slot)) = (
        snapshot.member(&candidate.member_id),
        snapshot.slot(&candidate.slot_id),
    ) else {
        return Some(HardViolation::DanglingReference);
    };

    if slot.requires_role() && !member.has_role(&slot.required_role) {
        return Some(HardViolation::RoleMismatch);
    }

    if let Some(availability) = snapshot.availability(&member.id) {
        if !availability.is_available_during(&slot.window) {
            return Some(HardViolation::Unavailable);
        }
    }

    if snapshot
        .requests_for(&member.id)
        .iter()
        .any(|r| r.kind == RequestKind::MandatoryOff && r.applies_to(slot))
    {
        return Some(HardViolation::MandatoryOff);
    }

    let slot_count = partial.iter().filter(|a| a.slot_id == slot.id).count();
    if slot_count as i32 >= slot.headcount {
        return Some(HardViolation::SlotSaturated);
    }

    let mut load_ms: i64 = 0;
    for existing in partial.iter().filter(|a| a.member_id == member.id) {
        if existing.window.overlaps(&slot.window) {
            return Some(HardViolation::OverlapsAssignment);
        }
        if let Some(gap) = existing.window.gap_to(&slot.window) {
            if gap < member.min_rest_ms {
                return Some(HardViolation::InsufficientRest);
            }
        }
        load_ms += existing.duration_ms();
    }

    if let Some(cap) = snapshot.effective_max_load_ms(&member.id) {
        if load_ms + slot.duration_ms() > cap && !member.overtime_allowed {
            return Some(HardViolation::LoadExceeded);
        }
    }

    if quota_unsatisfiable(member, slot, partial, snapshot) {
        return Some(HardViolation::QuotaUnsatisfiable);
    }

    None
}

/// Tag-quota propagation: after taking the candidate, the remaining
/// open seats must still be able to cover every unmet quota minimum.
///
/// A single member may satisfy several quotas at once, so the bound is
/// the largest single unmet count, never the sum — the check rejects
/// only candidates that provably make a quota impossible.
fn quota_unsatisfiable(
    member: &Member,
    slot: &ShiftSlot,
    partial: &[Assignment],
    snapshot: &Snapshot,
) -> bool {
    if slot.tag_quotas.is_empty() {
        return false;
    }

    let mut assigned: Vec<&Member> = partial
        .iter()
        .filter(|a| a.slot_id == slot.id)
        .filter_map(|a| snapshot.member(&a.member_id))
        .collect();
    assigned.push(member);

    let open_seats = slot.headcount - assigned.len() as i32;
    let max_unmet = slot
        .tag_quotas
        .iter()
        .map(|q| q.min_count - assigned.iter().filter(|m| m.has_role(&q.tag)).count() as i32)
        .max()
        .unwrap_or(0);

    max_unmet > open_seats.max(0)
}

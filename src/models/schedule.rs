//! Schedule (solution) model.
//!
//! A schedule is the output of a generation run: member-to-slot
//! assignments, per-slot fill status, and per-member load totals.
//! It is owned by the caller after return and never mutated by the
//! engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::TimeWindow;

/// A member-slot assignment.
///
/// The slot window is denormalized onto the assignment for overlap
/// queries without a slot lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned member ID.
    pub member_id: String,
    /// Filled slot ID.
    pub slot_id: String,
    /// The slot's time window.
    pub window: TimeWindow,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(member_id: impl Into<String>, slot_id: impl Into<String>, window: TimeWindow) -> Self {
        Self {
            member_id: member_id.into(),
            slot_id: slot_id.into(),
            window,
        }
    }

    /// Duration of this assignment (ms).
    #[inline]
    pub fn duration_ms(&self) -> i64 {
        self.window.duration_ms()
    }
}

/// Fill status of a slot in a returned schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillStatus {
    /// Assigned headcount equals required headcount.
    Filled,
    /// Some but not all required heads assigned.
    PartiallyFilled,
    /// No heads assigned.
    Unfilled,
}

/// Per-slot fill record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotFill {
    /// Slot ID.
    pub slot_id: String,
    /// Heads assigned.
    pub assigned: i32,
    /// Heads required.
    pub required: i32,
    /// Fill classification.
    pub status: FillStatus,
}

impl SlotFill {
    /// Creates a fill record, deriving the status from the counts.
    pub fn new(slot_id: impl Into<String>, assigned: i32, required: i32) -> Self {
        let status = if assigned >= required {
            FillStatus::Filled
        } else if assigned > 0 {
            FillStatus::PartiallyFilled
        } else {
            FillStatus::Unfilled
        };
        Self {
            slot_id: slot_id.into(),
            assigned,
            required,
            status,
        }
    }
}

/// A complete or partial schedule for one generation period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    /// Assignments, ordered by (start time, slot ID, member ID).
    pub assignments: Vec<Assignment>,
    /// Fill status for every slot in the input snapshot.
    pub slot_fills: Vec<SlotFill>,
    /// Total assigned time per member (ms). Members without
    /// assignments are absent.
    pub member_loads: BTreeMap<String, i64>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all assignments for a given member.
    pub fn assignments_for_member(&self, member_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.member_id == member_id)
            .collect()
    }

    /// Returns all assignments for a given slot.
    pub fn assignments_for_slot(&self, slot_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.slot_id == slot_id)
            .collect()
    }

    /// Total assigned time for a member (ms). 0 if unassigned.
    pub fn member_load_ms(&self, member_id: &str) -> i64 {
        self.member_loads.get(member_id).copied().unwrap_or(0)
    }

    /// Fill record for a slot.
    pub fn fill_for_slot(&self, slot_id: &str) -> Option<&SlotFill> {
        self.slot_fills.iter().find(|f| f.slot_id == slot_id)
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the schedule holds no assignments.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new();
        s.assignments = vec![
            Assignment::new("m1", "s1", TimeWindow::new(0, 8_000)),
            Assignment::new("m2", "s1", TimeWindow::new(0, 8_000)),
            Assignment::new("m1", "s2", TimeWindow::new(10_000, 18_000)),
        ];
        s.slot_fills = vec![SlotFill::new("s1", 2, 2), SlotFill::new("s2", 1, 3)];
        s.member_loads = BTreeMap::from([("m1".to_string(), 16_000), ("m2".to_string(), 8_000)]);
        s
    }

    #[test]
    fn test_assignments_for_member() {
        let s = sample_schedule();
        assert_eq!(s.assignments_for_member("m1").len(), 2);
        assert_eq!(s.assignments_for_member("m2").len(), 1);
        assert!(s.assignments_for_member("m9").is_empty());
    }

    #[test]
    fn test_assignments_for_slot() {
        let s = sample_schedule();
        assert_eq!(s.assignments_for_slot("s1").len(), 2);
        assert_eq!(s.assignments_for_slot("s2").len(), 1);
    }

    #[test]
    fn test_member_load() {
        let s = sample_schedule();
        assert_eq!(s.member_load_ms("m1"), 16_000);
        assert_eq!(s.member_load_ms("m2"), 8_000);
        assert_eq!(s.member_load_ms("m9"), 0);
    }

    #[test]
    fn test_fill_status_derivation() {
        assert_eq!(SlotFill::new("s", 2, 2).status, FillStatus::Filled);
        assert_eq!(SlotFill::new("s", 1, 3).status, FillStatus::PartiallyFilled);
        assert_eq!(SlotFill::new("s", 0, 1).status, FillStatus::Unfilled);
    }

    #[test]
    fn test_fill_for_slot() {
        let s = sample_schedule();
        assert_eq!(s.fill_for_slot("s2").unwrap().status, FillStatus::PartiallyFilled);
        assert!(s.fill_for_slot("s9").is_none());
    }

    #[test]
    fn test_empty_schedule() {
        let s = Schedule::new();
        assert!(s.is_empty());
        assert_eq!(s.assignment_count(), 0);
    }
}

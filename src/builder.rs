//! Schedule assembly and coverage statistics.
//!
//! Turns a solver outcome into the `Schedule` aggregate handed back to
//! the caller, computing coverage and load statistics along the way.
//! Before assembling, the builder re-verifies the data model
//! invariants against the snapshot: the solver is supposed to uphold
//! them, so any violation here is an engine bug and fails the run —
//! never silently corrected.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::BuilderInvariantError;
use crate::models::{FillStatus, RequestKind, Schedule, SlotFill};
use crate::snapshot::Snapshot;
use crate::solver::SolverOutcome;

/// Coverage and load statistics of a built schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleStats {
    /// Assigned heads / required heads (1.0 when nothing is required).
    pub coverage_ratio: f64,
    /// Total heads required across all slots.
    pub required_heads: i32,
    /// Total heads assigned.
    pub assigned_heads: i32,
    /// Slots at full headcount.
    pub filled_slots: usize,
    /// Slots with some but not all heads.
    pub partially_filled_slots: usize,
    /// Slots with no assignments.
    pub unfilled_slots: usize,
    /// Mean target load per member (ms).
    pub target_load_ms: i64,
    /// Max minus min assigned load across the roster (ms).
    pub load_spread_ms: i64,
}

/// A verified schedule plus its statistics.
#[derive(Debug, Clone)]
pub struct BuiltSchedule {
    /// The schedule aggregate.
    pub schedule: Schedule,
    /// Coverage and load statistics.
    pub stats: ScheduleStats,
    /// Total reported soft cost.
    pub total_soft_cost: f64,
}

/// Assembles solver output into a `Schedule`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleBuilder;

impl ScheduleBuilder {
    /// Creates a builder.
    pub fn new() -> Self {
        Self
    }

    /// Verifies the outcome against the data model invariants and
    /// assembles the schedule.
    pub fn build(
        &self,
        outcome: &SolverOutcome,
        snapshot: &Snapshot,
    ) -> Result<BuiltSchedule, BuilderInvariantError> {
        self.verify(outcome, snapshot)?;

        let mut assignments = outcome.assignments.clone();
        assignments.sort_by(|a, b| {
            (a.window.start_ms, a.slot_id.as_str(), a.member_id.as_str()).cmp(&(
                b.window.start_ms,
                b.slot_id.as_str(),
                b.member_id.as_str(),
            ))
        });

        let mut member_loads: BTreeMap<String, i64> = BTreeMap::new();
        for a in &assignments {
            *member_loads.entry(a.member_id.clone()).or_insert(0) += a.duration_ms();
        }

        let mut slot_fills = Vec::with_capacity(snapshot.slots().len());
        let mut assigned_heads: i32 = 0;
        let mut required_heads: i32 = 0;
        let mut filled = 0usize;
        let mut partially_filled = 0usize;
        let mut unfilled = 0usize;
        for slot in snapshot.slots() {
            let assigned = assignments.iter().filter(|a| a.slot_id == slot.id).count() as i32;
            let fill = SlotFill::new(slot.id.clone(), assigned, slot.headcount);
            match fill.status {
                FillStatus::Filled => filled += 1,
                FillStatus::PartiallyFilled => partially_filled += 1,
                FillStatus::Unfilled => unfilled += 1,
            }
            assigned_heads += assigned;
            required_heads += slot.headcount;
            slot_fills.push(fill);
        }

        let coverage_ratio = if required_heads == 0 {
            1.0
        } else {
            assigned_heads as f64 / required_heads as f64
        };

        let load_spread_ms = if snapshot.member_count() == 0 {
            0
        } else {
            let loads: Vec<i64> = snapshot
                .members()
                .map(|m| member_loads.get(&m.id).copied().unwrap_or(0))
                .collect();
            let max = loads.iter().max().copied().unwrap_or(0);
            let min = loads.iter().min().copied().unwrap_or(0);
            max - min
        };

        let stats = ScheduleStats {
            coverage_ratio,
            required_heads,
            assigned_heads,
            filled_slots: filled,
            partially_filled_slots: partially_filled,
            unfilled_slots: unfilled,
            target_load_ms: snapshot.target_load_ms(),
            load_spread_ms,
        };

        let schedule = Schedule {
            assignments,
            slot_fills,
            member_loads,
        };

        Ok(BuiltSchedule {
            schedule,
            stats,
            total_soft_cost: outcome.total_soft_cost(),
        })
    }

    /// Defensive re-check of the data model invariants.
    fn verify(
        &self,
        outcome: &SolverOutcome,
        snapshot: &Snapshot,
    ) -> Result<(), BuilderInvariantError> {
        let assignments = &outcome.assignments;

        // Referential integrity
        for a in assignments {
            if snapshot.member(&a.member_id).is_none() {
                return Err(BuilderInvariantError::DanglingReference {
                    id: a.member_id.clone(),
                });
            }
            if snapshot.slot(&a.slot_id).is_none() {
                return Err(BuilderInvariantError::DanglingReference {
                    id: a.slot_id.clone(),
                });
            }
        }

        // No overlapping assignments per member
        for (i, a) in assignments.iter().enumerate() {
            for b in assignments.iter().skip(i + 1) {
                if a.member_id == b.member_id && a.window.overlaps(&b.window) {
                    return Err(BuilderInvariantError::OverlappingAssignments {
                        member_id: a.member_id.clone(),
                    });
                }
            }
        }

        // Availability and mandatory-off
        for a in assignments {
            let unavailable = snapshot
                .availability(&a.member_id)
                .is_some_and(|av| !av.is_available_during(&a.window));
            let forced_off = snapshot.slot(&a.slot_id).is_some_and(|slot| {
                snapshot
                    .requests_for(&a.member_id)
                    .iter()
                    .any(|r| r.kind == RequestKind::MandatoryOff && r.applies_to(slot))
            });
            if unavailable || forced_off {
                return Err(BuilderInvariantError::AssignedWhileUnavailable {
                    member_id: a.member_id.clone(),
                    slot_id: a.slot_id.clone(),
                });
            }
        }

        // Headcount per slot
        for slot in snapshot.slots() {
            let assigned = assignments.iter().filter(|a| a.slot_id == slot.id).count();
            if assigned as i32 > slot.headcount {
                return Err(BuilderInvariantError::HeadcountExceeded {
                    slot_id: slot.id.clone(),
                });
            }
        }

        // Load caps
        for member in snapshot.members() {
            if member.overtime_allowed {
                continue;
            }
            if let Some(cap) = snapshot.effective_max_load_ms(&member.id) {
                let load: i64 = assignments
                    .iter()
                    .filter(|a| a.member_id == member.id)
                    .map(|a| a.duration_ms())
                    .sum();
                if load > cap {
                    return Err(BuilderInvariantError::LoadLimitExceeded {
                        member_id: member.id.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

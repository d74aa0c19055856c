//! Generation orchestration.
//!
//! Runs the fixed phase order of a generation run:
//!
//!   1. Validating — structural checks on the raw request
//!   2. Solving    — backtracking search under the budget
//!   3. Building   — schedule assembly and invariant verification
//!
//! terminating in `Done`, `Rejected` (malformed input), or `Aborted`
//! (budget died with zero progress). The orchestrator has no side
//! effects beyond CPU time: it does not persist the result, and every
//! run owns its snapshot, so concurrent `generate` calls never share
//! mutable state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::builder::{ScheduleBuilder, ScheduleStats};
use crate::constraints::CostWeights;
use crate::error::EngineError;
use crate::models::Schedule;
use crate::snapshot::{GenerationRequest, Snapshot, SolveBudget};
use crate::solver::{AssignmentSolver, SolverOutcome, UnfilledReason, UnfilledSlot};
use crate::validation::validate_request;

/// Phase of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Checking the raw request.
    Validating,
    /// Searching for assignments.
    Solving,
    /// Assembling and verifying the schedule.
    Building,
    /// Finished with a result.
    Done,
    /// Terminated on malformed input.
    Rejected,
    /// Terminated on budget exhaustion with zero progress.
    Aborted,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Solving => "solving",
            Self::Building => "building",
            Self::Done => "done",
            Self::Rejected => "rejected",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Final classification of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationStatus {
    /// Every seat filled.
    Complete,
    /// Some seats filled, the rest recorded with reasons.
    Partial,
    /// No assignment was ever possible for any slot.
    Infeasible,
    /// Malformed input; the run never started.
    Rejected,
    /// Budget died before any progress despite fillable seats.
    Aborted,
    /// The solver violated a data model invariant (engine bug).
    InternalError,
}

/// Result of a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Final status.
    pub status: GenerationStatus,
    /// The schedule, when one was built.
    pub schedule: Option<Schedule>,
    /// Coverage and load statistics, when a schedule was built.
    pub stats: Option<ScheduleStats>,
    /// Slots with open seats and why.
    pub unfilled: Vec<UnfilledSlot>,
    /// Total reported soft cost.
    pub total_soft_cost: f64,
    /// Human-readable run notes.
    pub diagnostics: Vec<String>,
}

impl GenerationResult {
    fn terminal(status: GenerationStatus, diagnostics: Vec<String>) -> Self {
        Self {
            status,
            schedule: None,
            stats: None,
            unfilled: Vec::new(),
            total_soft_cost: 0.0,
            diagnostics,
        }
    }
}

/// The generation engine's entry point.
///
/// Stateless apart from its configuration; one instance may serve any
/// number of concurrent `generate` calls.
///
/// # Example
///
/// ```
/// use rota_engine::models::{Member, ShiftSlot};
/// use rota_engine::orchestrator::{GenerationStatus, ShiftGenerator};
/// use rota_engine::snapshot::GenerationRequest;
///
/// let request = GenerationRequest::new(0, 86_400_000)
///     .with_member(Member::new("m1"))
///     .with_slot(ShiftSlot::new("s1", 0, 28_800_000));
///
/// let result = ShiftGenerator::new().generate(request);
/// assert_eq!(result.status, GenerationStatus::Complete);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShiftGenerator {
    weights: CostWeights,
    budget: SolveBudget,
}

impl ShiftGenerator {
    /// Creates a generator with default weights and budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the soft-cost weights.
    pub fn with_weights(mut self, weights: CostWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the solve budget.
    pub fn with_budget(mut self, budget: SolveBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Runs one generation.
    pub fn generate(&self, request: GenerationRequest) -> GenerationResult {
        let mut state = RunState::Validating;
        let mut diagnostics = Vec::new();

        if let Err(errors) = validate_request(&request) {
            for error in &errors {
                diagnostics.push(error.message.clone());
            }
            advance(&mut state, RunState::Rejected);
            log::warn!("request rejected: {}", EngineError::MalformedInput(errors));
            return GenerationResult::terminal(GenerationStatus::Rejected, diagnostics);
        }

        let snapshot = Snapshot::build(request);
        log::debug!(
            "snapshot: {} members, {} slots, period {} ms",
            snapshot.member_count(),
            snapshot.slots().len(),
            snapshot.period().duration_ms()
        );
        advance(&mut state, RunState::Solving);

        let deadline = self.budget.max_duration.map(|d| Instant::now() + d);
        let solver = AssignmentSolver::new()
            .with_weights(self.weights)
            .with_budget(self.budget);
        let outcome = solver.solve(&snapshot, deadline);

        diagnostics.push(format!("search used {} iteration(s)", outcome.iterations));
        if outcome.budget_exhausted {
            diagnostics.push("search budget exhausted".to_string());
        }

        match classify(&outcome) {
            Classification::Infeasible => {
                advance(&mut state, RunState::Done);
                diagnostics.push("no slot has any eligible member".to_string());
                let mut result =
                    GenerationResult::terminal(GenerationStatus::Infeasible, diagnostics);
                result.unfilled = outcome.unfilled;
                result
            }
            Classification::Aborted => {
                advance(&mut state, RunState::Aborted);
                let mut result =
                    GenerationResult::terminal(GenerationStatus::Aborted, diagnostics);
                result.unfilled = outcome.unfilled;
                result
            }
            Classification::Solved(status) => {
                advance(&mut state, RunState::Building);
                match ScheduleBuilder::new().build(&outcome, &snapshot) {
                    Ok(built) => {
                        advance(&mut state, RunState::Done);
                        GenerationResult {
                            status,
                            schedule: Some(built.schedule),
                            stats: Some(built.stats),
                            unfilled: outcome.unfilled,
                            total_soft_cost: built.total_soft_cost,
                            diagnostics,
                        }
                    }
                    Err(invariant) => {
                        let error = EngineError::from(invariant);
                        log::error!("{error}");
                        diagnostics.push(error.to_string());
                        advance(&mut state, RunState::Done);
                        GenerationResult::terminal(GenerationStatus::InternalError, diagnostics)
                    }
                }
            }
        }
    }
}

enum Classification {
    Solved(GenerationStatus),
    Infeasible,
    Aborted,
}

/// Maps a solver outcome onto the result status.
///
/// Zero assignments with every open seat lacking eligible members is
/// `Infeasible`; zero assignments for any other reason means the
/// budget died before progress (`Aborted`). Anything else built a
/// schedule and is `Complete` or `Partial`.
fn classify(outcome: &SolverOutcome) -> Classification {
    if outcome.unfilled.is_empty() {
        Classification::Solved(GenerationStatus::Complete)
    } else if !outcome.assignments.is_empty() {
        Classification::Solved(GenerationStatus::Partial)
    } else if outcome
        .unfilled
        .iter()
        .all(|u| u.reason == UnfilledReason::NoEligibleMember)
    {
        Classification::Infeasible
    } else {
        Classification::Aborted
    }
}

fn advance(state: &mut RunState, next: RunState) {
    log::debug!("run state: {state} -> {next}");
    *state = next;
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::models::{Availability, Member, ShiftSlot};
    use proptest::prelude::*;

    fn roster_request(
        slots: &[(i64, i64)],
        member_count: usize,
        blocks: &[(i64, i64)],
    ) -> GenerationRequest {
        let mut request = GenerationRequest::new(0, 10_000);
        for i in 0..member_count {
            request = request.with_member(Member::new(format!("m{i}")));
            if let Some(&(start, duration)) = blocks.get(i) {
                request = request.with_availability(
                    Availability::new(format!("m{i}")).with_unavailable(start, start + duration),
                );
            }
        }
        for (i, &(start, duration)) in slots.iter().enumerate() {
            let end = (start + duration).min(10_000);
            request = request.with_slot(ShiftSlot::new(format!("s{i}"), start, end));
        }
        request
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn no_member_holds_overlapping_assignments(
            slots in prop::collection::vec((0i64..9_000, 1i64..1_000), 1..12),
            member_count in 1usize..5,
        ) {
            let result = ShiftGenerator::new()
                .with_budget(SolveBudget::new(2_000))
                .generate(roster_request(&slots, member_count, &[]));
            prop_assert_ne!(result.status, GenerationStatus::Rejected);
            if let Some(schedule) = &result.schedule {
                for (i, a) in schedule.assignments.iter().enumerate() {
                    for b in schedule.assignments.iter().skip(i + 1) {
                        prop_assert!(
                            a.member_id != b.member_id || !a.window.overlaps(&b.window)
                        );
                    }
                }
            }
        }

        #[test]
        fn assignments_respect_unavailability(
            slots in prop::collection::vec((0i64..9_000, 1i64..1_000), 1..10),
            blocks in prop::collection::vec((0i64..9_000, 1i64..1_000), 1..4),
        ) {
            let result = ShiftGenerator::new()
                .with_budget(SolveBudget::new(2_000))
                .generate(roster_request(&slots, blocks.len(), &blocks));
            prop_assert_ne!(result.status, GenerationStatus::Rejected);
            if let Some(schedule) = &result.schedule {
                for a in &schedule.assignments {
                    let idx: usize = a.member_id[1..].parse().unwrap();
                    let (start, duration) = blocks[idx];
                    let blocked = crate::models::TimeWindow::new(start, start + duration);
                    prop_assert!(!a.window.overlaps(&blocked));
                }
            }
        }
    }
}

//! Backtracking assignment search.
//!
//! The search walks one decision frame per seat (a slot requiring
//! headcount N contributes N seats). Each frame's options are the
//! admissible candidates in deterministic order, followed by an
//! implicit "leave the seat open" option, so a dead end never aborts
//! the run. The first zero-skip solution is accepted; otherwise the
//! search keeps exploring for better coverage (then lower cost) until
//! the frame arena or the budget is exhausted.
//!
//! Cancellation is cooperative: the iteration and wall-clock budget
//! are checked once per step, and the best solution found so far is
//! extracted from the frame stack — no unwinding, no preemption.

use std::collections::BTreeMap;
use std::time::Instant;

use crate::constraints::{hard, soft, CostWeights};
use crate::models::Assignment;
use crate::snapshot::{Snapshot, SolveBudget};

use super::{SolverOutcome, UnfilledReason, UnfilledSlot};

/// A ranked candidate within a decision frame.
#[derive(Debug, Clone)]
struct Candidate {
    member_id: String,
    raw: f64,
}

/// One decision frame: who fills one seat.
///
/// `cursor` walks the ordered candidates; one past the end is the
/// skip option, after which the frame is exhausted.
#[derive(Debug)]
struct Frame {
    slot_idx: usize,
    options: Vec<Candidate>,
    cursor: usize,
    chose_assign: bool,
    chose_skip: bool,
}

/// Best full-depth solution seen so far.
struct BestSolution {
    assignments: Vec<Assignment>,
    raw_scores: Vec<f64>,
    skipped_seats: Vec<usize>,
    cost: f64,
}

/// Backtracking solver over a validated snapshot.
#[derive(Debug, Clone, Default)]
pub struct AssignmentSolver {
    weights: CostWeights,
    budget: SolveBudget,
}

impl AssignmentSolver {
    /// Creates a solver with default weights and budget.
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

    /// Runs the search.
    ///
    /// `deadline` is the wall-clock cutoff derived from the budget's
    /// `max_duration`; it is checked at step boundaries only, so the
    /// search always stops between consistent states.
    pub fn solve(&self, snapshot: &Snapshot, deadline: Option<Instant>) -> SolverOutcome {
        let slots = snapshot.slots();

        // Who could take each slot on an empty schedule. Drives the
        // scarcity ordering and the unfilled-reason classification.
        let static_eligible: Vec<usize> = slots
            .iter()
            .map(|slot| {
                snapshot
                    .members()
                    .filter(|m| {
                        let probe =
                            Assignment::new(m.id.clone(), slot.id.clone(), slot.window);
                        hard::check_hard(&probe, &[], snapshot).is_none()
                    })
                    .count()
            })
            .collect();

        // Slot order: scarcity ascending, start ascending, ID ascending.
        let mut slot_order: Vec<usize> = (0..slots.len()).collect();
        slot_order.sort_by(|&a, &b| {
            (static_eligible[a], slots[a].window.start_ms, slots[a].id.as_str()).cmp(&(
                static_eligible[b],
                slots[b].window.start_ms,
                slots[b].id.as_str(),
            ))
        });

        // One seat per required head.
        let seats: Vec<usize> = slot_order
            .iter()
            .flat_map(|&idx| std::iter::repeat(idx).take(slots[idx].headcount.max(0) as usize))
            .collect();

        log::debug!(
            "search: {} slots, {} seats, budget {} iterations",
            slots.len(),
            seats.len(),
            self.budget.max_iterations
        );

        let mut partial: Vec<Assignment> = Vec::new();
        let mut raw_scores: Vec<f64> = Vec::new();
        let mut skipped: Vec<usize> = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut best: Option<BestSolution> = None;
        let mut iterations: u64 = 0;
        let mut budget_exhausted = false;

        if !seats.is_empty() {
            let frame = self.expand(seats[0], &partial, snapshot);
            stack.push(frame);
        }

        while !stack.is_empty() {
            if iterations >= self.budget.max_iterations
                || deadline.is_some_and(|d| Instant::now() >= d)
            {
                budget_exhausted = true;
                break;
            }
            iterations += 1;

            // Advance the top frame: undo its previous choice, take the
            // next one, or pop when exhausted.
            let depth = stack.len() - 1;
            let choice = {
                let frame = &mut stack[depth];
                if frame.chose_assign {
                    partial.pop();
                    raw_scores.pop();
                    frame.chose_assign = false;
                } else if frame.chose_skip {
                    skipped.pop();
                    frame.chose_skip = false;
                }

                if frame.cursor < frame.options.len() {
                    let option = frame.options[frame.cursor].clone();
                    frame.cursor += 1;
                    frame.chose_assign = true;
                    Some(Some((frame.slot_idx, option)))
                } else if frame.cursor == frame.options.len() {
                    frame.cursor += 1;
                    frame.chose_skip = true;
                    skipped.push(depth);
                    Some(None)
                } else {
                    None
                }
            };

            let Some(choice) = choice else {
                stack.pop();
                continue;
            };
            if let Some((slot_idx, option)) = choice {
                let slot = &slots[slot_idx];
                partial.push(Assignment::new(option.member_id, slot.id.clone(), slot.window));
                raw_scores.push(option.raw);
            }

            // A branch already skipping more seats than the best
            // solution cannot improve coverage.
            if best
                .as_ref()
                .is_some_and(|b| skipped.len() > b.skipped_seats.len())
            {
                continue;
            }

            if stack.len() == seats.len() {
                let cost: f64 = raw_scores.iter().map(|r| r.max(0.0)).sum();
                let improves = match &best {
                    None => true,
                    Some(b) => {
                        skipped.len() < b.skipped_seats.len()
                            || (skipped.len() == b.skipped_seats.len() && cost + 1e-9 < b.cost)
                    }
                };
                if improves {
                    best = Some(BestSolution {
                        assignments: partial.clone(),
                        raw_scores: raw_scores.clone(),
                        skipped_seats: skipped.clone(),
                        cost,
                    });
                }
                if skipped.is_empty() {
                    break; // maximal coverage; first complete solution wins
                }
                continue;
            }

            let frame = self.expand(seats[stack.len()], &partial, snapshot);
            stack.push(frame);
        }

        // Prefer the best full-depth solution; fall back to the current
        // prefix when the budget died before one was recorded (or with
        // deeper coverage than any recorded solution).
        let (assignments, raw_scores, skipped_seats, explored) = match best {
            Some(b) if partial.len() <= b.assignments.len() => {
                (b.assignments, b.raw_scores, b.skipped_seats, seats.len())
            }
            _ => {
                let explored = partial.len() + skipped.len();
                (partial, raw_scores, skipped, explored)
            }
        };

        // Aggregate open seats per slot, snapshot slot order.
        let mut open_by_slot: BTreeMap<usize, (i32, bool)> = BTreeMap::new();
        for &seat in &skipped_seats {
            let entry = open_by_slot.entry(seats[seat]).or_insert((0, false));
            entry.0 += 1;
        }
        for &slot_idx in seats.iter().skip(explored) {
            let entry = open_by_slot.entry(slot_idx).or_insert((0, false));
            entry.0 += 1;
            entry.1 = true;
        }

        let unfilled: Vec<UnfilledSlot> = open_by_slot
            .into_iter()
            .map(|(slot_idx, (missing, hit_budget))| {
                let slot = &slots[slot_idx];
                let reason = if static_eligible[slot_idx] < slot.headcount.max(0) as usize {
                    UnfilledReason::NoEligibleMember
                } else if hit_budget {
                    UnfilledReason::BudgetExceeded
                } else {
                    UnfilledReason::HardConflict
                };
                UnfilledSlot {
                    slot_id: slot.id.clone(),
                    missing,
                    reason,
                }
            })
            .collect();

        log::debug!(
            "search done: {} assignments, {} unfilled slots, {} iterations{}",
            assignments.len(),
            unfilled.len(),
            iterations,
            if budget_exhausted { " (budget exhausted)" } else { "" }
        );

        SolverOutcome {
            assignments,
            raw_scores,
            unfilled,
            iterations,
            budget_exhausted,
        }
    }

    /// Builds the frame for a seat: admissible candidates against the
    /// current partial schedule, ordered by raw score then member ID.
    fn expand(&self, slot_idx: usize, partial: &[Assignment], snapshot: &Snapshot) -> Frame {
        let slot = &snapshot.slots()[slot_idx];
        let mut options: Vec<Candidate> = Vec::new();
        for member in snapshot.members() {
            let probe = Assignment::new(member.id.clone(), slot.id.clone(), slot.window);
            if let Some(violation) = hard::check_hard(&probe, partial, snapshot) {
                log::trace!("reject {} for {}: {}", member.id, slot.id, violation);
                continue;
            }
            let raw = soft::raw_score(&probe, partial, snapshot, &self.weights);
            options.push(Candidate {
                member_id: member.id.clone(),
                raw,
            });
        }
        options.sort_by(|a, b| {
            a.raw
                .partial_cmp(&b.raw)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.member_id.cmp(&b.member_id))
        });
        Frame {
            slot_idx,
            options,
            cursor: 0,
            chose_assign: false,
            chose_skip: false,
        }
    }
}

//! Workforce shift-scheduling engine.
//!
//! Takes a roster of members, their declared availability, and explicit
//! shift requests, and produces a conflict-free assignment of members
//! to shift slots. The engine is a pure library: it owns no storage,
//! performs no I/O beyond logging, and is invoked synchronously per
//! generation request — callers persist the returned schedule.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Member`, `Availability`, `ShiftSlot`,
//!   `ShiftRequest`, `Assignment`, `Schedule`
//! - **`validation`**: Structural input checks (duplicate IDs, inverted
//!   intervals, dangling references)
//! - **`snapshot`**: The immutable indexed input view and solve budget
//! - **`constraints`**: Hard admissibility rules and the weighted
//!   soft-cost policy
//! - **`solver`**: Backtracking search over an explicit decision-frame
//!   stack
//! - **`builder`**: Schedule assembly, statistics, and defensive
//!   invariant verification
//! - **`orchestrator`**: The `generate` entry point and result types
//!
//! # Concurrency
//!
//! Runs are independent: inputs are immutable, outputs freshly
//! allocated, and no state is shared between `generate` calls, so any
//! number may execute in parallel. Within a run the search is
//! single-threaded and cooperative — budgets are checked at step
//! boundaries, never by preemption.
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review"
//! - Van den Bergh et al. (2013), "Personnel scheduling: A literature review"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod builder;
pub mod constraints;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod snapshot;
pub mod solver;
pub mod validation;

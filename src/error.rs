//! Engine error taxonomy.
//!
//! Two failure classes exist: malformed input (the run never starts)
//! and builder invariant violations (an internal solver bug, always
//! fatal). Budget exhaustion is not an error — it is a first-class
//! result state (`Partial` or `Aborted`).

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors surfaced by the generation engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Structural problems in the input snapshot. Surfaced to the
    /// caller as status `Rejected`; the run never starts.
    #[error("malformed input: {} problem(s) found", .0.len())]
    MalformedInput(Vec<ValidationError>),

    /// The solver produced output that violates a data model
    /// invariant. Indicates an engine bug, surfaced as status
    /// `InternalError`, distinct from user-facing `Infeasible`.
    #[error("builder invariant violated: {0}")]
    Invariant(#[from] BuilderInvariantError),
}

/// A data model invariant violated by solver output.
///
/// Detected by the schedule builder's defensive re-check. Never
/// silently corrected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderInvariantError {
    /// A member holds two assignments with overlapping windows.
    #[error("member '{member_id}' holds overlapping assignments")]
    OverlappingAssignments { member_id: String },

    /// An assignment contradicts the member's declared unavailability
    /// or a mandatory-off request.
    #[error("member '{member_id}' assigned to slot '{slot_id}' while unavailable")]
    AssignedWhileUnavailable { member_id: String, slot_id: String },

    /// A slot holds more assignments than its required headcount.
    #[error("slot '{slot_id}' assigned beyond its headcount")]
    HeadcountExceeded { slot_id: String },

    /// An assignment references a member or slot absent from the
    /// input snapshot.
    #[error("assignment references unknown entity '{id}'")]
    DanglingReference { id: String },

    /// A member's load exceeds their cap without an overtime flag.
    #[error("member '{member_id}' load exceeds the period cap")]
    LoadLimitExceeded { member_id: String },
}

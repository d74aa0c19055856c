//! Shift-scheduling domain models.
//!
//! Provides the core data types for representing a generation run:
//! who can work (`Member`, `Availability`), what must be filled
//! (`ShiftSlot`), what people asked for (`ShiftRequest`), and what the
//! engine produced (`Schedule`, `Assignment`).
//!
//! All entities are constructed from the input snapshot at the start of
//! a run and are immutable during solving; the solver only produces new
//! `Assignment` records.

mod availability;
mod member;
mod request;
mod schedule;
mod slot;

pub use availability::{Availability, TimeWindow};
pub use member::Member;
pub use request::{RequestKind, RequestTarget, ShiftRequest};
pub use schedule::{Assignment, FillStatus, Schedule, SlotFill};
pub use slot::{ShiftSlot, TagQuota};

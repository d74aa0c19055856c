//! Shift request model.
//!
//! A request expresses a member's wish toward a specific slot or a time
//! range: preferring it, avoiding it, or declaring it off-limits. The
//! request kind is a closed enum so constraint evaluation can match
//! exhaustively.

use serde::{Deserialize, Serialize};

use super::{ShiftSlot, TimeWindow};

/// What the member is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    /// The member would like to work the target.
    Prefer,
    /// The member would rather not work the target (soft).
    Avoid,
    /// The member must not work the target (hard).
    MandatoryOff,
}

/// What the request points at: a specific slot or a time range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestTarget {
    /// A specific slot by ID.
    Slot(String),
    /// A time range.
    Window(TimeWindow),
}

/// A member's wish toward a slot or a time range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftRequest {
    /// Member this request belongs to (lookup reference, not ownership).
    pub member_id: String,
    /// The slot or time range the request points at.
    pub target: RequestTarget,
    /// The request kind.
    pub kind: RequestKind,
    /// Priority weight (>= 0, 1.0 = baseline). Scales the soft cost of
    /// honoring or violating the request; irrelevant for `MandatoryOff`.
    pub weight: f64,
}

impl ShiftRequest {
    /// Creates a "prefer" request for a specific slot.
    pub fn prefer_slot(member_id: impl Into<String>, slot_id: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            target: RequestTarget::Slot(slot_id.into()),
            kind: RequestKind::Prefer,
            weight: 1.0,
        }
    }

    /// Creates an "avoid" request for a specific slot.
    pub fn avoid_slot(member_id: impl Into<String>, slot_id: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            target: RequestTarget::Slot(slot_id.into()),
            kind: RequestKind::Avoid,
            weight: 1.0,
        }
    }

    /// Creates a "mandatory off" request for a time range.
    pub fn mandatory_off(member_id: impl Into<String>, start_ms: i64, end_ms: i64) -> Self {
        Self {
            member_id: member_id.into(),
            target: RequestTarget::Window(TimeWindow::new(start_ms, end_ms)),
            kind: RequestKind::MandatoryOff,
            weight: 1.0,
        }
    }

    /// Creates a request of the given kind for a time range.
    pub fn for_window(
        member_id: impl Into<String>,
        kind: RequestKind,
        start_ms: i64,
        end_ms: i64,
    ) -> Self {
        Self {
            member_id: member_id.into(),
            target: RequestTarget::Window(TimeWindow::new(start_ms, end_ms)),
            kind,
            weight: 1.0,
        }
    }

    /// Sets the priority weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Whether this request applies to the given slot.
    ///
    /// Slot-targeted requests match by ID. Window-targeted requests
    /// match by kind: `Prefer` requires the window to cover the whole
    /// slot (a member only prefers shifts they can attend in full),
    /// while `Avoid` and `MandatoryOff` trigger on any overlap.
    pub fn applies_to(&self, slot: &ShiftSlot) -> bool {
        match &self.target {
            RequestTarget::Slot(id) => *id == slot.id,
            RequestTarget::Window(w) => match self.kind {
                RequestKind::Prefer => w.covers(&slot.window),
                RequestKind::Avoid | RequestKind::MandatoryOff => w.overlaps(&slot.window),
            },
        }
    }
}

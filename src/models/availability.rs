//! Time windows and member availability.
//!
//! Defines when a member can be rostered: positive availability windows
//! and negative unavailable periods (leave, blocked days).
//!
//! # Time Model
//! All times are in milliseconds relative to a scheduling epoch.
//! The consumer defines what epoch means (e.g., start of the roster period).
//!
//! # Precedence
//! Unavailable periods override availability windows. A shift window is
//! workable iff:
//! - It is fully covered by the `available` windows (or none are declared), AND
//! - It does NOT overlap any `unavailable` entry.

use serde::{Deserialize, Serialize};

/// A time interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    /// Interval start (ms, inclusive).
    pub start_ms: i64,
    /// Interval end (ms, exclusive).
    pub end_ms: i64,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Duration of this window (ms).
    #[inline]
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    /// Whether a timestamp falls within this window.
    #[inline]
    pub fn contains(&self, time_ms: i64) -> bool {
        time_ms >= self.start_ms && time_ms < self.end_ms
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_ms < other.end_ms && other.start_ms < self.end_ms
    }

    /// Whether this window fully covers another.
    pub fn covers(&self, other: &Self) -> bool {
        self.start_ms <= other.start_ms && other.end_ms <= self.end_ms
    }

    /// Gap between two disjoint windows (ms).
    ///
    /// Returns `None` if the windows overlap. Adjacent windows have gap 0.
    pub fn gap_to(&self, other: &Self) -> Option<i64> {
        if self.overlaps(other) {
            return None;
        }
        if self.end_ms <= other.start_ms {
            Some(other.start_ms - self.end_ms)
        } else {
            Some(self.start_ms - other.end_ms)
        }
    }
}

/// A member's declared availability for the roster period.
///
/// Combines positive availability windows with overriding unavailable
/// periods. If no `available` windows are declared, the member is
/// available whenever not blocked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    /// Member this record belongs to (lookup reference, not ownership).
    pub member_id: String,
    /// Periods the member declared workable.
    /// Empty = available at any time.
    pub available: Vec<TimeWindow>,
    /// Periods the member cannot work (overrides `available`).
    pub unavailable: Vec<TimeWindow>,
    /// Per-period load cap override (ms). Replaces the member's
    /// `max_load_ms` for this generation run when present.
    pub max_load_override_ms: Option<i64>,
}

impl Availability {
    /// Creates an empty record (no constraints = always available).
    pub fn new(member_id: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            available: Vec::new(),
            unavailable: Vec::new(),
            max_load_override_ms: None,
        }
    }

    /// Adds an availability window.
    pub fn with_available(mut self, start_ms: i64, end_ms: i64) -> Self {
        self.available.push(TimeWindow::new(start_ms, end_ms));
        self
    }

    /// Adds an unavailable period.
    pub fn with_unavailable(mut self, start_ms: i64, end_ms: i64) -> Self {
        self.unavailable.push(TimeWindow::new(start_ms, end_ms));
        self
    }

    /// Sets the per-period load cap override.
    pub fn with_load_override(mut self, max_load_ms: i64) -> Self {
        self.max_load_override_ms = Some(max_load_ms);
        self
    }

    /// Whether a timestamp is workable.
    pub fn is_available_at(&self, time_ms: i64) -> bool {
        if self.unavailable.iter().any(|w| w.contains(time_ms)) {
            return false;
        }
        if self.available.is_empty() {
            return true;
        }
        self.available.iter().any(|w| w.contains(time_ms))
    }

    /// Whether an entire window is workable.
    ///
    /// The window must not overlap any unavailable period and, when
    /// availability windows are declared, must be fully covered by one
    /// of them. Coverage by a single window is required: split
    /// availability across two touching windows does not admit a shift
    /// spanning the seam.
    pub fn is_available_during(&self, window: &TimeWindow) -> bool {
        if self.unavailable.iter().any(|w| w.overlaps(window)) {
            return false;
        }
        if self.available.is_empty() {
            return true;
        }
        self.available.iter().any(|w| w.covers(window))
    }

    /// Whether any unavailable period overlaps the window.
    pub fn is_blocked_during(&self, window: &TimeWindow) -> bool {
        self.unavailable.iter().any(|w| w.overlaps(window))
    }
}

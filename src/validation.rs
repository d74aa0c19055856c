//! Input validation for generation requests.
//!
//! Checks structural integrity of the snapshot before a run starts.
//! Detects:
//! - Inverted or empty time intervals
//! - Slot headcount or tag quota below 1
//! - Duplicate IDs
//! - References to unknown members or slots
//! - Invalid weights
//! - Slots outside the roster period
//!
//! A non-empty error list means the run is rejected; the solver never
//! sees a malformed snapshot.

use std::collections::HashSet;

use crate::models::{RequestTarget, TimeWindow};
use crate::snapshot::GenerationRequest;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// An interval's end does not follow its start.
    InvalidInterval,
    /// A slot's required headcount is below 1.
    InvalidHeadcount,
    /// A tag quota's minimum count is below 1.
    InvalidQuota,
    /// Two entities share the same ID.
    DuplicateId,
    /// A record references a member that doesn't exist.
    UnknownMember,
    /// A request references a slot that doesn't exist.
    UnknownSlot,
    /// A weight is negative or not finite.
    InvalidWeight,
    /// A slot's window falls outside the roster period.
    OutsidePeriod,
    /// A member has more than one availability record.
    DuplicateAvailability,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn check_interval(errors: &mut Vec<ValidationError>, window: &TimeWindow, what: &str) {
    if window.end_ms <= window.start_ms {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidInterval,
            format!("{what} has end {} <= start {}", window.end_ms, window.start_ms),
        ));
    }
}

/// Validates a generation request.
///
/// Collects **all** detected problems rather than stopping at the
/// first, so the caller can report them together.
pub fn validate_request(request: &GenerationRequest) -> ValidationResult {
    let mut errors = Vec::new();

    check_interval(&mut errors, &request.period, "roster period");

    // Member IDs and weights
    let mut member_ids = HashSet::new();
    for m in &request.members {
        if !member_ids.insert(m.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate member ID: {}", m.id),
            ));
        }
        if !m.weight.is_finite() || m.weight < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWeight,
                format!("member '{}' has invalid weight {}", m.id, m.weight),
            ));
        }
    }

    // Slot IDs, intervals, headcounts, quotas, period containment
    let mut slot_ids = HashSet::new();
    for s in &request.slots {
        if !slot_ids.insert(s.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate slot ID: {}", s.id),
            ));
        }
        check_interval(&mut errors, &s.window, &format!("slot '{}'", s.id));
        if s.headcount < 1 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidHeadcount,
                format!("slot '{}' has headcount {}", s.id, s.headcount),
            ));
        }
        for q in &s.tag_quotas {
            if q.min_count < 1 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidQuota,
                    format!("slot '{}' quota on '{}' has min_count {}", s.id, q.tag, q.min_count),
                ));
            }
        }
        if s.window.end_ms > s.window.start_ms && !request.period.covers(&s.window) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutsidePeriod,
                format!("slot '{}' falls outside the roster period", s.id),
            ));
        }
    }

    // Availability: member references, intervals, one record per member
    let mut availability_members = HashSet::new();
    for a in &request.availabilities {
        if !member_ids.contains(a.member_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownMember,
                format!("availability references unknown member '{}'", a.member_id),
            ));
        }
        if !availability_members.insert(a.member_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateAvailability,
                format!("member '{}' has more than one availability record", a.member_id),
            ));
        }
        for w in a.available.iter().chain(a.unavailable.iter()) {
            check_interval(
                &mut errors,
                w,
                &format!("availability window of member '{}'", a.member_id),
            );
        }
    }

    // Requests: member/slot references, intervals, weights
    for r in &request.requests {
        if !member_ids.contains(r.member_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownMember,
                format!("request references unknown member '{}'", r.member_id),
            ));
        }
        match &r.target {
            RequestTarget::Slot(slot_id) => {
                if !slot_ids.contains(slot_id.as_str()) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownSlot,
                        format!("request references unknown slot '{slot_id}'"),
                    ));
                }
            }
            RequestTarget::Window(w) => {
                check_interval(
                    &mut errors,
                    w,
                    &format!("request window of member '{}'", r.member_id),
                );
            }
        }
        if !r.weight.is_finite() || r.weight < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWeight,
                format!("request of member '{}' has invalid weight {}", r.member_id, r.weight),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Availability, Member, ShiftRequest, ShiftSlot};

    fn valid_request() -> GenerationRequest {
        GenerationRequest::new(0, 100_000)
            .with_member(Member::new("m1").with_role("cashier"))
            .with_member(Member::new("m2"))
            .with_availability(Availability::new("m1").with_available(0, 100_000))
            .with_slot(ShiftSlot::new("s1", 0, 10_000).with_role("cashier"))
            .with_request(ShiftRequest::prefer_slot("m1", "s1"))
    }

    fn kinds(request: &GenerationRequest) -> Vec<ValidationErrorKind> {
        validate_request(request)
            .unwrap_err()
            .into_iter()
            .map(|e| e.kind)
            .collect()
    }

    #[test]
    fn test_valid_request() {
        assert!(validate_request(&valid_request()).is_ok());
    }

    #[test]
    fn test_inverted_period() {
        let request = GenerationRequest::new(100, 0);
        assert!(kinds(&request).contains(&ValidationErrorKind::InvalidInterval));
    }

    #[test]
    fn test_duplicate_member_id() {
        let request = valid_request().with_member(Member::new("m1"));
        assert!(kinds(&request).contains(&ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_duplicate_slot_id() {
        let request = valid_request().with_slot(ShiftSlot::new("s1", 0, 5_000));
        assert!(kinds(&request).contains(&ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_inverted_slot_window() {
        let request = valid_request().with_slot(ShiftSlot::new("s2", 5_000, 5_000));
        assert!(kinds(&request).contains(&ValidationErrorKind::InvalidInterval));
    }

    #[test]
    fn test_headcount_below_one() {
        let request = valid_request().with_slot(ShiftSlot::new("s2", 0, 5_000).with_headcount(0));
        assert!(kinds(&request).contains(&ValidationErrorKind::InvalidHeadcount));
    }

    #[test]
    fn test_quota_below_one() {
        let request =
            valid_request().with_slot(ShiftSlot::new("s2", 0, 5_000).with_tag_quota("committee", 0));
        assert!(kinds(&request).contains(&ValidationErrorKind::InvalidQuota));
    }

    #[test]
    fn test_unknown_member_in_availability() {
        let request = valid_request().with_availability(Availability::new("ghost"));
        assert!(kinds(&request).contains(&ValidationErrorKind::UnknownMember));
    }

    #[test]
    fn test_duplicate_availability() {
        let request = valid_request().with_availability(Availability::new("m1"));
        assert!(kinds(&request).contains(&ValidationErrorKind::DuplicateAvailability));
    }

    #[test]
    fn test_unknown_member_in_request() {
        let request = valid_request().with_request(ShiftRequest::prefer_slot("ghost", "s1"));
        assert!(kinds(&request).contains(&ValidationErrorKind::UnknownMember));
    }

    #[test]
    fn test_unknown_slot_in_request() {
        let request = valid_request().with_request(ShiftRequest::prefer_slot("m1", "nope"));
        assert!(kinds(&request).contains(&ValidationErrorKind::UnknownSlot));
    }

    #[test]
    fn test_negative_request_weight() {
        let request =
            valid_request().with_request(ShiftRequest::avoid_slot("m1", "s1").with_weight(-1.0));
        assert!(kinds(&request).contains(&ValidationErrorKind::InvalidWeight));
    }

    #[test]
    fn test_slot_outside_period() {
        let request = valid_request().with_slot(ShiftSlot::new("s2", 90_000, 110_000));
        assert!(kinds(&request).contains(&ValidationErrorKind::OutsidePeriod));
    }

    #[test]
    fn test_multiple_errors_collected() {
        let request = GenerationRequest::new(0, 100_000)
            .with_member(Member::new("m1"))
            .with_member(Member::new("m1"))
            .with_slot(ShiftSlot::new("s1", 10, 5).with_headcount(0));

        let errors = validate_request(&request).unwrap_err();
        assert!(errors.len() >= 3);
    }
}

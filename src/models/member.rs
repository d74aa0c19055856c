//! Member (roster participant) model.
//!
//! A member is a person who can be assigned to shift slots. Each member
//! carries role tags, a load cap for the roster period, and a fairness
//! weight.
//!
//! # Reference
//! Ernst et al. (2004), "Staff scheduling and rostering: A review of
//! applications, methods and models"

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A member who can be assigned to shift slots.
///
/// Immutable during a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Unique member identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Role/skill tags (e.g., "cashier", "committee").
    /// Matched against `ShiftSlot::required_role` and tag quotas.
    pub roles: Vec<String>,
    /// Maximum total assigned time per roster period (ms).
    /// `None` = no cap.
    pub max_load_ms: Option<i64>,
    /// Whether assignments may exceed `max_load_ms`.
    pub overtime_allowed: bool,
    /// Fairness/seniority weight (1.0 = baseline).
    pub weight: f64,
    /// Minimum gap between two of this member's assignments (ms).
    /// 0 = only overlap is forbidden.
    pub min_rest_ms: i64,
    /// Domain-specific key-value metadata.
    pub attributes: HashMap<String, String>,
}

impl Member {
    /// Creates a new member with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            roles: Vec::new(),
            max_load_ms: None,
            overtime_allowed: false,
            weight: 1.0,
            min_rest_ms: 0,
            attributes: HashMap::new(),
        }
    }

    /// Sets the member name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a role tag.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Sets the load cap for the roster period.
    pub fn with_max_load(mut self, max_load_ms: i64) -> Self {
        self.max_load_ms = Some(max_load_ms);
        self
    }

    /// Allows assignments beyond the load cap.
    pub fn with_overtime(mut self) -> Self {
        self.overtime_allowed = true;
        self
    }

    /// Sets the fairness weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the minimum rest gap between assignments.
    pub fn with_min_rest(mut self, min_rest_ms: i64) -> Self {
        self.min_rest_ms = min_rest_ms;
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Whether this member carries a given role tag.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_builder() {
        let m = Member::new("m1")
            .with_name("Alex Kim")
            .with_role("cashier")
            .with_role("committee")
            .with_max_load(40 * 3_600_000)
            .with_weight(1.5)
            .with_min_rest(8 * 3_600_000)
            .with_attribute("team", "front");

        assert_eq!(m.id, "m1");
        assert_eq!(m.name, "Alex Kim");
        assert!(m.has_role("cashier"));
        assert!(m.has_role("committee"));
        assert!(!m.has_role("barista"));
        assert_eq!(m.max_load_ms, Some(144_000_000));
        assert!(!m.overtime_allowed);
        assert!((m.weight - 1.5).abs() < 1e-10);
        assert_eq!(m.min_rest_ms, 28_800_000);
        assert_eq!(m.attributes.get("team"), Some(&"front".to_string()));
    }

    #[test]
    fn test_member_defaults() {
        let m = Member::new("m2");
        assert_eq!(m.max_load_ms, None);
        assert!(!m.overtime_allowed);
        assert!((m.weight - 1.0).abs() < 1e-10);
        assert_eq!(m.min_rest_ms, 0);
        assert!(m.roles.is_empty());
    }

    #[test]
    fn test_overtime_flag() {
        let m = Member::new("m3").with_max_load(1000).with_overtime();
        assert!(m.overtime_allowed);
    }
}

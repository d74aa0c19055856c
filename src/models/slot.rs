//! Shift slot model.
//!
//! A slot is the unit to be filled: a time-bound, role-tagged piece of
//! work requiring a fixed headcount. Slots may additionally demand
//! minimum counts of member tags (e.g., at least one committee member
//! on every slot).
//!
//! # Reference
//! Van den Bergh et al. (2013), "Personnel scheduling: A literature review"

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::TimeWindow;

/// A shift slot to be filled with members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftSlot {
    /// Unique slot identifier.
    pub id: String,
    /// The time interval this slot covers.
    pub window: TimeWindow,
    /// Role tag a member must carry to fill this slot.
    /// Empty = no role restriction.
    pub required_role: String,
    /// Number of members required (>= 1).
    pub headcount: i32,
    /// Minimum tag counts across the slot's assigned members.
    pub tag_quotas: Vec<TagQuota>,
    /// Domain-specific key-value metadata.
    pub attributes: HashMap<String, String>,
}

/// A minimum count of a member tag among a slot's assignments.
///
/// Tags are matched against `Member::roles`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagQuota {
    /// Required tag (e.g., "committee").
    pub tag: String,
    /// Minimum number of assigned members carrying the tag.
    pub min_count: i32,
}

impl ShiftSlot {
    /// Creates a new slot with headcount 1 and no role restriction.
    pub fn new(id: impl Into<String>, start_ms: i64, end_ms: i64) -> Self {
        Self {
            id: id.into(),
            window: TimeWindow::new(start_ms, end_ms),
            required_role: String::new(),
            headcount: 1,
            tag_quotas: Vec::new(),
            attributes: HashMap::new(),
        }
    }

    /// Sets the required role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.required_role = role.into();
        self
    }

    /// Sets the required headcount.
    pub fn with_headcount(mut self, headcount: i32) -> Self {
        self.headcount = headcount;
        self
    }

    /// Adds a tag quota.
    pub fn with_tag_quota(mut self, tag: impl Into<String>, min_count: i32) -> Self {
        self.tag_quotas.push(TagQuota {
            tag: tag.into(),
            min_count,
        });
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Duration of this slot (ms).
    #[inline]
    pub fn duration_ms(&self) -> i64 {
        self.window.duration_ms()
    }

    /// Total headcount-milliseconds this slot demands.
    pub fn demand_ms(&self) -> i64 {
        self.duration_ms() * self.headcount as i64
    }

    /// Whether this slot restricts the roles of its members.
    pub fn requires_role(&self) -> bool {
        !self.required_role.is_empty()
    }
}

impl TagQuota {
    /// Creates a new tag quota.
    pub fn new(tag: impl Into<String>, min_count: i32) -> Self {
        Self {
            tag: tag.into(),
            min_count,
        }
    }
}

//! Generation input: raw request, solve budget, and the indexed snapshot.
//!
//! `GenerationRequest` is the boundary type supplied by the calling
//! layer. After validation it is indexed into a `Snapshot`: an
//! immutable view with by-ID lookups that are infallible by
//! construction. Each `generate` call owns its snapshot; there is no
//! process-wide registry of members or slots.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::models::{Availability, Member, ShiftRequest, ShiftSlot, TimeWindow};

/// Input container for a generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Roster members.
    pub members: Vec<Member>,
    /// Declared availability, at most one record per member.
    /// Members without a record are always available.
    pub availabilities: Vec<Availability>,
    /// Slots to fill.
    pub slots: Vec<ShiftSlot>,
    /// Member wishes.
    pub requests: Vec<ShiftRequest>,
    /// The roster period. Every slot must fall within it.
    pub period: TimeWindow,
}

impl GenerationRequest {
    /// Creates an empty request for the given period.
    pub fn new(period_start_ms: i64, period_end_ms: i64) -> Self {
        Self {
            period: TimeWindow::new(period_start_ms, period_end_ms),
            ..Self::default()
        }
    }

    /// Adds a member.
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// Adds an availability record.
    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availabilities.push(availability);
        self
    }

    /// Adds a slot.
    pub fn with_slot(mut self, slot: ShiftSlot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Adds a shift request.
    pub fn with_request(mut self, request: ShiftRequest) -> Self {
        self.requests.push(request);
        self
    }
}

/// Iteration and wall-clock budget for one solve.
///
/// The iteration budget is the reproducibility anchor: identical
/// snapshot and iteration budget yield an identical schedule. The
/// wall-clock limit is checked cooperatively at search step boundaries
/// and only ever truncates the search earlier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolveBudget {
    /// Maximum search steps.
    pub max_iterations: u64,
    /// Optional wall-clock limit.
    pub max_duration: Option<Duration>,
}

impl SolveBudget {
    /// Default iteration cap.
    pub const DEFAULT_MAX_ITERATIONS: u64 = 200_000;

    /// Creates a budget with the given iteration cap.
    pub fn new(max_iterations: u64) -> Self {
        Self {
            max_iterations,
            max_duration: None,
        }
    }

    /// Sets the wall-clock limit.
    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = Some(max_duration);
        self
    }
}

impl Default for SolveBudget {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ITERATIONS)
    }
}

/// Immutable indexed view of a validated request.
///
/// Lookups by ID are infallible for entities that passed validation.
/// Member iteration order is ID-ascending (`BTreeMap`), which is part
/// of the engine's determinism contract.
#[derive(Debug, Clone)]
pub struct Snapshot {
    members: BTreeMap<String, Member>,
    availability_by_member: HashMap<String, Availability>,
    requests_by_member: HashMap<String, Vec<ShiftRequest>>,
    slots: Vec<ShiftSlot>,
    slot_index: HashMap<String, usize>,
    period: TimeWindow,
    target_load_ms: i64,
}

impl Snapshot {
    /// Indexes a validated request.
    ///
    /// Must only be called after `validation::validate_request`
    /// succeeded; duplicate or dangling IDs would be silently collapsed
    /// here.
    pub fn build(request: GenerationRequest) -> Self {
        let member_count = request.members.len();
        let members: BTreeMap<String, Member> = request
            .members
            .into_iter()
            .map(|m| (m.id.clone(), m))
            .collect();

        let availability_by_member: HashMap<String, Availability> = request
            .availabilities
            .into_iter()
            .map(|a| (a.member_id.clone(), a))
            .collect();

        let mut requests_by_member: HashMap<String, Vec<ShiftRequest>> = HashMap::new();
        for r in request.requests {
            requests_by_member
                .entry(r.member_id.clone())
                .or_default()
                .push(r);
        }

        let slot_index: HashMap<String, usize> = request
            .slots
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();

        let total_demand_ms: i64 = request.slots.iter().map(|s| s.demand_ms()).sum();
        let target_load_ms = if member_count == 0 {
            0
        } else {
            total_demand_ms / member_count as i64
        };

        Self {
            members,
            availability_by_member,
            requests_by_member,
            slots: request.slots,
            slot_index,
            period: request.period,
            target_load_ms,
        }
    }

    /// Members, ID-ascending.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Number of members.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Looks up a member by ID.
    pub fn member(&self, member_id: &str) -> Option<&Member> {
        self.members.get(member_id)
    }

    /// The member's availability record, if declared.
    pub fn availability(&self, member_id: &str) -> Option<&Availability> {
        self.availability_by_member.get(member_id)
    }

    /// The member's requests (empty slice if none).
    pub fn requests_for(&self, member_id: &str) -> &[ShiftRequest] {
        self.requests_by_member
            .get(member_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Slots in input order.
    pub fn slots(&self) -> &[ShiftSlot] {
        &self.slots
    }

    /// Looks up a slot by ID.
    pub fn slot(&self, slot_id: &str) -> Option<&ShiftSlot> {
        self.slot_index.get(slot_id).map(|&i| &self.slots[i])
    }

    /// The roster period.
    pub fn period(&self) -> &TimeWindow {
        &self.period
    }

    /// Mean target load per member (ms): total demanded
    /// headcount-milliseconds divided by member count. The fairness
    /// baseline for soft-cost evaluation.
    pub fn target_load_ms(&self) -> i64 {
        self.target_load_ms
    }

    /// Effective load cap for a member (ms): the availability override
    /// when present, else the member's own cap. `None` = uncapped.
    pub fn effective_max_load_ms(&self, member_id: &str) -> Option<i64> {
        if let Some(av) = self.availability(member_id) {
            if av.max_load_override_ms.is_some() {
                return av.max_load_override_ms;
            }
        }
        self.member(member_id).and_then(|m| m.max_load_ms)
    }
}

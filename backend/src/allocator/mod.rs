//! Courtroom allocation
//!
//! Assigns the day's prioritized cases to courtrooms under per-room daily
//! capacity, balancing cumulative load across rooms over the life of the
//! run (LOAD_BALANCED strategy): each case goes to the room with the
//! lowest cumulative assignment count among rooms with remaining
//! capacity, ties broken by room id ascending.
//!
//! Guarantees:
//! - no case is assigned to more than one courtroom per day
//! - no courtroom exceeds its effective daily capacity
//! - assignment is deterministic given the same case ordering
//!
//! The allocator also keeps the run's fairness statistics: per-room
//! totals and daily averages, a Gini coefficient over per-room loads, the
//! count of cases whose room differs from their previous assignment
//! (continuity), and the cumulative capacity-rejection count.

use crate::core::calendar::CourtCalendar;
use crate::models::Courtroom;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One day's case → courtroom assignment.
///
/// Ephemeral: produced by the allocator and consumed once by the day's
/// outcome-sampling pass. Iteration is room-id-ordered and, within a
/// room, priority-ordered — outcome sampling walks it in exactly this
/// order so random draws stay aligned between runs.
#[derive(Debug, Clone, Default)]
pub struct DailyAllocation {
    /// (room id, case ids in assignment order), sorted by room id
    by_room: Vec<(String, Vec<String>)>,
}

impl DailyAllocation {
    /// Rooms in id order with their assigned case ids.
    pub fn by_room(&self) -> &[(String, Vec<String>)] {
        &self.by_room
    }

    /// Room assigned to a case, if any.
    pub fn room_for(&self, case_id: &str) -> Option<&str> {
        self.by_room
            .iter()
            .find(|(_, cases)| cases.iter().any(|c| c == case_id))
            .map(|(room, _)| room.as_str())
    }

    /// Total cases assigned today.
    pub fn num_assigned(&self) -> usize {
        self.by_room.iter().map(|(_, cases)| cases.len()).sum()
    }
}

/// Cumulative allocator statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatorStats {
    /// Cases assigned per room over the run
    pub per_room_totals: BTreeMap<String, u64>,

    /// Average cases per room per allocation day
    pub per_room_daily_average: BTreeMap<String, f64>,

    /// Gini coefficient over per-room loads (0 = perfectly balanced)
    pub load_gini: f64,

    /// Cases whose assigned room differs from their previous assignment
    pub allocation_changes: u64,

    /// Eligible cases left unassigned because total capacity ran out
    pub capacity_rejections: u64,
}

/// Load-balancing courtroom allocator
#[derive(Debug, Clone, Default)]
pub struct CourtroomAllocator {
    /// Cumulative assignment count per room over the run
    cumulative: BTreeMap<String, u64>,

    /// Previous room assignment per case (continuity tracking)
    last_assignment: HashMap<String, String>,

    allocation_changes: u64,
    capacity_rejections: u64,
    days_allocated: u64,
}

impl CourtroomAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign each case id to exactly one courtroom.
    ///
    /// `case_ids` must already be prioritized and truncated to the day's
    /// total effective capacity; any overflow beyond per-room capacity is
    /// still left unassigned and counted as a rejection.
    pub fn allocate(
        &mut self,
        case_ids: &[String],
        courtrooms: &[Courtroom],
        date: NaiveDate,
        calendar: &CourtCalendar,
    ) -> DailyAllocation {
        self.days_allocated += 1;

        let mut remaining: BTreeMap<&str, u32> = BTreeMap::new();
        let mut assigned: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for room in courtrooms {
            self.cumulative.entry(room.id().to_string()).or_insert(0);
            remaining.insert(room.id(), room.effective_capacity(date, calendar));
            assigned.insert(room.id(), Vec::new());
        }

        for case_id in case_ids {
            // Lowest cumulative load among rooms with headroom; iteration
            // is in room-id order, so the first minimum wins ties.
            let mut best: Option<(String, u64)> = None;
            for (room_id, cap) in remaining.iter() {
                if *cap == 0 {
                    continue;
                }
                let load = self.cumulative.get(*room_id).copied().unwrap_or(0);
                let better = match &best {
                    Some((_, best_load)) => load < *best_load,
                    None => true,
                };
                if better {
                    best = Some((room_id.to_string(), load));
                }
            }

            let room_id: String = match best {
                Some((room_id, _)) => room_id,
                None => {
                    self.capacity_rejections += 1;
                    continue;
                }
            };

            *remaining.get_mut(room_id.as_str()).unwrap() -= 1;
            *self.cumulative.get_mut(&room_id).unwrap() += 1;

            match self.last_assignment.get(case_id) {
                Some(prev) if prev != &room_id => self.allocation_changes += 1,
                _ => {}
            }
            self.last_assignment.insert(case_id.clone(), room_id.clone());

            assigned.get_mut(room_id.as_str()).unwrap().push(case_id.clone());
        }

        DailyAllocation {
            by_room: assigned
                .into_iter()
                .map(|(room, cases)| (room.to_string(), cases))
                .collect(),
        }
    }

    /// Record eligible cases the engine dropped before allocation because
    /// the day's total capacity was exceeded.
    pub fn record_rejections(&mut self, count: u64) {
        self.capacity_rejections += count;
    }

    /// Current cumulative statistics.
    pub fn stats(&self) -> AllocatorStats {
        let days = self.days_allocated.max(1) as f64;
        let per_room_daily_average = self
            .cumulative
            .iter()
            .map(|(room, &total)| (room.clone(), total as f64 / days))
            .collect();

        let loads: Vec<u64> = self.cumulative.values().copied().collect();

        AllocatorStats {
            per_room_totals: self.cumulative.clone(),
            per_room_daily_average,
            load_gini: gini(&loads),
            allocation_changes: self.allocation_changes,
            capacity_rejections: self.capacity_rejections,
        }
    }
}

/// Gini coefficient over a set of non-negative loads.
///
/// 0 = perfectly equal, approaching 1 = maximally unequal. Empty or
/// all-zero input yields 0.
pub fn gini(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let total: u64 = values.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let mean = total as f64 / n;

    let mut abs_diff_sum = 0.0;
    for &a in values {
        for &b in values {
            abs_diff_sum += (a as f64 - b as f64).abs();
        }
    }

    abs_diff_sum / (2.0 * n * n * mean)
}

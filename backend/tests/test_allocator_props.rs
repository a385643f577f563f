//! Property tests for the courtroom allocator invariants.

use chrono::NaiveDate;
use court_simulator_core_rs::{CourtCalendar, Courtroom, CourtroomAllocator};
use proptest::prelude::*;
use std::collections::HashSet;

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
}

fn rooms(count: usize, capacity: u32) -> Vec<Courtroom> {
    (1..=count)
        .map(|i| Courtroom::new(format!("CR-{:02}", i), format!("J-{:03}", i), capacity))
        .collect()
}

fn case_ids(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("OS-{:06}", i)).collect()
}

proptest! {
    #[test]
    fn prop_no_room_over_capacity(
        num_rooms in 1usize..8,
        capacity in 0u32..10,
        num_cases in 0usize..200,
    ) {
        let mut allocator = CourtroomAllocator::new();
        let calendar = CourtCalendar::new(vec![]);
        let rooms = rooms(num_rooms, capacity);

        let allocation = allocator.allocate(&case_ids(num_cases), &rooms, monday(), &calendar);

        for (_, assigned) in allocation.by_room() {
            prop_assert!(assigned.len() <= capacity as usize);
        }
    }

    #[test]
    fn prop_no_case_double_assigned(
        num_rooms in 1usize..8,
        capacity in 0u32..10,
        num_cases in 0usize..200,
    ) {
        let mut allocator = CourtroomAllocator::new();
        let calendar = CourtCalendar::new(vec![]);
        let rooms = rooms(num_rooms, capacity);

        let allocation = allocator.allocate(&case_ids(num_cases), &rooms, monday(), &calendar);

        let mut seen = HashSet::new();
        for (_, assigned) in allocation.by_room() {
            for case_id in assigned {
                prop_assert!(seen.insert(case_id.clone()), "case {} assigned twice", case_id);
            }
        }
    }

    #[test]
    fn prop_assigned_plus_rejected_covers_input(
        num_rooms in 1usize..8,
        capacity in 0u32..10,
        num_cases in 0usize..200,
    ) {
        let mut allocator = CourtroomAllocator::new();
        let calendar = CourtCalendar::new(vec![]);
        let rooms = rooms(num_rooms, capacity);

        let allocation = allocator.allocate(&case_ids(num_cases), &rooms, monday(), &calendar);
        let stats = allocator.stats();

        prop_assert_eq!(
            allocation.num_assigned() as u64 + stats.capacity_rejections,
            num_cases as u64
        );
    }

    #[test]
    fn prop_load_stays_balanced(
        num_rooms in 1usize..6,
        days in 1usize..10,
        per_day in 0usize..30,
    ) {
        // Ample capacity: over any number of days the per-room totals can
        // differ by at most 1 under the lowest-load rule.
        let mut allocator = CourtroomAllocator::new();
        let calendar = CourtCalendar::new(vec![]);
        let rooms = rooms(num_rooms, 1000);

        let mut date = monday();
        for day in 0..days {
            let ids: Vec<String> = (0..per_day)
                .map(|i| format!("OS-{:03}-{:03}", day, i))
                .collect();
            allocator.allocate(&ids, &rooms, date, &calendar);
            date = calendar.next_working_day(date);
        }

        let stats = allocator.stats();
        let totals: Vec<u64> = stats.per_room_totals.values().copied().collect();
        let min = totals.iter().min().copied().unwrap_or(0);
        let max = totals.iter().max().copied().unwrap_or(0);
        prop_assert!(max - min <= 1, "loads diverged: min {} max {}", min, max);
    }
}

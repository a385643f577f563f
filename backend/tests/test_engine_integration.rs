//! End-to-end engine scenarios over generated caseloads.

use chrono::NaiveDate;
use court_simulator_core_rs::{
    Case, CaseGenerator, CourtSim, EmpiricalParameterStore, EventKind, GeneratorConfig,
    ParameterStore, PolicyKind, SimRng, SimulationConfig,
};
use std::collections::HashMap;

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
}

fn generated_pool(count: usize) -> Vec<Case> {
    let mut rng = SimRng::new(17);
    let mut generator = CaseGenerator::new(GeneratorConfig::default());
    generator.generate_pool(count, start_date(), &mut rng)
}

fn store() -> Box<dyn ParameterStore> {
    Box::new(EmpiricalParameterStore::with_defaults())
}

#[test]
fn test_fifty_cases_three_courtrooms_ten_days() {
    let mut config = SimulationConfig::new(start_date(), 10);
    config.num_courtrooms = 3;
    config.courtroom_capacity = 50;

    let mut sim = CourtSim::new(config, generated_pool(50), store()).unwrap();
    let result = sim.run().unwrap();

    // Counters are consistent
    assert_eq!(
        result.hearings_heard + result.hearings_adjourned,
        result.hearings_total
    );

    // Scheduled events never exceed total capacity (150) on any day
    let mut scheduled_per_day: HashMap<NaiveDate, usize> = HashMap::new();
    for event in sim.event_log().events_of_kind(EventKind::Scheduled) {
        *scheduled_per_day.entry(event.date).or_insert(0) += 1;
    }
    for (date, count) in &scheduled_per_day {
        assert!(*count <= 150, "{} scheduled on {}", count, date);
    }

    // One metrics row per day, internally consistent
    assert_eq!(sim.daily_metrics().len(), 10);
    for row in sim.daily_metrics() {
        assert_eq!(row.scheduled, row.heard + row.adjourned);
        assert!(row.utilization >= 0.0 && row.utilization <= 1.0);
    }
}

#[test]
fn test_per_room_daily_capacity_never_exceeded() {
    let mut config = SimulationConfig::new(start_date(), 10);
    config.num_courtrooms = 2;
    config.courtroom_capacity = 5;

    let mut sim = CourtSim::new(config, generated_pool(80), store()).unwrap();
    sim.run().unwrap();

    // Group scheduled events by (date, courtroom)
    let mut per_room_day: HashMap<(NaiveDate, String), usize> = HashMap::new();
    for event in sim.event_log().events_of_kind(EventKind::Scheduled) {
        let room = event.courtroom_id.clone().expect("scheduled event has a courtroom");
        *per_room_day.entry((event.date, room)).or_insert(0) += 1;
    }

    for ((date, room), count) in &per_room_day {
        assert!(
            *count <= 5,
            "courtroom {} over capacity on {}: {}",
            room,
            date,
            count
        );
    }
}

#[test]
fn test_case_never_listed_twice_same_day() {
    let mut config = SimulationConfig::new(start_date(), 10);
    config.num_courtrooms = 3;
    config.courtroom_capacity = 10;

    let mut sim = CourtSim::new(config, generated_pool(60), store()).unwrap();
    sim.run().unwrap();

    let mut seen: HashMap<(NaiveDate, String), usize> = HashMap::new();
    for event in sim.event_log().events_of_kind(EventKind::Scheduled) {
        *seen.entry((event.date, event.case_id.clone())).or_insert(0) += 1;
    }
    for ((date, case_id), count) in &seen {
        assert_eq!(*count, 1, "case {} listed {} times on {}", case_id, count, date);
    }
}

#[test]
fn test_disposal_stops_all_activity() {
    let mut config = SimulationConfig::new(start_date(), 60);
    config.num_courtrooms = 3;
    config.courtroom_capacity = 20;

    let mut sim = CourtSim::new(config, generated_pool(100), store()).unwrap();
    let result = sim.run().unwrap();

    assert!(result.disposals > 0, "60 days over 100 cases should dispose some");

    for case in sim.cases().iter().filter(|c| c.is_disposed()) {
        let events = sim.event_log().events_for_case(case.id());
        let disposed_at = events
            .iter()
            .position(|e| e.kind == EventKind::Disposed)
            .unwrap();
        for event in &events[disposed_at + 1..] {
            assert!(
                !matches!(event.kind, EventKind::Scheduled | EventKind::Outcome),
                "case {} active after disposal",
                case.id()
            );
        }
        assert!(case.disposal_date().is_some());
    }

    // Disposals equal end-state disposed count (no mid-run filings here)
    let end_disposed = sim.cases().iter().filter(|c| c.is_disposed()).count() as u64;
    assert_eq!(result.disposals, end_disposed);
}

#[test]
fn test_weekends_are_skipped() {
    let config = SimulationConfig::new(start_date(), 10);
    let mut sim = CourtSim::new(config, generated_pool(10), store()).unwrap();
    sim.run().unwrap();

    use chrono::Datelike;
    for row in sim.daily_metrics() {
        let weekday = row.date.weekday();
        assert!(
            !matches!(weekday, chrono::Weekday::Sat | chrono::Weekday::Sun),
            "simulated a weekend: {}",
            row.date
        );
    }
}

#[test]
fn test_holiday_is_not_simulated() {
    // 2024-01-10 (Wednesday) declared a holiday: the run must skip it and
    // still simulate the configured number of sitting days.
    let holiday = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let mut config = SimulationConfig::new(start_date(), 5);
    config.holidays = vec![holiday];

    let mut sim = CourtSim::new(config, generated_pool(10), store()).unwrap();
    sim.run().unwrap();

    assert_eq!(sim.daily_metrics().len(), 5);
    assert!(sim.daily_metrics().iter().all(|row| row.date != holiday));
}

#[test]
fn test_policies_share_identical_inputs_but_order_differently() {
    // Same pool and seed under different policies: totals may differ, but
    // each run must stay internally consistent.
    for policy in [PolicyKind::Fifo, PolicyKind::Age, PolicyKind::Readiness] {
        let mut config = SimulationConfig::new(start_date(), 10);
        config.num_courtrooms = 2;
        config.courtroom_capacity = 6;
        config.policy = policy;

        let mut sim = CourtSim::new(config, generated_pool(60), store()).unwrap();
        let result = sim.run().unwrap();

        assert_eq!(
            result.hearings_heard + result.hearings_adjourned,
            result.hearings_total,
            "{:?}",
            policy
        );
        assert!(result.utilization >= 0.0 && result.utilization <= 1.0);
    }
}

#[test]
fn test_readiness_policy_prefers_urgent_backlog() {
    // Two otherwise identical cases, one urgent; capacity 1. The urgent
    // case must be listed first under the readiness policy.
    let filed = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    let urgent = Case::new("OS-000001".into(), "OS".into(), filed, "evidence".into())
        .with_service_complete(true)
        .with_urgent(true);
    let plain = Case::new("OS-000002".into(), "OS".into(), filed, "evidence".into())
        .with_service_complete(true);

    let mut config = SimulationConfig::new(start_date(), 1);
    config.policy = PolicyKind::Readiness;
    config.courtroom_capacity = 1;

    // Input order deliberately puts the plain case first
    let mut sim = CourtSim::new(config, vec![plain, urgent], store()).unwrap();
    sim.run().unwrap();

    let scheduled = sim.event_log().events_of_kind(EventKind::Scheduled);
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].case_id, "OS-000001");
    assert_eq!(scheduled[0].annotations.urgent, Some(true));
    assert!(scheduled[0].annotations.readiness_score.is_some());
}

#[test]
fn test_stage_changes_follow_transition_table() {
    // Force every hearing to be heard; verify each stage_change edge
    // exists in the parameter store's transition table.
    let mut params = EmpiricalParameterStore::with_defaults();
    for stage in court_simulator_core_rs::params::DEFAULT_STAGES {
        params.set_stage_adjournment_prob(stage, 0.0);
    }
    let reference = EmpiricalParameterStore::with_defaults();

    let mut config = SimulationConfig::new(start_date(), 30);
    config.num_courtrooms = 2;
    config.courtroom_capacity = 10;

    let mut sim = CourtSim::new(config, generated_pool(40), Box::new(params)).unwrap();
    sim.run().unwrap();

    let changes = sim.event_log().events_of_kind(EventKind::StageChange);
    assert!(!changes.is_empty(), "30 heard-only days must change stages");

    for event in changes {
        let (from, to) = event
            .detail
            .split_once(" -> ")
            .expect("stage_change detail is 'old -> new'");
        assert!(
            reference.transition_prob(from, to) > 0.0,
            "transition {} -> {} not in table",
            from,
            to
        );
    }
}

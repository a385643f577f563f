//! Event-log and metrics file output, driven through a full run.

use chrono::NaiveDate;
use court_simulator_core_rs::writer::EVENT_LOG_COLUMNS;
use court_simulator_core_rs::{
    CaseGenerator, CourtSim, CsvEventSink, CsvMetricsSink, EmpiricalParameterStore,
    GeneratorConfig, SimRng, SimulationConfig,
};
use std::path::PathBuf;

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("court_sim_{}_{}", std::process::id(), name))
}

fn build_sim(events_path: &PathBuf, metrics_path: &PathBuf) -> CourtSim {
    let mut rng = SimRng::new(31);
    let mut generator = CaseGenerator::new(GeneratorConfig::default());
    let pool = generator.generate_pool(40, start_date(), &mut rng);

    let mut config = SimulationConfig::new(start_date(), 8);
    config.num_courtrooms = 2;
    config.courtroom_capacity = 10;

    CourtSim::new(
        config,
        pool,
        Box::new(EmpiricalParameterStore::with_defaults()),
    )
    .unwrap()
    .with_event_sink(Box::new(CsvEventSink::create(events_path).unwrap()))
    .with_metrics_sink(Box::new(CsvMetricsSink::create(metrics_path).unwrap()))
}

#[test]
fn test_run_writes_complete_event_log_file() {
    let events_path = temp_path("events.csv");
    let metrics_path = temp_path("metrics.csv");

    let mut sim = build_sim(&events_path, &metrics_path);
    sim.run().unwrap();

    let content = std::fs::read_to_string(&events_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    // Header plus one row per in-memory event
    assert_eq!(lines[0], EVENT_LOG_COLUMNS.join(","));
    assert_eq!(lines.len() - 1, sim.event_log().len());

    // Every row carries the full fixed column set
    let expected_columns = EVENT_LOG_COLUMNS.len();
    for line in &lines[1..] {
        let fields = line.split(',').count();
        assert!(
            fields >= expected_columns,
            "row has {} fields, expected at least {}: {}",
            fields,
            expected_columns,
            line
        );
    }

    std::fs::remove_file(&events_path).ok();
    std::fs::remove_file(&metrics_path).ok();
}

#[test]
fn test_run_writes_one_metrics_row_per_day() {
    let events_path = temp_path("events2.csv");
    let metrics_path = temp_path("metrics2.csv");

    let mut sim = build_sim(&events_path, &metrics_path);
    sim.run().unwrap();

    let content = std::fs::read_to_string(&metrics_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines.len() - 1, 8, "one row per simulated day");

    // Utilization column has exactly 4 decimal places
    for line in &lines[1..] {
        let utilization = line.rsplit(',').next().unwrap();
        let decimals = utilization.split('.').nth(1).unwrap_or("");
        assert_eq!(decimals.len(), 4, "bad utilization cell: {}", utilization);
    }

    std::fs::remove_file(&events_path).ok();
    std::fs::remove_file(&metrics_path).ok();
}

//! Thin command-line runner for the court simulator core.
//!
//! Maps CLI flags onto `SimulationConfig`, generates a synthetic
//! caseload, runs the engine, and writes the event log and daily metrics
//! as CSV. All presentation beyond a summary line lives downstream of
//! those files.

use chrono::NaiveDate;
use clap::Parser;
use court_simulator_core_rs::{
    CaseGenerator, CourtSim, CsvEventSink, CsvMetricsSink, DurationPercentile,
    EmpiricalParameterStore, GeneratorConfig, PolicyKind, SimRng, SimulationConfig,
};
use std::error::Error;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "court-sim",
    about = "Simulate daily court scheduling over a synthetic caseload",
    version
)]
struct Cli {
    /// First simulated date (YYYY-MM-DD)
    #[arg(long)]
    start_date: NaiveDate,

    /// Number of working days to simulate
    #[arg(long, default_value_t = 30)]
    days: usize,

    /// RNG seed (same seed reproduces the run exactly)
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Number of courtrooms
    #[arg(long, default_value_t = 3)]
    courtrooms: usize,

    /// Daily hearing capacity per courtroom
    #[arg(long, default_value_t = 20)]
    capacity: u32,

    /// Scheduling policy: fifo | age | readiness
    #[arg(long, default_value = "fifo")]
    policy: String,

    /// Stage-duration percentile: median | p90
    #[arg(long, default_value = "median")]
    percentile: String,

    /// Size of the generated initial case pool
    #[arg(long, default_value_t = 200)]
    cases: usize,

    /// Mean fresh filings per day (0 disables mid-run filings)
    #[arg(long, default_value_t = 0.0)]
    filing_rate: f64,

    /// Court holiday (YYYY-MM-DD); repeat for multiple dates
    #[arg(long = "holiday")]
    holidays: Vec<NaiveDate>,

    /// Write the event log CSV to this path
    #[arg(long)]
    events_out: Option<PathBuf>,

    /// Write the daily metrics CSV to this path
    #[arg(long)]
    metrics_out: Option<PathBuf>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    // Fail fast on names before any simulation state is built
    let policy: PolicyKind = cli.policy.parse()?;
    let percentile: DurationPercentile = cli.percentile.parse()?;

    let mut config = SimulationConfig::new(cli.start_date, cli.days);
    config.rng_seed = cli.seed;
    config.num_courtrooms = cli.courtrooms;
    config.courtroom_capacity = cli.capacity;
    config.policy = policy;
    config.percentile = percentile;
    config.holidays = cli.holidays;
    config.filing_rate_per_day = cli.filing_rate;

    // The pool is generated from the run seed so the whole scenario is
    // reproducible from the command line alone
    let mut rng = SimRng::new(cli.seed);
    let mut generator = CaseGenerator::new(GeneratorConfig::default());
    let pool = generator.generate_pool(cli.cases, cli.start_date, &mut rng);

    info!(
        cases = pool.len(),
        courtrooms = cli.courtrooms,
        policy = %cli.policy,
        days = cli.days,
        "starting simulation"
    );

    let mut sim = CourtSim::new(
        config,
        pool,
        Box::new(EmpiricalParameterStore::with_defaults()),
    )?
    .with_filing_generator(generator);

    if let Some(path) = &cli.events_out {
        sim = sim.with_event_sink(Box::new(CsvEventSink::create(path)?));
    }
    if let Some(path) = &cli.metrics_out {
        sim = sim.with_metrics_sink(Box::new(CsvMetricsSink::create(path)?));
    }

    let result = sim.run()?;
    let stats = sim.allocator_stats();

    println!("Simulation complete ({} -> {})", cli.start_date, result.end_date);
    println!(
        "  hearings: {} total, {} heard, {} adjourned",
        result.hearings_total, result.hearings_heard, result.hearings_adjourned
    );
    println!("  disposals: {}", result.disposals);
    println!("  utilization: {:.4}", result.utilization);
    println!(
        "  ripeness: {} transitions, {} candidate-days filtered",
        result.ripeness_transitions, result.unripe_filtered
    );
    println!(
        "  load balance: gini {:.4}, {} reassignments, {} capacity rejections",
        stats.load_gini, stats.allocation_changes, stats.capacity_rejections
    );
    if let Some(path) = &cli.events_out {
        println!("  event log: {}", path.display());
    }
    if let Some(path) = &cli.metrics_out {
        println!("  metrics: {}", path.display());
    }

    Ok(())
}

//! Court simulation engine
//!
//! Main daily loop integrating all components:
//! - Ripeness re-evaluation (periodic batch + per-candidate)
//! - Candidate filtering (gap eligibility)
//! - Policy prioritization and capacity truncation
//! - Load-balanced courtroom allocation
//! - Stochastic hearing outcomes and stage progression
//! - Event logging and daily metrics
//!
//! # Architecture
//!
//! `CourtSim` executes this procedure once per working day:
//!
//! ```text
//! For each day d:
//! 1. Batch-reclassify ripeness every 7 elapsed calendar days
//! 2. Build candidate set (all non-disposed cases); recompute ages and,
//!    if the policy needs them, readiness scores
//! 3. Reclassify every candidate's ripeness; only ripe cases proceed
//! 4. Filter by minimum hearing gap
//! 5. Prioritize with the active policy
//! 6. Truncate to total capacity; allocate to courtrooms
//! 7. Sample each listed hearing: adjourned, or heard (then natural
//!    disposal check, then gated stage transition)
//! 8. Record per-courtroom utilization
//! 9. Append the daily metrics row; flush buffered events
//! ```
//!
//! # Determinism
//!
//! All randomness flows through one seeded `SimRng`; courtrooms are
//! visited in id order and cases in priority order, so identical inputs
//! and seed reproduce a byte-identical event log.
//!
//! # Ownership
//!
//! The engine exclusively owns its case pool for the duration of a run.
//! Callers hand the pool over at construction and read results and the
//! event log back out; no external reference observes in-place mutation.

use crate::allocator::{AllocatorStats, CourtroomAllocator};
use crate::core::calendar::{days_between, CourtCalendar};
use crate::generator::CaseGenerator;
use crate::models::{Case, Courtroom, DailyMetrics, EventAnnotations, EventKind, EventLog, EventRecord};
use crate::orchestrator::disposal::DisposalModel;
use crate::params::{DurationPercentile, ParameterStore};
use crate::policy::{PolicyKind, SchedulingPolicy};
use crate::ripeness::{classify, ripeness_reason, RipenessStatus};
use crate::rng::SimRng;
use crate::writer::{EventSink, EventWriter, MetricsSink, WriterError};
use chrono::{Duration, NaiveDate};
use std::collections::{HashMap, HashSet};

// ============================================================================
// Configuration Types
// ============================================================================

/// Default minimum calendar days between two hearings of the same case.
pub const DEFAULT_MIN_HEARING_GAP_DAYS: i64 = 3;

/// Default interval (elapsed calendar days) between batch ripeness
/// re-evaluations.
pub const DEFAULT_RIPENESS_REVIEW_INTERVAL_DAYS: i64 = 7;

/// Complete simulation configuration
///
/// # Fields
///
/// * `start_date` - First simulated date (advanced to the next working
///   day if it falls on a weekend/holiday)
/// * `num_days` - Number of working days to simulate
/// * `rng_seed` - Seed for deterministic random number generation
/// * `num_courtrooms` / `courtroom_capacity` - The courtroom pool
/// * `policy` - Scheduling policy (parsed by name at configuration time)
/// * `percentile` - Which fitted duration percentile gates stage changes
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// First simulated date
    pub start_date: NaiveDate,

    /// Number of working days to simulate
    pub num_days: usize,

    /// RNG seed for deterministic simulation
    pub rng_seed: u64,

    /// Number of courtrooms in the pool
    pub num_courtrooms: usize,

    /// Daily hearing capacity per courtroom (0 models a starved system)
    pub courtroom_capacity: u32,

    /// Active scheduling policy
    pub policy: PolicyKind,

    /// Duration percentile used for stage-ready gates
    pub percentile: DurationPercentile,

    /// Minimum calendar days since a case's last hearing before it is
    /// eligible again
    pub min_hearing_gap_days: i64,

    /// Elapsed calendar days between batch ripeness re-evaluations
    pub ripeness_review_interval_days: i64,

    /// Court holidays (zero effective capacity; skipped by the day loop)
    pub holidays: Vec<NaiveDate>,

    /// Stages whose entry disposes the case
    pub terminal_stages: Vec<String>,

    /// Mean fresh filings per day (0.0 disables mid-run filings; requires
    /// a filing generator to be attached)
    pub filing_rate_per_day: f64,
}

impl SimulationConfig {
    /// Configuration with conventional defaults: one courtroom of
    /// capacity 20, FIFO policy, median durations, no holidays, no
    /// mid-run filings.
    pub fn new(start_date: NaiveDate, num_days: usize) -> Self {
        Self {
            start_date,
            num_days,
            rng_seed: 12345,
            num_courtrooms: 1,
            courtroom_capacity: 20,
            policy: PolicyKind::Fifo,
            percentile: DurationPercentile::Median,
            min_hearing_gap_days: DEFAULT_MIN_HEARING_GAP_DAYS,
            ripeness_review_interval_days: DEFAULT_RIPENESS_REVIEW_INTERVAL_DAYS,
            holidays: Vec::new(),
            terminal_stages: vec!["judgment".to_string()],
            filing_rate_per_day: 0.0,
        }
    }
}

/// Simulation error types
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Configuration validation error (surfaced before any day executes)
    InvalidConfig(String),

    /// Inconsistent case state encountered mid-run
    CaseState(String),

    /// Event log / metrics write failure (the audit trail is the record
    /// of the run; a failed flush must surface, not be dropped)
    Writer(String),
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            SimulationError::CaseState(msg) => write!(f, "Case state error: {}", msg),
            SimulationError::Writer(msg) => write!(f, "Writer error: {}", msg),
        }
    }
}

impl std::error::Error for SimulationError {}

impl From<WriterError> for SimulationError {
    fn from(err: WriterError) -> Self {
        SimulationError::Writer(err.to_string())
    }
}

/// Result of a single simulated day
#[derive(Debug, Clone, PartialEq)]
pub struct DayResult {
    /// Simulated date
    pub date: NaiveDate,

    /// Cases listed for hearing
    pub scheduled: usize,

    /// Listed cases actually heard
    pub heard: usize,

    /// Listed cases adjourned
    pub adjourned: usize,

    /// Cases disposed this day
    pub disposed: usize,

    /// Candidates filtered out as unripe this day
    pub unripe_filtered: usize,

    /// Ripeness transitions recorded this day
    pub ripeness_changes: usize,
}

/// Aggregate result of a full run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Hearings listed over the run (heard + adjourned)
    pub hearings_total: u64,

    /// Hearings actually heard
    pub hearings_heard: u64,

    /// Hearings adjourned
    pub hearings_adjourned: u64,

    /// Cases disposed over the run
    pub disposals: u64,

    /// Total heard / total effective capacity over the run
    pub utilization: f64,

    /// Last simulated date
    pub end_date: NaiveDate,

    /// Ripeness transitions recorded over the run
    pub ripeness_transitions: u64,

    /// Candidate-days filtered out as unripe
    pub unripe_filtered: u64,
}

// ============================================================================
// Engine
// ============================================================================

/// Court simulation engine owning all run state
///
/// See the module docs for the daily procedure. Construct with
/// [`CourtSim::new`], optionally attach sinks and a filing generator,
/// then call [`CourtSim::run`] (or drive [`CourtSim::step_day`] manually).
pub struct CourtSim {
    config: SimulationConfig,

    /// The case pool, owned exclusively for the run's duration
    cases: Vec<Case>,

    /// case id → index into `cases`
    case_index: HashMap<String, usize>,

    /// Courtroom pool, sorted by id
    courtrooms: Vec<Courtroom>,

    calendar: CourtCalendar,
    policy: Box<dyn SchedulingPolicy>,
    allocator: CourtroomAllocator,
    params: Box<dyn ParameterStore>,
    rng: SimRng,
    disposal_model: DisposalModel,
    terminal_stages: HashSet<String>,

    /// In-memory audit log (always kept; file sink is optional)
    event_log: EventLog,

    /// Optional buffered file sink, flushed once per day
    event_writer: Option<EventWriter<Box<dyn EventSink>>>,

    /// Optional metrics sink, one row per day
    metrics_sink: Option<Box<dyn MetricsSink>>,

    /// Optional generator for mid-run filings
    filing_generator: Option<CaseGenerator>,

    /// Daily metrics rows in memory
    daily_metrics: Vec<DailyMetrics>,

    /// Date of the last batch ripeness re-evaluation
    last_ripeness_review: NaiveDate,

    // Run counters
    hearings_heard: u64,
    hearings_adjourned: u64,
    disposals: u64,
    ripeness_transitions: u64,
    unripe_filtered: u64,
    total_heard: u64,
    total_capacity_days: u64,
}

impl CourtSim {
    /// Create a new engine from configuration, an initial case pool, and
    /// a parameter store.
    ///
    /// Validates the configuration and seeds every case's stage-ready
    /// date from its hearing history (or filing date) plus the typical
    /// duration of its current stage, floored at 1 day.
    ///
    /// # Errors
    ///
    /// `SimulationError::InvalidConfig` for a non-positive day count or
    /// courtroom count, invalid gap/interval values, an empty terminal
    /// stage set, or duplicate case ids.
    pub fn new(
        config: SimulationConfig,
        cases: Vec<Case>,
        params: Box<dyn ParameterStore>,
    ) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;

        let mut case_index = HashMap::with_capacity(cases.len());
        for (i, case) in cases.iter().enumerate() {
            if case_index.insert(case.id().to_string(), i).is_some() {
                return Err(SimulationError::InvalidConfig(format!(
                    "Duplicate case id: {}",
                    case.id()
                )));
            }
        }

        let courtrooms: Vec<Courtroom> = (1..=config.num_courtrooms)
            .map(|i| {
                Courtroom::new(
                    format!("CR-{:02}", i),
                    format!("J-{:03}", 100 + i),
                    config.courtroom_capacity,
                )
            })
            .collect();

        let calendar = CourtCalendar::new(config.holidays.clone());
        let policy = config.policy.build();
        let rng = SimRng::new(config.rng_seed);
        let terminal_stages: HashSet<String> = config.terminal_stages.iter().cloned().collect();

        let mut sim = Self {
            last_ripeness_review: config.start_date,
            config,
            cases,
            case_index,
            courtrooms,
            calendar,
            policy,
            allocator: CourtroomAllocator::new(),
            params,
            rng,
            disposal_model: DisposalModel::default(),
            terminal_stages,
            event_log: EventLog::new(),
            event_writer: None,
            metrics_sink: None,
            filing_generator: None,
            daily_metrics: Vec::new(),
            hearings_heard: 0,
            hearings_adjourned: 0,
            disposals: 0,
            ripeness_transitions: 0,
            unripe_filtered: 0,
            total_heard: 0,
            total_capacity_days: 0,
        };

        sim.seed_stage_ready_dates();
        Ok(sim)
    }

    fn validate_config(config: &SimulationConfig) -> Result<(), SimulationError> {
        if config.num_days == 0 {
            return Err(SimulationError::InvalidConfig(
                "num_days must be > 0".to_string(),
            ));
        }
        if config.num_courtrooms == 0 {
            return Err(SimulationError::InvalidConfig(
                "num_courtrooms must be > 0".to_string(),
            ));
        }
        if config.min_hearing_gap_days < 0 {
            return Err(SimulationError::InvalidConfig(
                "min_hearing_gap_days must be >= 0".to_string(),
            ));
        }
        if config.ripeness_review_interval_days <= 0 {
            return Err(SimulationError::InvalidConfig(
                "ripeness_review_interval_days must be > 0".to_string(),
            ));
        }
        if config.terminal_stages.is_empty() {
            return Err(SimulationError::InvalidConfig(
                "at least one terminal stage is required".to_string(),
            ));
        }
        if !config.filing_rate_per_day.is_finite() || config.filing_rate_per_day < 0.0 {
            return Err(SimulationError::InvalidConfig(
                "filing_rate_per_day must be finite and >= 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Attach a buffered event-log sink, flushed once per simulated day.
    pub fn with_event_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.event_writer = Some(EventWriter::new(sink));
        self
    }

    /// Attach a daily-metrics sink.
    pub fn with_metrics_sink(mut self, sink: Box<dyn MetricsSink>) -> Self {
        self.metrics_sink = Some(sink);
        self
    }

    /// Attach the generator used for mid-run filings. Pass the same
    /// generator instance that produced the initial pool so case ids
    /// stay unique.
    pub fn with_filing_generator(mut self, generator: CaseGenerator) -> Self {
        self.filing_generator = Some(generator);
        self
    }

    /// Override the natural-disposal model (custom disposal-capable
    /// stages / multipliers).
    pub fn with_disposal_model(mut self, model: DisposalModel) -> Self {
        self.disposal_model = model;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn courtrooms(&self) -> &[Courtroom] {
        &self.courtrooms
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn daily_metrics(&self) -> &[DailyMetrics] {
        &self.daily_metrics
    }

    pub fn allocator_stats(&self) -> AllocatorStats {
        self.allocator.stats()
    }

    // ========================================================================
    // Event Logging
    // ========================================================================

    fn log_event(&mut self, event: EventRecord) {
        if let Some(writer) = &mut self.event_writer {
            writer.write(event.clone());
        }
        self.event_log.log(event);
    }

    // ========================================================================
    // Initialization
    // ========================================================================

    /// Seed each case's stage-ready date: (last hearing date, or filing
    /// date) + typical current-stage duration, floored at 1 day.
    fn seed_stage_ready_dates(&mut self) {
        for case in &mut self.cases {
            let base = case.last_hearing_date().unwrap_or_else(|| case.filed_date());
            let duration =
                self.params.stage_duration(case.current_stage(), self.config.percentile);
            let days = (duration as i64).max(1);
            case.set_stage_ready_date(base + Duration::days(days));
        }
    }

    // ========================================================================
    // Daily Loop
    // ========================================================================

    /// Run the configured number of working days and return the aggregate
    /// result.
    ///
    /// Weekends and holidays are skipped; `num_days` counts sitting days.
    pub fn run(&mut self) -> Result<SimulationResult, SimulationError> {
        if self.config.filing_rate_per_day > 0.0 && self.filing_generator.is_none() {
            return Err(SimulationError::InvalidConfig(
                "filing_rate_per_day > 0 requires a filing generator".to_string(),
            ));
        }

        let mut date = self.calendar.first_working_day_on_or_after(self.config.start_date);
        let mut last_date = date;

        for _ in 0..self.config.num_days {
            let day = self.step_day(date)?;
            tracing::debug!(
                date = %day.date,
                scheduled = day.scheduled,
                heard = day.heard,
                adjourned = day.adjourned,
                disposed = day.disposed,
                "simulated day"
            );
            last_date = date;
            date = self.calendar.next_working_day(date);
        }

        let result = SimulationResult {
            hearings_total: self.hearings_heard + self.hearings_adjourned,
            hearings_heard: self.hearings_heard,
            hearings_adjourned: self.hearings_adjourned,
            disposals: self.disposals,
            utilization: if self.total_capacity_days == 0 {
                0.0
            } else {
                self.total_heard as f64 / self.total_capacity_days as f64
            },
            end_date: last_date,
            ripeness_transitions: self.ripeness_transitions,
            unripe_filtered: self.unripe_filtered,
        };

        tracing::info!(
            hearings = result.hearings_total,
            disposals = result.disposals,
            utilization = result.utilization,
            "run complete"
        );

        Ok(result)
    }

    /// Execute one simulated day.
    pub fn step_day(&mut self, date: NaiveDate) -> Result<DayResult, SimulationError> {
        let mut day_ripeness_changes = 0usize;

        // STEP 0: MID-RUN FILINGS (optional)
        self.generate_filings(date)?;

        // STEP 1: PERIODIC RIPENESS RE-EVALUATION
        // Every N elapsed calendar days (not a day counter), reclassify
        // every non-disposed case.
        if days_between(self.last_ripeness_review, date)
            >= self.config.ripeness_review_interval_days
        {
            for i in 0..self.cases.len() {
                if self.cases[i].is_disposed() {
                    continue;
                }
                let status = classify(&self.cases[i], date);
                day_ripeness_changes += self.apply_ripeness(i, status, date);
            }
            self.last_ripeness_review = date;
        }

        // STEP 2: CANDIDATE SET
        // All non-disposed cases; recompute readiness scores only when
        // the active policy sorts on them.
        let candidates: Vec<usize> = (0..self.cases.len())
            .filter(|&i| !self.cases[i].is_disposed())
            .collect();

        if self.policy.requires_readiness_scores() {
            for &i in &candidates {
                self.cases[i].compute_readiness_score(date);
            }
        }

        // STEP 3: PER-CANDIDATE RIPENESS CHECK
        // Deliberately repeated on batch days: classification is cheap
        // and must reflect same-day state. Only ripe cases proceed.
        let mut day_unripe = 0usize;
        let mut ripe: Vec<usize> = Vec::with_capacity(candidates.len());
        for &i in &candidates {
            let status = classify(&self.cases[i], date);
            day_ripeness_changes += self.apply_ripeness(i, status, date);
            if status.is_ripe() {
                ripe.push(i);
            } else {
                day_unripe += 1;
            }
        }
        self.unripe_filtered += day_unripe as u64;

        // STEP 4: MINIMUM-GAP ELIGIBILITY
        let gap = self.config.min_hearing_gap_days;
        let eligible: Vec<usize> = ripe
            .into_iter()
            .filter(|&i| match self.cases[i].days_since_last_hearing(date) {
                Some(days) => days >= gap,
                None => true,
            })
            .collect();

        // STEP 5: POLICY PRIORITIZATION
        let ordered_ids: Vec<String> = {
            let refs: Vec<&Case> = eligible.iter().map(|&i| &self.cases[i]).collect();
            self.policy
                .prioritize(refs, date)
                .into_iter()
                .map(|case| case.id().to_string())
                .collect()
        };

        // STEP 6: CAPACITY TRUNCATION + ALLOCATION
        let total_capacity: u32 = self
            .courtrooms
            .iter()
            .map(|room| room.effective_capacity(date, &self.calendar))
            .sum();
        self.total_capacity_days += total_capacity as u64;

        let overflow = ordered_ids.len().saturating_sub(total_capacity as usize);
        if overflow > 0 {
            self.allocator.record_rejections(overflow as u64);
        }
        let truncated: Vec<String> = ordered_ids
            .into_iter()
            .take(total_capacity as usize)
            .collect();

        let allocation =
            self.allocator
                .allocate(&truncated, &self.courtrooms, date, &self.calendar);

        // STEP 7: OUTCOME SAMPLING
        // Courtrooms in id order, cases in priority order — this walk
        // fixes the order of RNG draws.
        let mut day_scheduled = 0usize;
        let mut day_heard = 0usize;
        let mut day_adjourned = 0usize;
        let mut day_disposed = 0usize;
        let mut heard_by_room: Vec<(String, u32)> = Vec::with_capacity(allocation.by_room().len());

        for (room_id, assigned) in allocation.by_room() {
            let mut room_heard = 0u32;

            for case_id in assigned {
                let i = match self.case_index.get(case_id) {
                    Some(&i) => i,
                    None => {
                        return Err(SimulationError::CaseState(format!(
                            "allocated unknown case {}",
                            case_id
                        )))
                    }
                };

                // Defensive: a case disposed between allocation and
                // sampling is a no-op, not an error.
                if self.cases[i].is_disposed() {
                    continue;
                }

                self.schedule_case(i, date, room_id);
                day_scheduled += 1;

                let adjournment_prob = self
                    .params
                    .adjournment_prob(self.cases[i].current_stage(), self.cases[i].case_type());

                if self.rng.bernoulli(adjournment_prob) {
                    self.cases[i].record_adjourned(date);
                    self.hearings_adjourned += 1;
                    day_adjourned += 1;

                    let event = EventRecord::for_case(date, EventKind::Outcome, &self.cases[i])
                        .in_courtroom(room_id)
                        .with_detail("adjourned");
                    self.log_event(event);
                    continue;
                }

                self.cases[i].record_heard(date);
                self.hearings_heard += 1;
                day_heard += 1;
                room_heard += 1;

                let event = EventRecord::for_case(date, EventKind::Outcome, &self.cases[i])
                    .in_courtroom(room_id)
                    .with_detail("heard");
                self.log_event(event);

                // 7a: natural disposal. The probability is zero outside
                // disposal-capable stages; the draw is still consumed so
                // the stream stays aligned.
                let disposal_prob = self.disposal_model.disposal_probability(
                    &self.cases[i],
                    date,
                    self.params.as_ref(),
                );
                if self.rng.bernoulli(disposal_prob) {
                    self.dispose_case(i, date, Some(room_id), "natural disposal")?;
                    day_disposed += 1;
                    continue;
                }

                // 7b: stage progression, gated on the stage-ready date
                let gate_open = match self.cases[i].stage_ready_date() {
                    Some(ready) => date >= ready,
                    None => true,
                };
                if gate_open && self.advance_stage(i, date, room_id)? {
                    day_disposed += 1;
                }
            }

            heard_by_room.push((room_id.clone(), room_heard));
        }

        // STEP 8: COURTROOM UTILIZATION RECORDS
        for (room_id, count) in heard_by_room {
            if let Some(room) = self.courtrooms.iter_mut().find(|r| r.id() == room_id) {
                room.record_heard(date, count);
            }
        }
        self.total_heard += day_heard as u64;

        // STEP 9: DAILY METRICS + PER-DAY FLUSH
        let metrics = DailyMetrics {
            date,
            total_cases: self.cases.iter().filter(|c| !c.is_disposed()).count(),
            scheduled: day_scheduled,
            heard: day_heard,
            adjourned: day_adjourned,
            disposals: self.disposals as usize,
            utilization: DailyMetrics::utilization_for(day_heard, total_capacity),
        };
        if let Some(sink) = &mut self.metrics_sink {
            sink.append(&metrics)?;
        }
        self.daily_metrics.push(metrics);

        if let Some(writer) = &mut self.event_writer {
            writer.flush()?;
        }

        Ok(DayResult {
            date,
            scheduled: day_scheduled,
            heard: day_heard,
            adjourned: day_adjourned,
            disposed: day_disposed,
            unripe_filtered: day_unripe,
            ripeness_changes: day_ripeness_changes,
        })
    }

    // ========================================================================
    // Step helpers
    // ========================================================================

    /// Generate and register this day's fresh filings, if enabled.
    fn generate_filings(&mut self, date: NaiveDate) -> Result<(), SimulationError> {
        let rate = self.config.filing_rate_per_day;
        if rate <= 0.0 {
            return Ok(());
        }
        let generator = match &mut self.filing_generator {
            Some(g) => g,
            None => return Ok(()),
        };

        let filings = generator.generate_filings(rate, date, &mut self.rng);
        for case in filings {
            if self.case_index.contains_key(case.id()) {
                return Err(SimulationError::CaseState(format!(
                    "filing with duplicate case id {}",
                    case.id()
                )));
            }
            let event = EventRecord::for_case(date, EventKind::Filing, &case).with_detail("filed");
            self.case_index.insert(case.id().to_string(), self.cases.len());
            self.cases.push(case);
            self.log_event(event);
        }
        Ok(())
    }

    /// Store a new ripeness status if it differs (by canonical value) and
    /// emit a `ripeness_change` event. Returns the number of events
    /// emitted (0 or 1).
    fn apply_ripeness(&mut self, i: usize, status: RipenessStatus, date: NaiveDate) -> usize {
        let old = self.cases[i].ripeness();
        if old.as_str() == status.as_str() {
            return 0;
        }

        let reason = ripeness_reason(status).map(str::to_string);
        let detail = match &reason {
            Some(reason) => format!("{} -> {} ({})", old.as_str(), status.as_str(), reason),
            None => format!("{} -> {}", old.as_str(), status.as_str()),
        };

        self.cases[i].set_ripeness(status, reason, date);
        self.ripeness_transitions += 1;

        let event = EventRecord::for_case(date, EventKind::RipenessChange, &self.cases[i])
            .with_detail(detail)
            .with_annotations(EventAnnotations {
                ripeness: Some(status.as_str().to_string()),
                ..EventAnnotations::default()
            });
        self.log_event(event);
        1
    }

    /// Mark a case scheduled and emit the `scheduled` event with its
    /// priority annotations.
    fn schedule_case(&mut self, i: usize, date: NaiveDate, room_id: &str) {
        let annotations = {
            let case = &self.cases[i];
            let readiness = if self.policy.requires_readiness_scores() {
                Some(case.readiness_score())
            } else {
                None
            };
            EventAnnotations {
                priority_score: readiness,
                age_days: Some(case.age_days(date)),
                readiness_score: readiness,
                urgent: Some(case.is_urgent()),
                adjournment_boost: case.adjournment_boost(date),
                ripeness: Some(case.ripeness().as_str().to_string()),
                days_since_last_hearing: case.days_since_last_hearing(date),
            }
        };

        self.cases[i].mark_scheduled(date);

        let event = EventRecord::for_case(date, EventKind::Scheduled, &self.cases[i])
            .in_courtroom(room_id)
            .with_detail(format!("listed ({})", self.policy.name()))
            .with_annotations(annotations);
        self.log_event(event);
    }

    /// Dispose a case and emit the `disposed` event.
    fn dispose_case(
        &mut self,
        i: usize,
        date: NaiveDate,
        room_id: Option<&str>,
        detail: &str,
    ) -> Result<(), SimulationError> {
        self.cases[i]
            .dispose(date)
            .map_err(|e| SimulationError::CaseState(e.to_string()))?;
        self.disposals += 1;

        let mut event = EventRecord::for_case(date, EventKind::Disposed, &self.cases[i])
            .with_detail(detail);
        if let Some(room_id) = room_id {
            event = event.in_courtroom(room_id);
        }
        self.log_event(event);
        Ok(())
    }

    /// Sample and apply a stage transition for a heard case whose gate
    /// has elapsed. Returns true if the transition disposed the case.
    fn advance_stage(
        &mut self,
        i: usize,
        date: NaiveDate,
        room_id: &str,
    ) -> Result<bool, SimulationError> {
        let old_stage = self.cases[i].current_stage().to_string();

        let next_stage = {
            let table = self.params.stage_transitions(&old_stage);
            if table.is_empty() {
                // Absorbing stage: nothing to sample
                return Ok(false);
            }
            let draw = self.rng.next_f64();
            table
                .iter()
                .find(|(_, cumulative)| *cumulative >= draw)
                .map(|(stage, _)| stage.clone())
                // Cumulative tables may fall short of 1.0; the last entry
                // is the documented fallback
                .unwrap_or_else(|| table[table.len() - 1].0.clone())
        };

        self.cases[i].set_stage(next_stage.clone());

        let event = EventRecord::for_case(date, EventKind::StageChange, &self.cases[i])
            .in_courtroom(room_id)
            .with_detail(format!("{} -> {}", old_stage, next_stage));
        self.log_event(event);

        if self.terminal_stages.contains(&next_stage) || self.cases[i].is_disposed() {
            if !self.cases[i].is_disposed() {
                self.dispose_case(i, date, Some(room_id), "terminal stage")?;
            }
            return Ok(true);
        }

        // New stage: restart the duration gate, floored at 1 day
        let duration = self.params.stage_duration(&next_stage, self.config.percentile);
        let days = (duration as i64).max(1);
        self.cases[i].set_stage_ready_date(date + Duration::days(days));

        Ok(false)
    }
}

// Manual Debug implementation (the boxed policy does not implement Debug)
impl std::fmt::Debug for CourtSim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CourtSim")
            .field("num_cases", &self.cases.len())
            .field("num_courtrooms", &self.courtrooms.len())
            .field("policy", &self.policy.name())
            .field("event_count", &self.event_log.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

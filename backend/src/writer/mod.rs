//! Event-log and metrics sinks
//!
//! The event log is the audit trail of record, written as a
//! CSV-compatible table with a fixed column schema: column order is
//! stable and every column is present in every row, empty when not
//! meaningful for the event type.
//!
//! `EventWriter` buffers rows in memory during a simulated day; `flush`
//! appends all buffered rows to the backing store exactly once per day.
//! A flush is all-or-nothing from the caller's perspective: if the
//! underlying append fails, the buffer is retained, never silently
//! cleared — the failure surfaces to the caller because dropping audit
//! rows is not recoverable mid-run.

use crate::models::{DailyMetrics, EventRecord};
use std::fs::File;
use std::path::Path;
use thiserror::Error;

/// Column schema of the event-log file. Order is part of the contract
/// with downstream reporting tools.
pub const EVENT_LOG_COLUMNS: &[&str] = &[
    "date",
    "event_type",
    "case_id",
    "case_type",
    "stage",
    "courtroom_id",
    "detail",
    "priority_score",
    "age_days",
    "readiness_score",
    "urgent",
    "adjournment_boost",
    "ripeness",
    "days_since_last_hearing",
];

/// Column schema of the daily-metrics file.
pub const METRICS_COLUMNS: &[&str] = &[
    "date",
    "total_cases",
    "scheduled",
    "heard",
    "adjourned",
    "disposals",
    "utilization",
];

/// Errors from writing the event log or metrics files
#[derive(Debug, Error)]
pub enum WriterError {
    #[error("event log I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Append-only backing store for event rows.
pub trait EventSink {
    /// Append all rows, atomically from the caller's perspective: either
    /// every row is accepted or an error is returned and the caller keeps
    /// its buffer.
    fn append(&mut self, rows: &[EventRecord]) -> Result<(), WriterError>;
}

impl EventSink for Box<dyn EventSink> {
    fn append(&mut self, rows: &[EventRecord]) -> Result<(), WriterError> {
        (**self).append(rows)
    }
}

/// Append-only backing store for daily metrics rows.
pub trait MetricsSink {
    fn append(&mut self, row: &DailyMetrics) -> Result<(), WriterError>;
}

impl MetricsSink for Box<dyn MetricsSink> {
    fn append(&mut self, row: &DailyMetrics) -> Result<(), WriterError> {
        (**self).append(row)
    }
}

/// Buffering writer over an event sink.
///
/// # Example
/// ```
/// use court_simulator_core_rs::writer::{EventWriter, MemoryEventSink};
///
/// let mut writer = EventWriter::new(MemoryEventSink::new());
/// assert_eq!(writer.buffered(), 0);
/// assert_eq!(writer.flush().unwrap(), 0);
/// ```
pub struct EventWriter<S: EventSink> {
    buffer: Vec<EventRecord>,
    sink: S,
}

impl<S: EventSink> EventWriter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            buffer: Vec::new(),
            sink,
        }
    }

    /// Buffer one row in memory.
    pub fn write(&mut self, record: EventRecord) {
        self.buffer.push(record);
    }

    /// Rows currently buffered.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Append all buffered rows to the sink and clear the buffer.
    ///
    /// Returns the number of rows flushed. On error the buffer is
    /// retained in full.
    pub fn flush(&mut self) -> Result<usize, WriterError> {
        if self.buffer.is_empty() {
            return Ok(0);
        }
        self.sink.append(&self.buffer)?;
        let flushed = self.buffer.len();
        self.buffer.clear();
        Ok(flushed)
    }

    /// Access the underlying sink (used by tests to inspect rows).
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the underlying sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

// ============================================================================
// CSV sinks
// ============================================================================

/// CSV file event sink. The header row is written when the store is
/// initialized.
pub struct CsvEventSink {
    writer: csv::Writer<File>,
}

impl CsvEventSink {
    /// Create (or truncate) the event-log file and write the header row.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, WriterError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(EVENT_LOG_COLUMNS)?;
        writer.flush()?;
        Ok(Self { writer })
    }
}

impl EventSink for CsvEventSink {
    fn append(&mut self, rows: &[EventRecord]) -> Result<(), WriterError> {
        for row in rows {
            self.writer.write_record(&event_row(row))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// CSV file metrics sink, one row per simulated day.
pub struct CsvMetricsSink {
    writer: csv::Writer<File>,
}

impl CsvMetricsSink {
    /// Create (or truncate) the metrics file and write the header row.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, WriterError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(METRICS_COLUMNS)?;
        writer.flush()?;
        Ok(Self { writer })
    }
}

impl MetricsSink for CsvMetricsSink {
    fn append(&mut self, row: &DailyMetrics) -> Result<(), WriterError> {
        self.writer.write_record(&[
            row.date.to_string(),
            row.total_cases.to_string(),
            row.scheduled.to_string(),
            row.heard.to_string(),
            row.adjourned.to_string(),
            row.disposals.to_string(),
            // Utilization fraction with exactly 4 decimal places
            format!("{:.4}", row.utilization),
        ])?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Serialize one event record into the fixed column order. Absent
/// optional fields become empty cells, never dropped columns.
fn event_row(record: &EventRecord) -> Vec<String> {
    let a = &record.annotations;
    vec![
        record.date.to_string(),
        record.kind.as_str().to_string(),
        record.case_id.clone(),
        record.case_type.clone(),
        record.stage.clone(),
        record.courtroom_id.clone().unwrap_or_default(),
        record.detail.clone(),
        fmt_opt_f64(a.priority_score),
        fmt_opt_i64(a.age_days),
        fmt_opt_f64(a.readiness_score),
        a.urgent.map(|u| u.to_string()).unwrap_or_default(),
        fmt_opt_f64(a.adjournment_boost),
        a.ripeness.clone().unwrap_or_default(),
        fmt_opt_i64(a.days_since_last_hearing),
    ]
}

fn fmt_opt_f64(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_default()
}

fn fmt_opt_i64(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// ============================================================================
// In-memory sinks (tests and embedded use)
// ============================================================================

/// In-memory event sink with optional injected append failure.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    rows: Vec<EventRecord>,
    fail_next_append: bool,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows appended so far.
    pub fn rows(&self) -> &[EventRecord] {
        &self.rows
    }

    /// Make the next `append` call fail (one-shot).
    pub fn fail_next_append(&mut self) {
        self.fail_next_append = true;
    }
}

impl EventSink for MemoryEventSink {
    fn append(&mut self, rows: &[EventRecord]) -> Result<(), WriterError> {
        if self.fail_next_append {
            self.fail_next_append = false;
            return Err(WriterError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "injected append failure",
            )));
        }
        self.rows.extend_from_slice(rows);
        Ok(())
    }
}

/// In-memory metrics sink.
#[derive(Debug, Default)]
pub struct MemoryMetricsSink {
    rows: Vec<DailyMetrics>,
}

impl MemoryMetricsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[DailyMetrics] {
        &self.rows
    }
}

impl MetricsSink for MemoryMetricsSink {
    fn append(&mut self, row: &DailyMetrics) -> Result<(), WriterError> {
        self.rows.push(row.clone());
        Ok(())
    }
}

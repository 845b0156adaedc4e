//! Schedule types shared by every algorithm.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;
use crate::metrics::Metrics;
use crate::task::Task;
use crate::time::WorkingHours;
use crate::urgency::SchedulingWeight;

pub const DEFAULT_TIME_QUANTUM: i32 = 60;

/// Algorithm tag. Ordering is the comparison/tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "SJF")]
    Sjf,
    RoundRobin,
    Priority,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Sjf, Algorithm::RoundRobin, Algorithm::Priority];

    pub fn tag(self) -> &'static str {
        match self {
            Algorithm::Sjf => "SJF",
            Algorithm::RoundRobin => "RoundRobin",
            Algorithm::Priority => "Priority",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Algorithm {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SchedulerError::InvalidAlgorithm(s.to_string()))
    }
}

/// Knobs a caller may set per request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulingOptions {
    pub working_hours: WorkingHours,
    /// Round-Robin slice length in minutes; must be >= 1.
    pub time_quantum: i32,
}

impl Default for SchedulingOptions {
    fn default() -> Self {
        Self {
            working_hours: WorkingHours::default(),
            time_quantum: DEFAULT_TIME_QUANTUM,
        }
    }
}

/// Algorithm-specific data attached to an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryDetail {
    /// Non-preemptive placement (SJF).
    Sequential,
    /// One Round-Robin slice.
    Slice {
        /// Minutes actually run in this slice.
        quantum: i32,
        /// Minutes still owed after this slice.
        remaining_time: i32,
        is_complete: bool,
    },
    /// Priority placement with the weight that ranked it.
    Weighted { weight: SchedulingWeight },
}

/// One contiguous placement of (a slice of) a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub task: Task,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub algorithm: Algorithm,
    pub detail: EntryDetail,
}

impl ScheduleEntry {
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub algorithm: Algorithm,
    pub entries: Vec<ScheduleEntry>,
    pub total_span_minutes: i64,
    pub metrics: Metrics,
}

impl ScheduleResult {
    /// Result for a request with no eligible tasks.
    pub fn empty(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            entries: Vec::new(),
            total_span_minutes: 0,
            metrics: Metrics::default(),
        }
    }

    /// Wrap finished entries, scoring them against the `eligible` task count.
    pub fn from_entries(algorithm: Algorithm, entries: Vec<ScheduleEntry>, eligible: usize) -> Self {
        let metrics = Metrics::calculate(&entries, eligible);
        let total_span_minutes = total_span_minutes(&entries);
        Self {
            algorithm,
            entries,
            total_span_minutes,
            metrics,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries belonging to one task, in schedule order.
    pub fn entries_for<'a>(&'a self, task_id: &'a str) -> impl Iterator<Item = &'a ScheduleEntry> + 'a {
        self.entries.iter().filter(move |e| e.task.id == task_id)
    }
}

fn total_span_minutes(entries: &[ScheduleEntry]) -> i64 {
    let (Some(first), Some(last)) = (entries.first(), entries.last()) else {
        return 0;
    };
    let millis = (last.end_time - first.start_time).num_milliseconds();
    (millis as f64 / 60_000.0).ceil() as i64
}

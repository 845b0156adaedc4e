//! Schedule quality metrics.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Wait time | entry start - schedule start |
//! | Turnaround time | entry end - schedule start |
//! | On-time completion | % of entries ending at or before the task's due date |
//! | Utilization | occupied time / (last end - first start) |
//!
//! Averages are whole minutes rounded up; percentages carry one decimal.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleEntry;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    /// Eligible tasks handed to the algorithm.
    pub total_tasks: usize,
    /// Number of entries (Round-Robin emits one per slice).
    pub scheduled_tasks: usize,
    /// Minutes.
    pub average_wait_time: i64,
    /// Minutes.
    pub average_turnaround_time: i64,
    /// Percentage, 0.0..=100.0.
    pub on_time_completion: f64,
    /// Percentage, 0.0..=100.0.
    pub utilization_rate: f64,
}

pub fn wait_time(entry: &ScheduleEntry, schedule_start: DateTime<Utc>) -> Duration {
    entry.start_time - schedule_start
}

pub fn turnaround_time(entry: &ScheduleEntry, schedule_start: DateTime<Utc>) -> Duration {
    entry.end_time - schedule_start
}

impl Metrics {
    pub fn calculate(entries: &[ScheduleEntry], total_tasks: usize) -> Self {
        let (Some(first), Some(last)) = (entries.first(), entries.last()) else {
            return Self {
                total_tasks,
                ..Self::default()
            };
        };

        let origin = first.start_time;
        let n = entries.len() as f64;

        let mut total_wait_ms: i64 = 0;
        let mut total_turnaround_ms: i64 = 0;
        let mut occupied_ms: i64 = 0;
        let mut on_time: usize = 0;

        for entry in entries {
            total_wait_ms += wait_time(entry, origin).num_milliseconds();
            total_turnaround_ms += turnaround_time(entry, origin).num_milliseconds();
            occupied_ms += entry.duration().num_milliseconds();
            if entry.end_time <= entry.task.due_date {
                on_time += 1;
            }
        }

        let span_ms = (last.end_time - origin).num_milliseconds();
        let utilization = if span_ms > 0 {
            occupied_ms as f64 / span_ms as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total_tasks,
            scheduled_tasks: entries.len(),
            average_wait_time: ceil_minutes(total_wait_ms as f64 / n),
            average_turnaround_time: ceil_minutes(total_turnaround_ms as f64 / n),
            on_time_completion: round1(on_time as f64 / n * 100.0),
            utilization_rate: round1(utilization),
        }
    }

    /// Composite score used to rank algorithms; higher is better.
    pub fn score(&self) -> f64 {
        self.on_time_completion * 0.4
            + self.utilization_rate * 0.3
            + (100.0 - self.average_wait_time as f64) * 0.2
            + (100.0 - self.average_turnaround_time as f64) * 0.1
    }
}

fn ceil_minutes(millis: f64) -> i64 {
    (millis / 60_000.0).ceil() as i64
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

//! Scheduling analytics over recently completed tasks.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::round1;
use crate::schedule::Algorithm;
use crate::task::{Task, TaskStatus};

pub const DEFAULT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeVariance {
    pub task_id: String,
    /// Minutes.
    pub estimated: i32,
    /// Minutes.
    pub actual: i32,
    /// actual - estimated, minutes.
    pub variance: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchedulingAnalytics {
    pub total_completed_tasks: usize,
    pub algorithm_usage: BTreeMap<Algorithm, usize>,
    /// Mean estimate accuracy, percentage with one decimal.
    pub average_accuracy: f64,
    /// Percentage with one decimal.
    pub on_time_completion: f64,
    pub time_variance: Vec<TimeVariance>,
}

impl SchedulingAnalytics {
    /// Analyse tasks completed within the last `window_days` that were placed
    /// by one of the algorithms.
    pub fn calculate(tasks: &[Task], now: DateTime<Utc>, window_days: i64) -> Self {
        let since = now - Duration::days(window_days);

        let completed: Vec<(&Task, DateTime<Utc>, Algorithm)> = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .filter_map(|t| {
                let completed_at = t.completed_at.filter(|at| *at >= since)?;
                let algorithm = t.scheduled.as_ref()?.algorithm;
                Some((t, completed_at, algorithm))
            })
            .collect();

        if completed.is_empty() {
            return Self::default();
        }

        let mut algorithm_usage = BTreeMap::new();
        let mut time_variance = Vec::new();
        let mut total_accuracy = 0.0;
        let mut on_time = 0usize;

        for (task, completed_at, algorithm) in &completed {
            *algorithm_usage.entry(*algorithm).or_insert(0) += 1;

            if let Some(actual) = task
                .actual_time_spent
                .filter(|a| *a > 0 && task.estimated_duration > 0)
            {
                total_accuracy += estimate_accuracy(task.estimated_duration, actual);
                time_variance.push(TimeVariance {
                    task_id: task.id.clone(),
                    estimated: task.estimated_duration,
                    actual,
                    variance: actual - task.estimated_duration,
                });
            }

            if *completed_at <= task.due_date {
                on_time += 1;
            }
        }

        // Tasks without an actual time count as zero accuracy.
        let n = completed.len() as f64;
        Self {
            total_completed_tasks: completed.len(),
            algorithm_usage,
            average_accuracy: round1(total_accuracy / n),
            on_time_completion: round1(on_time as f64 / n * 100.0),
            time_variance,
        }
    }
}

/// `max(0, 100 - |actual - estimated| / estimated * 100)`.
pub fn estimate_accuracy(estimated: i32, actual: i32) -> f64 {
    let error = f64::from(actual - estimated) / f64::from(estimated) * 100.0;
    (100.0 - error.abs()).max(0.0)
}

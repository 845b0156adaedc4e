//! Urgency and scheduling weight.
//!
//! Both are pure functions of the task and an explicit `now`; nothing here
//! reads the wall clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::Task;

const HOURS_PER_WEEK: f64 = 168.0;

/// 1-10 time pressure score; 10 when overdue, lower the further out `due_date` is.
pub fn urgency(due_date: DateTime<Utc>, now: DateTime<Utc>) -> u8 {
    let hours_left = (due_date - now).num_milliseconds() as f64 / 3_600_000.0;

    if hours_left < 0.0 {
        return 10;
    }
    if hours_left < 24.0 {
        return 9;
    }
    if hours_left < 48.0 {
        return 8;
    }
    if hours_left < HOURS_PER_WEEK {
        return 7;
    }

    let weeks = (hours_left / HOURS_PER_WEEK).floor();
    (6.0 - weeks).max(1.0) as u8
}

/// `priority*0.4 + urgency*0.4 + (60 - duration)*0.2`.
///
/// Not clamped: tasks longer than an hour pull the weight down and can push
/// it negative.
pub fn combined_weight(priority: u8, urgency: u8, estimated_duration: i32) -> f64 {
    f64::from(priority) * 0.4 + f64::from(urgency) * 0.4 + (60.0 - f64::from(estimated_duration)) * 0.2
}

/// Inputs and result of the weight calculation for one task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulingWeight {
    pub priority: u8,
    pub urgency: u8,
    pub estimated_duration: i32,
    pub combined_weight: f64,
}

impl SchedulingWeight {
    pub fn of(task: &Task, now: DateTime<Utc>) -> Self {
        let urgency = urgency(task.due_date, now);
        Self {
            priority: task.priority,
            urgency,
            estimated_duration: task.estimated_duration,
            combined_weight: combined_weight(task.priority, urgency, task.estimated_duration),
        }
    }
}

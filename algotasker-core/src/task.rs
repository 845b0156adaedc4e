//! Task model consumed by the scheduling engine.
//!
//! The engine only reads tasks. Storage and ownership belong to the caller;
//! the optional bookkeeping fields (`scheduled`, `completed_at`, ...) are
//! carried so callers can round-trip their records through the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};
use crate::schedule::Algorithm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    /// Only pending and in-progress tasks are placed on the calendar.
    pub fn is_schedulable(self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::InProgress)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Work,
    Personal,
    Urgent,
    Meeting,
    #[default]
    Other,
}

/// A placement previously written back onto a task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub algorithm: Algorithm,
}

/// Core task type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub status: TaskStatus,

    /// 1-5, 5 is most important.
    pub priority: u8,

    /// Minutes of work to place on the calendar.
    pub estimated_duration: i32,

    pub due_date: DateTime<Utc>,

    #[serde(default)]
    pub category: TaskCategory,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled: Option<ScheduledSlot>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Minutes actually spent, recorded on completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_time_spent: Option<i32>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, due_date: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            status: TaskStatus::Pending,
            priority: 3,
            estimated_duration: 30,
            due_date,
            category: TaskCategory::Other,
            tags: Vec::new(),
            scheduled: None,
            completed_at: None,
            actual_time_spent: None,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_duration(mut self, minutes: i32) -> Self {
        self.estimated_duration = minutes;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = category;
        self
    }

    pub fn completed(mut self, at: DateTime<Utc>, actual_minutes: Option<i32>) -> Self {
        self.status = TaskStatus::Completed;
        self.completed_at = Some(at);
        self.actual_time_spent = actual_minutes;
        self
    }

    pub fn with_scheduled(mut self, slot: ScheduledSlot) -> Self {
        self.scheduled = Some(slot);
        self
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        now > self.due_date && self.status != TaskStatus::Completed
    }

    /// Record invariants required before a task reaches the engine.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| SchedulerError::InvalidTask {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id must be non-empty"));
        }
        if !(1..=5).contains(&self.priority) {
            return Err(invalid("priority must be 1..=5"));
        }
        if self.estimated_duration < 1 {
            return Err(invalid("estimated_duration must be at least 1 minute"));
        }
        Ok(())
    }
}

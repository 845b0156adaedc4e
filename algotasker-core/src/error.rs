//! Engine errors.
//!
//! The engine does no I/O, so every failure here is a caller input problem
//! surfaced synchronously. An empty task set is not an error.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("invalid algorithm '{0}': must be one of SJF, RoundRobin, Priority")]
    InvalidAlgorithm(String),

    #[error("invalid time quantum {0}: must be at least 1 minute")]
    InvalidTimeQuantum(i32),

    #[error("invalid working hours: {0}")]
    InvalidWorkingHours(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("invalid task '{id}': {reason}")]
    InvalidTask { id: String, reason: String },
}

pub type Result<T, E = SchedulerError> = std::result::Result<T, E>;

//! algotasker-core: CPU-scheduling algorithms applied to personal tasks.
//!
//! Shortest-Job-First, Round-Robin and Priority scheduling place tasks into
//! daily working hours; the metrics and comparison layer scores each
//! schedule and recommends an algorithm. Every entry point takes `now`
//! explicitly and holds no state between calls.

pub mod agenda;
pub mod algorithms;
pub mod analytics;
pub mod compare;
pub mod error;
pub mod metrics;
pub mod schedule;
pub mod task;
pub mod time;
pub mod urgency;

pub use agenda::{apply_schedule, clear_schedule, group_by_day};
pub use algorithms::{
    Scheduler, priority_scheduling, round_robin, schedule_tasks, shortest_job_first,
};
pub use analytics::{SchedulingAnalytics, TimeVariance};
pub use compare::{
    Comparison, ComparisonOutcome, NO_RECOMMENDATION, Recommendation, compare_algorithms,
    compare_with, recommend,
};
pub use error::{Result, SchedulerError};
pub use metrics::Metrics;
pub use schedule::{
    Algorithm, DEFAULT_TIME_QUANTUM, EntryDetail, ScheduleEntry, ScheduleResult,
    SchedulingOptions,
};
pub use task::{ScheduledSlot, Task, TaskCategory, TaskStatus};
pub use time::{WorkingHours, next_working_instant, parse_local_datetime, place_duration};
pub use urgency::{SchedulingWeight, combined_weight, urgency};

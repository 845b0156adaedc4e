//! Scheduling algorithms: Shortest-Job-First, Round-Robin and Priority.
//!
//! Every algorithm:
//! 1) drops tasks that are not pending / in-progress
//! 2) orders the rest (or cycles through them, for Round-Robin)
//! 3) walks a cursor from the first working instant at or after `now`,
//!    placing each task (or slice) with [`place_duration`]
//!
//! Output is a pure function of the inputs; `now` is always explicit.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{Result, SchedulerError};
use crate::schedule::{Algorithm, EntryDetail, ScheduleEntry, ScheduleResult, SchedulingOptions};
use crate::task::Task;
use crate::time::{WorkingHours, next_working_instant, place_duration};
use crate::urgency::SchedulingWeight;

/// Something that turns a task set into a schedule.
pub trait Scheduler {
    fn algorithm(&self) -> Algorithm;

    fn schedule(
        &self,
        tasks: &[Task],
        options: &SchedulingOptions,
        now: DateTime<Utc>,
    ) -> Result<ScheduleResult>;
}

impl Scheduler for Algorithm {
    fn algorithm(&self) -> Algorithm {
        *self
    }

    fn schedule(
        &self,
        tasks: &[Task],
        options: &SchedulingOptions,
        now: DateTime<Utc>,
    ) -> Result<ScheduleResult> {
        schedule_tasks(tasks, *self, options, now)
    }
}

/// Run one algorithm over `tasks`.
///
/// Parameters are checked before any work, so an invalid quantum is
/// rejected even when there is nothing to schedule.
pub fn schedule_tasks(
    tasks: &[Task],
    algorithm: Algorithm,
    options: &SchedulingOptions,
    now: DateTime<Utc>,
) -> Result<ScheduleResult> {
    let hours = &options.working_hours;
    match algorithm {
        Algorithm::Sjf => Ok(shortest_job_first(tasks, hours, now)),
        Algorithm::RoundRobin => round_robin(tasks, hours, now, options.time_quantum),
        Algorithm::Priority => Ok(priority_scheduling(tasks, hours, now)),
    }
}

fn eligible(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|t| t.status.is_schedulable()).collect()
}

/// Place tasks back to back in the given order, one entry each.
fn place_sequentially<'a>(
    algorithm: Algorithm,
    ordered: impl IntoIterator<Item = (&'a Task, EntryDetail)>,
    hours: &WorkingHours,
    now: DateTime<Utc>,
) -> Vec<ScheduleEntry> {
    let mut cursor = next_working_instant(now, hours);
    let mut entries = Vec::new();

    for (task, detail) in ordered {
        let (start_time, end_time) = place_duration(cursor, task.estimated_duration, hours);
        entries.push(ScheduleEntry {
            task: task.clone(),
            start_time,
            end_time,
            algorithm,
            detail,
        });
        cursor = end_time;
    }

    entries
}

/// Shortest-Job-First: ascending `estimated_duration`, ties keep input order.
pub fn shortest_job_first(tasks: &[Task], hours: &WorkingHours, now: DateTime<Utc>) -> ScheduleResult {
    let mut ordered = eligible(tasks);
    ordered.sort_by_key(|t| t.estimated_duration);

    let entries = place_sequentially(
        Algorithm::Sjf,
        ordered.iter().map(|t| (*t, EntryDetail::Sequential)),
        hours,
        now,
    );
    debug!(tasks = ordered.len(), entries = entries.len(), "SJF schedule built");

    ScheduleResult::from_entries(Algorithm::Sjf, entries, ordered.len())
}

/// Priority: descending combined weight, ties broken by earlier due date.
pub fn priority_scheduling(tasks: &[Task], hours: &WorkingHours, now: DateTime<Utc>) -> ScheduleResult {
    let mut ranked: Vec<(&Task, SchedulingWeight)> = eligible(tasks)
        .into_iter()
        .map(|t| (t, SchedulingWeight::of(t, now)))
        .collect();

    ranked.sort_by(|(a, wa), (b, wb)| {
        // weight desc
        wb.combined_weight
            .total_cmp(&wa.combined_weight)
            // then due date asc
            .then_with(|| a.due_date.cmp(&b.due_date))
    });

    let entries = place_sequentially(
        Algorithm::Priority,
        ranked
            .iter()
            .map(|(t, weight)| (*t, EntryDetail::Weighted { weight: *weight })),
        hours,
        now,
    );
    debug!(tasks = ranked.len(), entries = entries.len(), "Priority schedule built");

    ScheduleResult::from_entries(Algorithm::Priority, entries, ranked.len())
}

/// Queue slot for Round-Robin. Re-enqueueing pushes a fresh value with the
/// reduced remainder; the task itself is never mutated.
#[derive(Debug, Clone, Copy)]
struct QueuedTask<'a> {
    task: &'a Task,
    remaining: i32,
}

/// Round-Robin: FIFO over tasks, each turn runs at most `time_quantum` minutes.
pub fn round_robin(
    tasks: &[Task],
    hours: &WorkingHours,
    now: DateTime<Utc>,
    time_quantum: i32,
) -> Result<ScheduleResult> {
    if time_quantum < 1 {
        return Err(SchedulerError::InvalidTimeQuantum(time_quantum));
    }

    let mut queue: VecDeque<QueuedTask<'_>> = eligible(tasks)
        .into_iter()
        .map(|task| QueuedTask {
            task,
            remaining: task.estimated_duration,
        })
        .collect();
    let eligible_count = queue.len();

    let mut cursor = next_working_instant(now, hours);
    let mut entries = Vec::new();

    while let Some(slot) = queue.pop_front() {
        let run = slot.remaining.min(time_quantum);
        let (start_time, end_time) = place_duration(cursor, run, hours);
        let remaining = slot.remaining - run;

        entries.push(ScheduleEntry {
            task: slot.task.clone(),
            start_time,
            end_time,
            algorithm: Algorithm::RoundRobin,
            detail: EntryDetail::Slice {
                quantum: run,
                remaining_time: remaining.max(0),
                is_complete: remaining <= 0,
            },
        });
        cursor = end_time;

        if remaining > 0 {
            queue.push_back(QueuedTask { remaining, ..slot });
        }
    }

    debug!(
        tasks = eligible_count,
        slices = entries.len(),
        time_quantum,
        "RoundRobin schedule built"
    );

    Ok(ScheduleResult::from_entries(Algorithm::RoundRobin, entries, eligible_count))
}

//! Write a schedule back onto task records, and read the current agenda off them.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::schedule::ScheduleResult;
use crate::task::{ScheduledSlot, Task};

/// Return `tasks` with `scheduled` set for every task that appears in `result`.
///
/// A Round-Robin task spans from its first slice's start to its last slice's
/// end. Tasks without entries come back unchanged.
pub fn apply_schedule(tasks: &[Task], result: &ScheduleResult) -> Vec<Task> {
    tasks
        .iter()
        .map(|task| {
            let mut entries = result.entries_for(&task.id);
            let Some(first) = entries.next() else {
                return task.clone();
            };
            let end_time = entries.last().map_or(first.end_time, |e| e.end_time);

            task.clone().with_scheduled(ScheduledSlot {
                start_time: first.start_time,
                end_time,
                algorithm: result.algorithm,
            })
        })
        .collect()
}

/// Return `tasks` with every scheduled slot removed.
pub fn clear_schedule(tasks: &[Task]) -> Vec<Task> {
    tasks
        .iter()
        .map(|task| Task {
            scheduled: None,
            ..task.clone()
        })
        .collect()
}

/// Open tasks with a scheduled slot, grouped by the UTC date of their start.
pub fn group_by_day(tasks: &[Task]) -> BTreeMap<NaiveDate, Vec<Task>> {
    let mut scheduled: Vec<(&Task, &ScheduledSlot)> = tasks
        .iter()
        .filter(|t| t.status.is_schedulable())
        .filter_map(|t| t.scheduled.as_ref().map(|s| (t, s)))
        .collect();
    scheduled.sort_by_key(|(_, slot)| slot.start_time);

    let mut days: BTreeMap<NaiveDate, Vec<Task>> = BTreeMap::new();
    for (task, slot) in scheduled {
        days.entry(slot.start_time.date_naive())
            .or_default()
            .push(task.clone());
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::round_robin;
    use crate::schedule::Algorithm;
    use crate::task::TaskStatus;
    use crate::time::WorkingHours;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, h, m, 0).unwrap()
    }

    #[test]
    fn apply_spans_round_robin_slices() {
        let now = at(2, 8, 0);
        let tasks = vec![
            Task::new("a", "a", now + Duration::days(2)).with_duration(90),
            Task::new("b", "b", now + Duration::days(2)).with_duration(30),
            Task::new("done", "done", now).with_status(TaskStatus::Completed),
        ];
        let result = round_robin(&tasks, &WorkingHours::default(), now, 60).unwrap();
        let updated = apply_schedule(&tasks, &result);

        // a: 09:00-10:00, b: 10:00-10:30, a: 10:30-11:00
        let slot = updated[0].scheduled.as_ref().unwrap();
        assert_eq!(slot.start_time, at(2, 9, 0));
        assert_eq!(slot.end_time, at(2, 11, 0));
        assert_eq!(slot.algorithm, Algorithm::RoundRobin);

        let slot = updated[1].scheduled.as_ref().unwrap();
        assert_eq!((slot.start_time, slot.end_time), (at(2, 10, 0), at(2, 10, 30)));

        assert_eq!(updated[2], tasks[2]);
    }

    #[test]
    fn clear_undoes_apply() {
        let now = at(2, 8, 0);
        let tasks = vec![
            Task::new("a", "a", now + Duration::days(2)).with_duration(90),
            Task::new("b", "b", now + Duration::days(2)).with_duration(30),
            Task::new("done", "done", now).with_status(TaskStatus::Completed),
        ];
        let result = round_robin(&tasks, &WorkingHours::default(), now, 60).unwrap();
        let applied = apply_schedule(&tasks, &result);
        assert!(applied[0].scheduled.is_some());

        assert_eq!(clear_schedule(&applied), tasks);
    }

    #[test]
    fn clear_drops_slots_on_closed_tasks_too() {
        let due = at(9, 0, 0);
        let slot = ScheduledSlot {
            start_time: at(2, 9, 0),
            end_time: at(2, 9, 30),
            algorithm: Algorithm::Priority,
        };
        let tasks = vec![
            Task::new("done", "done", due)
                .with_scheduled(slot.clone())
                .completed(at(2, 9, 30), Some(30)),
            Task::new("open", "open", due).with_scheduled(slot),
        ];

        let cleared = clear_schedule(&tasks);
        assert!(cleared.iter().all(|t| t.scheduled.is_none()));
        assert_eq!(cleared[0].completed_at, tasks[0].completed_at);
        assert!(group_by_day(&cleared).is_empty());
    }

    #[test]
    fn group_by_day_orders_within_and_across_days() {
        let due = at(9, 0, 0);
        let slot = |start: DateTime<Utc>| ScheduledSlot {
            start_time: start,
            end_time: start + Duration::minutes(30),
            algorithm: Algorithm::Sjf,
        };
        let tasks = vec![
            Task::new("late", "late", due).with_scheduled(slot(at(3, 14, 0))),
            Task::new("early", "early", due).with_scheduled(slot(at(3, 9, 0))),
            Task::new("mon", "mon", due).with_scheduled(slot(at(2, 16, 0))),
            Task::new("unscheduled", "x", due),
            Task::new("closed", "x", due)
                .with_status(TaskStatus::Cancelled)
                .with_scheduled(slot(at(2, 10, 0))),
        ];

        let days = group_by_day(&tasks);
        let keys: Vec<NaiveDate> = days.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()
            ]
        );

        let tuesday: Vec<&str> = days[&keys[1]].iter().map(|t| t.id.as_str()).collect();
        assert_eq!(tuesday, vec!["early", "late"]);
        assert_eq!(days[&keys[0]].len(), 1);
    }
}
